#![allow(dead_code)]

use hamlet_oracle::layers::embedding::WordEmbedding;
use hamlet_oracle::layers::linear::LinearLayer;
use hamlet_oracle::models::lstm_network::LSTMNetwork;
use hamlet_oracle::{AppContext, NextWordModel, OracleConfig, Vocabulary};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const WINDOW: usize = 3;

pub fn king_vocab() -> Vocabulary {
    Vocabulary::from_words(["the", "king", "is", "dead"]).unwrap()
}

/// A model whose output ignores its input: the dense layer has zero weights
/// and a bias that peaks at `winner`.
pub fn rigged_model(winner: usize) -> NextWordModel {
    let mut rng = StdRng::seed_from_u64(9);
    let embedding = WordEmbedding::new_random(5, 4, &mut rng);
    let lstm = LSTMNetwork::new_random(4, &[6, 3], &mut rng);

    let mut bias = Array2::zeros((5, 1));
    bias[[winner, 0]] = 5.0;
    let output = LinearLayer::from_weights(Array2::zeros((5, 3)), bias).unwrap();

    NextWordModel::from_parts(embedding, lstm, output, WINDOW).unwrap()
}

pub fn random_model(seed: u64) -> NextWordModel {
    let mut rng = StdRng::seed_from_u64(seed);
    NextWordModel::new_random(5, 4, &[6, 3], WINDOW, &mut rng).unwrap()
}

pub fn rigged_context(winner: usize) -> AppContext {
    AppContext::new(Box::new(rigged_model(winner)), king_vocab(), OracleConfig::default()).unwrap()
}
