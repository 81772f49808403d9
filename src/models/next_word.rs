//! Next-word model: embedding → stacked LSTM → dense softmax.

use ndarray::{Array1, Axis};
use rand::Rng;

use crate::error::{OracleError, Result};
use crate::layers::embedding::WordEmbedding;
use crate::layers::linear::LinearLayer;
use crate::models::lstm_network::LSTMNetwork;
use crate::utils::softmax;

/// A trained model that scores the next word for a fixed-length window.
///
/// `infer` takes `&self` and implementations must hold no per-call state, so
/// one loaded model can serve every request thread.
pub trait SequenceModel: Send + Sync {
    /// Number of token positions the model consumes (L-1).
    fn window_len(&self) -> usize;

    /// Length of the probability vector returned by `infer`.
    fn output_size(&self) -> usize;

    /// Probability of each vocabulary index following `window`.
    fn infer(&self, window: &[usize]) -> Result<Array1<f64>>;
}

#[derive(Clone, Debug)]
pub struct NextWordModel {
    pub embedding: WordEmbedding,
    pub lstm: LSTMNetwork,
    pub output: LinearLayer,
    window_len: usize,
}

impl NextWordModel {
    /// Assembles a model from its layers, checking that they fit together.
    pub fn from_parts(
        embedding: WordEmbedding,
        lstm: LSTMNetwork,
        output: LinearLayer,
        window_len: usize,
    ) -> Result<Self> {
        if window_len == 0 {
            return Err(OracleError::ShapeMismatch("window length must be positive".to_string()));
        }
        if lstm.input_size != embedding.embed_dim() {
            return Err(OracleError::ShapeMismatch(format!(
                "embedding produces {} features but the LSTM expects {}",
                embedding.embed_dim(),
                lstm.input_size
            )));
        }
        if output.input_size != lstm.output_size() {
            return Err(OracleError::ShapeMismatch(format!(
                "LSTM outputs {} features but the dense layer expects {}",
                lstm.output_size(),
                output.input_size
            )));
        }
        if embedding.rows() != output.output_size {
            return Err(OracleError::ShapeMismatch(format!(
                "embedding has {} rows but the dense layer scores {} indices",
                embedding.rows(),
                output.output_size
            )));
        }

        Ok(Self { embedding, lstm, output, window_len })
    }

    /// Untrained model with random weights.
    ///
    /// `vocab_size` counts the padding row, so it is the vocabulary length
    /// plus one.
    pub fn new_random<R: Rng + ?Sized>(
        vocab_size: usize,
        embed_dim: usize,
        hidden_sizes: &[usize],
        window_len: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if hidden_sizes.is_empty() {
            return Err(OracleError::ShapeMismatch("at least one LSTM layer is required".to_string()));
        }
        let embedding = WordEmbedding::new_random(vocab_size, embed_dim, rng);
        let lstm = LSTMNetwork::new_random(embed_dim, hidden_sizes, rng);
        let output = LinearLayer::new_random(lstm.output_size(), vocab_size, rng);
        Self::from_parts(embedding, lstm, output, window_len)
    }

    pub fn num_parameters(&self) -> usize {
        self.embedding.num_parameters() + self.lstm.num_parameters() + self.output.num_parameters()
    }
}

impl SequenceModel for NextWordModel {
    fn window_len(&self) -> usize {
        self.window_len
    }

    fn output_size(&self) -> usize {
        self.output.output_size
    }

    fn infer(&self, window: &[usize]) -> Result<Array1<f64>> {
        if window.len() != self.window_len {
            return Err(OracleError::WindowLength { expected: self.window_len, found: window.len() });
        }

        let steps = self.embedding.forward(window)?;
        let hidden = self.lstm.forward_sequence(&steps);
        let logits = self.output.forward(&hidden).index_axis_move(Axis(1), 0);
        Ok(softmax(&logits))
    }
}
