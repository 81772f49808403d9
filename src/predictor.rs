//! Prediction adapter: free text in, next word out.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::next_word::SequenceModel;
use crate::utils::{argmax, top_k};
use crate::vocab::Vocabulary;
use crate::window::TokenWindow;

/// Outcome of decoding the model output.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prediction {
    Word { word: String, index: usize, probability: f64 },
    /// The winning index has no word (padding, or the output was all NaN).
    NoPrediction { index: Option<usize> },
}

impl Prediction {
    pub fn word(&self) -> Option<&str> {
        match self {
            Prediction::Word { word, .. } => Some(word),
            Prediction::NoPrediction { .. } => None,
        }
    }
}

/// A runner-up word with its probability.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Candidate {
    pub word: String,
    pub probability: f64,
}

/// Full result of one adapter call.
#[derive(Clone, Debug, Serialize)]
pub struct PredictionReport {
    pub window: TokenWindow,
    pub prediction: Prediction,
    pub candidates: Vec<Candidate>,
}

/// Borrows the loaded model and vocabulary; holds no state of its own.
pub struct Predictor<'a> {
    model: &'a dyn SequenceModel,
    vocab: &'a Vocabulary,
}

impl<'a> Predictor<'a> {
    pub fn new(model: &'a dyn SequenceModel, vocab: &'a Vocabulary) -> Self {
        Self { model, vocab }
    }

    /// Tokenize, fit to the model window, infer and decode the argmax.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        Ok(self.predict_with_candidates(text, 0)?.prediction)
    }

    /// Like [`predict`](Self::predict), also reporting the window and the
    /// `k` most likely words.
    pub fn predict_with_candidates(&self, text: &str, k: usize) -> Result<PredictionReport> {
        let window = TokenWindow::from_text(self.vocab, text, self.model.window_len());
        let probs = self.model.infer(window.as_slice())?;

        let prediction = match argmax(&probs) {
            Some(index) => match self.vocab.index_to_word(index) {
                Some(word) => Prediction::Word { word: word.to_string(), index, probability: probs[index] },
                None => Prediction::NoPrediction { index: Some(index) },
            },
            None => Prediction::NoPrediction { index: None },
        };

        // Over-fetch by one so a winning padding index does not shrink the list.
        let candidates = if k == 0 {
            Vec::new()
        } else {
            top_k(&probs, k + 1)
                .into_iter()
                .filter_map(|(idx, probability)| {
                    self.vocab
                        .index_to_word(idx)
                        .map(|word| Candidate { word: word.to_string(), probability })
                })
                .take(k)
                .collect()
        };

        debug!(window = ?window.as_slice(), ?prediction, "decoded model output");

        Ok(PredictionReport { window, prediction, candidates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use std::sync::Mutex;

    /// Returns a fixed distribution and remembers the windows it saw.
    struct FixedModel {
        window_len: usize,
        probs: Vec<f64>,
        seen: Mutex<Vec<Vec<usize>>>,
    }

    impl FixedModel {
        fn new(window_len: usize, probs: Vec<f64>) -> Self {
            Self { window_len, probs, seen: Mutex::new(Vec::new()) }
        }
    }

    impl SequenceModel for FixedModel {
        fn window_len(&self) -> usize {
            self.window_len
        }

        fn output_size(&self) -> usize {
            self.probs.len()
        }

        fn infer(&self, window: &[usize]) -> Result<Array1<f64>> {
            self.seen.lock().unwrap().push(window.to_vec());
            Ok(Array1::from(self.probs.clone()))
        }
    }

    fn vocab() -> Vocabulary {
        Vocabulary::from_words(["the", "king", "is", "dead"]).unwrap()
    }

    #[test]
    fn test_king_is_dead() {
        let vocab = vocab();
        let model = FixedModel::new(3, vec![0.05, 0.1, 0.05, 0.1, 0.7]);
        let predictor = Predictor::new(&model, &vocab);

        let prediction = predictor.predict("the king is").unwrap();
        assert_eq!(prediction.word(), Some("dead"));
        assert_eq!(model.seen.lock().unwrap()[0], vec![1, 2, 3]);
    }

    #[test]
    fn test_only_last_window_tokens_reach_model() {
        let vocab = vocab();
        let model = FixedModel::new(2, vec![0.0, 0.0, 0.0, 0.0, 1.0]);
        let predictor = Predictor::new(&model, &vocab);

        predictor.predict("the king is dead").unwrap();
        assert_eq!(model.seen.lock().unwrap()[0], vec![3, 4]);
    }

    #[test]
    fn test_padding_argmax_is_no_prediction() {
        let vocab = vocab();
        let model = FixedModel::new(3, vec![0.9, 0.02, 0.03, 0.02, 0.03]);
        let predictor = Predictor::new(&model, &vocab);

        let prediction = predictor.predict("the").unwrap();
        assert_eq!(prediction, Prediction::NoPrediction { index: Some(0) });
        assert_eq!(model.seen.lock().unwrap()[0], vec![0, 0, 1]);
    }

    #[test]
    fn test_candidates_skip_padding() {
        let vocab = vocab();
        let model = FixedModel::new(3, vec![0.4, 0.1, 0.3, 0.05, 0.15]);
        let predictor = Predictor::new(&model, &vocab);

        let report = predictor.predict_with_candidates("is", 2).unwrap();
        let words: Vec<&str> = report.candidates.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["king", "dead"]);
        assert_eq!(report.window.as_slice(), &[0, 0, 3]);
    }

    #[test]
    fn test_unknown_words_still_infer() {
        let vocab = vocab();
        let model = FixedModel::new(3, vec![0.0, 1.0, 0.0, 0.0, 0.0]);
        let predictor = Predictor::new(&model, &vocab);

        assert_eq!(predictor.predict("Marcellus Barnardo").unwrap().word(), Some("the"));
        assert_eq!(model.seen.lock().unwrap()[0], vec![0, 0, 0]);
    }
}
