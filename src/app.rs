//! Load-once application context.

use tracing::{info, warn};

use crate::config::OracleConfig;
use crate::error::{OracleError, Result};
use crate::models::next_word::{NextWordModel, SequenceModel};
use crate::persistence::{ModelMetadata, PersistentModel};
use crate::predictor::{Predictor, PredictionReport};
use crate::vocab::Vocabulary;

/// What the page shows after the user presses "predict".
#[derive(Clone, Debug)]
pub enum Verdict {
    /// Nothing to work with; inference was not run.
    EmptyInput,
    Predicted { word: String, report: PredictionReport },
    /// The oracle answered with an index that maps to no word.
    Confused { report: PredictionReport },
}

/// Model, vocabulary and settings shared read-only by every request.
pub struct AppContext {
    model: Box<dyn SequenceModel>,
    vocab: Vocabulary,
    metadata: Option<ModelMetadata>,
    config: OracleConfig,
}

impl AppContext {
    /// Pair a model with its vocabulary, checking that the output layer
    /// covers every word plus the padding index.
    pub fn new(model: Box<dyn SequenceModel>, vocab: Vocabulary, config: OracleConfig) -> Result<Self> {
        let expected = vocab.len() + 1;
        if model.output_size() != expected {
            return Err(OracleError::ShapeMismatch(format!(
                "model scores {} classes but the vocabulary needs {} ({} words + padding)",
                model.output_size(),
                expected,
                vocab.len()
            )));
        }
        if vocab.is_empty() {
            warn!("vocabulary is empty; every prediction will be confused");
        }

        Ok(Self { model, vocab, metadata: None, config })
    }

    /// Load both artifacts named by `config`.
    pub fn load(config: OracleConfig) -> Result<Self> {
        let vocab = Vocabulary::load(&config.vocab_path)?;
        info!(path = %config.vocab_path.display(), words = vocab.len(), "loaded vocabulary");

        let (model, metadata) = NextWordModel::load(&config.model_path)?;
        info!(
            path = %config.model_path.display(),
            name = %metadata.model_name,
            window = model.window_len(),
            parameters = model.num_parameters(),
            "loaded model"
        );

        let mut context = Self::new(Box::new(model), vocab, config)?;
        context.metadata = Some(metadata);
        Ok(context)
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn model(&self) -> &dyn SequenceModel {
        self.model.as_ref()
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(self.model.as_ref(), &self.vocab)
    }

    /// Validate the phrase, run the adapter and classify the result.
    pub fn consult(&self, text: &str, top_k: usize) -> Result<Verdict> {
        if text.trim().is_empty() {
            return Ok(Verdict::EmptyInput);
        }

        let report = self.predictor().predict_with_candidates(text, top_k)?;
        let verdict = match report.prediction.word().map(str::to_string) {
            Some(word) => {
                info!(input = %text, word = %word, "predicted next word");
                Verdict::Predicted { word, report }
            }
            None => {
                info!(input = %text, "oracle is confused");
                Verdict::Confused { report }
            }
        };
        Ok(verdict)
    }
}
