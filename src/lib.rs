//! # Hamlet Oracle
//!
//! Next-word prediction behind a small web form. A phrase is tokenized with a
//! word vocabulary, fitted to the model's fixed window, scored by an LSTM word
//! model and the most likely index is mapped back to a word.
//!
//! ## Core Components
//!
//! - **Vocabulary**: dense word ↔ index mapping, index 0 reserved for padding
//! - **Token window**: left-truncated / left-padded index sequence
//! - **Model**: embedding → stacked LSTM → dense softmax, inference only
//! - **Predictor**: the adapter from text to predicted word
//! - **App context**: artifacts loaded once and shared by every request
//! - **Web**: `tiny_http` form and JSON API
//!
//! ## Quick Start
//!
//! ```rust
//! use hamlet_oracle::{AppContext, NextWordModel, OracleConfig, Verdict, Vocabulary};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let vocab = Vocabulary::from_words(["the", "king", "is", "dead"]).unwrap();
//! let mut rng = StdRng::seed_from_u64(0);
//! let model = NextWordModel::new_random(vocab.len() + 1, 8, &[16], 3, &mut rng).unwrap();
//!
//! let ctx = AppContext::new(Box::new(model), vocab, OracleConfig::default()).unwrap();
//! match ctx.consult("the king is", 3).unwrap() {
//!     Verdict::Predicted { word, .. } => println!("next word: {}", word),
//!     Verdict::Confused { .. } => println!("the oracle is confused"),
//!     Verdict::EmptyInput => unreachable!(),
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod layers;
pub mod models;
pub mod persistence;
pub mod predictor;
pub mod utils;
pub mod vocab;
pub mod web;
pub mod window;

// Re-export commonly used items
pub use app::{AppContext, Verdict};
pub use config::OracleConfig;
pub use error::{OracleError, Result};
pub use models::next_word::{NextWordModel, SequenceModel};
pub use persistence::{ModelMetadata, ModelPersistence, PersistentModel, SavedModel};
pub use predictor::{Candidate, Prediction, PredictionReport, Predictor};
pub use vocab::Vocabulary;
pub use window::TokenWindow;
