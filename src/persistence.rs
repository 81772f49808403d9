use ndarray::{Array2, Dimension};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{OracleError, Result};
use crate::layers::embedding::WordEmbedding;
use crate::layers::linear::LinearLayer;
use crate::layers::lstm_cell::LSTMCell;
use crate::models::lstm_network::LSTMNetwork;
use crate::models::next_word::{NextWordModel, SequenceModel};

/// Row-major matrix as stored on disk
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SerializableArray2 {
    data: Vec<f64>,
    shape: (usize, usize),
}

impl From<&Array2<f64>> for SerializableArray2 {
    fn from(array: &Array2<f64>) -> Self {
        Self {
            data: array.iter().cloned().collect(),
            shape: array.raw_dim().into_pattern(),
        }
    }
}

impl TryFrom<SerializableArray2> for Array2<f64> {
    type Error = OracleError;

    fn try_from(stored: SerializableArray2) -> Result<Self> {
        Ok(Array2::from_shape_vec(stored.shape, stored.data)?)
    }
}

/// Serializable LSTM cell parameters
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SerializableLSTMCell {
    w_ih: SerializableArray2,
    w_hh: SerializableArray2,
    bias: SerializableArray2,
}

impl From<&LSTMCell> for SerializableLSTMCell {
    fn from(cell: &LSTMCell) -> Self {
        Self {
            w_ih: (&cell.w_ih).into(),
            w_hh: (&cell.w_hh).into(),
            bias: (&cell.bias).into(),
        }
    }
}

impl TryFrom<SerializableLSTMCell> for LSTMCell {
    type Error = OracleError;

    fn try_from(stored: SerializableLSTMCell) -> Result<Self> {
        LSTMCell::from_weights(
            stored.w_ih.try_into()?,
            stored.w_hh.try_into()?,
            stored.bias.try_into()?,
        )
    }
}

/// Serializable next-word model
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SerializableNextWordModel {
    embedding: SerializableArray2,
    cells: Vec<SerializableLSTMCell>,
    dense_weight: SerializableArray2,
    dense_bias: SerializableArray2,
    window_len: usize,
}

impl From<&NextWordModel> for SerializableNextWordModel {
    fn from(model: &NextWordModel) -> Self {
        Self {
            embedding: (&model.embedding.weight).into(),
            cells: model.lstm.get_cells().iter().map(|cell| cell.into()).collect(),
            dense_weight: (&model.output.weight).into(),
            dense_bias: (&model.output.bias).into(),
            window_len: model.window_len(),
        }
    }
}

impl TryFrom<SerializableNextWordModel> for NextWordModel {
    type Error = OracleError;

    fn try_from(stored: SerializableNextWordModel) -> Result<Self> {
        let embedding = WordEmbedding::from_weights(stored.embedding.try_into()?);
        let cells = stored
            .cells
            .into_iter()
            .map(LSTMCell::try_from)
            .collect::<Result<Vec<_>>>()?;
        let lstm = LSTMNetwork::from_cells(cells)?;
        let output = LinearLayer::from_weights(stored.dense_weight.try_into()?, stored.dense_bias.try_into()?)?;
        NextWordModel::from_parts(embedding, lstm, output, stored.window_len)
    }
}

/// Descriptive information stored next to the weights
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ModelMetadata {
    pub model_name: String,
    pub version: String,
    pub created_at: String,
    pub window_len: usize,
    pub vocab_size: usize,
    pub embed_dim: usize,
    pub hidden_sizes: Vec<usize>,
    pub description: Option<String>,
}

/// Complete saved model including weights and metadata
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SavedModel {
    pub model: SerializableNextWordModel,
    pub metadata: ModelMetadata,
}

/// Model persistence operations
pub struct ModelPersistence;

impl ModelPersistence {
    /// Save model to JSON format (human-readable)
    pub fn save_to_json<P: AsRef<Path>>(model: &SavedModel, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(model)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Load model from JSON format
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<SavedModel> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save model to binary format (compact and fast)
    pub fn save_to_binary<P: AsRef<Path>>(model: &SavedModel, path: P) -> Result<()> {
        let encoded = bincode::serialize(model)?;
        let mut file = File::create(path)?;
        file.write_all(&encoded)?;
        Ok(())
    }

    /// Load model from binary format
    pub fn load_from_binary<P: AsRef<Path>>(path: P) -> Result<SavedModel> {
        let mut file = File::open(path)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(bincode::deserialize(&contents)?)
    }

    /// Describe a model, stamping the current crate version and time
    pub fn create_metadata(model: &NextWordModel, model_name: String, description: Option<String>) -> ModelMetadata {
        ModelMetadata {
            model_name,
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            window_len: model.window_len(),
            vocab_size: model.output_size(),
            embed_dim: model.embedding.embed_dim(),
            hidden_sizes: model.lstm.hidden_sizes(),
            description,
        }
    }
}

fn is_json(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("json"))
}

/// Save/load with the format picked from the file extension
///
/// `.json` is human-readable JSON; anything else (`.bin`, `.model`, ...) is bincode.
pub trait PersistentModel {
    fn save<P: AsRef<Path>>(&self, path: P, metadata: ModelMetadata) -> Result<()>;

    fn load<P: AsRef<Path>>(path: P) -> Result<(Self, ModelMetadata)>
    where
        Self: Sized;
}

impl PersistentModel for NextWordModel {
    fn save<P: AsRef<Path>>(&self, path: P, metadata: ModelMetadata) -> Result<()> {
        let saved_model = SavedModel { model: self.into(), metadata };

        if is_json(path.as_ref()) {
            ModelPersistence::save_to_json(&saved_model, path)
        } else {
            ModelPersistence::save_to_binary(&saved_model, path)
        }
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<(Self, ModelMetadata)> {
        let saved_model = if is_json(path.as_ref()) {
            ModelPersistence::load_from_json(path)?
        } else {
            ModelPersistence::load_from_binary(path)?
        };

        let model = NextWordModel::try_from(saved_model.model)?;
        Ok((model, saved_model.metadata))
    }
}
