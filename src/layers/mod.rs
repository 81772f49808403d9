/// Word index to vector lookup.
pub mod embedding;

/// Inference-only LSTM cell.
pub mod lstm_cell;

/// Dense projection layer.
pub mod linear;
