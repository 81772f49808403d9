/// Stacked LSTM over a sequence.
pub mod lstm_network;

/// Next-word model and the inference trait the adapter consumes.
pub mod next_word;
