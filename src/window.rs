use serde::Serialize;

use crate::vocab::Vocabulary;

/// Padding index used to fill short windows.
pub const PAD_INDEX: usize = 0;

/// Fixed-length token sequence fed to the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenWindow(Vec<usize>);

impl TokenWindow {
    /// Keep the last `len` tokens, or left-pad with [`PAD_INDEX`] up to `len`.
    pub fn fit(tokens: &[usize], len: usize) -> Self {
        let mut window = Vec::with_capacity(len);
        if tokens.len() >= len {
            window.extend_from_slice(&tokens[tokens.len() - len..]);
        } else {
            window.resize(len - tokens.len(), PAD_INDEX);
            window.extend_from_slice(tokens);
        }
        TokenWindow(window)
    }

    /// Tokenize `text` against `vocab` and fit the result to `len`.
    pub fn from_text(vocab: &Vocabulary, text: &str, len: usize) -> Self {
        Self::fit(&vocab.encode(text), len)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every position is padding.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|&idx| idx == PAD_INDEX)
    }
}
