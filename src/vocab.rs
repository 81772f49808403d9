//! Word vocabulary loaded from an exported tokenizer word index.
//!
//! The artifact is a JSON object mapping each word to a positive index, the
//! shape a Keras `Tokenizer.word_index` dumps to. Index 0 is never assigned;
//! it is the padding slot in token windows.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{OracleError, Result};

/// Characters the tokenizer treats as word separators, besides the space.
const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Lowercase, strip punctuation, and split into words.
///
/// Apostrophes survive, so `that's` stays a single word.
pub fn split_words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|ch| if FILTERS.contains(ch) { ' ' } else { ch })
        .collect();
    cleaned
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Bidirectional word ↔ index mapping with dense indices `1..=len`.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    word_to_idx: HashMap<String, usize>,
    // idx_to_word[i] holds the word for index i + 1
    idx_to_word: Vec<String>,
}

impl Vocabulary {
    /// Build from a word → index map, rejecting gaps, duplicates and index 0.
    pub fn from_word_index(word_index: HashMap<String, usize>) -> Result<Self> {
        let len = word_index.len();
        let mut slots: Vec<Option<String>> = vec![None; len];

        for (word, &index) in &word_index {
            if word.is_empty() {
                return Err(OracleError::InvalidVocabulary("empty word".to_string()));
            }
            if index == 0 || index > len {
                return Err(OracleError::InvalidVocabulary(format!(
                    "word {:?} has index {}, indices must lie in 1..={}",
                    word, index, len
                )));
            }
            let slot = &mut slots[index - 1];
            if let Some(existing) = slot {
                return Err(OracleError::InvalidVocabulary(format!(
                    "index {} assigned to both {:?} and {:?}",
                    index, existing, word
                )));
            }
            *slot = Some(word.clone());
        }

        // With len slots, len entries and no collisions every slot is filled.
        let idx_to_word = slots.into_iter().flatten().collect();

        Ok(Self { word_to_idx: word_index, idx_to_word })
    }

    /// Build from words in index order: the first word gets index 1.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut word_index = HashMap::new();
        for (i, word) in words.into_iter().enumerate() {
            let word = word.into();
            if word_index.insert(word.clone(), i + 1).is_some() {
                return Err(OracleError::InvalidVocabulary(format!("duplicate word {:?}", word)));
            }
        }
        Self::from_word_index(word_index)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let word_index: HashMap<String, usize> = serde_json::from_str(json)?;
        Self::from_word_index(word_index)
    }

    /// Load the JSON word index artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn word_to_index(&self, word: &str) -> Option<usize> {
        self.word_to_idx.get(word).copied()
    }

    pub fn index_to_word(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|slot| self.idx_to_word.get(slot))
            .map(String::as_str)
    }

    /// Number of words, not counting the padding index.
    pub fn len(&self) -> usize {
        self.idx_to_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idx_to_word.is_empty()
    }

    /// Indices of the in-vocabulary words of `text`, in order.
    ///
    /// Unknown words are dropped.
    pub fn encode(&self, text: &str) -> Vec<usize> {
        split_words(text)
            .iter()
            .filter_map(|word| self.word_to_index(word))
            .collect()
    }

    /// Words in index order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.idx_to_word.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hamlet_vocab() -> Vocabulary {
        Vocabulary::from_words(["the", "king", "is", "dead"]).unwrap()
    }

    #[test]
    fn test_split_words_normalizes() {
        assert_eq!(
            split_words("The King that's dead!\tLooke, where it comes..."),
            vec!["the", "king", "that's", "dead", "looke", "where", "it", "comes"]
        );
        assert!(split_words("  ?! ").is_empty());
    }

    #[test]
    fn test_split_words_only_breaks_on_spaces() {
        assert_eq!(split_words("to\rbe"), vec!["to\rbe"]);
        assert_eq!(split_words("the\u{a0}king is"), vec!["the\u{a0}king", "is"]);
        assert_eq!(split_words("to\tbe\nor"), vec!["to", "be", "or"]);
    }

    #[test]
    fn test_round_trip_every_word() {
        let vocab = hamlet_vocab();
        for word in vocab.words() {
            let idx = vocab.word_to_index(word).unwrap();
            assert_eq!(vocab.index_to_word(idx), Some(word));
        }
        assert_eq!(vocab.len(), 4);
    }

    #[test]
    fn test_padding_index_has_no_word() {
        let vocab = hamlet_vocab();
        assert_eq!(vocab.index_to_word(0), None);
        assert_eq!(vocab.index_to_word(5), None);
        assert_eq!(vocab.index_to_word(4), Some("dead"));
    }

    #[test]
    fn test_encode_skips_unknown_words() {
        let vocab = hamlet_vocab();
        assert_eq!(vocab.encode("The ghost KING is"), vec![1, 2, 3]);
        assert!(vocab.encode("horatio").is_empty());
    }

    #[test]
    fn test_json_word_index() {
        let vocab = Vocabulary::from_json_str(r#"{"dead": 4, "the": 1, "is": 3, "king": 2}"#).unwrap();
        assert_eq!(vocab.word_to_index("king"), Some(2));
        assert_eq!(vocab.words().collect::<Vec<_>>(), vec!["the", "king", "is", "dead"]);
    }

    #[test]
    fn test_rejects_gaps_zero_and_duplicates() {
        assert!(Vocabulary::from_json_str(r#"{"the": 1, "king": 3}"#).is_err());
        assert!(Vocabulary::from_json_str(r#"{"the": 0, "king": 1}"#).is_err());
        assert!(Vocabulary::from_json_str(r#"{"the": 1, "king": 1}"#).is_err());
        assert!(Vocabulary::from_words(["the", "the"]).is_err());
        assert!(Vocabulary::from_json_str("[1, 2]").is_err());
    }
}
