//! Word embedding lookup table.

use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::error::{OracleError, Result};

/// Maps word indices to dense vectors.
///
/// Row 0 is the padding slot. It is an ordinary learned row, so a padded
/// window still feeds real vectors into the LSTM.
#[derive(Clone, Debug)]
pub struct WordEmbedding {
    pub weight: Array2<f64>, // (rows, embed_dim)
    rows: usize,
    embed_dim: usize,
}

impl WordEmbedding {
    /// Create embedding with uniform(-0.05, 0.05) initialization.
    pub fn new_random<R: Rng + ?Sized>(rows: usize, embed_dim: usize, rng: &mut R) -> Self {
        let weight = Array2::random_using((rows, embed_dim), Uniform::new(-0.05, 0.05), rng);
        Self { weight, rows, embed_dim }
    }

    /// Create embedding from existing weights.
    pub fn from_weights(weight: Array2<f64>) -> Self {
        let (rows, embed_dim) = weight.dim();
        Self { weight, rows, embed_dim }
    }

    pub fn embed_dim(&self) -> usize {
        self.embed_dim
    }

    /// Number of addressable indices, including the padding row.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Embed a window of indices as one (embed_dim, 1) column per step.
    pub fn forward(&self, indices: &[usize]) -> Result<Vec<Array2<f64>>> {
        indices
            .iter()
            .map(|&idx| {
                if idx >= self.rows {
                    return Err(OracleError::TokenOutOfRange { index: idx, rows: self.rows });
                }
                Ok(self.weight.row(idx).to_owned().insert_axis(ndarray::Axis(1)))
            })
            .collect()
    }

    pub fn num_parameters(&self) -> usize {
        self.weight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_embedding_forward_columns() {
        let emb = WordEmbedding::from_weights(arr2(&[[0.0, 0.0], [1.0, 2.0], [3.0, 4.0]]));
        let steps = emb.forward(&[2, 0, 1]).unwrap();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0], arr2(&[[3.0], [4.0]]));
        assert_eq!(steps[2], arr2(&[[1.0], [2.0]]));
    }

    #[test]
    fn test_embedding_rejects_out_of_range() {
        let emb = WordEmbedding::from_weights(Array2::zeros((3, 2)));
        match emb.forward(&[1, 3]) {
            Err(OracleError::TokenOutOfRange { index, rows }) => {
                assert_eq!(index, 3);
                assert_eq!(rows, 3);
            }
            other => panic!("unexpected result: {:?}", other.map(|v| v.len())),
        }
    }
}
