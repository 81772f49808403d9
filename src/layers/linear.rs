use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::error::{OracleError, Result};

/// A fully connected (dense) layer
///
/// Performs `output = weight · input + bias` where weight has shape
/// (output_size, input_size) and bias has shape (output_size, 1).
#[derive(Clone, Debug)]
pub struct LinearLayer {
    pub weight: Array2<f64>,
    pub bias: Array2<f64>,
    pub input_size: usize,
    pub output_size: usize,
}

impl LinearLayer {
    /// Create a new linear layer with Xavier/Glorot uniform initialization
    ///
    /// # Arguments
    /// * `input_size` - Size of input features
    /// * `output_size` - Size of output features
    /// * `rng` - Source of randomness, seed it for reproducible weights
    pub fn new_random<R: Rng + ?Sized>(input_size: usize, output_size: usize, rng: &mut R) -> Self {
        let scale = (6.0 / (input_size + output_size) as f64).sqrt();
        let weight = Array2::random_using((output_size, input_size), Uniform::new(-scale, scale), rng);

        Self {
            weight,
            bias: Array2::zeros((output_size, 1)),
            input_size,
            output_size,
        }
    }

    /// Create a layer from existing weights
    pub fn from_weights(weight: Array2<f64>, bias: Array2<f64>) -> Result<Self> {
        let (output_size, input_size) = weight.dim();
        if bias.dim() != (output_size, 1) {
            return Err(OracleError::ShapeMismatch(format!(
                "dense bias is {:?}, expected ({}, 1)",
                bias.dim(),
                output_size
            )));
        }

        Ok(Self { weight, bias, input_size, output_size })
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `input` - Input of shape (input_size, batch_size)
    ///
    /// # Returns
    /// * Output of shape (output_size, batch_size)
    pub fn forward(&self, input: &Array2<f64>) -> Array2<f64> {
        debug_assert_eq!(input.nrows(), self.input_size);
        &self.weight.dot(input) + &self.bias
    }

    pub fn num_parameters(&self) -> usize {
        self.weight.len() + self.bias.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_linear_forward_known_values() {
        let layer = LinearLayer::from_weights(
            arr2(&[[1.0, 2.0], [0.0, -1.0], [0.5, 0.5]]),
            arr2(&[[0.0], [1.0], [-1.0]]),
        )
        .unwrap();

        let output = layer.forward(&arr2(&[[2.0], [3.0]]));
        assert_eq!(output, arr2(&[[8.0], [-2.0], [1.5]]));
    }

    #[test]
    fn test_bias_shape_checked() {
        let result = LinearLayer::from_weights(Array2::zeros((3, 2)), Array2::zeros((2, 1)));
        assert!(result.is_err());
    }
}
