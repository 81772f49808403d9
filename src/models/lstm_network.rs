use ndarray::Array2;
use rand::Rng;

use crate::error::{OracleError, Result};
use crate::layers::lstm_cell::LSTMCell;

/// Stacked LSTM run over a whole sequence
///
/// Layer i+1 consumes the hidden output of layer i at the same time step.
/// Each layer keeps its own hidden/cell state, so layers may have different
/// widths (the usual 150 → 100 next-word stack, for instance).
#[derive(Clone, Debug)]
pub struct LSTMNetwork {
    cells: Vec<LSTMCell>,
    pub input_size: usize,
}

impl LSTMNetwork {
    /// Creates a randomly initialized stack with the given layer widths
    pub fn new_random<R: Rng + ?Sized>(input_size: usize, hidden_sizes: &[usize], rng: &mut R) -> Self {
        let mut cells = Vec::with_capacity(hidden_sizes.len());
        let mut layer_input = input_size;

        for &hidden in hidden_sizes {
            cells.push(LSTMCell::new_random(layer_input, hidden, rng));
            layer_input = hidden;
        }

        LSTMNetwork { cells, input_size }
    }

    /// Creates a network from existing cells, checking that layer widths chain
    pub fn from_cells(cells: Vec<LSTMCell>) -> Result<Self> {
        let first = cells
            .first()
            .ok_or_else(|| OracleError::ShapeMismatch("LSTM stack has no layers".to_string()))?;
        let input_size = first.input_size;

        for (i, pair) in cells.windows(2).enumerate() {
            if pair[1].input_size != pair[0].hidden_size {
                return Err(OracleError::ShapeMismatch(format!(
                    "layer {} outputs {} features but layer {} expects {}",
                    i,
                    pair[0].hidden_size,
                    i + 1,
                    pair[1].input_size
                )));
            }
        }

        Ok(LSTMNetwork { cells, input_size })
    }

    pub fn get_cells(&self) -> &[LSTMCell] {
        &self.cells
    }

    pub fn num_layers(&self) -> usize {
        self.cells.len()
    }

    pub fn hidden_sizes(&self) -> Vec<usize> {
        self.cells.iter().map(|cell| cell.hidden_size).collect()
    }

    /// Width of the final hidden state
    pub fn output_size(&self) -> usize {
        self.cells.last().map(|cell| cell.hidden_size).unwrap_or(self.input_size)
    }

    /// Runs the sequence from zero state and returns the top layer's last hidden state
    pub fn forward_sequence(&self, sequence: &[Array2<f64>]) -> Array2<f64> {
        let mut states: Vec<(Array2<f64>, Array2<f64>)> = self
            .cells
            .iter()
            .map(|cell| (Array2::zeros((cell.hidden_size, 1)), Array2::zeros((cell.hidden_size, 1))))
            .collect();

        for input in sequence {
            let mut layer_input = input.clone();
            for (cell, (hx, cx)) in self.cells.iter().zip(states.iter_mut()) {
                let (new_hx, new_cx) = cell.forward(&layer_input, hx, cx);
                layer_input = new_hx.clone();
                *hx = new_hx;
                *cx = new_cx;
            }
        }

        states
            .pop()
            .map(|(hx, _)| hx)
            .unwrap_or_else(|| Array2::zeros((self.input_size, 1)))
    }

    pub fn num_parameters(&self) -> usize {
        self.cells.iter().map(LSTMCell::num_parameters).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_stack_with_mixed_widths() {
        let mut rng = StdRng::seed_from_u64(11);
        let network = LSTMNetwork::new_random(3, &[5, 2], &mut rng);

        assert_eq!(network.num_layers(), 2);
        assert_eq!(network.hidden_sizes(), vec![5, 2]);

        let sequence = vec![arr2(&[[0.5], [0.1], [-0.3]]), arr2(&[[0.0], [1.0], [0.2]])];
        let hy = network.forward_sequence(&sequence);
        assert_eq!(hy.shape(), &[2, 1]);
    }

    #[test]
    fn test_sequence_order_matters() {
        let mut rng = StdRng::seed_from_u64(3);
        let network = LSTMNetwork::new_random(2, &[4], &mut rng);

        let a = arr2(&[[1.0], [0.0]]);
        let b = arr2(&[[0.0], [1.0]]);
        let ab = network.forward_sequence(&[a.clone(), b.clone()]);
        let ba = network.forward_sequence(&[b, a]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_from_cells_rejects_broken_chain() {
        let mut rng = StdRng::seed_from_u64(5);
        let cells = vec![
            LSTMCell::new_random(3, 4, &mut rng),
            LSTMCell::new_random(5, 2, &mut rng),
        ];
        assert!(LSTMNetwork::from_cells(cells).is_err());
        assert!(LSTMNetwork::from_cells(Vec::new()).is_err());
    }
}
