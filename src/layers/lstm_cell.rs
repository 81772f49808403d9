use ndarray::{s, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::error::{OracleError, Result};
use crate::utils::sigmoid;

/// Inference-only LSTM cell
///
/// Gate rows are laid out as `[input, forget, cell, output]`, matching the
/// Keras kernel layout so exported weights can be copied in without
/// reordering:
/// - i_t = σ(W_xi * x_t + W_hi * h_t-1 + b_i)
/// - f_t = σ(W_xf * x_t + W_hf * h_t-1 + b_f)
/// - g_t = tanh(W_xg * x_t + W_hg * h_t-1 + b_g)
/// - o_t = σ(W_xo * x_t + W_ho * h_t-1 + b_o)
/// - c_t = f_t ⊙ c_t-1 + i_t ⊙ g_t
/// - h_t = o_t ⊙ tanh(c_t)
#[derive(Clone, Debug)]
pub struct LSTMCell {
    pub w_ih: Array2<f64>,  // input-to-hidden weights (4*hidden_size, input_size)
    pub w_hh: Array2<f64>,  // hidden-to-hidden weights (4*hidden_size, hidden_size)
    pub bias: Array2<f64>,  // combined bias (4*hidden_size, 1)
    pub input_size: usize,
    pub hidden_size: usize,
}

impl LSTMCell {
    /// Creates a cell with uniform(-0.1, 0.1) weights drawn from `rng`
    pub fn new_random<R: Rng + ?Sized>(input_size: usize, hidden_size: usize, rng: &mut R) -> Self {
        let dist = Uniform::new(-0.1, 0.1);

        LSTMCell {
            w_ih: Array2::random_using((4 * hidden_size, input_size), dist, rng),
            w_hh: Array2::random_using((4 * hidden_size, hidden_size), dist, rng),
            bias: Array2::zeros((4 * hidden_size, 1)),
            input_size,
            hidden_size,
        }
    }

    /// Builds a cell from existing weights, checking that the shapes agree
    pub fn from_weights(w_ih: Array2<f64>, w_hh: Array2<f64>, bias: Array2<f64>) -> Result<Self> {
        let (gate_rows, input_size) = w_ih.dim();
        if gate_rows == 0 || gate_rows % 4 != 0 {
            return Err(OracleError::ShapeMismatch(format!(
                "LSTM input kernel has {} rows, expected a positive multiple of 4",
                gate_rows
            )));
        }
        let hidden_size = gate_rows / 4;
        if w_hh.dim() != (gate_rows, hidden_size) {
            return Err(OracleError::ShapeMismatch(format!(
                "LSTM recurrent kernel is {:?}, expected {:?}",
                w_hh.dim(),
                (gate_rows, hidden_size)
            )));
        }
        if bias.dim() != (gate_rows, 1) {
            return Err(OracleError::ShapeMismatch(format!(
                "LSTM bias is {:?}, expected {:?}",
                bias.dim(),
                (gate_rows, 1)
            )));
        }

        Ok(LSTMCell { w_ih, w_hh, bias, input_size, hidden_size })
    }

    /// One time step. `input` is (input_size, 1), states are (hidden_size, 1).
    pub fn forward(&self, input: &Array2<f64>, hx: &Array2<f64>, cx: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
        let h = self.hidden_size;
        let gates = &self.w_ih.dot(input) + &self.w_hh.dot(hx) + &self.bias;

        let input_gate = gates.slice(s![0..h, ..]).mapv(sigmoid);
        let forget_gate = gates.slice(s![h..2 * h, ..]).mapv(sigmoid);
        let cell_gate = gates.slice(s![2 * h..3 * h, ..]).mapv(f64::tanh);
        let output_gate = gates.slice(s![3 * h..4 * h, ..]).mapv(sigmoid);

        let cy = &forget_gate * cx + &input_gate * &cell_gate;
        let hy = &output_gate * &cy.mapv(f64::tanh);

        (hy, cy)
    }

    pub fn num_parameters(&self) -> usize {
        self.w_ih.len() + self.w_hh.len() + self.bias.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_lstm_cell_forward() {
        let mut rng = StdRng::seed_from_u64(7);
        let cell = LSTMCell::new_random(3, 2, &mut rng);

        let input = arr2(&[[0.5], [0.1], [-0.3]]);
        let hx = Array2::zeros((2, 1));
        let cx = Array2::zeros((2, 1));

        let (hy, cy) = cell.forward(&input, &hx, &cx);

        assert_eq!(hy.shape(), &[2, 1]);
        assert_eq!(cy.shape(), &[2, 1]);
        assert!(hy.iter().all(|v| v.abs() < 1.0));
    }

    #[test]
    fn test_zero_weights_give_half_gated_state() {
        let cell = LSTMCell::from_weights(
            Array2::zeros((4, 1)),
            Array2::zeros((4, 1)),
            Array2::zeros((4, 1)),
        )
        .unwrap();

        let (hy, cy) = cell.forward(&arr2(&[[1.0]]), &arr2(&[[0.0]]), &arr2(&[[2.0]]));

        // f = 0.5, i = 0.5, g = 0 → c = 1.0; o = 0.5 → h = 0.5 * tanh(1)
        assert!((cy[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((hy[[0, 0]] - 0.5 * 1.0f64.tanh()).abs() < 1e-12);
    }

    #[test]
    fn test_from_weights_rejects_bad_shapes() {
        let err = LSTMCell::from_weights(
            Array2::zeros((8, 3)),
            Array2::zeros((8, 3)),
            Array2::zeros((8, 1)),
        );
        assert!(matches!(err, Err(OracleError::ShapeMismatch(_))));

        let err = LSTMCell::from_weights(
            Array2::zeros((6, 3)),
            Array2::zeros((6, 1)),
            Array2::zeros((6, 1)),
        );
        assert!(err.is_err());
    }
}
