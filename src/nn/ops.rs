//! Forward-pass math shared by networks and compiled artifacts.
//!
//! The reference forward pass and the compiled execution plan both call
//! these functions, so a source/artifact disagreement can only come from
//! the conversion plumbing, never from divergent kernels.

/// σ(x) = 1 / (1 + exp(-x))
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Affine transform y = x·K + b with kernel layout `[fan_in, units]`.
#[must_use]
pub fn dense_step(input: &[f32], kernel: &[f32], bias: &[f32], units: usize) -> Vec<f32> {
    let fan_in = input.len();
    let mut out = vec![0.0f32; units];
    for (j, y) in out.iter_mut().enumerate() {
        let mut acc = bias[j];
        for i in 0..fan_in {
            acc += input[i] * kernel[i * units + j];
        }
        *y = acc;
    }
    out
}

/// One LSTM timestep with consolidated gate parameters.
///
/// `kernel` is `[fan_in, 4 * units]`, `recurrent` is `[units, 4 * units]`,
/// `bias` is `[4 * units]`. Gate columns are ordered input, forget, cell,
/// output. Returns the new hidden and cell states.
#[must_use]
pub fn lstm_step(
    x: &[f32],
    h: &[f32],
    c: &[f32],
    kernel: &[f32],
    recurrent: &[f32],
    bias: &[f32],
    units: usize,
) -> (Vec<f32>, Vec<f32>) {
    let fan_in = x.len();
    let width = 4 * units;

    let mut gates = vec![0.0f32; width];
    for (j, g) in gates.iter_mut().enumerate() {
        let mut acc = bias[j];
        for i in 0..fan_in {
            acc += x[i] * kernel[i * width + j];
        }
        for u in 0..units {
            acc += h[u] * recurrent[u * width + j];
        }
        *g = acc;
    }

    let mut h_new = vec![0.0f32; units];
    let mut c_new = vec![0.0f32; units];
    for u in 0..units {
        let i_gate = sigmoid(gates[u]);
        let f_gate = sigmoid(gates[units + u]);
        let g_gate = gates[2 * units + u].tanh();
        let o_gate = sigmoid(gates[3 * units + u]);

        let c_t = f_gate * c[u] + i_gate * g_gate;
        h_new[u] = o_gate * c_t.tanh();
        c_new[u] = c_t;
    }

    (h_new, c_new)
}

/// Run an LSTM over a `[seq_len, fan_in]` input from zero initial state,
/// returning the hidden state after the last timestep.
#[must_use]
pub fn lstm_sequence(
    input: &[f32],
    seq_len: usize,
    fan_in: usize,
    kernel: &[f32],
    recurrent: &[f32],
    bias: &[f32],
    units: usize,
) -> Vec<f32> {
    let mut h = vec![0.0f32; units];
    let mut c = vec![0.0f32; units];

    for t in 0..seq_len {
        let xt = &input[t * fan_in..(t + 1) * fan_in];
        let (h_next, c_next) = lstm_step(xt, &h, &c, kernel, recurrent, bias, units);
        h = h_next;
        c = c_next;
    }

    h
}

/// Numerically stable softmax (max subtraction before exponentiation).
#[must_use]
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter().map(|&x| x / sum).collect()
}

/// Index of the largest value. Ties break toward the lower index.
#[must_use]
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_step_identity() {
        // 2x2 identity kernel, zero bias
        let kernel = [1.0, 0.0, 0.0, 1.0];
        let bias = [0.0, 0.0];
        let y = dense_step(&[3.0, -4.0], &kernel, &bias, 2);
        assert_eq!(y, vec![3.0, -4.0]);
    }

    #[test]
    fn test_dense_step_known_values() {
        // kernel [fan_in=2, units=2]: row 0 = [1, 2], row 1 = [3, 4]
        let kernel = [1.0, 2.0, 3.0, 4.0];
        let bias = [10.0, 20.0];
        let y = dense_step(&[1.0, 2.0], &kernel, &bias, 2);
        // y0 = 1*1 + 2*3 + 10 = 17, y1 = 1*2 + 2*4 + 20 = 30
        assert_eq!(y, vec![17.0, 30.0]);
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_lstm_step_zero_weights_stay_zero() {
        let units = 3;
        let kernel = vec![0.0; 2 * 4 * units];
        let recurrent = vec![0.0; units * 4 * units];
        let bias = vec![0.0; 4 * units];
        let h = vec![0.0; units];
        let c = vec![0.0; units];

        let (h_new, c_new) = lstm_step(&[1.0, 1.0], &h, &c, &kernel, &recurrent, &bias, units);

        // all gates sit at sigmoid(0)/tanh(0), so cell and hidden stay zero
        for u in 0..units {
            assert!(c_new[u].abs() < 1e-6);
            assert!(h_new[u].abs() < 1e-6);
        }
    }

    #[test]
    fn test_lstm_step_hidden_bounded() {
        let units = 4;
        let kernel = vec![0.5; 3 * 4 * units];
        let recurrent = vec![0.2; units * 4 * units];
        let bias = vec![0.1; 4 * units];
        let h = vec![0.0; units];
        let c = vec![0.0; units];

        let (h_new, c_new) =
            lstm_step(&[1.0, -1.0, 0.5], &h, &c, &kernel, &recurrent, &bias, units);

        // hidden state is o * tanh(c), bounded by (-1, 1)
        for &v in &h_new {
            assert!((-1.0..=1.0).contains(&v));
        }
        // a nonzero input with nonzero weights must move the cell state
        let c_sum: f32 = c_new.iter().map(|v| v.abs()).sum();
        assert!(c_sum > 1e-6);
    }

    #[test]
    fn test_lstm_sequence_single_step_matches_step() {
        let units = 2;
        let kernel = vec![0.3; 2 * 4 * units];
        let recurrent = vec![0.1; units * 4 * units];
        let bias = vec![0.05; 4 * units];
        let x = [0.7, -0.2];

        let from_sequence = lstm_sequence(&x, 1, 2, &kernel, &recurrent, &bias, units);
        let (from_step, _) = lstm_step(
            &x,
            &[0.0; 2],
            &[0.0; 2],
            &kernel,
            &recurrent,
            &bias,
            units,
        );
        assert_eq!(from_sequence, from_step);
    }

    #[test]
    fn test_lstm_sequence_depends_on_order() {
        let units = 2;
        let kernel = vec![0.4; 4 * units];
        let recurrent = vec![0.3; units * 4 * units];
        let bias = vec![0.0; 4 * units];

        let forward = lstm_sequence(&[1.0, -1.0], 2, 1, &kernel, &recurrent, &bias, units);
        let reversed = lstm_sequence(&[-1.0, 1.0], 2, 1, &kernel, &recurrent, &bias, units);
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let y = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = y.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_softmax_numerical_stability() {
        // Large values that could overflow without max subtraction
        let y = softmax(&[1000.0, 1001.0, 1002.0]);
        for &val in &y {
            assert!(val.is_finite());
            assert!((0.0..=1.0).contains(&val));
        }
        let sum: f32 = y.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_softmax_empty() {
        assert!(softmax(&[]).is_empty());
    }

    #[test]
    fn test_argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
    }

    #[test]
    fn test_argmax_tie_breaks_low() {
        assert_eq!(argmax(&[1.0, 2.0, 2.0, 1.5]), 1);
    }
}
