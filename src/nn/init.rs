//! Deterministic weight generation for test networks.
//!
//! Every function takes the caller's generator instead of a seed argument:
//! the generator state advances across calls, so a whole weight set drawn
//! in a fixed order from one seeded `StdRng` is reproducible end to end.

use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::Rng;

/// Uniform distribution initialization.
///
/// Samples from U(low, high).
///
/// # Example
///
/// ```
/// use congelar::nn::init::uniform;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let t = uniform(&[2, 3], 0.0, 1.0, &mut rng);
/// assert_eq!(t.shape(), &[2, 3]);
/// ```
#[must_use]
pub fn uniform(shape: &[usize], low: f32, high: f32, rng: &mut StdRng) -> Tensor {
    let numel: usize = shape.iter().product();
    let data: Vec<f32> = (0..numel).map(|_| rng.gen_range(low..high)).collect();
    Tensor::new(&data, shape)
}

/// Sample one tensor per shape, in order, from a single stream.
#[must_use]
pub fn uniform_weight_set(
    shapes: &[Vec<usize>],
    low: f32,
    high: f32,
    rng: &mut StdRng,
) -> Vec<Tensor> {
    shapes
        .iter()
        .map(|shape| uniform(shape, low, high, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let t = uniform(&[100, 10], -0.1, 0.1, &mut rng);

        for &val in t.data() {
            assert!(
                (-0.1..0.1).contains(&val),
                "Value {val} out of bounds [-0.1, 0.1)"
            );
        }
    }

    #[test]
    fn test_uniform_reproducible() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        let t1 = uniform(&[10, 10], 0.0, 1.0, &mut rng1);
        let t2 = uniform(&[10, 10], 0.0, 1.0, &mut rng2);

        assert_eq!(t1.data(), t2.data());
    }

    #[test]
    fn test_uniform_advances_stream() {
        let mut rng = StdRng::seed_from_u64(42);
        let t1 = uniform(&[50], 0.0, 1.0, &mut rng);
        let t2 = uniform(&[50], 0.0, 1.0, &mut rng);

        assert_ne!(t1.data(), t2.data());
    }

    #[test]
    fn test_uniform_different_seeds_differ() {
        let mut rng1 = StdRng::seed_from_u64(1);
        let mut rng2 = StdRng::seed_from_u64(2);
        let t1 = uniform(&[50], 0.0, 1.0, &mut rng1);
        let t2 = uniform(&[50], 0.0, 1.0, &mut rng2);

        assert_ne!(t1.data(), t2.data());
    }

    #[test]
    fn test_uniform_weight_set_shapes() {
        let mut rng = StdRng::seed_from_u64(7);
        let shapes = vec![vec![5, 48], vec![12, 48], vec![48]];
        let set = uniform_weight_set(&shapes, 0.0, 1.0, &mut rng);

        assert_eq!(set.len(), 3);
        for (tensor, shape) in set.iter().zip(&shapes) {
            assert_eq!(tensor.shape(), shape.as_slice());
        }
    }

    #[test]
    fn test_uniform_weight_set_matches_sequential_draws() {
        // one stream: the set must equal drawing each tensor in order
        let shapes = vec![vec![3, 2], vec![2]];

        let mut rng_set = StdRng::seed_from_u64(9);
        let set = uniform_weight_set(&shapes, 0.0, 1.0, &mut rng_set);

        let mut rng_seq = StdRng::seed_from_u64(9);
        let first = uniform(&shapes[0], 0.0, 1.0, &mut rng_seq);
        let second = uniform(&shapes[1], 0.0, 1.0, &mut rng_seq);

        assert_eq!(set[0].data(), first.data());
        assert_eq!(set[1].data(), second.data());
    }
}
