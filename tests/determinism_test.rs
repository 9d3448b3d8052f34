//! Seeded reproducibility tests.
//!
//! Every harness scenario must be reproducible from its seed alone: the
//! seed fixes the weights, the probe input, and therefore every output.
//! These tests pin that contract, plus the numeric invariants the
//! scenarios lean on.

use congelar::harness::{ClassifierScenario, IntermediateTapScenario};
use congelar::nn::{init, ops};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn classifier(seed: u64) -> ClassifierScenario {
    ClassifierScenario {
        input_dim: 4,
        hidden_width: 6,
        num_classes: 3,
        sequence_length: 2,
        class_labels: vec!["x".to_string(), "y".to_string(), "z".to_string()],
        predicted_feature: "pf".to_string(),
        input_name: "input".to_string(),
        output_name: "probs".to_string(),
        name_probabilities_output: true,
        seed,
    }
}

/// Same seed, same weight set.
///
/// # Falsification Criteria
///
/// - PASS: Two independently seeded generators draw bit-identical arrays
/// - FAIL: Any element differs
#[test]
fn test_same_seed_reproduces_weight_set() {
    let shapes = vec![vec![5, 48], vec![12, 48], vec![48], vec![12, 6], vec![6]];

    let mut rng_a = StdRng::seed_from_u64(1988);
    let mut rng_b = StdRng::seed_from_u64(1988);
    let set_a = init::uniform_weight_set(&shapes, 0.0, 1.0, &mut rng_a);
    let set_b = init::uniform_weight_set(&shapes, 0.0, 1.0, &mut rng_b);

    assert_eq!(set_a.len(), set_b.len());
    for (a, b) in set_a.iter().zip(&set_b) {
        assert_eq!(a.data(), b.data(), "same seed must draw the same values");
    }
}

#[test]
fn test_different_seeds_draw_different_weights() {
    let mut rng_a = StdRng::seed_from_u64(1);
    let mut rng_b = StdRng::seed_from_u64(2);
    let a = init::uniform(&[16], 0.0, 1.0, &mut rng_a);
    let b = init::uniform(&[16], 0.0, 1.0, &mut rng_b);
    assert_ne!(a.data(), b.data());
}

/// Same scenario seed, same classifier outputs.
///
/// # Falsification Criteria
///
/// - PASS: Probability dictionaries and predicted labels are identical
///   across two runs
/// - FAIL: Any probability or label differs
#[test]
fn test_classifier_scenario_reproducible_from_seed() {
    let first = classifier(1988).run().expect("run");
    let second = classifier(1988).run().expect("run");

    assert_eq!(first.probabilities(), second.probabilities());
    assert_eq!(first.predicted_label(), second.predicted_label());
    assert_eq!(first.source_output(), second.source_output());
}

#[test]
fn test_classifier_scenario_seed_changes_outputs() {
    let first = classifier(1).run().expect("run");
    let second = classifier(2).run().expect("run");
    assert_ne!(first.probabilities(), second.probabilities());
}

#[test]
fn test_tap_scenario_reproducible_from_seed() {
    let scenario = IntermediateTapScenario {
        input_dim: 5,
        widths: [10, 7, 5],
        input_name: "input".to_string(),
        output_name: "output".to_string(),
        middle_name: "middle_layer".to_string(),
        tap_name: "middle_layer_output".to_string(),
        seed: 1988,
        places: 2,
    };
    let first = scenario.run().expect("run");
    let second = scenario.run().expect("run");

    assert_eq!(first.tap_values(), second.tap_values());
    assert_eq!(first.truncated_values(), second.truncated_values());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn uniform_draws_are_deterministic(seed in any::<u64>()) {
        let mut rng_a = StdRng::seed_from_u64(seed);
        let mut rng_b = StdRng::seed_from_u64(seed);
        let a = init::uniform(&[4, 3], -1.0, 1.0, &mut rng_a);
        let b = init::uniform(&[4, 3], -1.0, 1.0, &mut rng_b);
        prop_assert_eq!(a.data(), b.data());
    }

    #[test]
    fn uniform_respects_bounds(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let tensor = init::uniform(&[32], 0.0, 1.0, &mut rng);
        prop_assert!(tensor.data().iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn softmax_sums_to_one(logits in proptest::collection::vec(-10.0f32..10.0, 1..16)) {
        let probs = ops::softmax(&logits);
        let sum: f32 = probs.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-4, "sum was {}", sum);
    }

    #[test]
    fn softmax_is_a_distribution(logits in proptest::collection::vec(-10.0f32..10.0, 1..16)) {
        let probs = ops::softmax(&logits);
        prop_assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn argmax_points_at_a_maximum(values in proptest::collection::vec(-100.0f32..100.0, 1..16)) {
        let index = ops::argmax(&values);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        prop_assert_eq!(values[index], max);
    }
}
