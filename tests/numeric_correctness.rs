//! End-to-end conversion correctness regressions.
//!
//! These tests pin the two conversion paths the harness exists for:
//! classifier metadata (probabilities must come back as a label keyed
//! dictionary, with or without an explicitly named probabilities output)
//! and derived outputs (a tapped hidden layer must agree with a
//! truncated network built from the same weights, and must not perturb
//! the terminal output).

use congelar::prelude::*;

fn lstm_classifier(name_probabilities_output: bool) -> ClassifierScenario {
    ClassifierScenario {
        input_dim: 5,
        hidden_width: 12,
        num_classes: 6,
        sequence_length: 3,
        class_labels: ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(ToString::to_string)
            .collect(),
        predicted_feature: "pf".to_string(),
        input_name: "input".to_string(),
        output_name: "zzzz".to_string(),
        name_probabilities_output,
        seed: 1988,
    }
}

fn middle_layer_tap(seed: u64) -> IntermediateTapScenario {
    IntermediateTapScenario {
        input_dim: 5,
        widths: [10, 7, 5],
        input_name: "input".to_string(),
        output_name: "output".to_string(),
        middle_name: "middle_layer".to_string(),
        tap_name: "middle_layer_output".to_string(),
        seed,
        places: 2,
    }
}

#[test]
fn test_classifier_returns_dictionary_with_named_probabilities_output() {
    let report = lstm_classifier(true).run().expect("scenario");

    assert!(
        report.probabilities_is_dictionary(),
        "probabilities output must be a dictionary, got {:?}",
        report.outputs().get("zzzz")
    );
    let dict = report.probabilities().expect("dictionary");
    assert_eq!(dict.len(), 6);
    for label in ["a", "b", "c", "d", "e", "f"] {
        assert!(dict.contains_key(label), "missing class {label}");
    }
    let sum: f32 = dict.values().sum();
    assert!((sum - 1.0).abs() < 1e-5, "probabilities sum to {sum}");
}

#[test]
fn test_classifier_returns_dictionary_with_default_probabilities_output() {
    let report = lstm_classifier(false).run().expect("scenario");

    assert!(
        report.probabilities_is_dictionary(),
        "default-named probabilities output must still be a dictionary"
    );
    assert_eq!(report.probabilities().map(std::collections::BTreeMap::len), Some(6));
}

#[test]
fn test_classifier_interface_identical_across_naming_variants() {
    let named = lstm_classifier(true).run().expect("scenario");
    let defaulted = lstm_classifier(false).run().expect("scenario");

    // naming the probabilities output explicitly is a no-op
    assert_eq!(named.spec(), defaulted.spec());
    assert_eq!(named.probabilities(), defaulted.probabilities());
    assert_eq!(named.predicted_label(), defaulted.predicted_label());
}

#[test]
fn test_classifier_spec_declares_dictionary_and_label_outputs() {
    let report = lstm_classifier(true).run().expect("scenario");
    let spec = report.spec();

    assert!(spec.is_classifier());
    assert_eq!(
        spec.output("zzzz").map(|output| &output.feature.kind),
        Some(&FeatureKind::Dictionary)
    );
    assert_eq!(
        spec.output("pf").map(|output| &output.feature.kind),
        Some(&FeatureKind::Label)
    );
    let info = spec.classifier.as_ref().expect("classifier info");
    assert_eq!(info.predicted_feature, "pf");
    assert_eq!(info.probabilities_output, "zzzz");
}

#[test]
fn test_classifier_predicted_label_is_argmax_class() {
    let report = lstm_classifier(true).run().expect("scenario");

    let label = report.predicted_label().expect("predicted label");
    assert!(report.class_labels().iter().any(|l| l == label));

    let dict = report.probabilities().expect("dictionary");
    let (best, _) = dict
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .expect("non-empty");
    assert_eq!(label, best);
}

#[test]
fn test_classifier_artifact_matches_source_network() {
    let report = lstm_classifier(true).run().expect("scenario");
    let agreement = report.source_agreement(5).expect("compare");
    assert!(agreement.all_agree(), "{}", agreement.summary());
    assert_eq!(agreement.compared(), 6);
}

#[test]
fn test_middle_layer_tap_agrees_with_truncated_network() {
    let report = middle_layer_tap(1988).run().expect("scenario");

    assert_eq!(report.agreement().compared(), 7);
    assert!(report.all_agree(), "{}", report.agreement().summary());
}

#[test]
fn test_middle_layer_tap_leaves_terminal_output_unchanged() {
    let report = middle_layer_tap(1988).run().expect("scenario");
    assert!(report.terminal_unchanged());
}

#[test]
fn test_middle_layer_tap_agrees_across_seeds() {
    for seed in [1988, 1, 7, 42] {
        let report = middle_layer_tap(seed).run().expect("scenario");
        assert!(
            report.all_agree(),
            "seed {seed}: {}",
            report.agreement().summary()
        );
    }
}

#[test]
fn test_tap_values_have_middle_layer_width() {
    let report = middle_layer_tap(1988).run().expect("scenario");
    assert_eq!(report.tap_values().len(), 7);
    assert_eq!(report.truncated_values().len(), 7);
}
