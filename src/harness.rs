//! End-to-end conversion correctness scenarios.
//!
//! Each scenario builds a small network with seeded random weights,
//! converts it, runs inference on both the source network and the
//! compiled artifact, and reports whether the two sides agree. The
//! scenarios mirror the two conversion paths that historically break:
//! classifier metadata ([`ClassifierScenario`]) and derived outputs
//! tapping a hidden layer ([`IntermediateTapScenario`]).
//!
//! Reports carry values, not verdicts: callers assert on
//! [`ClassifierReport`] and [`TapReport`] accessors so a failure
//! message can show the numbers that disagreed.
//!
//! # Example
//!
//! ```
//! use congelar::harness::ClassifierScenario;
//!
//! let report = ClassifierScenario {
//!     input_dim: 3,
//!     hidden_width: 4,
//!     num_classes: 2,
//!     sequence_length: 2,
//!     class_labels: vec!["no".to_string(), "yes".to_string()],
//!     predicted_feature: "pf".to_string(),
//!     input_name: "input".to_string(),
//!     output_name: "probs".to_string(),
//!     name_probabilities_output: true,
//!     seed: 7,
//! }
//! .run()
//! .unwrap();
//!
//! assert!(report.probabilities_is_dictionary());
//! ```

use std::collections::{BTreeMap, HashMap};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compare::{compare_to_places, AgreementReport};
use crate::convert::{compile, ConvertOptions, FeatureKind, ModelSpec, Value};
use crate::error::{CongelarError, Result};
use crate::nn::{init, Activation, Layer, Network};

/// A recurrent classifier round trip: LSTM into softmax dense, converted
/// with class labels attached.
///
/// Weights are drawn uniformly from `[0, 1)` and the probe input from
/// the same seeded stream, so a scenario is reproducible from its `seed`
/// alone. With `name_probabilities_output` set the conversion names the
/// probabilities output explicitly; cleared, it relies on the default
/// (the terminal output carries the dictionary). Converted behavior must
/// not depend on that flag.
#[derive(Debug, Clone)]
pub struct ClassifierScenario {
    /// Feature width of each input timestep.
    pub input_dim: usize,
    /// LSTM hidden width.
    pub hidden_width: usize,
    /// Terminal dense width. Must equal the label count.
    pub num_classes: usize,
    /// Declared sequence length of the recurrent layer.
    pub sequence_length: usize,
    /// Class labels in terminal column order.
    pub class_labels: Vec<String>,
    /// Name for the predicted-label output.
    pub predicted_feature: String,
    /// Name for the input feature.
    pub input_name: String,
    /// Name for the terminal output feature.
    pub output_name: String,
    /// Pass the probabilities output name explicitly instead of relying
    /// on the default.
    pub name_probabilities_output: bool,
    /// Seed for weight and input generation.
    pub seed: u64,
}

impl ClassifierScenario {
    /// Build, convert, and run the classifier once.
    ///
    /// # Errors
    ///
    /// Fails if conversion rejects the configuration (for example a
    /// label count that disagrees with `num_classes`) or inference
    /// fails.
    pub fn run(&self) -> Result<ClassifierReport> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut network = Network::new()
            .add(
                Layer::lstm(self.hidden_width)
                    .with_input_dim(self.input_dim)
                    .with_input_length(self.sequence_length),
            )
            .add(Layer::dense(self.num_classes).with_activation(Activation::Softmax));
        let shapes = network.weight_shapes()?;
        let weights = init::uniform_weight_set(&shapes, 0.0, 1.0, &mut rng);
        network.set_weights(weights)?;

        let mut options = ConvertOptions::new()
            .with_class_labels(self.class_labels.iter().cloned())
            .with_predicted_feature(&self.predicted_feature);
        if self.name_probabilities_output {
            options = options.with_probabilities_output(&self.output_name);
        }
        let model = compile(
            &network,
            &[self.input_name.as_str()],
            &[self.output_name.as_str()],
            options,
        )?;

        let input = init::uniform(&[self.input_dim], 0.0, 1.0, &mut rng);
        let source_output = network.forward(&input)?;

        let mut inputs = HashMap::new();
        inputs.insert(self.input_name.clone(), input);
        let outputs = model.predict(&inputs)?;

        Ok(ClassifierReport {
            output_name: self.output_name.clone(),
            predicted_feature: self.predicted_feature.clone(),
            class_labels: self.class_labels.clone(),
            source_output: source_output.data().to_vec(),
            outputs,
            spec: model.spec().clone(),
        })
    }
}

/// What one [`ClassifierScenario`] run produced.
#[derive(Debug, Clone)]
pub struct ClassifierReport {
    output_name: String,
    predicted_feature: String,
    class_labels: Vec<String>,
    source_output: Vec<f32>,
    outputs: HashMap<String, Value>,
    spec: ModelSpec,
}

impl ClassifierReport {
    /// Whether the probabilities output came back as a dictionary.
    #[must_use]
    pub fn probabilities_is_dictionary(&self) -> bool {
        self.outputs
            .get(&self.output_name)
            .is_some_and(Value::is_dictionary)
    }

    /// The label keyed probability map, if the output is a dictionary.
    #[must_use]
    pub fn probabilities(&self) -> Option<&BTreeMap<String, f32>> {
        self.outputs
            .get(&self.output_name)
            .and_then(Value::as_dictionary)
    }

    /// The predicted class label, if present.
    #[must_use]
    pub fn predicted_label(&self) -> Option<&str> {
        self.outputs
            .get(&self.predicted_feature)
            .and_then(Value::as_label)
    }

    /// Labels the scenario classified over, in column order.
    #[must_use]
    pub fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    /// Source-network probabilities, in column order.
    #[must_use]
    pub fn source_output(&self) -> &[f32] {
        &self.source_output
    }

    /// All named outputs of the compiled artifact.
    #[must_use]
    pub fn outputs(&self) -> &HashMap<String, Value> {
        &self.outputs
    }

    /// The compiled artifact's interface.
    #[must_use]
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Compare artifact probabilities against the source network.
    ///
    /// Dictionary values are read back in label column order and checked
    /// element by element against the source network's output.
    ///
    /// # Errors
    ///
    /// Fails if the probabilities output is not a dictionary or a label
    /// is missing from it.
    pub fn source_agreement(&self, places: i32) -> Result<AgreementReport> {
        let dict = self.probabilities().ok_or_else(|| {
            CongelarError::conversion("probabilities output is not a dictionary")
        })?;
        let mut actual = Vec::with_capacity(self.class_labels.len());
        for label in &self.class_labels {
            let p = dict
                .get(label)
                .copied()
                .ok_or_else(|| CongelarError::MissingFeature {
                    name: label.clone(),
                })?;
            actual.push(p);
        }
        compare_to_places(&self.source_output, &actual, places)
    }
}

/// A derived-output round trip: a three dense layer stack, the middle
/// layer exposed via a spec patch, checked against a two layer
/// truncation built from the same weights.
///
/// Kernels are drawn before biases (first to third layer each), then
/// the probe input, all from one stream seeded by `seed`. Kernel and
/// bias values are uniform in `[-0.1, 0.1)`, the input in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct IntermediateTapScenario {
    /// Input feature width.
    pub input_dim: usize,
    /// Widths of the three dense layers, first to last.
    pub widths: [usize; 3],
    /// Name for the input feature.
    pub input_name: String,
    /// Name for the terminal output feature.
    pub output_name: String,
    /// Layer name given to the middle dense layer.
    pub middle_name: String,
    /// Feature name for the derived output that taps the middle layer.
    pub tap_name: String,
    /// Seed for weight and input generation.
    pub seed: u64,
    /// Decimal places the tap must agree to.
    pub places: i32,
}

impl IntermediateTapScenario {
    /// Build, convert, patch, and run the comparison once.
    ///
    /// # Errors
    ///
    /// Fails if conversion, the spec patch, or inference fails.
    pub fn run(&self) -> Result<TapReport> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let [w1, w2, w3] = self.widths;

        let k1 = init::uniform(&[self.input_dim, w1], -0.1, 0.1, &mut rng);
        let k2 = init::uniform(&[w1, w2], -0.1, 0.1, &mut rng);
        let k3 = init::uniform(&[w2, w3], -0.1, 0.1, &mut rng);
        let b1 = init::uniform(&[w1], -0.1, 0.1, &mut rng);
        let b2 = init::uniform(&[w2], -0.1, 0.1, &mut rng);
        let b3 = init::uniform(&[w3], -0.1, 0.1, &mut rng);

        let mut full = Network::new()
            .add(Layer::dense(w1).with_input_dim(self.input_dim))
            .add(Layer::dense(w2).named(&self.middle_name))
            .add(Layer::dense(w3));
        full.set_weights(vec![
            k1.clone(),
            b1.clone(),
            k2.clone(),
            b2.clone(),
            k3,
            b3,
        ])?;

        let model = compile(
            &full,
            &[self.input_name.as_str()],
            &[self.output_name.as_str()],
            ConvertOptions::new(),
        )?;
        let patched = model.spec().add_derived_output(
            &self.tap_name,
            &self.middle_name,
            FeatureKind::Array { shape: vec![w2] },
        )?;
        let tapped = model.rebuild(patched)?;

        let mut truncated = Network::new()
            .add(Layer::dense(w1).with_input_dim(self.input_dim))
            .add(Layer::dense(w2));
        truncated.set_weights(vec![k1, b1, k2, b2])?;
        let truncated_model = compile(
            &truncated,
            &[self.input_name.as_str()],
            &[self.output_name.as_str()],
            ConvertOptions::new(),
        )?;

        let input = init::uniform(&[self.input_dim], 0.0, 1.0, &mut rng);
        let mut inputs = HashMap::new();
        inputs.insert(self.input_name.clone(), input);

        let full_outputs = model.predict(&inputs)?;
        let tapped_outputs = tapped.predict(&inputs)?;
        let truncated_outputs = truncated_model.predict(&inputs)?;

        let tap_values = array_output(&tapped_outputs, &self.tap_name)?;
        let truncated_values = array_output(&truncated_outputs, &self.output_name)?;
        let terminal_before_patch = array_output(&full_outputs, &self.output_name)?;
        let terminal_after_patch = array_output(&tapped_outputs, &self.output_name)?;
        let agreement = compare_to_places(&truncated_values, &tap_values, self.places)?;

        Ok(TapReport {
            agreement,
            tap_values,
            truncated_values,
            terminal_before_patch,
            terminal_after_patch,
        })
    }
}

/// What one [`IntermediateTapScenario`] run produced.
#[derive(Debug, Clone)]
pub struct TapReport {
    agreement: AgreementReport,
    tap_values: Vec<f32>,
    truncated_values: Vec<f32>,
    terminal_before_patch: Vec<f32>,
    terminal_after_patch: Vec<f32>,
}

impl TapReport {
    /// Element comparison of the tap against the truncated network.
    #[must_use]
    pub fn agreement(&self) -> &AgreementReport {
        &self.agreement
    }

    /// Whether every tap element agreed with the truncation.
    #[must_use]
    pub fn all_agree(&self) -> bool {
        self.agreement.all_agree()
    }

    /// Values read from the derived output.
    #[must_use]
    pub fn tap_values(&self) -> &[f32] {
        &self.tap_values
    }

    /// Terminal values of the two layer truncation.
    #[must_use]
    pub fn truncated_values(&self) -> &[f32] {
        &self.truncated_values
    }

    /// Whether the terminal output is bit-identical before and after
    /// the spec patch.
    #[must_use]
    pub fn terminal_unchanged(&self) -> bool {
        self.terminal_before_patch == self.terminal_after_patch
    }
}

fn array_output(outputs: &HashMap<String, Value>, name: &str) -> Result<Vec<f32>> {
    match outputs.get(name) {
        Some(Value::Array(values)) => Ok(values.clone()),
        Some(_) => Err(CongelarError::Other(format!(
            "output {name} is not an array"
        ))),
        None => Err(CongelarError::MissingFeature {
            name: name.to_string(),
        }),
    }
}
