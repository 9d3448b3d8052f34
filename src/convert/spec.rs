//! Describable model interface: named features and classifier metadata.

use serde::{Deserialize, Serialize};

use crate::error::{CongelarError, Result};

/// How a feature's value is shaped and typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Single number.
    Scalar,
    /// Numeric array of the given shape.
    Array {
        /// Declared shape, e.g. `[7]`.
        shape: Vec<usize>,
    },
    /// Class label to probability map.
    Dictionary,
    /// Predicted class label.
    Label,
}

/// A named input or output feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescription {
    /// Feature name as seen by callers.
    pub name: String,
    /// Value shape and type.
    pub kind: FeatureKind,
}

/// An output feature bound to an internal tensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescription {
    /// The externally visible feature.
    pub feature: FeatureDescription,
    /// Name of the internal tensor this output reads from.
    pub tensor: String,
}

/// Classifier metadata attached to a converted model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierInfo {
    /// Labels in terminal-layer column order.
    pub class_labels: Vec<String>,
    /// Name of the predicted-label output feature.
    pub predicted_feature: String,
    /// Name of the output carrying the probability dictionary.
    pub probabilities_output: String,
}

/// The describable interface of a compiled model.
///
/// A spec lists input and output features by name and, for classifiers,
/// the label set and which output carries probabilities. Specs are value
/// types: [`ModelSpec::add_derived_output`] returns an extended copy and
/// never mutates the original, so a patched spec can be replayed against
/// the same execution plan via
/// [`CompiledModel::rebuild`](crate::convert::CompiledModel::rebuild).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Input features in declaration order.
    pub inputs: Vec<FeatureDescription>,
    /// Output features in declaration order.
    pub outputs: Vec<OutputDescription>,
    /// Present when the model is a classifier.
    pub classifier: Option<ClassifierInfo>,
}

impl ModelSpec {
    /// Look up an output feature by name.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<&OutputDescription> {
        self.outputs.iter().find(|output| output.feature.name == name)
    }

    /// Whether classifier metadata is attached.
    #[must_use]
    pub fn is_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Copy this spec and expose an internal tensor as a new output.
    ///
    /// The original spec is left untouched. The new output's `kind`
    /// declares its shape; the binding is checked against the execution
    /// plan when the patched spec is handed to
    /// [`CompiledModel::rebuild`](crate::convert::CompiledModel::rebuild).
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or collides with an existing input or
    /// output feature.
    pub fn add_derived_output(
        &self,
        name: &str,
        tensor: &str,
        kind: FeatureKind,
    ) -> Result<ModelSpec> {
        if name.is_empty() {
            return Err(CongelarError::conversion("derived output name is empty"));
        }
        let taken = self
            .outputs
            .iter()
            .any(|output| output.feature.name == name)
            || self.inputs.iter().any(|input| input.name == name);
        if taken {
            return Err(CongelarError::DuplicateFeature {
                name: name.to_string(),
            });
        }

        let mut patched = self.clone();
        patched.outputs.push(OutputDescription {
            feature: FeatureDescription {
                name: name.to_string(),
                kind,
            },
            tensor: tensor.to_string(),
        });
        Ok(patched)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Fails if the JSON is malformed or does not describe a spec.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
