//! Runtime output values produced by a compiled model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named output of a prediction.
///
/// The variant is dictated by the [`FeatureKind`](crate::convert::FeatureKind)
/// declared for the output: a classifier's probabilities arrive as a
/// [`Value::Dictionary`] keyed by class label, its prediction as a
/// [`Value::Label`], and plain tensors as [`Value::Array`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Flat numeric array.
    Array(Vec<f32>),
    /// Single number.
    Scalar(f32),
    /// Class label to probability map.
    Dictionary(BTreeMap<String, f32>),
    /// Predicted class label.
    Label(String),
}

impl Value {
    /// The array contents, if this is an array value.
    #[must_use]
    pub fn as_array(&self) -> Option<&[f32]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// The scalar, if this is a scalar value.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Value::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// The label-keyed map, if this is a dictionary value.
    #[must_use]
    pub fn as_dictionary(&self) -> Option<&BTreeMap<String, f32>> {
        match self {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// The label, if this is a label value.
    #[must_use]
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Value::Label(label) => Some(label),
            _ => None,
        }
    }

    /// Whether this value is a probability dictionary.
    #[must_use]
    pub fn is_dictionary(&self) -> bool {
        matches!(self, Value::Dictionary(_))
    }
}
