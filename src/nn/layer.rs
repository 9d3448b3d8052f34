//! Layer descriptors for sequential networks.
//!
//! A [`Layer`] records what a layer is, not how it runs: kind, width, an
//! optional name, and the input annotations the first layer carries. Weight
//! array shapes follow the row-major convention used by the trainable
//! frameworks these descriptions are ported from: dense kernels are
//! `[fan_in, units]` with a `[units]` bias, and recurrent layers consolidate
//! their four gates into `[fan_in, 4 * units]` columns.

use crate::nn::ops;

/// Activation applied after a dense layer's affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Identity.
    Linear,
    /// max(0, x)
    Relu,
    /// 1 / (1 + exp(-x))
    Sigmoid,
    /// tanh(x)
    Tanh,
    /// exp(x_i) / sum_j exp(x_j), over the whole vector.
    Softmax,
}

impl Activation {
    /// Apply this activation to a vector of pre-activations.
    #[must_use]
    pub fn apply(self, values: &[f32]) -> Vec<f32> {
        match self {
            Activation::Linear => values.to_vec(),
            Activation::Relu => values.iter().map(|&v| v.max(0.0)).collect(),
            Activation::Sigmoid => values.iter().map(|&v| 1.0 / (1.0 + (-v).exp())).collect(),
            Activation::Tanh => values.iter().map(|&v| v.tanh()).collect(),
            Activation::Softmax => ops::softmax(values),
        }
    }
}

/// What a layer computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Fully connected layer with an elementwise (or softmax) activation.
    Dense {
        /// Activation applied after the affine transform.
        activation: Activation,
    },
    /// Recurrent layer (input, forget, cell, output gates), returning the
    /// hidden state after the last timestep.
    Lstm,
}

/// Description of one layer in a sequential network.
///
/// # Example
///
/// ```
/// use congelar::nn::{Activation, Layer};
///
/// let layer = Layer::dense(6)
///     .with_activation(Activation::Softmax)
///     .named("head");
/// assert_eq!(layer.units(), 6);
/// assert_eq!(layer.name(), Some("head"));
/// ```
#[derive(Debug, Clone)]
pub struct Layer {
    kind: LayerKind,
    units: usize,
    name: Option<String>,
    input_dim: Option<usize>,
    input_length: Option<usize>,
}

impl Layer {
    /// Dense layer with a linear activation.
    #[must_use]
    pub fn dense(units: usize) -> Self {
        Self {
            kind: LayerKind::Dense {
                activation: Activation::Linear,
            },
            units,
            name: None,
            input_dim: None,
            input_length: None,
        }
    }

    /// Recurrent layer with `units` hidden width.
    #[must_use]
    pub fn lstm(units: usize) -> Self {
        Self {
            kind: LayerKind::Lstm,
            units,
            name: None,
            input_dim: None,
            input_length: None,
        }
    }

    /// Set the dense activation. Has no effect on recurrent layers, whose
    /// gate activations are fixed.
    #[must_use]
    pub fn with_activation(mut self, activation: Activation) -> Self {
        if let LayerKind::Dense { activation: a } = &mut self.kind {
            *a = activation;
        }
        self
    }

    /// Name the layer. Named layers keep their name as the internal tensor
    /// name after conversion, making them addressable for derived outputs.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Declare the input width. Required on the first layer.
    #[must_use]
    pub fn with_input_dim(mut self, input_dim: usize) -> Self {
        self.input_dim = Some(input_dim);
        self
    }

    /// Declare the training-time sequence length on a recurrent first layer.
    /// Annotation only; inference accepts any sequence length.
    #[must_use]
    pub fn with_input_length(mut self, input_length: usize) -> Self {
        self.input_length = Some(input_length);
        self
    }

    /// Layer kind.
    #[must_use]
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Output width.
    #[must_use]
    pub fn units(&self) -> usize {
        self.units
    }

    /// Layer name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared input width, if set.
    #[must_use]
    pub fn input_dim(&self) -> Option<usize> {
        self.input_dim
    }

    /// Declared sequence length, if set.
    #[must_use]
    pub fn input_length(&self) -> Option<usize> {
        self.input_length
    }

    /// Number of weight arrays this layer carries.
    pub(crate) fn parameter_count(&self) -> usize {
        match self.kind {
            LayerKind::Dense { .. } => 2,
            LayerKind::Lstm => 3,
        }
    }

    /// Shapes of this layer's weight arrays for a given fan-in, in
    /// assignment order.
    pub(crate) fn weight_shapes(&self, fan_in: usize) -> Vec<Vec<usize>> {
        match self.kind {
            LayerKind::Dense { .. } => vec![vec![fan_in, self.units], vec![self.units]],
            LayerKind::Lstm => vec![
                vec![fan_in, 4 * self.units],
                vec![self.units, 4 * self.units],
                vec![4 * self.units],
            ],
        }
    }
}
