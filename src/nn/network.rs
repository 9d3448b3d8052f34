//! Sequential network description with assignable weights.

use crate::error::{CongelarError, Result};
use crate::nn::layer::{Layer, LayerKind};
use crate::nn::ops;
use crate::tensor::Tensor;

/// An ordered stack of layers with flat-array weight assignment.
///
/// Layers are added in execution order. Weights arrive as one flat list of
/// arrays matching [`Network::weight_shapes`]; assignment is shape-checked
/// so a bad weight set fails before any forward pass or conversion.
///
/// # Example
///
/// ```
/// use congelar::nn::{Layer, Network};
/// use congelar::tensor::Tensor;
///
/// let mut network = Network::new()
///     .add(Layer::dense(2).with_input_dim(3));
/// network
///     .set_weights(vec![Tensor::zeros(&[3, 2]), Tensor::zeros(&[2])])
///     .unwrap();
///
/// let output = network.forward(&Tensor::from_slice(&[1.0, 2.0, 3.0])).unwrap();
/// assert_eq!(output.shape(), &[2]);
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    /// Per-layer weight groups, parallel to `layers`. Empty until assigned.
    weights: Vec<Vec<Tensor>>,
}

impl Network {
    /// Create an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Add a layer to the stack.
    ///
    /// Returns self for method chaining.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn add(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self.weights.push(Vec::new());
        self
    }

    /// Get the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Check if the network has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The layers in execution order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Input width declared on the first layer.
    #[must_use]
    pub fn input_dim(&self) -> Option<usize> {
        self.layers.first().and_then(Layer::input_dim)
    }

    /// Sequence length declared on the first layer.
    #[must_use]
    pub fn input_length(&self) -> Option<usize> {
        self.layers.first().and_then(Layer::input_length)
    }

    /// Whether every layer has its weight group assigned.
    #[must_use]
    pub fn has_weights(&self) -> bool {
        !self.layers.is_empty() && self.weights.iter().all(|group| !group.is_empty())
    }

    /// Weight group for one layer. Empty before assignment.
    pub(crate) fn layer_weights(&self, index: usize) -> &[Tensor] {
        &self.weights[index]
    }

    /// Expected weight array shapes, flat and in assignment order.
    ///
    /// # Errors
    ///
    /// Fails if the network is empty or the first layer declares no input
    /// width (fan-ins cannot be derived without it).
    pub fn weight_shapes(&self) -> Result<Vec<Vec<usize>>> {
        let mut fan_in = self.declared_input_dim()?;
        let mut shapes = Vec::new();
        for layer in &self.layers {
            shapes.extend(layer.weight_shapes(fan_in));
            fan_in = layer.units();
        }
        Ok(shapes)
    }

    /// Assign weights as a flat list of arrays.
    ///
    /// # Errors
    ///
    /// Fails with a shape mismatch if the array count or any array's shape
    /// disagrees with [`Network::weight_shapes`]. On error no weights are
    /// assigned.
    pub fn set_weights(&mut self, weights: Vec<Tensor>) -> Result<()> {
        let expected = self.weight_shapes()?;
        if weights.len() != expected.len() {
            return Err(CongelarError::DimensionMismatch {
                expected: format!("{} weight arrays", expected.len()),
                actual: format!("{}", weights.len()),
            });
        }
        for (index, (tensor, shape)) in weights.iter().zip(&expected).enumerate() {
            if tensor.shape() != shape.as_slice() {
                return Err(CongelarError::DimensionMismatch {
                    expected: format!("{shape:?} for weight array {index}"),
                    actual: format!("{:?}", tensor.shape()),
                });
            }
        }

        let mut iter = weights.into_iter();
        for (index, layer) in self.layers.iter().enumerate() {
            self.weights[index] = (&mut iter).take(layer.parameter_count()).collect();
        }
        Ok(())
    }

    /// Assigned weights as a flat list, in assignment order.
    #[must_use]
    pub fn get_weights(&self) -> Vec<Tensor> {
        self.weights.iter().flatten().cloned().collect()
    }

    /// Per-layer output activations for one input.
    ///
    /// A rank-1 input of the declared width runs as a single timestep; a
    /// rank-2 `[seq_len, width]` input runs a recurrent first layer over
    /// the whole sequence.
    ///
    /// # Errors
    ///
    /// Fails if weights are unassigned or the input shape disagrees with
    /// the declared input width.
    pub fn activations(&self, input: &Tensor) -> Result<Vec<Vec<f32>>> {
        if self.layers.is_empty() {
            return Err(CongelarError::empty_input("network layers"));
        }
        if !self.has_weights() {
            return Err(CongelarError::Other(
                "network weights are not assigned".to_string(),
            ));
        }
        let declared = self.declared_input_dim()?;
        let (mut seq, width) = match input.ndim() {
            1 => (1, input.shape()[0]),
            2 => (input.shape()[0], input.shape()[1]),
            n => {
                return Err(CongelarError::DimensionMismatch {
                    expected: "a rank 1 or rank 2 input".to_string(),
                    actual: format!("rank {n}"),
                })
            }
        };
        if width != declared {
            return Err(CongelarError::DimensionMismatch {
                expected: format!("input width {declared}"),
                actual: format!("{width}"),
            });
        }

        let mut current = input.data().to_vec();
        let mut outputs = Vec::with_capacity(self.layers.len());
        let mut fan_in = declared;
        for (index, layer) in self.layers.iter().enumerate() {
            let group = &self.weights[index];
            let out = match layer.kind() {
                LayerKind::Lstm => {
                    let h = ops::lstm_sequence(
                        &current,
                        seq,
                        fan_in,
                        group[0].data(),
                        group[1].data(),
                        group[2].data(),
                        layer.units(),
                    );
                    seq = 1;
                    h
                }
                LayerKind::Dense { activation } => {
                    if seq != 1 {
                        return Err(CongelarError::DimensionMismatch {
                            expected: "a single feature vector".to_string(),
                            actual: format!("a sequence of {seq} timesteps"),
                        });
                    }
                    let y = ops::dense_step(&current, group[0].data(), group[1].data(), layer.units());
                    activation.apply(&y)
                }
            };
            fan_in = layer.units();
            current.clone_from(&out);
            outputs.push(out);
        }
        Ok(outputs)
    }

    /// Output of the last layer for one input.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Network::activations`].
    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let outputs = self.activations(input)?;
        match outputs.last() {
            Some(last) => Ok(Tensor::from_slice(last)),
            None => Err(CongelarError::empty_input("network layers")),
        }
    }

    fn declared_input_dim(&self) -> Result<usize> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| CongelarError::empty_input("network layers"))?;
        first.input_dim().ok_or_else(|| {
            CongelarError::Other("first layer does not declare an input dimension".to_string())
        })
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
