//! Inference-only artifact produced by conversion.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::convert::spec::{ClassifierInfo, FeatureKind, ModelSpec};
use crate::convert::value::Value;
use crate::error::{CongelarError, Result};
use crate::nn::ops;
use crate::nn::Activation;
use crate::tensor::Tensor;

/// One dense or recurrent step with its frozen weights.
#[derive(Debug, Clone)]
pub(crate) enum StepOp {
    Dense {
        activation: Activation,
        units: usize,
        kernel: Tensor,
        bias: Tensor,
    },
    Lstm {
        units: usize,
        kernel: Tensor,
        recurrent: Tensor,
        bias: Tensor,
    },
}

impl StepOp {
    fn units(&self) -> usize {
        match self {
            StepOp::Dense { units, .. } | StepOp::Lstm { units, .. } => *units,
        }
    }
}

/// A named internal tensor and the op that computes it.
#[derive(Debug, Clone)]
pub(crate) struct LayerStep {
    /// Internal tensor name, unique within the plan.
    pub(crate) tensor: String,
    pub(crate) op: StepOp,
}

/// The executable half of a compiled model.
#[derive(Debug, Clone)]
pub(crate) struct ExecutionPlan {
    pub(crate) input_dim: usize,
    pub(crate) steps: Vec<LayerStep>,
}

impl ExecutionPlan {
    /// Run every step once and return each step's output, in step order.
    fn run(&self, input: &[f32], mut seq: usize) -> Result<Vec<Vec<f32>>> {
        let mut current = input.to_vec();
        let mut fan_in = self.input_dim;
        let mut outputs = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let out = match &step.op {
                StepOp::Lstm {
                    units,
                    kernel,
                    recurrent,
                    bias,
                } => {
                    let h = ops::lstm_sequence(
                        &current,
                        seq,
                        fan_in,
                        kernel.data(),
                        recurrent.data(),
                        bias.data(),
                        *units,
                    );
                    seq = 1;
                    h
                }
                StepOp::Dense {
                    activation,
                    units,
                    kernel,
                    bias,
                } => {
                    if seq != 1 {
                        return Err(CongelarError::DimensionMismatch {
                            expected: "a single feature vector".to_string(),
                            actual: format!("a sequence of {seq} timesteps"),
                        });
                    }
                    activation.apply(&ops::dense_step(
                        &current,
                        kernel.data(),
                        bias.data(),
                        *units,
                    ))
                }
            };
            fan_in = step.op.units();
            current.clone_from(&out);
            outputs.push(out);
        }
        Ok(outputs)
    }
}

/// A converted model: a describable [`ModelSpec`] plus frozen weights.
///
/// Produced by [`compile`](crate::convert::compile). The spec half can be
/// inspected, serialized, and patched with
/// [`ModelSpec::add_derived_output`]; [`CompiledModel::rebuild`] then
/// re-validates the patched spec against the unchanged execution plan,
/// so exposing an internal tensor never perturbs any computed value.
///
/// Prediction is by named features: inputs arrive in a map keyed by the
/// declared input name, outputs come back keyed by the declared output
/// names, each materialized per its [`FeatureKind`].
#[derive(Debug, Clone)]
pub struct CompiledModel {
    spec: ModelSpec,
    plan: ExecutionPlan,
}

impl CompiledModel {
    /// Validate a spec against an execution plan and bind them.
    pub(crate) fn new(spec: ModelSpec, plan: ExecutionPlan) -> Result<Self> {
        let widths: HashMap<&str, usize> = plan
            .steps
            .iter()
            .map(|step| (step.tensor.as_str(), step.op.units()))
            .collect();

        let input = match spec.inputs.as_slice() {
            [single] => single,
            other => {
                return Err(CongelarError::conversion(format!(
                    "expected exactly one input feature, got {}",
                    other.len()
                )))
            }
        };
        match &input.kind {
            FeatureKind::Array { shape } if shape.iter().product::<usize>() == plan.input_dim => {}
            other => {
                return Err(CongelarError::DimensionMismatch {
                    expected: format!("an array input of {} elements", plan.input_dim),
                    actual: format!("{other:?}"),
                })
            }
        }

        let mut seen = HashSet::new();
        for output in &spec.outputs {
            let name = output.feature.name.as_str();
            if !seen.insert(name) || name == input.name {
                return Err(CongelarError::DuplicateFeature {
                    name: name.to_string(),
                });
            }
            let width = *widths.get(output.tensor.as_str()).ok_or_else(|| {
                CongelarError::UnknownTensor {
                    name: output.tensor.clone(),
                }
            })?;
            match &output.feature.kind {
                FeatureKind::Array { shape } => {
                    let declared: usize = shape.iter().product();
                    if declared != width {
                        return Err(CongelarError::DimensionMismatch {
                            expected: format!("a declared size of {width} for output {name}"),
                            actual: format!("{declared}"),
                        });
                    }
                }
                FeatureKind::Scalar => {
                    if width != 1 {
                        return Err(CongelarError::DimensionMismatch {
                            expected: format!("a width 1 tensor for scalar output {name}"),
                            actual: format!("width {width}"),
                        });
                    }
                }
                FeatureKind::Dictionary | FeatureKind::Label => {
                    let info = spec.classifier.as_ref().ok_or_else(|| {
                        CongelarError::conversion(format!(
                            "output {name} requires classifier metadata"
                        ))
                    })?;
                    if info.class_labels.len() != width {
                        return Err(CongelarError::DimensionMismatch {
                            expected: format!("{width} class labels for output {name}"),
                            actual: format!("{}", info.class_labels.len()),
                        });
                    }
                }
            }
        }

        if let Some(info) = &spec.classifier {
            if spec.output(&info.probabilities_output).is_none() {
                return Err(CongelarError::conversion(format!(
                    "probabilities output {} is not a declared output",
                    info.probabilities_output
                )));
            }
        }

        Ok(Self { spec, plan })
    }

    /// The model's describable interface.
    #[must_use]
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Bind a patched spec to this model's unchanged execution plan.
    ///
    /// # Errors
    ///
    /// Fails if the spec names an internal tensor the plan does not
    /// compute, or declares a shape or kind the bound tensor cannot
    /// satisfy.
    pub fn rebuild(&self, spec: ModelSpec) -> Result<CompiledModel> {
        CompiledModel::new(spec, self.plan.clone())
    }

    /// Run inference for one set of named inputs.
    ///
    /// A rank-1 input of the declared width runs as a single timestep; a
    /// rank-2 `[seq_len, width]` input runs a recurrent first step over
    /// the whole sequence.
    ///
    /// # Errors
    ///
    /// Fails if the declared input feature is absent from the map or its
    /// tensor disagrees with the declared input width.
    pub fn predict(&self, inputs: &HashMap<String, Tensor>) -> Result<HashMap<String, Value>> {
        let input_desc = self
            .spec
            .inputs
            .first()
            .ok_or_else(|| CongelarError::conversion("model declares no inputs"))?;
        let tensor = inputs
            .get(&input_desc.name)
            .ok_or_else(|| CongelarError::MissingFeature {
                name: input_desc.name.clone(),
            })?;

        let (seq, width) = match tensor.ndim() {
            1 => (1, tensor.shape()[0]),
            2 => (tensor.shape()[0], tensor.shape()[1]),
            n => {
                return Err(CongelarError::DimensionMismatch {
                    expected: "a rank 1 or rank 2 input".to_string(),
                    actual: format!("rank {n}"),
                })
            }
        };
        if width != self.plan.input_dim {
            return Err(CongelarError::DimensionMismatch {
                expected: format!("input width {}", self.plan.input_dim),
                actual: format!("{width}"),
            });
        }

        let activations = self.plan.run(tensor.data(), seq)?;
        let by_tensor: HashMap<&str, &[f32]> = self
            .plan
            .steps
            .iter()
            .zip(&activations)
            .map(|(step, values)| (step.tensor.as_str(), values.as_slice()))
            .collect();

        let mut outputs = HashMap::new();
        for output in &self.spec.outputs {
            let values = *by_tensor.get(output.tensor.as_str()).ok_or_else(|| {
                CongelarError::UnknownTensor {
                    name: output.tensor.clone(),
                }
            })?;
            let value = match &output.feature.kind {
                FeatureKind::Array { .. } => Value::Array(values.to_vec()),
                FeatureKind::Scalar => {
                    let scalar = values
                        .first()
                        .copied()
                        .ok_or_else(|| CongelarError::empty_input("scalar output"))?;
                    Value::Scalar(scalar)
                }
                FeatureKind::Dictionary => {
                    let info = self.classifier_info(&output.feature.name)?;
                    let map: BTreeMap<String, f32> = info
                        .class_labels
                        .iter()
                        .cloned()
                        .zip(values.iter().copied())
                        .collect();
                    Value::Dictionary(map)
                }
                FeatureKind::Label => {
                    let info = self.classifier_info(&output.feature.name)?;
                    let index = ops::argmax(values);
                    let label = info.class_labels.get(index).cloned().ok_or_else(|| {
                        CongelarError::conversion("predicted index is out of label range")
                    })?;
                    Value::Label(label)
                }
            };
            outputs.insert(output.feature.name.clone(), value);
        }
        Ok(outputs)
    }

    fn classifier_info(&self, output_name: &str) -> Result<&ClassifierInfo> {
        self.spec.classifier.as_ref().ok_or_else(|| {
            CongelarError::conversion(format!(
                "output {output_name} requires classifier metadata"
            ))
        })
    }
}
