//! Network-to-artifact conversion.

use std::collections::HashSet;

use crate::convert::artifact::{CompiledModel, ExecutionPlan, LayerStep, StepOp};
use crate::convert::options::ConvertOptions;
use crate::convert::spec::{
    ClassifierInfo, FeatureDescription, FeatureKind, ModelSpec, OutputDescription,
};
use crate::error::{CongelarError, Result};
use crate::nn::{LayerKind, Network};

/// Predicted-label feature name when the caller does not choose one.
const DEFAULT_PREDICTED_FEATURE: &str = "classLabel";

/// Convert a weighted network into an inference-only [`CompiledModel`].
///
/// `input_names` and `output_names` each take exactly one name: the
/// single input feature and the terminal output feature. Layer names
/// become internal tensor names (unnamed layers get `layer{index}`),
/// which is what makes hidden layers addressable for
/// [`ModelSpec::add_derived_output`].
///
/// With class labels in `options` the terminal output is declared as a
/// label keyed probability dictionary and a predicted-label output is
/// added, named `"classLabel"` unless the options say otherwise.
///
/// # Errors
///
/// Fails if the network is empty, lacks a declared input width or
/// assigned weights, if any name is empty, duplicated, or refers to a
/// feature that does not exist, or if the label count disagrees with the
/// terminal layer width.
pub fn compile(
    network: &Network,
    input_names: &[&str],
    output_names: &[&str],
    options: ConvertOptions,
) -> Result<CompiledModel> {
    let (input_dim, terminal_units) = validate_network(network)?;
    let (input_name, output_name) = validate_names(input_names, output_names)?;
    let classifier = validate_classifier(&options, output_name, terminal_units)?;
    let steps = build_steps(network)?;

    let terminal = match steps.last() {
        Some(step) => step.tensor.clone(),
        None => return Err(CongelarError::conversion("network has no layers")),
    };
    let terminal_kind = if classifier
        .as_ref()
        .is_some_and(|info| info.probabilities_output == output_name)
    {
        FeatureKind::Dictionary
    } else {
        FeatureKind::Array {
            shape: vec![terminal_units],
        }
    };

    let mut outputs = vec![OutputDescription {
        feature: FeatureDescription {
            name: output_name.to_string(),
            kind: terminal_kind,
        },
        tensor: terminal.clone(),
    }];
    if let Some(info) = &classifier {
        outputs.push(OutputDescription {
            feature: FeatureDescription {
                name: info.predicted_feature.clone(),
                kind: FeatureKind::Label,
            },
            tensor: terminal,
        });
    }

    let spec = ModelSpec {
        inputs: vec![FeatureDescription {
            name: input_name.to_string(),
            kind: FeatureKind::Array {
                shape: vec![input_dim],
            },
        }],
        outputs,
        classifier,
    };
    CompiledModel::new(spec, ExecutionPlan { input_dim, steps })
}

fn validate_network(network: &Network) -> Result<(usize, usize)> {
    let terminal_units = match network.layers().last() {
        Some(layer) => layer.units(),
        None => return Err(CongelarError::conversion("network has no layers")),
    };
    let input_dim = network.input_dim().ok_or_else(|| {
        CongelarError::conversion("first layer does not declare an input dimension")
    })?;
    if !network.has_weights() {
        return Err(CongelarError::conversion("network weights are not assigned"));
    }
    Ok((input_dim, terminal_units))
}

fn validate_names<'a>(
    input_names: &[&'a str],
    output_names: &[&'a str],
) -> Result<(&'a str, &'a str)> {
    let input_name = match input_names {
        [name] => *name,
        other => {
            return Err(CongelarError::conversion(format!(
                "expected exactly one input name, got {}",
                other.len()
            )))
        }
    };
    let output_name = match output_names {
        [name] => *name,
        other => {
            return Err(CongelarError::conversion(format!(
                "expected exactly one output name, got {}",
                other.len()
            )))
        }
    };
    if input_name.is_empty() {
        return Err(CongelarError::conversion("input name is empty"));
    }
    if output_name.is_empty() {
        return Err(CongelarError::conversion("output name is empty"));
    }
    if input_name == output_name {
        return Err(CongelarError::DuplicateFeature {
            name: input_name.to_string(),
        });
    }
    Ok((input_name, output_name))
}

fn validate_classifier(
    options: &ConvertOptions,
    output_name: &str,
    terminal_units: usize,
) -> Result<Option<ClassifierInfo>> {
    let Some(labels) = options.class_labels() else {
        if options.probabilities_output().is_some() {
            return Err(CongelarError::conversion(
                "a probabilities output requires class labels",
            ));
        }
        if options.predicted_feature().is_some() {
            return Err(CongelarError::conversion(
                "a predicted feature requires class labels",
            ));
        }
        return Ok(None);
    };

    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(CongelarError::DuplicateFeature {
                name: label.clone(),
            });
        }
    }
    if labels.len() != terminal_units {
        return Err(CongelarError::conversion(format!(
            "{} class labels for a terminal layer of width {terminal_units}",
            labels.len()
        )));
    }

    if let Some(probabilities) = options.probabilities_output() {
        if probabilities != output_name {
            return Err(CongelarError::conversion(format!(
                "probabilities output {probabilities} is not a declared output"
            )));
        }
    }

    let predicted = options
        .predicted_feature()
        .unwrap_or(DEFAULT_PREDICTED_FEATURE);
    if predicted.is_empty() {
        return Err(CongelarError::conversion("predicted feature name is empty"));
    }
    if predicted == output_name {
        return Err(CongelarError::DuplicateFeature {
            name: predicted.to_string(),
        });
    }

    Ok(Some(ClassifierInfo {
        class_labels: labels.to_vec(),
        predicted_feature: predicted.to_string(),
        probabilities_output: options
            .probabilities_output()
            .unwrap_or(output_name)
            .to_string(),
    }))
}

fn build_steps(network: &Network) -> Result<Vec<LayerStep>> {
    let mut names = HashSet::new();
    let mut steps = Vec::with_capacity(network.len());
    for (index, layer) in network.layers().iter().enumerate() {
        let tensor = layer
            .name()
            .map_or_else(|| format!("layer{index}"), str::to_string);
        if !names.insert(tensor.clone()) {
            return Err(CongelarError::DuplicateFeature { name: tensor });
        }
        let group = network.layer_weights(index);
        let op = match layer.kind() {
            LayerKind::Dense { activation } => StepOp::Dense {
                activation,
                units: layer.units(),
                kernel: group[0].clone(),
                bias: group[1].clone(),
            },
            LayerKind::Lstm => StepOp::Lstm {
                units: layer.units(),
                kernel: group[0].clone(),
                recurrent: group[1].clone(),
                bias: group[2].clone(),
            },
        };
        steps.push(LayerStep { tensor, op });
    }
    Ok(steps)
}
