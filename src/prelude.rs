//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use congelar::prelude::*;
//! ```

pub use crate::compare::{agrees_to_places, compare_to_places, AgreementReport};
pub use crate::convert::{compile, CompiledModel, ConvertOptions, FeatureKind, ModelSpec, Value};
pub use crate::error::{CongelarError, Result};
pub use crate::harness::{
    ClassifierReport, ClassifierScenario, IntermediateTapScenario, TapReport,
};
pub use crate::nn::{Activation, Layer, Network};
pub use crate::tensor::Tensor;
