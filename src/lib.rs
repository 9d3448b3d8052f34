//! Congelar: numeric correctness harness for neural network conversion.
//!
//! Congelar builds small networks with seeded weights, freezes them into
//! inference-only artifacts with named input and output features, and
//! checks that the artifact's numbers agree with the source network's.
//! Classifier conversions attach class labels so probabilities come back
//! as a label keyed dictionary; spec patching exposes hidden layers as
//! derived outputs without perturbing any existing value.
//!
//! # Quick Start
//!
//! ```
//! use congelar::prelude::*;
//!
//! // Tap the middle layer of a three layer stack and check it against
//! // a two layer truncation built from the same weights.
//! let report = IntermediateTapScenario {
//!     input_dim: 4,
//!     widths: [5, 3, 2],
//!     input_name: "input".to_string(),
//!     output_name: "output".to_string(),
//!     middle_name: "middle".to_string(),
//!     tap_name: "middle_output".to_string(),
//!     seed: 7,
//!     places: 2,
//! }
//! .run()
//! .unwrap();
//!
//! assert!(report.all_agree(), "{}", report.agreement().summary());
//! ```
//!
//! # Modules
//!
//! - [`tensor`]: Flat row-major tensors
//! - [`nn`]: Layer and network description, seeded weight init, math ops
//! - [`convert`]: Network-to-artifact conversion, specs, prediction
//! - [`compare`]: Decimal-place agreement checks
//! - [`harness`]: End-to-end conversion correctness scenarios
//! - [`error`]: Error types

pub mod compare;
pub mod convert;
pub mod error;
pub mod harness;
pub mod nn;
pub mod prelude;
pub mod tensor;

pub use error::{CongelarError, Result};
pub use tensor::Tensor;
