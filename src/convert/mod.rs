//! Conversion of a weighted [`Network`](crate::nn::Network) into an
//! inference-only artifact.
//!
//! The entry point is [`compile`], which validates the network and the
//! requested feature names, then produces a [`CompiledModel`] holding a
//! describable [`ModelSpec`] alongside an executable plan. Classifier
//! metadata (class labels, predicted-label feature, probabilities output)
//! is attached through [`ConvertOptions`].
//!
//! # Example
//!
//! ```
//! use congelar::convert::{compile, ConvertOptions};
//! use congelar::nn::{Layer, Network};
//! use congelar::tensor::Tensor;
//!
//! let mut network = Network::new().add(Layer::dense(2).with_input_dim(3));
//! network
//!     .set_weights(vec![Tensor::zeros(&[3, 2]), Tensor::zeros(&[2])])
//!     .unwrap();
//!
//! let model = compile(&network, &["input"], &["output"], ConvertOptions::new()).unwrap();
//! assert_eq!(model.spec().outputs.len(), 1);
//! ```

pub mod artifact;
pub mod compile;
pub mod options;
pub mod spec;
pub mod value;

pub use artifact::CompiledModel;
pub use compile::compile;
pub use options::ConvertOptions;
pub use spec::{ClassifierInfo, FeatureDescription, FeatureKind, ModelSpec, OutputDescription};
pub use value::Value;
