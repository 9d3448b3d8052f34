//! Neural network building blocks for conversion testing.
//!
//! Networks here are descriptions, not trainable modules: a [`Network`] is an
//! ordered list of [`Layer`] descriptors whose weights are assigned as flat
//! arrays, then read back by the converter. The reference forward pass in
//! [`Network`] and the compiled artifact both run on the math in [`ops`], so
//! source and artifact differ only in what the conversion step did.
//!
//! # Example
//!
//! ```
//! use congelar::nn::{Activation, Layer, Network};
//!
//! let network = Network::new()
//!     .add(Layer::dense(4).with_input_dim(3))
//!     .add(Layer::dense(2).with_activation(Activation::Softmax));
//!
//! let shapes = network.weight_shapes().unwrap();
//! assert_eq!(shapes, vec![vec![3, 4], vec![4], vec![4, 2], vec![2]]);
//! ```

pub mod init;
mod layer;
mod network;
pub mod ops;

pub use layer::{Activation, Layer, LayerKind};
pub use network::Network;
