//! Error types for Congelar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Congelar operations.
///
/// Provides detailed context about failures including shape mismatches,
/// invalid conversion requests, and missing or duplicated feature names.
///
/// # Examples
///
/// ```
/// use congelar::error::CongelarError;
///
/// let err = CongelarError::DimensionMismatch {
///     expected: "[5, 24]".to_string(),
///     actual: "[5, 20]".to_string(),
/// };
/// assert!(err.to_string().contains("mismatch"));
/// ```
#[derive(Debug)]
pub enum CongelarError {
    /// Tensor/weight dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Conversion request could not be satisfied.
    Conversion {
        /// Failure description
        message: String,
    },

    /// A named input or output feature was not supplied.
    MissingFeature {
        /// Feature name
        name: String,
    },

    /// An output binding names an internal tensor the model does not compute.
    UnknownTensor {
        /// Tensor name
        name: String,
    },

    /// Two features or internal tensors share a name.
    DuplicateFeature {
        /// Colliding name
        name: String,
    },

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for CongelarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CongelarError::DimensionMismatch { expected, actual } => {
                write!(f, "Shape mismatch: expected {expected}, got {actual}")
            }
            CongelarError::Conversion { message } => {
                write!(f, "Conversion failed: {message}")
            }
            CongelarError::MissingFeature { name } => {
                write!(f, "Missing feature: {name}")
            }
            CongelarError::UnknownTensor { name } => {
                write!(f, "Unknown internal tensor: {name}")
            }
            CongelarError::DuplicateFeature { name } => {
                write!(f, "Duplicate feature name: {name}")
            }
            CongelarError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            CongelarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CongelarError {}

impl From<&str> for CongelarError {
    fn from(msg: &str) -> Self {
        CongelarError::Other(msg.to_string())
    }
}

impl From<String> for CongelarError {
    fn from(msg: String) -> Self {
        CongelarError::Other(msg)
    }
}

impl From<serde_json::Error> for CongelarError {
    fn from(err: serde_json::Error) -> Self {
        CongelarError::Serialization(err.to_string())
    }
}

impl CongelarError {
    /// Create a conversion error with a descriptive message
    #[must_use]
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for CongelarError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<CongelarError> for &str {
    fn eq(&self, other: &CongelarError) -> bool {
        *self == other.to_string()
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, CongelarError>;
