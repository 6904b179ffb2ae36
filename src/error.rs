//! Error types for the column and type introspection layer.
//!
//! Metadata lookups against the engine never fail; a missing logical type is
//! reported as `None`. These errors cover the host dispatch surface and the
//! checked accessors.

use thiserror::Error;

use crate::types::TypeId;

/// Result type alias for introspection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for introspection and host dispatch operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Method is not defined on the host class.
    #[error("undefined method `{method}' for {class}")]
    NoMethod { class: &'static str, method: String },

    /// Private method called through the public dispatch path.
    #[error("private method `{method}' called for {class}")]
    PrivateMethod { class: &'static str, method: String },

    /// Wrong number of arguments passed to a host method.
    #[error("wrong number of arguments for `{method}' (given {given}, expected {expected})")]
    ArgumentCount {
        method: String,
        expected: usize,
        given: usize,
    },

    /// Host value could not be converted to the expected type.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },

    /// Accessor used on a logical type of the wrong kind.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: TypeId, actual: String },

    /// Column index out of bounds.
    #[error("Column index {index} out of bounds (columns: {count})")]
    ColumnIndexOutOfBounds { index: u64, count: u64 },

    /// Struct child or union member index out of bounds.
    #[error("Child index {index} out of bounds (children: {count})")]
    ChildIndexOutOfBounds { index: u64, count: u64 },
}

impl Error {
    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// Create an undefined method error.
    pub fn no_method(class: &'static str, method: impl Into<String>) -> Self {
        Self::NoMethod {
            class,
            method: method.into(),
        }
    }
}
