use thiserror::Error;

use crate::signature::Selector;

/// Stores the result of interface and encoding operations. Returns an
/// [`AbiError`] upon failure.
pub type AbiResult<T> = Result<T, AbiError>;

/// An error type for interface parsing and call-data encoding.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum AbiError {
    /// The interface description is not valid JSON or an entry in it is
    /// structurally invalid.
    #[error("Malformed interface description! ({0})")]
    MalformedInterface(String),

    /// A parameter type string does not name a supported type.
    #[error("Unknown parameter type `{0}`!")]
    UnknownTypeTag(String),

    /// The number of arguments differs from the number of declared inputs.
    #[error("Expected {expected} arguments but got {found}!")]
    ArityMismatch { expected: usize, found: usize },

    /// An argument does not have the shape of its parameter.
    #[error("Value `{found}` does not fit parameter type `{expected}`!")]
    TypeMismatch { expected: String, found: String },

    /// No function with this name in the interface.
    #[error("The interface has no function named `{0}`!")]
    UnknownFunction(String),

    /// No function with this selector in the interface.
    #[error("The interface has no function with selector {0}!")]
    UnknownSelector(Selector),

    /// The compiler output does not contain the requested contract.
    #[error("The compiler output has no contract `{0}`!")]
    UnknownContract(String),

    /// Call data that cannot be decoded against the expected types.
    #[error("Invalid call data! ({0})")]
    InvalidData(String),
}

impl From<serde_json::Error> for AbiError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedInterface(err.to_string())
    }
}
