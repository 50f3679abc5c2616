//! Errors raised by inspectors and the JSON codec.

use spyglass_values::HostError;
use thiserror::Error;

/// Failure of an inspector operation.
///
/// Rendering (`get_display_value`, `to_plaintext`, ...) never produces one of
/// these; navigation, copying and serialization do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InspectError {
    /// The operation is not defined for values of this type.
    #[error("{operation}() is not implemented for type: {type_name}")]
    Unsupported {
        operation: &'static str,
        type_name: String,
    },

    /// The value is mutable and has no safe deep-copy strategy.
    #[error("Deepcopying is not supported for type: {type_name}")]
    CopyRefused { type_name: String },

    /// A JSON payload did not have the expected shape.
    #[error("malformed payload: {message}")]
    MalformedPayload { message: String },

    /// An optional third-party library binding was never installed.
    #[error("{library} is not available")]
    LibraryUnavailable { library: &'static str },

    /// The host raised while the inspector was talking to the value.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl InspectError {
    pub fn unsupported(operation: &'static str, type_name: impl Into<String>) -> Self {
        InspectError::Unsupported {
            operation,
            type_name: type_name.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        InspectError::MalformedPayload {
            message: message.into(),
        }
    }
}

pub type Result<T, E = InspectError> = core::result::Result<T, E>;
