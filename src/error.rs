//! Error types for eclio

use crate::types::ArrayType;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, EclError>;

/// Everything that can go wrong while reading, indexing or writing a container
#[derive(Error, Debug)]
pub enum EclError {
    /// Container could not be opened, read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An array header is malformed or truncated
    #[error("corrupt array header at byte {position}: {message}")]
    CorruptHeader { position: u64, message: String },

    /// An array payload is malformed, truncated or has mismatching block markers
    #[error("corrupt data in array '{array}' at byte {position}: {message}")]
    Corrupt {
        array: String,
        position: u64,
        message: String,
    },

    /// Neither the binary nor the formatted framing was recognized
    #[error("unrecognized container format: {0}")]
    UnrecognizedFormat(String),

    /// Typed access with an element type that does not match the declared array type
    #[error("array '{name}' has type {actual}, requested {expected}")]
    TypeMismatch {
        name: String,
        expected: ArrayType,
        actual: ArrayType,
    },

    #[error("array '{0}' not found")]
    ArrayNotFound(String),

    #[error("array index {index} out of range ({len} arrays)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("report step {0} not found")]
    StepNotFound(i32),

    #[error("array '{name}' not found at report step {step}")]
    ArrayNotFoundAtStep { name: String, step: i32 },

    /// Writer-side validation failure
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EclError {
    pub(crate) fn corrupt(array: &str, position: u64, message: impl Into<String>) -> Self {
        EclError::Corrupt {
            array: array.to_string(),
            position,
            message: message.into(),
        }
    }

    pub(crate) fn header(position: u64, message: impl Into<String>) -> Self {
        EclError::CorruptHeader {
            position,
            message: message.into(),
        }
    }

    /// True for the corrupt-format kinds
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            EclError::Corrupt { .. } | EclError::CorruptHeader { .. }
        )
    }

    /// True for the not-found kinds (absent name, index or step)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EclError::ArrayNotFound(_)
                | EclError::IndexOutOfRange { .. }
                | EclError::StepNotFound(_)
                | EclError::ArrayNotFoundAtStep { .. }
        )
    }
}
