//! Error types for annotation import and export.

use thiserror::Error;

/// Errors that can occur while reading or writing annotation documents.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid format structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// Required field is missing
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// A line, angle, circle or pivot names a point that is not in the document
    #[error("{kind} references missing point {index}")]
    DanglingReference {
        /// The kind of entry holding the reference
        kind: String,
        /// The missing point index
        index: u32,
    },

    /// A point index that is zero, negative or too large
    #[error("Invalid point index: {index}")]
    InvalidIndex {
        /// The offending value
        index: i64,
    },

    /// A color that is not `#rrggbb`
    #[error("Invalid color: {value}")]
    InvalidColor {
        /// The offending text
        value: String,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a dangling reference error.
    pub fn dangling(kind: impl Into<String>, index: u32) -> Self {
        Self::DanglingReference {
            kind: kind.into(),
            index,
        }
    }
}
