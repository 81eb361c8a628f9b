//! Error types for MARC operations.
//!
//! This module provides the [`MarcError`] type for all library operations
//! and the [`Result`] convenience type.
//!
//! Lookups that find nothing are not errors: they return `None` (or the
//! read-only placeholder from the `*_or_empty` accessors). Errors are reserved
//! for misuse, such as touching subfields on a control field, and for
//! malformed input.

use thiserror::Error;

/// Error type for all MARC library operations.
#[derive(Error, Debug)]
pub enum MarcError {
    /// Operation is not valid for the field's current kind (control vs. data field),
    /// or the field cannot be represented in the requested form.
    #[error("Illegal operation: {0}")]
    StateViolation(String),

    /// Positional insert beyond the end of a subfield list.
    #[error("Index {index} out of range for field with {len} subfields")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Number of subfields in the field
        len: usize,
    },

    /// Malformed line format input.
    #[error("Parse error at line {line}: {message}")]
    ParseError {
        /// 1-based physical line number
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// A matcher or sorter pattern is not a valid regular expression.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// MarcXchange serialization or deserialization failure.
    #[error("XML error: {0}")]
    XmlError(String),

    /// The input declares a record format this reader does not handle.
    #[error("Unsupported record format: {0}")]
    UnsupportedFormat(String),
}

impl MarcError {
    /// Build a [`MarcError::StateViolation`] for an operation on a control field.
    pub(crate) fn on_control_field(operation: &str) -> Self {
        MarcError::StateViolation(format!("{operation} is not allowed on a control field"))
    }

    /// Build a [`MarcError::StateViolation`] for an operation on a data field.
    pub(crate) fn on_data_field(operation: &str) -> Self {
        MarcError::StateViolation(format!("{operation} is not allowed on a non-control field"))
    }
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;
