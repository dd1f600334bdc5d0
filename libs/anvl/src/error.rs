//! Error types for ANVL and ERC records.

use thiserror::Error;

/// Errors that can occur when building or parsing records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnvlError {
    /// The element label is not allowed.
    #[error("invalid label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },

    /// The record text is not structurally valid.
    #[error("not parseable at line {line}: {reason}")]
    NotParseable { line: usize, reason: String },
}

impl AnvlError {
    pub(crate) fn invalid_label(label: &str, reason: impl Into<String>) -> Self {
        AnvlError::InvalidLabel {
            label: label.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_parseable(line: usize, reason: impl Into<String>) -> Self {
        AnvlError::NotParseable {
            line,
            reason: reason.into(),
        }
    }

    /// Returns true if this error was raised while reading record text.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, AnvlError::NotParseable { .. })
    }
}
