//! Error types for ARK generation, checksum calculation and parsing.

use thiserror::Error;

/// Errors that can occur when minting, checking or parsing ARKs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArkError {
    /// An argument to generation failed validation.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The checksum input contains characters outside the repertoire.
    #[error("'{id}' contains characters outside the repertoire: {invalid:?}")]
    WellFormedness { id: String, invalid: Vec<char> },

    /// The identifier is too long for the repertoire's weight table.
    #[error("identifier length {id_len} must be less than repertoire length {repertoire_len}")]
    Length { id_len: usize, repertoire_len: usize },

    /// The input is not a structurally valid ARK.
    #[error("not a parseable ARK: '{0}'")]
    NotParseable(String),

    /// Minter settings could not be loaded.
    #[error("invalid setting {key}: {reason}")]
    Settings { key: &'static str, reason: String },
}

impl ArkError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ArkError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true if this error was raised by the check digit algorithm.
    pub fn is_checksum_error(&self) -> bool {
        matches!(
            self,
            ArkError::WellFormedness { .. } | ArkError::Length { .. }
        )
    }

    /// Returns true if this error indicates a bad caller argument.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ArkError::Validation { .. } | ArkError::Settings { .. })
    }
}
