//! Minter settings.
//!
//! A minter is configured per NAAN with the repertoire and shape of the
//! names it assigns. Settings can be deserialized with serde or read from
//! `ARK_*` environment variables.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ark::{self, GenerateOptions};
use crate::{ArkComponents, ArkError};

/// Default blade length.
pub const DEFAULT_LENGTH: usize = 8;

/// Default repertoire: digits plus the betanumeric consonants.
pub const DEFAULT_XDIGITS: &str = "0123456789bcdfghjkmnpqrstvwxz";

fn default_length() -> usize {
    DEFAULT_LENGTH
}

fn default_xdigits() -> String {
    DEFAULT_XDIGITS.to_string()
}

fn default_true() -> bool {
    true
}

/// Settings of a single minter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinterSettings {
    /// Name Assigning Authority Number.
    pub naan: String,

    /// Character repertoire of the blade.
    #[serde(default = "default_xdigits")]
    pub xdigits: String,

    /// Number of random characters.
    #[serde(default = "default_length")]
    pub length: usize,

    /// Prefix of every assigned name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoulder: Option<String>,

    /// Append an NCDA check character.
    #[serde(default = "default_true")]
    pub checksum: bool,

    /// Render the label as `ark:/`.
    #[serde(default)]
    pub slash_after_label: bool,
}

impl MinterSettings {
    /// Creates settings with the default repertoire and length.
    pub fn new(naan: impl Into<String>) -> Self {
        Self {
            naan: naan.into(),
            xdigits: default_xdigits(),
            length: DEFAULT_LENGTH,
            shoulder: None,
            checksum: true,
            slash_after_label: false,
        }
    }

    /// Loads settings from environment variables.
    ///
    /// `ARK_NAAN` is required. `ARK_XDIGITS`, `ARK_LENGTH`, `ARK_SHOULDER`,
    /// `ARK_CHECKSUM` and `ARK_SLASH_AFTER_LABEL` are optional.
    ///
    /// # Errors
    ///
    /// Returns [`ArkError::Settings`] if a variable is missing or malformed,
    /// or the validation error of [`MinterSettings::validate`].
    pub fn from_env() -> Result<Self, ArkError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ArkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let naan = lookup("ARK_NAAN").ok_or_else(|| ArkError::Settings {
            key: "ARK_NAAN",
            reason: "not set".to_string(),
        })?;

        let xdigits = lookup("ARK_XDIGITS").unwrap_or_else(default_xdigits);

        let length = match lookup("ARK_LENGTH") {
            Some(value) => value.parse().map_err(|_| ArkError::Settings {
                key: "ARK_LENGTH",
                reason: format!("'{value}' is not a positive integer"),
            })?,
            None => DEFAULT_LENGTH,
        };

        let shoulder = lookup("ARK_SHOULDER").filter(|s| !s.is_empty());

        let checksum = lookup("ARK_CHECKSUM")
            .map(|v| parse_flag("ARK_CHECKSUM", &v))
            .transpose()?
            .unwrap_or(true);

        let slash_after_label = lookup("ARK_SLASH_AFTER_LABEL")
            .map(|v| parse_flag("ARK_SLASH_AFTER_LABEL", &v))
            .transpose()?
            .unwrap_or(false);

        let settings = Self {
            naan,
            xdigits,
            length,
            shoulder,
            checksum,
            slash_after_label,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the settings against the generation preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`ArkError::Validation`] for an invalid NAAN, repertoire or length.
    pub fn validate(&self) -> Result<(), ArkError> {
        ark::validate_arguments(&self.naan, &self.xdigits, self.length)
    }

    /// Generation options derived from these settings.
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            shoulder: self.shoulder.clone(),
            checksum: self.checksum,
            slash_after_label: self.slash_after_label,
        }
    }

    /// Mints a new ARK.
    ///
    /// # Errors
    ///
    /// See [`ark::generate`].
    pub fn mint(&self) -> Result<String, ArkError> {
        self.mint_with(&mut rand::rng())
    }

    /// Mints a new ARK drawing from `rng`.
    ///
    /// # Errors
    ///
    /// See [`ark::generate_with`].
    pub fn mint_with<R: Rng>(&self, rng: &mut R) -> Result<String, ArkError> {
        ark::generate_with(rng, &self.naan, &self.xdigits, self.length, &self.options())
    }

    /// Checks that `ark` belongs to this minter and, if checksums are on,
    /// that its check character is correct.
    ///
    /// Returns `Ok(false)` for unparseable ARKs and foreign NAANs.
    ///
    /// # Errors
    ///
    /// Propagates NCDA errors for base names outside the repertoire.
    pub fn verify(&self, ark: &str) -> Result<bool, ArkError> {
        let components = ArkComponents::split(ark);
        if components.is_empty() || components.naan != self.naan {
            return Ok(false);
        }
        if !self.checksum {
            return Ok(true);
        }
        components.verify_checksum(&self.xdigits)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ArkError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ArkError::Settings {
            key,
            reason: format!("'{value}' is not a boolean"),
        }),
    }
}
