//! ARK generation.
//!
//! A generated ARK has the shape `ark:[/]<naan>/[<shoulder>]<blade>[<check>]`
//! where the blade is drawn uniformly at random from the repertoire and the
//! check character is computed with the NOID Check Digit Algorithm over
//! `<naan>/<shoulder><blade>`.

use rand::Rng;

use crate::{ncda, validator, ArkError};

/// Label prefixed to every generated ARK.
pub const LABEL: &str = "ark:";

/// Options controlling the shape of a generated ARK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Prefix of the assigned name. Ignored unless every character is in the repertoire.
    pub shoulder: Option<String>,

    /// Append an NCDA check character.
    pub checksum: bool,

    /// Render the label as `ark:/` instead of `ark:`.
    pub slash_after_label: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            shoulder: None,
            checksum: true,
            slash_after_label: false,
        }
    }
}

impl GenerateOptions {
    /// Sets the shoulder.
    #[must_use]
    pub fn with_shoulder(mut self, shoulder: impl Into<String>) -> Self {
        self.shoulder = Some(shoulder.into());
        self
    }

    /// Enables or disables the check character.
    #[must_use]
    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    /// Enables or disables the slash after the label.
    #[must_use]
    pub fn with_slash_after_label(mut self, slash: bool) -> Self {
        self.slash_after_label = slash;
        self
    }
}

/// Removes duplicate characters from a repertoire and sorts it by code point.
///
/// The position of a character in the result is its NCDA weight.
pub fn remove_duplicate_chars(xdigits: &str) -> Vec<char> {
    let mut chars: Vec<char> = xdigits.chars().collect();
    chars.sort_unstable();
    chars.dedup();
    chars
}

/// Generates an ARK using the thread-local random number generator.
///
/// # Errors
///
/// See [`generate_with`].
pub fn generate(
    naan: &str,
    xdigits: &str,
    length: usize,
    options: &GenerateOptions,
) -> Result<String, ArkError> {
    generate_with(&mut rand::rng(), naan, xdigits, length, options)
}

/// Generates an ARK drawing the blade from `rng`.
///
/// # Errors
///
/// - [`ArkError::Validation`] if `length` is zero, `naan` is not a valid
///   NAAN, or `xdigits` is empty or outside the ARK character repertoire.
/// - [`ArkError::Length`] if a checksum is requested and the check zone is not
///   shorter than the deduplicated repertoire.
pub fn generate_with<R: Rng>(
    rng: &mut R,
    naan: &str,
    xdigits: &str,
    length: usize,
    options: &GenerateOptions,
) -> Result<String, ArkError> {
    validate_arguments(naan, xdigits, length)?;

    let repertoire = remove_duplicate_chars(xdigits);
    let xdigits: String = repertoire.iter().collect();

    let mut id = String::with_capacity(naan.len() + length + 8);
    id.push_str(naan);
    id.push('/');

    if let Some(shoulder) = options.shoulder.as_deref().filter(|s| !s.is_empty()) {
        if validator::shoulder_in_xdigits(shoulder, &xdigits) {
            id.push_str(shoulder);
        } else {
            tracing::warn!(shoulder, xdigits = %xdigits, "shoulder not in repertoire, dropped");
        }
    }

    id.extend((0..length).map(|_| repertoire[rng.random_range(0..repertoire.len())]));

    if options.checksum {
        let check = ncda::calc(&id, &xdigits)?;
        id.push(check);
    }

    let label = if options.slash_after_label {
        "ark:/"
    } else {
        LABEL
    };
    let ark = format!("{label}{id}");

    tracing::debug!(ark = %ark, naan, length, checksum = options.checksum, "minted ark");

    Ok(ark)
}

pub(crate) fn validate_arguments(naan: &str, xdigits: &str, length: usize) -> Result<(), ArkError> {
    if length == 0 {
        return Err(ArkError::validation(
            "length",
            "ARKs must have a length greater than zero",
        ));
    }

    if !validator::is_valid_naan(naan) {
        return Err(ArkError::validation(
            "naan",
            format!(
                "'{naan}' must be 5 to 14 betanumeric characters: 0123456789bcdfghjkmnpqrstvwxz"
            ),
        ));
    }

    if xdigits.is_empty() || !validator::follows_ark_character_repertoire(xdigits, false) {
        return Err(ArkError::validation(
            "xdigits",
            "ARKs may be built using letters, digits, or any of = ~ * + @ _ $",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::validator::is_valid_base_compact_name;

    const XDIGITS: &str = "0123456789abcdefghijklmnopqrstuvwxyz=~*+@_$";

    #[test]
    fn test_remove_duplicate_chars() {
        assert_eq!(remove_duplicate_chars("ba0ab00"), vec!['0', 'a', 'b']);
        assert!(remove_duplicate_chars("").is_empty());
    }

    #[test]
    fn test_generate_with_shoulder_and_checksum() {
        let options = GenerateOptions::default().with_shoulder("x1");
        let ark = generate("12345", XDIGITS, 5, &options).unwrap();

        // "ark:" + "12345/" + "x1" + 5 + check
        assert_eq!(ark.len(), 18);
        assert!(ark.starts_with("ark:12345/x1"));
        assert!(is_valid_base_compact_name(&ark));
        assert!(ncda::verify(&ark[4..], XDIGITS).unwrap());
    }

    #[test]
    fn test_generate_slash_without_checksum() {
        let options = GenerateOptions::default()
            .with_checksum(false)
            .with_slash_after_label(true);
        let ark = generate("99999", "0123456789", 10, &options).unwrap();

        assert_eq!(ark.len(), 21);
        assert!(ark.starts_with("ark:/99999/"));
        assert!(ark[11..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_is_deterministic_for_seeded_rng() {
        let options = GenerateOptions::default();
        let mint = |seed| {
            generate_with(&mut StdRng::seed_from_u64(seed), "12345", XDIGITS, 8, &options).unwrap()
        };
        let (a, b) = (mint(7), mint(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_drops_foreign_shoulder() {
        let options = GenerateOptions::default()
            .with_shoulder("X!")
            .with_checksum(false);
        let ark = generate("12345", "0123456789", 4, &options).unwrap();
        assert_eq!(ark.len(), "ark:12345/".len() + 4);
    }

    #[test]
    fn test_generate_rejects_zero_length() {
        let err = generate("12345", XDIGITS, 0, &GenerateOptions::default()).unwrap_err();
        assert!(matches!(err, ArkError::Validation { field: "length", .. }));
    }

    #[test]
    fn test_generate_rejects_bad_naan() {
        let err = generate("1234a", XDIGITS, 4, &GenerateOptions::default()).unwrap_err();
        assert!(matches!(err, ArkError::Validation { field: "naan", .. }));
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_generate_rejects_bad_xdigits() {
        for xdigits in ["abc-", "", "abc/"] {
            let err = generate("12345", xdigits, 4, &GenerateOptions::default()).unwrap_err();
            assert!(matches!(err, ArkError::Validation { field: "xdigits", .. }));
        }
    }

    #[test]
    fn test_generate_checksum_needs_long_repertoire() {
        let err = generate("99999", "0123456789", 10, &GenerateOptions::default()).unwrap_err();
        assert!(matches!(err, ArkError::Length { .. }));
    }
}
