//! NOID Check Digit Algorithm.
//!
//! Each character of the id is weighted by its rank in the sorted, deduplicated
//! repertoire and multiplied by its 1-based position. The check character is
//! the repertoire character at `sum mod repertoire_len`. `/` weighs zero.
//!
//! Reference: <https://metacpan.org/dist/Noid/view/noid#NOID-CHECK-DIGIT-ALGORITHM>.

use std::collections::HashMap;

use crate::ark::remove_duplicate_chars;
use crate::ArkError;

/// Path separator allowed in check zones.
const SEPARATOR: char = '/';

/// Calculates the check character for `id` over the repertoire `xdigits`.
///
/// # Errors
///
/// - [`ArkError::Length`] if `id` is not shorter than `xdigits`.
/// - [`ArkError::WellFormedness`] if `id` contains a character that is
///   neither in `xdigits` nor `/`.
pub fn calc(id: &str, xdigits: &str) -> Result<char, ArkError> {
    let id_len = id.chars().count();
    let repertoire_len = xdigits.chars().count();
    if id_len >= repertoire_len {
        return Err(ArkError::Length {
            id_len,
            repertoire_len,
        });
    }

    let invalid: Vec<char> = id
        .chars()
        .filter(|&c| c != SEPARATOR && !xdigits.contains(c))
        .collect();
    if !invalid.is_empty() {
        return Err(ArkError::WellFormedness {
            id: id.to_string(),
            invalid,
        });
    }

    let repertoire = remove_duplicate_chars(xdigits);
    let mut weights: HashMap<char, usize> = repertoire
        .iter()
        .enumerate()
        .map(|(rank, &c)| (c, rank))
        .collect();
    weights.insert(SEPARATOR, 0);

    let sum: usize = id
        .chars()
        .enumerate()
        .map(|(index, c)| weights.get(&c).copied().unwrap_or(0) * (index + 1))
        .sum();

    Ok(repertoire[sum % repertoire.len()])
}

/// Verifies that the last character of `id` is the check character of the rest.
///
/// Returns `Ok(false)` for an empty id or a mismatching check character.
///
/// # Errors
///
/// Propagates the errors of [`calc`] for the prefix.
pub fn verify(id: &str, xdigits: &str) -> Result<bool, ArkError> {
    let Some((split, check)) = id.char_indices().last() else {
        return Ok(false);
    };

    Ok(calc(&id[..split], xdigits)? == check)
}
