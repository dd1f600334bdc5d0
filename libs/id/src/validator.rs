//! Character repertoire and shape predicates.
//!
//! All predicates are total: malformed input yields `false`, never an error.
//! See <https://www.ietf.org/archive/id/draft-kunze-ark-39.html#name-character-repertoires>.

/// Non-alphanumeric characters allowed in assigned names.
const ARK_SPECIALS: &[char] = &['=', '~', '*', '+', '@', '_', '$'];

/// Reserved characters that may appear in ARKs with structural meaning.
const ARK_RESERVED: &[char] = &['%', '-', '.', '/'];

/// Consonants of the betanumeric alphabet (no vowels, no `l`).
const BETANUMERIC_CONSONANTS: &str = "bcdfghjkmnpqrstvwxz";

/// Shortest NAAN accepted in a base compact name.
pub const NAAN_MIN_LEN: usize = 5;

/// Longest NAAN accepted in a base compact name.
pub const NAAN_MAX_LEN: usize = 14;

#[inline]
fn is_ark_char(c: char, include_reserved: bool) -> bool {
    c.is_ascii_alphanumeric()
        || ARK_SPECIALS.contains(&c)
        || (include_reserved && ARK_RESERVED.contains(&c))
}

#[inline]
fn is_betanumeric(c: char) -> bool {
    c.is_ascii_digit() || BETANUMERIC_CONSONANTS.contains(c)
}

/// Checks that every character of `s` may be used to build an ARK.
///
/// Letters, digits and `= ~ * + @ _ $` are always allowed; with
/// `include_reserved` the structural characters `% - . /` are too.
pub fn follows_ark_character_repertoire(s: &str, include_reserved: bool) -> bool {
    s.chars().all(|c| is_ark_char(c, include_reserved))
}

/// Checks that every character of `s` is betanumeric.
pub fn follows_naan_character_repertoire(s: &str) -> bool {
    s.chars().all(is_betanumeric)
}

/// Checks that `s` is a usable NAAN: betanumeric and 5 to 14 characters long.
pub fn is_valid_naan(s: &str) -> bool {
    (NAAN_MIN_LEN..=NAAN_MAX_LEN).contains(&s.len()) && follows_naan_character_repertoire(s)
}

/// Checks that `s` has the shape `ark:[/]<naan>/<name>`.
///
/// The NAAN must be valid per [`is_valid_naan`] and the name must be one or
/// more unreserved ARK characters. Nothing may follow the name.
pub fn is_valid_base_compact_name(s: &str) -> bool {
    let Some(label) = s.get(..4) else {
        return false;
    };
    if label != "ark:" {
        return false;
    }

    let rest = &s[4..];
    let rest = rest.strip_prefix('/').unwrap_or(rest);

    let Some((naan, name)) = rest.split_once('/') else {
        return false;
    };

    is_valid_naan(naan) && !name.is_empty() && follows_ark_character_repertoire(name, false)
}

/// Checks that every character of `shoulder` occurs in `xdigits`.
pub fn shoulder_in_xdigits(shoulder: &str, xdigits: &str) -> bool {
    shoulder.chars().all(|c| xdigits.contains(c))
}
