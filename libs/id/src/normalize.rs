//! Lexical normalization and equivalence of ARKs.
//!
//! Implements the rules of
//! <https://www.ietf.org/archive/id/draft-kunze-ark-39.html#name-normalization-and-lexical-e>.
//! Normalization never fails: malformed input is normalized as far as the
//! rules apply.

use std::collections::HashSet;

use crate::components::strip_resolver_prefix;

/// Normalizes an ARK or a URL containing an ARK.
///
/// Removing hyphens or separators can expose new matches (e.g. `a-rk:`), so
/// the rules are applied until the string no longer changes. A pass that
/// changes the string either shortens it or only fixes ASCII case.
pub fn normalize(ark: &str) -> String {
    let mut current = normalize_pass(ark);
    for _ in 0..=current.len() {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Returns true if at least two of `arks` normalize to the same string.
///
/// This reports whether an equivalent pair exists, not whether all ARKs
/// are equivalent to each other.
pub fn are_lexical_equivalent<S: AsRef<str>>(arks: &[S]) -> bool {
    let normalized: HashSet<String> = arks.iter().map(|ark| normalize(ark.as_ref())).collect();
    normalized.len() != arks.len()
}

fn normalize_pass(ark: &str) -> String {
    let ark = strip_resolver_prefix(ark.trim());

    let (path, query) = match ark.find('?') {
        Some(pos) => ark.split_at(pos),
        None => (ark, ""),
    };
    // `?`, `??` and `?info` are inflections and survive; key=value query strings do not.
    let inflection = if query.contains('=') { "" } else { query };

    let path: String = path.chars().filter(|&c| !is_hyphen_or_space(c)).collect();
    let path = collapse_label(&path);
    let path = lowercase_naan(&path);
    let path = uppercase_percent_escapes(&path);
    let path = collapse_structural(path.trim_end_matches('/'));

    path + inflection
}

#[inline]
fn is_hyphen_or_space(c: char) -> bool {
    matches!(
        c,
        ' ' | '\u{00A0}' | '-' | '\u{00AD}' | '\u{2000}'..='\u{2015}'
    )
}

/// `ark:/` or `ark:` at the start, in any case, becomes `ark:`.
fn collapse_label(s: &str) -> String {
    match s.get(..4) {
        Some(label) if label.eq_ignore_ascii_case("ark:") => {
            let rest = &s[4..];
            format!("ark:{}", rest.strip_prefix('/').unwrap_or(rest))
        }
        _ => s.to_string(),
    }
}

/// Lowercases the five characters after the first `ark:`.
fn lowercase_naan(s: &str) -> String {
    let Some(pos) = s.find("ark:") else {
        return s.to_string();
    };
    let (head, tail) = s.split_at(pos + 4);
    let mut out = String::with_capacity(s.len());
    out.push_str(head);
    for (i, c) in tail.chars().enumerate() {
        out.push(if i < 5 { c.to_ascii_lowercase() } else { c });
    }
    out
}

/// Uppercases the two characters following every `%`.
fn uppercase_percent_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '%' {
            out.extend(chars.by_ref().take(2).map(|c| c.to_ascii_uppercase()));
        }
    }
    out
}

/// Collapses every run of `/` and `.` to its first character.
fn collapse_structural(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_structural = false;
    for c in s.chars() {
        let structural = c == '/' || c == '.';
        if !(structural && previous_structural) {
            out.push(c);
        }
        previous_structural = structural;
    }
    out
}
