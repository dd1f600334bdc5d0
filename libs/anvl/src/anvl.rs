//! ANVL (A Name-Value Language) records.
//!
//! A record is a sequence of `label: value` elements terminated by a blank
//! line:
//!
//! ```text
//! erc:
//! who: Gibbon, Edward
//! what: The Decline and Fall of the Roman Empire
//! # a comment
//!
//! ```
//!
//! Lines end in CRLF. Long values are wrapped onto continuation lines that
//! start with a tab. See <https://datatracker.ietf.org/doc/draft-kunze-anvl/>.

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::{AnvlError, Record};

/// Default maximum line width for serialized records.
pub const DEFAULT_WRAP_WIDTH: usize = 72;

/// Label of comment elements.
pub const COMMENT_LABEL: &str = "#";

const CRLF: &str = "\r\n";

/// Line break followed by the continuation indent.
const CONTINUATION: &str = "\r\n\t";

/// An ordered collection of ANVL elements.
///
/// Labels are unique. Adding an existing label replaces its value in place,
/// so output order is the order in which labels were first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnvlRecord {
    elements: IndexMap<String, String>,
    wrap_width: usize,
}

impl Default for AnvlRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl AnvlRecord {
    /// Creates an empty record wrapping at [`DEFAULT_WRAP_WIDTH`].
    pub fn new() -> Self {
        Self::with_wrap_width(DEFAULT_WRAP_WIDTH)
    }

    /// Creates an empty record wrapping at `wrap_width`. Zero disables wrapping.
    pub fn with_wrap_width(wrap_width: usize) -> Self {
        Self {
            elements: IndexMap::new(),
            wrap_width,
        }
    }

    /// Returns the configured wrap width.
    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    /// Sets the value of `label` to the trimmed `value`.
    ///
    /// Returns the previous value if the label existed.
    ///
    /// # Errors
    ///
    /// Returns [`AnvlError::InvalidLabel`] if the label is empty or contains
    /// control characters or `:`.
    pub fn add(
        &mut self,
        label: impl Into<String>,
        value: &str,
    ) -> Result<Option<String>, AnvlError> {
        let label = label.into();
        validate_label(&label)?;
        Ok(self.elements.insert(label, value.trim().to_string()))
    }

    pub(crate) fn insert_unchecked(&mut self, label: &str, value: String) {
        self.elements.insert(label.to_string(), value);
    }

    /// Get the value of an element.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.elements.get(label).map(|s| s.as_str())
    }

    /// Remove an element, keeping the order of the others.
    pub fn remove(&mut self, label: &str) -> Option<String> {
        self.elements.shift_remove(label)
    }

    /// Check if a label exists.
    pub fn contains_label(&self, label: &str) -> bool {
        self.elements.contains_key(label)
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over label-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.elements.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get all labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(|k| k.as_str())
    }

    /// Serialize to ANVL text.
    ///
    /// Comment elements are skipped unless `include_comments` is set.
    pub fn serialize(&self, include_comments: bool) -> String {
        self.serialize_elements(
            self.iter().map(|(label, value)| (label, Cow::Borrowed(value))),
            include_comments,
        )
    }

    pub(crate) fn serialize_elements<'a, I>(&self, elements: I, include_comments: bool) -> String
    where
        I: IntoIterator<Item = (&'a str, Cow<'a, str>)>,
    {
        let mut out = String::new();

        for (label, value) in elements {
            let is_comment = label == COMMENT_LABEL;
            if is_comment && !include_comments {
                continue;
            }

            out.push_str(label);
            let separator = if is_comment { " " } else { ": " };
            out.push_str(separator);

            let prefix_width = label.chars().count() + separator.len();
            wrap_into(&mut out, &value, prefix_width, self.wrap_width);
            out.push_str(CRLF);
        }

        out.push_str(CRLF);
        out
    }

    /// Parse a single ANVL record.
    ///
    /// Leading blank lines are skipped and the first blank line after an
    /// element ends the record. Continuation lines are joined to the previous
    /// value with a single space. Lines starting with `#` are comments.
    ///
    /// # Errors
    ///
    /// Returns [`AnvlError::NotParseable`] for a line without `:`, a
    /// continuation line before the first element, or an invalid label.
    pub fn parse(text: &str) -> Result<Self, AnvlError> {
        let mut record = Self::new();
        let mut current: Option<String> = None;

        for (index, line) in text.split('\n').enumerate() {
            let line_num = index + 1;
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.trim().is_empty() {
                if record.is_empty() {
                    continue;
                }
                break;
            }

            if line.starts_with([' ', '\t']) {
                let Some(value) = current.as_ref().and_then(|l| record.elements.get_mut(l)) else {
                    return Err(AnvlError::not_parseable(
                        line_num,
                        "continuation line without element",
                    ));
                };
                append_joined(value, " ", line.trim());
                continue;
            }

            let (label, value) = match line.strip_prefix(COMMENT_LABEL) {
                Some(comment) => (COMMENT_LABEL, comment),
                None => line.split_once(':').ok_or_else(|| {
                    AnvlError::not_parseable(line_num, "expected 'label: value' format")
                })?,
            };

            if label == COMMENT_LABEL {
                if let Some(existing) = record.elements.get_mut(COMMENT_LABEL) {
                    append_joined(existing, " ", value.trim());
                    current = Some(COMMENT_LABEL.to_string());
                    continue;
                }
            }

            record
                .add(label, value)
                .map_err(|e| AnvlError::not_parseable(line_num, e.to_string()))?;
            current = Some(label.to_string());
        }

        Ok(record)
    }
}

impl Record for AnvlRecord {
    fn add(&mut self, label: &str, value: &str) -> Result<(), AnvlError> {
        AnvlRecord::add(self, label, value).map(|_| ())
    }

    fn get(&self, label: &str) -> Option<&str> {
        AnvlRecord::get(self, label)
    }

    fn serialize(&self, include_comments: bool) -> String {
        AnvlRecord::serialize(self, include_comments)
    }
}

/// Validate a label.
fn validate_label(label: &str) -> Result<(), AnvlError> {
    if label.is_empty() {
        return Err(AnvlError::invalid_label(label, "label cannot be empty"));
    }

    if label == COMMENT_LABEL {
        return Ok(());
    }

    for c in label.chars() {
        if c.is_control() {
            return Err(AnvlError::invalid_label(
                label,
                format!("control character {:?} in label", c),
            ));
        }
        if c == ':' {
            return Err(AnvlError::invalid_label(label, "':' in label"));
        }
    }

    Ok(())
}

fn append_joined(value: &mut String, separator: &str, addition: &str) {
    if addition.is_empty() {
        return;
    }
    if !value.is_empty() {
        value.push_str(separator);
    }
    value.push_str(addition);
}

/// Writes `value` word-wrapped so lines stay within `width` characters.
///
/// `prefix_width` is the width already used on the first line. Continuation
/// lines start with a tab, counted as one character. Words longer than the
/// width are never split. Line breaks inside the value become continuation
/// lines.
fn wrap_into(out: &mut String, value: &str, prefix_width: usize, width: usize) {
    let mut line_width = prefix_width;

    for (n, line) in value.lines().enumerate() {
        if n > 0 {
            out.push_str(CONTINUATION);
            line_width = 1;
        }

        let mut at_line_start = true;
        for word in line.split(' ') {
            let word_width = word.chars().count();
            if !at_line_start && width > 0 && line_width + 1 + word_width > width {
                out.push_str(CONTINUATION);
                line_width = 1;
                at_line_start = true;
            }
            if !at_line_start {
                out.push(' ');
                line_width += 1;
            }
            out.push_str(word);
            line_width += word_width;
            at_line_start = false;
        }
    }
}
