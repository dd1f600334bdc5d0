//! Electronic Resource Citations.
//!
//! An ERC is an ANVL record whose first element is `erc` and whose labels
//! are kernel element labels. Element values are stored encoded; reserved
//! characters are replaced by three-character `%` codes. The "story"
//! elements `who`, `what`, `when` and `where` describe the resource.
//!
//! See <https://www.dublincore.org/groups/kernel/spec/>.

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::anvl::{AnvlRecord, COMMENT_LABEL, DEFAULT_WRAP_WIDTH};
use crate::{AnvlError, Record};

/// Label of the leading element.
pub const ERC_LABEL: &str = "erc";

/// Kernel story labels, in positional order.
pub const STORY_LABELS: [&str; 4] = ["who", "what", "when", "where"];

/// Code of a literal `%`.
const PERCENT_CODE: &str = "%pe";

/// Reserved characters and their element value codes.
const ENCODING_SCHEME: [(char, &str); 25] = [
    (' ', "%sp"),
    ('!', "%ex"),
    ('"', "%dq"),
    ('#', "%ns"),
    ('$', "%do"),
    ('&', "%am"),
    ('\'', "%sq"),
    ('(', "%op"),
    (')', "%cp"),
    ('*', "%as"),
    ('+', "%pl"),
    (',', "%co"),
    ('.', "%pd"),
    ('/', "%sl"),
    (':', "%cn"),
    (';', "%sc"),
    ('<', "%lt"),
    ('=', "%eq"),
    ('>', "%gt"),
    ('?', "%qu"),
    ('@', "%at"),
    ('[', "%ox"),
    ('\\', "%ls"),
    (']', "%cx"),
    ('|', "%vb"),
];

/// Separator between values added under the same label.
const VALUE_SEPARATOR: &str = "; ";

/// An Electronic Resource Citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErcRecord {
    anvl: AnvlRecord,
}

impl Default for ErcRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl ErcRecord {
    /// Creates a record containing only the `erc` element.
    pub fn new() -> Self {
        Self::with_wrap_width(DEFAULT_WRAP_WIDTH)
    }

    /// Creates a record wrapping serialized values at `wrap_width`.
    pub fn with_wrap_width(wrap_width: usize) -> Self {
        let mut anvl = AnvlRecord::with_wrap_width(wrap_width);
        anvl.insert_unchecked(ERC_LABEL, String::new());
        Self { anvl }
    }

    /// Returns the underlying ANVL record with encoded values.
    pub fn as_anvl(&self) -> &AnvlRecord {
        &self.anvl
    }

    /// Adds an element, encoding its value.
    ///
    /// If the label already has a value, the new value is placed in front of
    /// it, separated by `"; "`.
    ///
    /// # Errors
    ///
    /// Returns [`AnvlError::InvalidLabel`] and leaves the record unchanged if
    /// `label` is not a kernel element label.
    pub fn add_element(&mut self, label: &str, value: &str) -> Result<(), AnvlError> {
        check_kernel_label(label)?;

        let mut encoded = encode_element_value(value);
        if let Some(existing) = self.anvl.get(label) {
            encoded.push_str(VALUE_SEPARATOR);
            encoded.push_str(existing);
        }

        self.anvl.add(label, &encoded)?;
        Ok(())
    }

    /// Adds a comment.
    ///
    /// # Errors
    ///
    /// Never fails for the comment label; the signature matches [`ErcRecord::add_element`].
    pub fn add_comment(&mut self, comment: &str) -> Result<(), AnvlError> {
        self.add_element(COMMENT_LABEL, comment)
    }

    /// Adds up to four story values under `who`, `what`, `when` and `where`.
    ///
    /// With a `story_type` the labels become `<type>-who` and so on. With
    /// `append`, values are added like [`ErcRecord::add_element`]; otherwise
    /// they replace existing values. Extra values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AnvlError::InvalidLabel`] if the story type does not form
    /// valid labels. Nothing is added in that case.
    pub fn add_story<S: AsRef<str>>(
        &mut self,
        values: &[S],
        story_type: Option<&str>,
        append: bool,
    ) -> Result<(), AnvlError> {
        let labels: Vec<String> = STORY_LABELS
            .iter()
            .map(|label| match story_type {
                Some(story_type) => format!("{story_type}-{label}"),
                None => label.to_string(),
            })
            .collect();
        for label in &labels {
            check_kernel_label(label)?;
        }

        for (label, value) in labels.iter().zip(values) {
            if append {
                self.add_element(label, value.as_ref())?;
            } else {
                self.anvl
                    .add(label.as_str(), &encode_element_value(value.as_ref()))?;
            }
        }
        Ok(())
    }

    /// Get the stored, encoded value of an element.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.anvl.get(label)
    }

    /// Get the decoded value of an element.
    pub fn get_decoded(&self, label: &str) -> Option<String> {
        self.anvl.get(label).map(decode_element_value)
    }

    /// Serializes the record, decoding values if `decode` is set.
    pub fn record(&self, decode: bool, include_comments: bool) -> String {
        let elements = self.anvl.iter().map(|(label, value)| {
            let value = if decode {
                Cow::Owned(decode_element_value(value))
            } else {
                Cow::Borrowed(value)
            };
            (label, value)
        });
        self.anvl.serialize_elements(elements, include_comments)
    }

    /// Checks whether `text` is a structurally valid ERC record.
    ///
    /// If `allowed_labels` is given, element labels other than `erc` must be
    /// members of it.
    pub fn is_valid_record(text: &str, allowed_labels: Option<&[&str]>) -> bool {
        validate_record(text, allowed_labels).is_ok()
    }

    /// Parses the elements of an ERC record.
    ///
    /// Returns `None` if the text is not a valid record. The leading `erc`
    /// element, blank lines and comments are not part of the result.
    pub fn parse_record(
        text: &str,
        allowed_labels: Option<&[&str]>,
    ) -> Option<IndexMap<String, String>> {
        let lines = validate_record(text, allowed_labels).ok()?;

        let mut elements = IndexMap::new();
        for line in &lines[1..lines.len() - 2] {
            if line.is_empty() || line.starts_with(COMMENT_LABEL) {
                continue;
            }
            if let Some((label, value)) = line.split_once(':') {
                elements.insert(label.to_string(), value.trim().to_string());
            }
        }
        Some(elements)
    }

    /// Builds a record from ERC text, storing values encoded.
    ///
    /// # Errors
    ///
    /// Returns [`AnvlError::NotParseable`] if the text is not a valid record.
    pub fn parse(text: &str, allowed_labels: Option<&[&str]>) -> Result<Self, AnvlError> {
        validate_record(text, allowed_labels)?;

        let mut record = Self::new();
        for (label, value) in Self::parse_record(text, allowed_labels).unwrap_or_default() {
            record.anvl.add(label, &encode_element_value(&value))?;
        }
        Ok(record)
    }
}

impl Record for ErcRecord {
    fn add(&mut self, label: &str, value: &str) -> Result<(), AnvlError> {
        self.add_element(label, value)
    }

    fn get(&self, label: &str) -> Option<&str> {
        ErcRecord::get(self, label)
    }

    fn serialize(&self, include_comments: bool) -> String {
        self.record(true, include_comments)
    }
}

/// Checks whether `label` is a kernel element label.
///
/// Kernel element labels begin with a letter and contain letters, digits,
/// hyphens and underscores, optionally followed by a coded synonym such as
/// `(h1)`. Labels starting with `#` are comments.
pub fn is_valid_kernel_element_label(label: &str) -> bool {
    if label.starts_with(COMMENT_LABEL) {
        return true;
    }

    let (name, synonym) = match label.find('(') {
        Some(pos) => (&label[..pos], Some(&label[pos..])),
        None => (label, None),
    };

    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && synonym.is_none_or(is_coded_synonym)
}

/// `(h` followed by one or two digits and `)`.
fn is_coded_synonym(s: &str) -> bool {
    s.strip_prefix("(h")
        .and_then(|s| s.strip_suffix(')'))
        .is_some_and(|digits| {
            (1..=2).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
        })
}

fn check_kernel_label(label: &str) -> Result<(), AnvlError> {
    if is_valid_kernel_element_label(label) {
        return Ok(());
    }
    tracing::debug!(label, "rejected kernel element label");
    Err(AnvlError::invalid_label(label, "not a kernel element label"))
}

/// Encodes reserved characters of an element value.
pub fn encode_element_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '%' {
            out.push_str(PERCENT_CODE);
        } else if let Some((_, code)) = ENCODING_SCHEME.iter().find(|(reserved, _)| *reserved == c)
        {
            out.push_str(code);
        } else {
            out.push(c);
        }
    }
    out
}

/// Decodes an element value. `%` not followed by a known code is kept as is.
pub fn decode_element_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        match rest.get(pos..pos + 3).and_then(decode_code) {
            Some(c) => {
                out.push(c);
                rest = &rest[pos + 3..];
            }
            None => {
                out.push('%');
                rest = &rest[pos + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_code(code: &str) -> Option<char> {
    if code == PERCENT_CODE {
        return Some('%');
    }
    ENCODING_SCHEME
        .iter()
        .find(|(_, known)| *known == code)
        .map(|(c, _)| *c)
}

/// Validates ERC text and returns its logical lines.
///
/// Continuation lines are folded into the previous line before checking, so
/// line numbers in errors refer to logical lines.
fn validate_record(
    text: &str,
    allowed_labels: Option<&[&str]>,
) -> Result<Vec<String>, AnvlError> {
    if !text.starts_with("erc:") {
        return Err(AnvlError::not_parseable(1, "record must start with 'erc:'"));
    }

    let folded = text.replace("\r\n\t", " ").replace("\n\t", " ");
    let lines: Vec<String> = folded
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();

    let count = lines.len();
    if count < 3 || !lines[count - 2].is_empty() || !lines[count - 1].is_empty() {
        return Err(AnvlError::not_parseable(
            count,
            "record must end with a blank line",
        ));
    }

    for (index, line) in lines[..count - 2].iter().enumerate() {
        if line.is_empty() || line.starts_with(COMMENT_LABEL) {
            continue;
        }

        let Some((label, _)) = line.split_once(':') else {
            return Err(AnvlError::not_parseable(
                index + 1,
                "expected 'label: value' format",
            ));
        };

        if !is_valid_kernel_element_label(label) {
            return Err(AnvlError::not_parseable(
                index + 1,
                format!("'{label}' is not a kernel element label"),
            ));
        }

        let allowed = label == ERC_LABEL
            || allowed_labels.is_none_or(|allowed| allowed.contains(&label));
        if !allowed {
            return Err(AnvlError::not_parseable(
                index + 1,
                format!("label '{label}' is not allowed"),
            ));
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIBBON: &str = "erc:\nwho: Gibbon, Edward\nwhat: The Decline and Fall\n\n";

    #[test]
    fn test_new_record() {
        let record = ErcRecord::new();
        assert_eq!(record.get(ERC_LABEL), Some(""));
        assert_eq!(record.record(true, false), "erc: \r\n\r\n");
        assert_eq!(record.record(false, true), "erc: \r\n\r\n");
        assert_eq!(record.as_anvl().wrap_width(), DEFAULT_WRAP_WIDTH);
    }

    #[test]
    fn test_kernel_element_labels() {
        for label in ["# Comment", "#", "wer(h1)", "who(h12)", "test-1", "test_2", "w", "erc"] {
            assert!(is_valid_kernel_element_label(label), "{label}");
        }

        for label in [
            "12345", "test.1", "test 2", "", "-who", "who(h)", "who(h123)", "who(x1)", "who(h1",
            "who(h1)x",
        ] {
            assert!(!is_valid_kernel_element_label(label), "{label}");
        }
    }

    #[test]
    fn test_encode_element_value() {
        assert_eq!(encode_element_value("Gibbon, Edward"), "Gibbon%co%spEdward");
        assert_eq!(encode_element_value("100%"), "100%pe");
        assert_eq!(encode_element_value("a|b"), "a%vbb");
        assert_eq!(encode_element_value("plain"), "plain");
    }

    #[test]
    fn test_decode_element_value() {
        assert_eq!(decode_element_value("Gibbon%co%spEdward"), "Gibbon, Edward");
        assert_eq!(decode_element_value("100%pe"), "100%");
        assert_eq!(decode_element_value("%pesp"), "%sp");
        assert_eq!(decode_element_value("50%"), "50%");
        assert_eq!(decode_element_value("%zz%"), "%zz%");
    }

    #[test]
    fn test_encode_decode_literal_codes() {
        for value in ["%sp", "%pe", "%%", "a % b", "%%pe%sp"] {
            assert_eq!(decode_element_value(&encode_element_value(value)), value);
        }
    }

    #[test]
    fn test_add_element_prepends() {
        let mut record = ErcRecord::new();
        record.add_element("who", "Gibbon, Edward").unwrap();
        record.add_element("who", "Womersley, David").unwrap();

        assert_eq!(
            record.get_decoded("who").as_deref(),
            Some("Womersley, David; Gibbon, Edward")
        );
    }

    #[test]
    fn test_add_element_rejects_label() {
        let mut record = ErcRecord::new();
        let err = record.add_element("test.1", "x").unwrap_err();
        assert!(matches!(err, AnvlError::InvalidLabel { .. }));
        assert_eq!(record, ErcRecord::new());
    }

    #[test]
    fn test_add_comment() {
        let mut record = ErcRecord::new();
        record.add_comment("checked by hand").unwrap();
        assert!(record.as_anvl().contains_label(COMMENT_LABEL));
        assert_eq!(record.record(true, false), "erc: \r\n\r\n");
        assert_eq!(record.record(true, true), "erc: \r\n# checked by hand\r\n\r\n");
    }

    #[test]
    fn test_add_story() {
        let mut record = ErcRecord::new();
        record
            .add_story(
                &[
                    "Gibbon, Edward",
                    "The Decline and Fall of the Roman Empire",
                    "1781",
                    "http://www.ccel.org/g/gibbon/decline/",
                    "ignored",
                ],
                None,
                true,
            )
            .unwrap();

        assert_eq!(
            record.record(true, false),
            "erc: \r\n\
             who: Gibbon, Edward\r\n\
             what: The Decline and Fall of the Roman Empire\r\n\
             when: 1781\r\n\
             where: http://www.ccel.org/g/gibbon/decline/\r\n\
             \r\n"
        );
        assert_eq!(
            record.record(false, false),
            "erc: \r\n\
             who: Gibbon%co%spEdward\r\n\
             what: The%spDecline%spand%spFall%spof%spthe%spRoman%spEmpire\r\n\
             when: 1781\r\n\
             where: http%cn%sl%slwww%pdccel%pdorg%slg%slgibbon%sldecline%sl\r\n\
             \r\n"
        );
    }

    #[test]
    fn test_add_story_with_type() {
        let mut record = ErcRecord::new();
        record
            .add_story(&["Burgerbibliothek", "archive"], Some("about"), true)
            .unwrap();
        record
            .add_story(&["Kunze, John"], Some("about"), false)
            .unwrap();

        assert_eq!(record.get_decoded("about-who").as_deref(), Some("Kunze, John"));
        assert_eq!(record.get_decoded("about-what").as_deref(), Some("archive"));
        assert_eq!(record.get("about-when"), None);
    }

    #[test]
    fn test_add_story_rejects_type() {
        let mut record = ErcRecord::new();
        let err = record.add_story(&["x"], Some("1st"), true).unwrap_err();
        assert!(matches!(err, AnvlError::InvalidLabel { .. }));
        assert_eq!(record, ErcRecord::new());
    }

    #[test]
    fn test_record_does_not_mutate() {
        let mut record = ErcRecord::new();
        record.add_element("what", "100%sp").unwrap();
        let first = record.record(true, false);
        assert_eq!(first, record.record(true, false));
        assert_eq!(record.get_decoded("what").as_deref(), Some("100%sp"));
    }

    #[test]
    fn test_is_valid_record() {
        assert!(ErcRecord::is_valid_record(GIBBON, None));
        assert!(ErcRecord::is_valid_record("erc:\r\n\r\n", None));
        assert!(ErcRecord::is_valid_record(
            "erc:\r\nwhat: The Decline\r\n\tand Fall\r\n# note\r\n\r\n",
            None
        ));

        assert!(!ErcRecord::is_valid_record("who: Gibbon\n\n", None));
        assert!(!ErcRecord::is_valid_record("erc:\nwho: Gibbon\n", None));
        assert!(!ErcRecord::is_valid_record("erc:\nwho Gibbon\n\n", None));
        assert!(!ErcRecord::is_valid_record("erc:\n1who: Gibbon\n\n", None));
    }

    #[test]
    fn test_is_valid_record_with_allowed_labels() {
        assert!(ErcRecord::is_valid_record(GIBBON, Some(&["who", "what"])));
        assert!(!ErcRecord::is_valid_record(GIBBON, Some(&["who"])));
    }

    #[test]
    fn test_parse_record() {
        let elements = ErcRecord::parse_record(GIBBON, None).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements["who"], "Gibbon, Edward");
        assert_eq!(elements["what"], "The Decline and Fall");

        assert!(ErcRecord::parse_record("erc:\nwho Gibbon\n\n", None).is_none());
    }

    #[test]
    fn test_parse_roundtrip() {
        let mut record = ErcRecord::with_wrap_width(24);
        record
            .add_story(
                &["Gibbon, Edward", "The Decline and Fall of the Roman Empire"],
                None,
                true,
            )
            .unwrap();

        let text = record.record(true, false);
        assert!(ErcRecord::is_valid_record(&text, None));

        let parsed = ErcRecord::parse(&text, None).unwrap();
        assert_eq!(parsed.get("who"), record.get("who"));
        assert_eq!(parsed.get("what"), record.get("what"));
    }

    #[test]
    fn test_parse_reports_line() {
        let err = ErcRecord::parse("erc:\nwho: a\nbad line\n\n", None).unwrap_err();
        assert!(matches!(err, AnvlError::NotParseable { line: 3, .. }));
    }

    #[test]
    fn test_record_trait() {
        fn fill(record: &mut dyn Record) {
            record.add("who", "Gibbon, Edward").unwrap();
        }

        let mut erc = ErcRecord::new();
        fill(&mut erc);
        assert_eq!(Record::get(&erc, "who"), Some("Gibbon%co%spEdward"));
        assert_eq!(
            Record::serialize(&erc, false),
            "erc: \r\nwho: Gibbon, Edward\r\n\r\n"
        );

        let mut anvl = AnvlRecord::new();
        fill(&mut anvl);
        assert_eq!(Record::get(&anvl, "who"), Some("Gibbon, Edward"));
    }
}
