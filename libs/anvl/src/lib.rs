//! ANVL records and Electronic Resource Citations.
//!
//! [`AnvlRecord`] reads and writes generic `label: value` records.
//! [`ErcRecord`] builds on it with kernel element labels, encoded element
//! values and the who/what/when/where story elements. Both implement
//! [`Record`].
//!
//! # Format
//!
//! ```text
//! erc:
//! who: Gibbon, Edward
//! what: The Decline and Fall of the Roman Empire
//! when: 1781
//! where: http://www.ccel.org/g/gibbon/decline/
//!
//! ```
//!
//! Serialized lines end in CRLF and long values continue on tab-indented
//! lines.

pub mod anvl;
pub mod erc;
mod error;
mod record;

pub use anvl::{AnvlRecord, COMMENT_LABEL, DEFAULT_WRAP_WIDTH};
pub use erc::{
    decode_element_value, encode_element_value, is_valid_kernel_element_label, ErcRecord,
    ERC_LABEL, STORY_LABELS,
};
pub use error::AnvlError;
pub use record::Record;
