//! The capability shared by ANVL and ERC records.

use crate::AnvlError;

/// A label-value record that serializes to ANVL text.
pub trait Record {
    /// Adds an element. What "adding" means is up to the record type.
    fn add(&mut self, label: &str, value: &str) -> Result<(), AnvlError>;

    /// Returns the stored value of an element.
    fn get(&self, label: &str) -> Option<&str>;

    /// Serializes the record, including comments if requested.
    fn serialize(&self, include_comments: bool) -> String;
}
