//! # ark-id
//!
//! Minting, parsing, normalization and checksum verification of Archival
//! Resource Keys (ARKs).
//!
//! ## Design Principles
//!
//! - Every operation is a pure function over strings; nothing is persisted
//! - Randomness is injectable so minting is reproducible in tests
//! - Untrusted input is parsed best-effort: invalid ARKs split into empty
//!   components and normalization never fails
//! - Caller mistakes (bad NAAN, repertoire or length) are errors
//!
//! ## ARK Format
//!
//! ```text
//! [https://resolver.tld/]ark:[/]<naan>/<baseName>[/<suffixes>][?<inflection>]
//! ```
//!
//! Examples:
//! - `ark:12345/x54xz321`
//! - `ark:/13030/xf93gt2q`
//! - `https://n2t.net/ark:/99999/a1b2c3d4e5f6g/suffix?info`
//!
//! The base name of a minted ARK may end in a check character computed with
//! the NOID Check Digit Algorithm ([`ncda`]) over `<naan>/<baseName>`.

pub mod ark;
mod components;
mod error;
pub mod ncda;
mod normalize;
mod settings;
pub mod validator;

pub use ark::{generate, generate_with, remove_duplicate_chars, GenerateOptions};
pub use components::{split_into_components, ArkComponents};
pub use error::ArkError;
pub use normalize::{are_lexical_equivalent, normalize};
pub use settings::{MinterSettings, DEFAULT_LENGTH, DEFAULT_XDIGITS};
