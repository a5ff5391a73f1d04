//! Custom error types for the famos-file crate.

use thiserror::Error;

use super::key_type::KeyType;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum FamosError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The stream ended in the middle of a key.
    #[error("Unexpected end of stream while reading {0}")]
    UnexpectedEof(&'static str),

    /// The key stream is structurally invalid.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A key was found with a version this codec cannot read.
    #[error("Expected {key_type} key version {expected}, got '{actual}'.")]
    UnsupportedKeyVersion {
        key_type: KeyType,
        expected: String,
        actual: u32,
    },

    /// A header field is outside of its valid range.
    #[error("Expected value for '{field}' property: {expected}. Got {actual}.")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// The declared dimension of a data field disagrees with its type.
    #[error("Expected data field dimension '{expected}', got '{actual}'.")]
    DimensionMismatch { expected: i32, actual: i32 },

    /// A data field holds fewer components than its dimension requires.
    #[error("Expected number of data field components is >= '{expected}', got '{actual}'.")]
    TooFewComponents { expected: usize, actual: usize },

    /// Group indices are 1-based.
    #[error("Expected group index > '0', got '{0}'.")]
    InvalidGroupIndex(i32),

    #[error("Group index '{0}' is used by more than one group.")]
    DuplicateGroupIndex(i32),

    /// A grouped key refers to a group that was never defined.
    #[error("The {key_type} key refers to group '{index}', which does not exist.")]
    MissingGroup { key_type: KeyType, index: i32 },

    /// A property value does not parse under its declared type.
    #[error("The property value '{value}' is not {expected}.")]
    InvalidPropertyValue { value: String, expected: &'static str },

    /// A numeric token inside a key payload could not be parsed.
    #[error("Invalid {kind} token '{token}'")]
    InvalidNumber { kind: &'static str, token: String },

    /// The calendar fields of a trigger time do not form a valid date.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A closed key group was expected but the closing flag is unset.
    ///
    /// This usually means the writing process was interrupted before the
    /// file content was completely flushed to disk.
    #[error("The key group is not closed. This may be a hint to an interruption that occurred while writing the file content to disk.")]
    InterruptedWrite,

    /// The code page has no known text encoding.
    #[error("Unsupported code page: {0}")]
    UnknownCodePage(u32),

    /// The text contains characters the selected code page cannot represent.
    #[error("Text '{text}' cannot be encoded with code page {code_page}")]
    Unencodable { text: String, code_page: u32 },
}

/// A convenience `Result` type alias using the crate's `FamosError` type.
pub type Result<T> = std::result::Result<T, FamosError>;
