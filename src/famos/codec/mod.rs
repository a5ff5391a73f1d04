//! Codec layer for the FAMOS key protocol.
//!
//! This module provides the primitives every structural parser builds on:
//!
//! - [`reader`]: key header protocol, skipping, pushback and field decoding
//! - [`writer`]: key framing and field encoding
//! - [`number`]: culture-invariant numeric tokens
//! - [`code_page`]: text encodings selected by code page

pub mod code_page;
pub mod number;
pub mod reader;
pub mod writer;

use std::io::Cursor;

use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;
use code_page::CodePage;
use reader::{KeyReader, PayloadReader};
use writer::{KeyWriter, PayloadWriter};

/// An entity stored as exactly one key.
pub trait Key: Sized {
    /// Tag identifying the key on disk.
    const KEY_TYPE: KeyType;

    /// Versions [`decode`](Key::decode) accepts.
    const VERSIONS: &'static [u32];

    /// Version [`encode`](Key::encode) produces.
    const WRITE_VERSION: u32;

    /// Decodes the payload of a key whose header has been consumed. The
    /// version has already been checked against [`VERSIONS`](Key::VERSIONS).
    fn decode(version: u32, payload: &mut PayloadReader<'_>) -> Result<Self>;

    /// Encodes the payload for [`WRITE_VERSION`](Key::WRITE_VERSION).
    fn encode(&self, payload: &mut PayloadWriter) -> Result<()>;
}

/// Serializes a single key without a trailing line break.
pub fn to_bytes<K: Key>(key: &K, code_page: CodePage) -> Result<Vec<u8>> {
    let mut writer = KeyWriter::new(Vec::new(), code_page)?.with_line_breaks(false);
    writer.write_key(key)?;
    Ok(writer.into_inner())
}

/// Deserializes a single key from the start of `bytes`.
pub fn from_bytes<K: Key>(bytes: &[u8], code_page: CodePage) -> Result<K> {
    let mut reader = KeyReader::new(Cursor::new(bytes), code_page)?;
    match reader.read_tag()? {
        Some(key_type) if key_type == K::KEY_TYPE => reader.read_key(),
        Some(key_type) => Err(FamosError::InvalidFormat(format!(
            "Expected key '{}', got '{}'",
            K::KEY_TYPE,
            key_type
        ))),
        None => Err(FamosError::UnexpectedEof("key tag")),
    }
}
