//! Reading side of the key protocol.
//!
//! [`KeyReader`] walks the key stream: it classifies tags, reads headers,
//! skips keys it does not understand and rewinds over a tag that belongs to
//! an outer grammar level. [`PayloadReader`] decodes the comma separated
//! fields inside one key's payload.
//!
//! # Key Structure
//! ```text
//! |CB,1,13,1,6,Gruppe,0,;
//! ^^^^                     tag token (4 bytes, the unit of pushback)
//!     ^^^^^                version and declared payload length
//!          ^^^^^^^^^^^^^   payload (13 bytes)
//!                       ^  terminator
//! ```

use std::io::{self, Read, Seek, SeekFrom};

use log::{trace, warn};
use rust_decimal::Decimal;

use super::code_page::{CodePage, TextCodec};
use super::number;
use super::Key;
use crate::famos::keys::raw::RawKey;
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;

/// Width of the `|XX,` tag token.
pub const TAG_WIDTH: u64 = 4;

/// Upper bound for the digits of a header number, padding included.
const MAX_NUMBER_TOKEN: usize = 32;

/// The (type, version, length) triple that prefixes every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHeader {
    pub key_type: KeyType,
    pub version: u32,
    /// Declared payload length in bytes, terminator excluded.
    pub length: u64,
    /// Stream offset of the `|` that starts the key.
    pub offset: u64,
    /// Stream offset of the first payload byte.
    pub payload_offset: u64,
}

impl KeyHeader {
    /// Number of bytes from the start of the key up to its payload.
    pub fn header_len(&self) -> u64 {
        self.payload_offset - self.offset
    }

    /// Stream offset just past the key's terminator.
    pub fn end_offset(&self) -> u64 {
        self.payload_offset + self.length + 1
    }
}

/// Cursor over a seekable FAMOS key stream.
///
/// Single byte reads are issued while scanning headers, so callers reading
/// from a file should wrap it in a `BufReader`.
pub struct KeyReader<R> {
    inner: R,
    text: TextCodec,
    /// Tag consumed by the last `read_tag` and not yet followed by a header.
    current: Option<(KeyType, u64)>,
}

impl<R: Read + Seek> KeyReader<R> {
    /// Creates a reader decoding text with the given code page.
    pub fn new(inner: R, code_page: CodePage) -> Result<Self> {
        Ok(Self {
            inner,
            text: TextCodec::new(code_page)?,
            current: None,
        })
    }

    pub fn text_codec(&self) -> TextCodec {
        self.text
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Consumes the next tag token. Returns `None` at the end of the stream.
    ///
    /// Whitespace between keys is skipped. After this call the cursor sits
    /// on the key version; call [`read_header`](Self::read_header) next, or
    /// [`push_back`](Self::push_back) to leave the key for someone else.
    pub fn read_tag(&mut self) -> Result<Option<KeyType>> {
        let first = loop {
            match self.next_byte()? {
                None => return Ok(None),
                Some(byte) if byte.is_ascii_whitespace() => continue,
                Some(byte) => break byte,
            }
        };

        let offset = self.inner.stream_position()? - 1;
        if first != b'|' {
            return Err(FamosError::InvalidFormat(format!(
                "Expected key start '|' at offset {}, got {:#04x}",
                offset, first
            )));
        }

        let mut rest = [0u8; 3];
        self.read_exact(&mut rest, "key tag")?;
        if rest[2] != b',' {
            return Err(FamosError::InvalidFormat(format!(
                "Expected ',' after key tag at offset {}, got {:#04x}",
                offset, rest[2]
            )));
        }

        let key_type = KeyType::from_tag([rest[0], rest[1]]);
        trace!("Key '{}' at offset {}", key_type, offset);
        self.current = Some((key_type, offset));
        Ok(Some(key_type))
    }

    /// Rewinds over the tag token just returned by [`read_tag`](Self::read_tag).
    pub fn push_back(&mut self, key_type: KeyType) -> Result<()> {
        match self.current.take() {
            Some((current, offset)) if current == key_type => {
                let position = self.inner.stream_position()?;
                if position != offset + TAG_WIDTH {
                    return Err(FamosError::InvalidFormat(format!(
                        "Cannot push back key '{}': cursor moved past its tag",
                        key_type
                    )));
                }
                self.inner.seek(SeekFrom::Current(-(TAG_WIDTH as i64)))?;
                trace!("Pushed back key '{}' to offset {}", key_type, offset);
                Ok(())
            }
            _ => Err(FamosError::InvalidFormat(format!(
                "Cannot push back key '{}': it is not the last tag read",
                key_type
            ))),
        }
    }

    /// Returns the type of the next key without consuming it.
    pub fn peek_tag(&mut self) -> Result<Option<KeyType>> {
        let key_type = self.read_tag()?;
        if let Some(key_type) = key_type {
            self.push_back(key_type)?;
        }
        Ok(key_type)
    }

    /// True when no further key follows.
    pub fn is_at_end(&mut self) -> Result<bool> {
        Ok(self.peek_tag()?.is_none())
    }

    /// Reads the version and declared length following a consumed tag.
    ///
    /// Fails with [`FamosError::UnsupportedKeyVersion`] when
    /// `expected_version` is given and differs from the stored one.
    pub fn read_header(&mut self, expected_version: Option<u32>) -> Result<KeyHeader> {
        let (key_type, offset) = self.current.take().ok_or_else(|| {
            FamosError::InvalidFormat("Key header requested before reading a key tag".to_string())
        })?;

        let version = self.read_header_number("key version")?;
        let length = self.read_header_number("key length")?;
        let payload_offset = self.inner.stream_position()?;

        let version = u32::try_from(version).map_err(|_| FamosError::InvalidNumber {
            kind: "key version",
            token: version.to_string(),
        })?;

        if let Some(expected) = expected_version {
            if version != expected {
                return Err(FamosError::UnsupportedKeyVersion {
                    key_type,
                    expected: format!("'{}'", expected),
                    actual: version,
                });
            }
        }

        trace!("Key '{}' header: version={}, length={} bytes", key_type, version, length);
        Ok(KeyHeader {
            key_type,
            version,
            length,
            offset,
            payload_offset,
        })
    }

    /// Reads the declared payload and the terminator after it.
    pub fn read_payload(&mut self, header: &KeyHeader) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        (&mut self.inner).take(header.length).read_to_end(&mut payload)?;
        if (payload.len() as u64) < header.length {
            return Err(FamosError::UnexpectedEof("key payload"));
        }
        self.expect_terminator(header)?;
        Ok(payload)
    }

    /// Advances past the payload and terminator without interpreting them.
    pub fn skip(&mut self, header: &KeyHeader) -> Result<()> {
        let length = i64::try_from(header.length).map_err(|_| FamosError::InvalidNumber {
            kind: "key length",
            token: header.length.to_string(),
        })?;
        self.inner.seek(SeekFrom::Current(length))?;
        self.expect_terminator(header)
    }

    /// Skips the whole key whose tag was just consumed.
    pub fn skip_key(&mut self) -> Result<KeyHeader> {
        let header = self.read_header(None)?;
        self.skip(&header)?;
        trace!(
            "Skipped key '{}' ({} bytes) at offset {}",
            header.key_type,
            header.length,
            header.offset
        );
        Ok(header)
    }

    /// Reads and decodes the key whose tag was just consumed.
    pub fn read_key<K: Key>(&mut self) -> Result<K> {
        let header = self.read_header(None)?;
        if header.key_type != K::KEY_TYPE {
            return Err(FamosError::InvalidFormat(format!(
                "Expected key '{}', got '{}'",
                K::KEY_TYPE,
                header.key_type
            )));
        }
        if !K::VERSIONS.contains(&header.version) {
            let expected = K::VERSIONS
                .iter()
                .map(|v| format!("'{}'", v))
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(FamosError::UnsupportedKeyVersion {
                key_type: header.key_type,
                expected,
                actual: header.version,
            });
        }

        let payload = self.read_payload(&header)?;
        let mut fields = PayloadReader::new(&payload, self.text);
        let key = K::decode(header.version, &mut fields)?;

        if !fields.is_empty() {
            warn!(
                "Key '{}' at offset {}: ignoring {} trailing payload bytes",
                header.key_type,
                header.offset,
                fields.remaining()
            );
        }
        Ok(key)
    }

    /// Reads the key whose tag was just consumed without decoding its payload.
    pub fn read_raw(&mut self) -> Result<RawKey> {
        let header = self.read_header(None)?;
        let payload = self.read_payload(&header)?;
        Ok(RawKey {
            key_type: header.key_type,
            version: header.version,
            payload,
        })
    }

    fn expect_terminator(&mut self, header: &KeyHeader) -> Result<()> {
        match self.next_byte()? {
            Some(b';') => Ok(()),
            Some(byte) => Err(FamosError::InvalidFormat(format!(
                "Key '{}' at offset {} is not terminated by ';' (found {:#04x})",
                header.key_type, header.offset, byte
            ))),
            None => Err(FamosError::UnexpectedEof("key terminator")),
        }
    }

    fn read_header_number(&mut self, what: &'static str) -> Result<u64> {
        let mut token = Vec::new();
        loop {
            match self.next_byte()? {
                Some(b',') => break,
                Some(byte) if token.len() < MAX_NUMBER_TOKEN => token.push(byte),
                Some(_) => {
                    return Err(FamosError::InvalidFormat(format!("The {} token is too long", what)))
                }
                None => return Err(FamosError::UnexpectedEof(what)),
            }
        }
        let text = String::from_utf8_lossy(&token);
        text.trim().parse::<u64>().map_err(|_| FamosError::InvalidNumber {
            kind: what,
            token: text.into_owned(),
        })
    }

    fn read_exact(&mut self, buf: &mut [u8], what: &'static str) -> Result<()> {
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => FamosError::UnexpectedEof(what),
            _ => FamosError::Io(e),
        })
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Field decoder over one key's payload.
///
/// Fields are comma separated. Decoding never looks past the declared
/// payload, so a string whose bytes contain `,` or `;` is read correctly
/// from its length prefix.
pub struct PayloadReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    text: TextCodec,
}

impl<'a> PayloadReader<'a> {
    pub fn new(bytes: &'a [u8], text: TextCodec) -> Self {
        Self { bytes, pos: 0, text }
    }

    pub fn text_codec(&self) -> TextCodec {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Bytes left in the payload.
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Reads an int32 field.
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32> {
        let token = self.read_token(field)?;
        let token = String::from_utf8_lossy(token);
        number::parse_integer(token.trim()).ok_or_else(|| FamosError::InvalidNumber {
            kind: field,
            token: token.into_owned(),
        })
    }

    /// Reads a boolean stored as an int32 field; only `1` is true.
    pub fn read_bool(&mut self, field: &'static str) -> Result<bool> {
        Ok(self.read_i32(field)? == 1)
    }

    /// Reads a real field in invariant notation.
    pub fn read_real(&mut self, field: &'static str) -> Result<f64> {
        let token = self.read_token(field)?;
        let token = String::from_utf8_lossy(token);
        number::parse_real(token.trim()).ok_or_else(|| FamosError::InvalidNumber {
            kind: field,
            token: token.into_owned(),
        })
    }

    /// Reads a fixed-point decimal field, keeping every stored digit.
    pub fn read_decimal(&mut self, field: &'static str) -> Result<Decimal> {
        let token = self.read_token(field)?;
        let token = String::from_utf8_lossy(token);
        number::parse_decimal(token.trim()).ok_or_else(|| FamosError::InvalidNumber {
            kind: field,
            token: token.into_owned(),
        })
    }

    /// Reads a `<byteLength>,<bytes>` string field.
    pub fn read_string(&mut self, field: &'static str) -> Result<String> {
        let length = self.read_i32(field)?;
        let length = usize::try_from(length).map_err(|_| {
            FamosError::InvalidFormat(format!("Negative length {} for string '{}'", length, field))
        })?;
        if length > self.remaining() {
            return Err(FamosError::UnexpectedEof(field));
        }

        let all: &'a [u8] = self.bytes;
        let bytes = &all[self.pos..self.pos + length];
        self.pos += length;

        match self.peek() {
            None => {}
            Some(b',') => self.pos += 1,
            Some(byte) => {
                return Err(FamosError::InvalidFormat(format!(
                    "Expected ',' after string '{}', got {:#04x}",
                    field, byte
                )))
            }
        }
        Ok(self.text.decode(bytes).into_owned())
    }

    /// Reads a double-quoted text; `""` inside the quotes stands for `"`.
    pub fn read_quoted(&mut self, field: &'static str) -> Result<Vec<u8>> {
        self.expect_byte(b'"', field)?;
        let mut unquoted = Vec::new();
        loop {
            let byte = self.next().ok_or(FamosError::UnexpectedEof(field))?;
            if byte != b'"' {
                unquoted.push(byte);
            } else if self.peek() == Some(b'"') {
                self.pos += 1;
                unquoted.push(b'"');
            } else {
                return Ok(unquoted);
            }
        }
    }

    /// Reads bytes up to (excluding) `delimiter` or the payload end, and
    /// consumes the delimiter.
    pub fn read_until(&mut self, delimiter: u8, field: &'static str) -> Result<&'a [u8]> {
        if self.is_empty() {
            return Err(FamosError::UnexpectedEof(field));
        }
        let all: &'a [u8] = self.bytes;
        let rest = &all[self.pos..];
        let end = rest.iter().position(|&b| b == delimiter).unwrap_or(rest.len());
        self.pos += (end + 1).min(rest.len());
        Ok(&rest[..end])
    }

    /// Consumes one byte, failing unless it equals `expected`.
    pub fn expect_byte(&mut self, expected: u8, field: &'static str) -> Result<()> {
        match self.next() {
            Some(byte) if byte == expected => Ok(()),
            Some(byte) => Err(FamosError::InvalidFormat(format!(
                "Expected '{}' in {}, got {:#04x}",
                expected as char, field, byte
            ))),
            None => Err(FamosError::UnexpectedEof(field)),
        }
    }

    fn read_token(&mut self, field: &'static str) -> Result<&'a [u8]> {
        self.read_until(b',', field)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }
}
