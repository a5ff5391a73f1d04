//! Writing side of the key protocol.

use std::io::{Seek, SeekFrom, Write};

use log::trace;
use rust_decimal::Decimal;

use super::code_page::{CodePage, TextCodec};
use super::number;
use super::Key;
use crate::famos::keys::raw::RawKey;
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;

/// Builds the comma separated payload of one key.
pub struct PayloadWriter {
    buf: Vec<u8>,
    text: TextCodec,
    empty: bool,
}

impl PayloadWriter {
    pub fn new(text: TextCodec) -> Self {
        Self {
            buf: Vec::new(),
            text,
            empty: true,
        }
    }

    pub fn text_codec(&self) -> TextCodec {
        self.text
    }

    pub fn write_i32(&mut self, value: i32) {
        self.separate();
        self.buf.extend_from_slice(value.to_string().as_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_i32(i32::from(value));
    }

    pub fn write_real(&mut self, field: &'static str, value: f64) -> Result<()> {
        let token = number::format_real(value).ok_or_else(|| FamosError::InvalidNumber {
            kind: field,
            token: value.to_string(),
        })?;
        self.separate();
        self.buf.extend_from_slice(token.as_bytes());
        Ok(())
    }

    pub fn write_decimal(&mut self, value: Decimal) {
        self.separate();
        self.buf.extend_from_slice(value.to_string().as_bytes());
    }

    /// Writes `<byteLength>,<bytes>`. The prefix counts encoded bytes, not
    /// characters.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = self.text.encode(value)?;
        self.write_i32(bytes.len() as i32);
        self.separate();
        self.buf.extend_from_slice(&bytes);
        Ok(())
    }

    /// Appends an already rendered field.
    pub fn write_raw(&mut self, token: &[u8]) {
        self.separate();
        self.buf.extend_from_slice(token);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn separate(&mut self) {
        if !self.empty {
            self.buf.push(b',');
        }
        self.empty = false;
    }
}

/// Writes keys to a byte sink.
pub struct KeyWriter<W> {
    inner: W,
    text: TextCodec,
    line_breaks: bool,
}

impl<W: Write> KeyWriter<W> {
    /// Creates a writer encoding text with the given code page. Keys are
    /// separated by `\r\n` unless disabled with
    /// [`with_line_breaks`](Self::with_line_breaks).
    pub fn new(inner: W, code_page: CodePage) -> Result<Self> {
        Ok(Self {
            inner,
            text: TextCodec::new(code_page)?,
            line_breaks: true,
        })
    }

    pub fn with_line_breaks(mut self, line_breaks: bool) -> Self {
        self.line_breaks = line_breaks;
        self
    }

    pub fn text_codec(&self) -> TextCodec {
        self.text
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Encodes and writes one key.
    pub fn write_key<K: Key>(&mut self, key: &K) -> Result<()> {
        let mut payload = PayloadWriter::new(self.text);
        key.encode(&mut payload)?;
        self.write_frame(K::KEY_TYPE, K::WRITE_VERSION, &payload.into_bytes())
    }

    /// Writes a key kept verbatim from a previous read.
    pub fn write_raw(&mut self, key: &RawKey) -> Result<()> {
        self.write_frame(key.key_type, key.version, &key.payload)
    }

    fn write_frame(&mut self, key_type: KeyType, version: u32, payload: &[u8]) -> Result<()> {
        self.inner.write_all(b"|")?;
        self.inner.write_all(&key_type.tag())?;
        write!(self.inner, ",{},{},", version, payload.len())?;
        self.inner.write_all(payload)?;
        self.inner.write_all(b";")?;
        if self.line_breaks {
            self.inner.write_all(b"\r\n")?;
        }
        trace!("Wrote key '{}' (version {}, {} bytes)", key_type, version, payload.len());
        Ok(())
    }
}

impl<W: Write + Seek> KeyWriter<W> {
    /// Writes an open key group sentinel and returns the offset of its
    /// closed flag for [`close_key_group`](Self::close_key_group).
    pub fn begin_key_group(&mut self) -> Result<u64> {
        let start = self.inner.stream_position()?;
        self.write_frame(KeyType::CK, 1, b"1,0")?;
        // "|CK,1,3," is followed by "1," and then the flag.
        Ok(start + 10)
    }

    /// Marks a key group written by [`begin_key_group`](Self::begin_key_group)
    /// as closed. The cursor is restored afterwards.
    pub fn close_key_group(&mut self, flag_offset: u64) -> Result<()> {
        let position = self.inner.stream_position()?;
        self.inner.seek(SeekFrom::Start(flag_offset))?;
        self.inner.write_all(b"1")?;
        self.inner.seek(SeekFrom::Start(position))?;
        self.inner.flush()?;
        trace!("Closed key group at offset {}", flag_offset);
        Ok(())
    }
}
