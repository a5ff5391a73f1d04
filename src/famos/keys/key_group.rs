//! Key group sentinel (`CK`).

use crate::famos::codec::reader::PayloadReader;
use crate::famos::codec::writer::PayloadWriter;
use crate::famos::codec::Key;
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;

/// Marks whether the keys of a file were completely written.
///
/// Writers emit the sentinel open and close it once everything is on disk
/// (see [`KeyWriter::begin_key_group`](crate::famos::codec::writer::KeyWriter::begin_key_group)).
/// Reading an open sentinel fails with [`FamosError::InterruptedWrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGroup {
    pub closed: bool,
}

impl KeyGroup {
    pub fn closed() -> Self {
        Self { closed: true }
    }
}

impl Key for KeyGroup {
    const KEY_TYPE: KeyType = KeyType::CK;
    const VERSIONS: &'static [u32] = &[1];
    const WRITE_VERSION: u32 = 1;

    fn decode(_version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        let _unknown = payload.read_i32("key group")?;
        let closed = payload.read_bool("key group closed")?;
        if !closed {
            return Err(FamosError::InterruptedWrite);
        }
        Ok(Self { closed })
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_i32(1);
        payload.write_bool(self.closed);
        Ok(())
    }
}
