//! Keys carried through without interpretation.

use crate::famos::types::key_type::KeyType;

/// A key kept verbatim.
///
/// Pack, buffer and display information describe the raw sample blocks,
/// which this crate does not read. They are preserved byte for byte so a
/// component can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKey {
    pub key_type: KeyType,
    pub version: u32,
    pub payload: Vec<u8>,
}
