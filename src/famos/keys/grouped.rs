//! Keys that belong to a group by index: texts (`CT`), single values
//! (`CI`) and channel information (`CN`).
//!
//! On disk each of these keys starts with the index of its group, `0`
//! meaning "no group". In memory the owning [`Group`](super::group::Group)
//! holds the item and the index is supplied again when writing.

use crate::famos::codec::reader::PayloadReader;
use crate::famos::codec::writer::PayloadWriter;
use crate::famos::codec::Key;
use crate::famos::types::enums::DataType;
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;

/// The part of a group-owned key that follows the group index.
pub trait GroupMember: Sized {
    const KEY_TYPE: KeyType;

    fn decode_fields(payload: &mut PayloadReader<'_>) -> Result<Self>;
    fn encode_fields(&self, payload: &mut PayloadWriter) -> Result<()>;
}

/// A group-owned item as stored on disk, together with its group index.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<T> {
    pub group_index: i32,
    pub item: T,
}

impl<T: GroupMember> Key for Grouped<T> {
    const KEY_TYPE: KeyType = T::KEY_TYPE;
    const VERSIONS: &'static [u32] = &[1];
    const WRITE_VERSION: u32 = 1;

    fn decode(_version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        let group_index = payload.read_i32("group index")?;
        if group_index < 0 {
            return Err(FamosError::OutOfRange {
                field: "group index",
                expected: ">= '0'",
                actual: group_index.to_string(),
            });
        }
        let item = T::decode_fields(payload)?;
        Ok(Self { group_index, item })
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_i32(self.group_index);
        self.item.encode_fields(payload)
    }
}

/// A named text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub name: String,
    pub text: String,
    pub comment: String,
}

impl GroupMember for Text {
    const KEY_TYPE: KeyType = KeyType::CT;

    fn decode_fields(payload: &mut PayloadReader<'_>) -> Result<Self> {
        Ok(Self {
            name: payload.read_string("text name")?,
            text: payload.read_string("text")?,
            comment: payload.read_string("text comment")?,
        })
    }

    fn encode_fields(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_string(&self.name)?;
        payload.write_string(&self.text)?;
        payload.write_string(&self.comment)
    }
}

/// A single named measurement value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SingleValue {
    pub data_type: DataType,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub comment: String,
    /// Time of the value relative to the trigger, in seconds.
    pub time: f64,
}

impl GroupMember for SingleValue {
    const KEY_TYPE: KeyType = KeyType::CI;

    fn decode_fields(payload: &mut PayloadReader<'_>) -> Result<Self> {
        let data_type = DataType::try_from(payload.read_i32("single value data type")?)?;
        let name = payload.read_string("single value name")?;
        let value = payload.read_real("single value")?;
        let unit = payload.read_string("single value unit")?;
        let comment = payload.read_string("single value comment")?;
        let _reserved = payload.read_i32("single value reserved")?;
        let time = payload.read_real("single value time")?;

        Ok(Self {
            data_type,
            name,
            value,
            unit,
            comment,
            time,
        })
    }

    fn encode_fields(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_i32(self.data_type.code());
        payload.write_string(&self.name)?;
        payload.write_real("single value", self.value)?;
        payload.write_string(&self.unit)?;
        payload.write_string(&self.comment)?;
        payload.write_i32(0);
        payload.write_real("single value time", self.time)
    }
}

/// Describes one channel, optionally a single bit of a digital component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelInfo {
    /// Bit index for digital channels, `0` otherwise.
    pub bit_index: i32,
    pub name: String,
    pub comment: String,
}

impl GroupMember for ChannelInfo {
    const KEY_TYPE: KeyType = KeyType::CN;

    fn decode_fields(payload: &mut PayloadReader<'_>) -> Result<Self> {
        let _reserved = payload.read_i32("channel reserved")?;
        let bit_index = payload.read_i32("channel bit index")?;
        if !(0..=16).contains(&bit_index) {
            return Err(FamosError::OutOfRange {
                field: "bit index",
                expected: "'0..16'",
                actual: bit_index.to_string(),
            });
        }
        Ok(Self {
            bit_index,
            name: payload.read_string("channel name")?,
            comment: payload.read_string("channel comment")?,
        })
    }

    fn encode_fields(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_i32(0);
        payload.write_i32(self.bit_index);
        payload.write_string(&self.name)?;
        payload.write_string(&self.comment)
    }
}
