//! Group definition (`CB`).

use crate::famos::codec::reader::PayloadReader;
use crate::famos::codec::writer::PayloadWriter;
use crate::famos::codec::Key;
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;

use super::grouped::{ChannelInfo, SingleValue, Text};
use super::property::PropertyInfo;

/// A named collection of texts, single values and channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    index: i32,
    pub name: String,
    pub comment: String,
    pub property_info: Option<PropertyInfo>,
    pub texts: Vec<Text>,
    pub single_values: Vec<SingleValue>,
    pub channel_infos: Vec<ChannelInfo>,
}

impl Group {
    /// Creates an empty group. `index` must be greater than zero.
    pub fn new(index: i32, name: impl Into<String>, comment: impl Into<String>) -> Result<Self> {
        validate_index(index)?;
        Ok(Self {
            index,
            name: name.into(),
            comment: comment.into(),
            property_info: None,
            texts: Vec::new(),
            single_values: Vec::new(),
            channel_infos: Vec::new(),
        })
    }

    /// The 1-based index other keys use to refer to this group.
    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn set_index(&mut self, index: i32) -> Result<()> {
        validate_index(index)?;
        self.index = index;
        Ok(())
    }
}

fn validate_index(index: i32) -> Result<()> {
    if index <= 0 {
        return Err(FamosError::InvalidGroupIndex(index));
    }
    Ok(())
}

impl Key for Group {
    const KEY_TYPE: KeyType = KeyType::CB;
    const VERSIONS: &'static [u32] = &[1];
    const WRITE_VERSION: u32 = 1;

    fn decode(_version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        let index = payload.read_i32("group index")?;
        let name = payload.read_string("group name")?;
        let comment = payload.read_string("group comment")?;
        Self::new(index, name, comment)
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_i32(self.index);
        payload.write_string(&self.name)?;
        payload.write_string(&self.comment)
    }
}
