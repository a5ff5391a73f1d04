//! Data field definition (`CG`).

use log::debug;

use crate::famos::codec::reader::PayloadReader;
use crate::famos::codec::writer::PayloadWriter;
use crate::famos::codec::Key;
use crate::famos::types::enums::DataFieldType;
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;

use super::component::Component;

/// A set of components that together form one (possibly two-dimensional)
/// data set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataField {
    pub field_type: DataFieldType,
    pub components: Vec<Component>,
}

impl DataField {
    pub fn new(field_type: DataFieldType) -> Self {
        Self {
            field_type,
            components: Vec::new(),
        }
    }

    /// 1 for equidistant time data, 2 for every other field type.
    pub fn dimension(&self) -> i32 {
        self.field_type.dimension()
    }

    pub fn header(&self) -> DataFieldHeader {
        DataFieldHeader {
            component_count: self.components.len() as i32,
            field_type: self.field_type,
        }
    }

    /// Checks that the field has at least as many components as dimensions.
    pub fn validate(&self) -> Result<()> {
        let expected = self.dimension() as usize;
        if self.components.len() < expected {
            return Err(FamosError::TooFewComponents {
                expected,
                actual: self.components.len(),
            });
        }
        Ok(())
    }
}

/// The `CG` key itself. Components follow as separate keys and are
/// attached by the field dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFieldHeader {
    /// Number of components the writer announced.
    pub component_count: i32,
    pub field_type: DataFieldType,
}

impl DataFieldHeader {
    pub fn into_field(self) -> DataField {
        DataField::new(self.field_type)
    }
}

impl Key for DataFieldHeader {
    const KEY_TYPE: KeyType = KeyType::CG;
    const VERSIONS: &'static [u32] = &[1];
    const WRITE_VERSION: u32 = 1;

    fn decode(_version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        let component_count = payload.read_i32("component count")?;
        let field_type = DataFieldType::try_from(payload.read_i32("data field type")?)?;
        let dimension = payload.read_i32("dimension")?;

        if dimension != field_type.dimension() {
            return Err(FamosError::DimensionMismatch {
                expected: field_type.dimension(),
                actual: dimension,
            });
        }

        debug!(
            "Data field header: type={:?}, dimension={}, components={}",
            field_type, dimension, component_count
        );
        Ok(Self {
            component_count,
            field_type,
        })
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_i32(self.component_count);
        payload.write_i32(self.field_type.code());
        payload.write_i32(self.field_type.dimension());
        Ok(())
    }
}
