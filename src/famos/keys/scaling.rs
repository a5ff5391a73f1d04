//! Axis scalings: x-axis (`CD`) and z-axis (`CZ`).

use crate::famos::codec::reader::PayloadReader;
use crate::famos::codec::writer::PayloadWriter;
use crate::famos::codec::Key;
use crate::famos::types::error::Result;
use crate::famos::types::key_type::KeyType;

/// Scaling of the x-axis (usually time) of the components that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct XAxisScaling {
    /// Distance between two samples.
    pub delta_x: f64,
    pub is_calibrated: bool,
    pub unit: String,
    /// Raw reduction code (version 2 keys only).
    pub reduction: i32,
    pub is_multiple_events: bool,
    pub sort_buffers: bool,
    /// X value of the first sample.
    pub x0: f64,
    /// Raw pretrigger usage code (version 2 keys only).
    pub pretrigger_usage: i32,
}

impl XAxisScaling {
    pub fn new(delta_x: f64, unit: impl Into<String>) -> Self {
        Self {
            delta_x,
            is_calibrated: true,
            unit: unit.into(),
            ..Self::default()
        }
    }
}

impl Default for XAxisScaling {
    fn default() -> Self {
        Self {
            delta_x: 1.0,
            is_calibrated: false,
            unit: String::new(),
            reduction: 0,
            is_multiple_events: false,
            sort_buffers: false,
            x0: 0.0,
            pretrigger_usage: 0,
        }
    }
}

impl Key for XAxisScaling {
    const KEY_TYPE: KeyType = KeyType::CD;
    const VERSIONS: &'static [u32] = &[1, 2];
    const WRITE_VERSION: u32 = 2;

    fn decode(version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        let mut scaling = Self {
            delta_x: payload.read_real("dx")?,
            is_calibrated: payload.read_bool("x calibrated")?,
            unit: payload.read_string("x unit")?,
            ..Self::default()
        };

        if version == 2 {
            scaling.reduction = payload.read_i32("reduction")?;
            scaling.is_multiple_events = payload.read_bool("multiple events")?;
            scaling.sort_buffers = payload.read_bool("sort buffers")?;
            scaling.x0 = payload.read_real("x0")?;
            scaling.pretrigger_usage = payload.read_i32("pretrigger usage")?;
        }

        Ok(scaling)
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_real("dx", self.delta_x)?;
        payload.write_bool(self.is_calibrated);
        payload.write_string(&self.unit)?;
        payload.write_i32(self.reduction);
        payload.write_bool(self.is_multiple_events);
        payload.write_bool(self.sort_buffers);
        payload.write_real("x0", self.x0)?;
        payload.write_i32(self.pretrigger_usage);
        Ok(())
    }
}

/// Scaling of the z-axis, used by segmented (multi-dimensional) data.
#[derive(Debug, Clone, PartialEq)]
pub struct ZAxisScaling {
    pub delta_z: f64,
    pub is_delta_z_calibrated: bool,
    pub z0: f64,
    pub is_z0_calibrated: bool,
    pub unit: String,
    /// Number of samples per segment.
    pub segment_size: i32,
}

impl Default for ZAxisScaling {
    fn default() -> Self {
        Self {
            delta_z: 1.0,
            is_delta_z_calibrated: false,
            z0: 0.0,
            is_z0_calibrated: false,
            unit: String::new(),
            segment_size: 0,
        }
    }
}

impl Key for ZAxisScaling {
    const KEY_TYPE: KeyType = KeyType::CZ;
    const VERSIONS: &'static [u32] = &[1];
    const WRITE_VERSION: u32 = 1;

    fn decode(_version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        Ok(Self {
            delta_z: payload.read_real("dz")?,
            is_delta_z_calibrated: payload.read_bool("dz calibrated")?,
            z0: payload.read_real("z0")?,
            is_z0_calibrated: payload.read_bool("z0 calibrated")?,
            unit: payload.read_string("z unit")?,
            segment_size: payload.read_i32("segment size")?,
        })
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_real("dz", self.delta_z)?;
        payload.write_bool(self.is_delta_z_calibrated);
        payload.write_real("z0", self.z0)?;
        payload.write_bool(self.is_z0_calibrated);
        payload.write_string(&self.unit)?;
        payload.write_i32(self.segment_size);
        Ok(())
    }
}
