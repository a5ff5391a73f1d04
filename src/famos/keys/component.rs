//! Component definition (`CC`).

use crate::famos::codec::reader::PayloadReader;
use crate::famos::codec::writer::PayloadWriter;
use crate::famos::codec::Key;
use crate::famos::types::enums::AnalogDigital;
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;
use crate::famos::types::Shared;

use super::calibration::Calibration;
use super::property::PropertyInfo;
use super::raw::RawKey;
use super::scaling::{XAxisScaling, ZAxisScaling};
use super::trigger_time::TriggerTime;

/// One channel's worth of data field metadata.
///
/// Scalings and the trigger time are shared handles: every component that
/// followed the same `CD`, `CZ` or `NT` key in the stream points at the
/// same object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    /// Position inside the data field, `1` or `2`.
    pub index: i32,
    pub analog_digital: AnalogDigital,
    pub x_axis_scaling: Option<Shared<XAxisScaling>>,
    pub z_axis_scaling: Option<Shared<ZAxisScaling>>,
    pub trigger_time: Option<Shared<TriggerTime>>,
    pub calibration: Option<Calibration>,
    pub property_info: Option<PropertyInfo>,
    /// Pack, buffer and display keys, in stream order.
    pub raw_keys: Vec<RawKey>,
}

impl Component {
    pub fn new(index: i32, analog_digital: AnalogDigital) -> Result<Self> {
        validate_index(index)?;
        Ok(Self {
            index,
            analog_digital,
            ..Self::default()
        })
    }
}

fn validate_index(index: i32) -> Result<()> {
    if !(1..=2).contains(&index) {
        return Err(FamosError::OutOfRange {
            field: "component index",
            expected: "'1..2'",
            actual: index.to_string(),
        });
    }
    Ok(())
}

impl Key for Component {
    const KEY_TYPE: KeyType = KeyType::CC;
    const VERSIONS: &'static [u32] = &[1];
    const WRITE_VERSION: u32 = 1;

    fn decode(_version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        let index = payload.read_i32("component index")?;
        let analog_digital = AnalogDigital::try_from(payload.read_i32("analog/digital")?)?;
        Self::new(index, analog_digital)
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        validate_index(self.index)?;
        payload.write_i32(self.index);
        payload.write_i32(self.analog_digital.code());
        Ok(())
    }
}
