//! Calibration (`CR`).

use rust_decimal::Decimal;

use crate::famos::codec::reader::PayloadReader;
use crate::famos::codec::writer::PayloadWriter;
use crate::famos::codec::Key;
use crate::famos::types::error::Result;
use crate::famos::types::key_type::KeyType;

/// Linear calibration of a component's values.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    /// Whether FAMOS applies `factor` and `offset` (integer raw data only).
    pub apply_transformation: bool,
    pub factor: Decimal,
    pub offset: Decimal,
    pub is_calibrated: bool,
    pub unit: String,
}

impl Calibration {
    pub fn new(
        apply_transformation: bool,
        factor: Decimal,
        offset: Decimal,
        is_calibrated: bool,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            apply_transformation,
            factor,
            offset,
            is_calibrated,
            unit: unit.into(),
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new(false, Decimal::ONE, Decimal::ZERO, false, "")
    }
}

impl Key for Calibration {
    const KEY_TYPE: KeyType = KeyType::CR;
    const VERSIONS: &'static [u32] = &[1];
    const WRITE_VERSION: u32 = 1;

    fn decode(_version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        Ok(Self {
            apply_transformation: payload.read_bool("apply transformation")?,
            factor: payload.read_decimal("calibration factor")?,
            offset: payload.read_decimal("calibration offset")?,
            is_calibrated: payload.read_bool("calibrated")?,
            unit: payload.read_string("calibration unit")?,
        })
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        payload.write_bool(self.apply_transformation);
        payload.write_decimal(self.factor);
        payload.write_decimal(self.offset);
        payload.write_bool(self.is_calibrated);
        payload.write_string(&self.unit)
    }
}
