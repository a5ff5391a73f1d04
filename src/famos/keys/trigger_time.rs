//! Trigger time (`NT`).
//!
//! Version 1 keys store a calendar time without time zone information.
//! Version 2 keys add the offset from UTC in minutes and a time mode; they
//! are normalized to UTC on read, which is why they are always written
//! back with a zero offset.

use jiff::civil::DateTime;
use jiff::tz::Offset;
use jiff::SignedDuration;

use crate::famos::codec::reader::PayloadReader;
use crate::famos::codec::writer::PayloadWriter;
use crate::famos::codec::Key;
use crate::famos::types::enums::TimeMode;
use crate::famos::types::error::{FamosError, Result};
use crate::famos::types::key_type::KeyType;

/// Start time of a measurement.
///
/// Components share trigger times by reference; use
/// [`detach`](crate::famos::types::detach) to obtain an independent copy
/// of a shared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerTime {
    pub date_time: DateTime,
    pub time_mode: TimeMode,
}

impl TriggerTime {
    pub fn new(date_time: DateTime, time_mode: TimeMode) -> Self {
        Self { date_time, time_mode }
    }
}

fn check_range(field: &'static str, expected: &'static str, valid: bool, actual: impl ToString) -> Result<()> {
    if !valid {
        return Err(FamosError::OutOfRange {
            field,
            expected,
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Splits a seconds value into whole seconds and milliseconds.
///
/// Both parts are truncated. Binary representation noise below a
/// millionth of a millisecond is absorbed first, so that `12.344` yields
/// 344 ms and not 343. The millisecond never carries into the whole
/// second, so `59.9999999999` stays in second 59.
fn split_second(second: f64) -> (i32, i32) {
    let whole = second.trunc() as i32;
    let scaled = second.fract() * 1000.0;
    let nearest = scaled.round();
    let millisecond = if (scaled - nearest).abs() < 1e-6 {
        nearest as i32
    } else {
        scaled.trunc() as i32
    };
    (whole, millisecond.min(999))
}

fn invalid_timestamp(e: jiff::Error) -> FamosError {
    FamosError::InvalidTimestamp(e.to_string())
}

impl Key for TriggerTime {
    const KEY_TYPE: KeyType = KeyType::NT;
    const VERSIONS: &'static [u32] = &[1, 2];
    const WRITE_VERSION: u32 = 2;

    fn decode(version: u32, payload: &mut PayloadReader<'_>) -> Result<Self> {
        let day = payload.read_i32("day")?;
        check_range("day", "'1..31'", (1..=31).contains(&day), day)?;

        let month = payload.read_i32("month")?;
        check_range("month", "'1..12'", (1..=12).contains(&month), month)?;

        let year = payload.read_i32("year")?;
        check_range("year", ">= '1980'", year >= 1980, year)?;

        let hour = payload.read_i32("hour")?;
        check_range("hour", "'0..23'", (0..=23).contains(&hour), hour)?;

        let minute = payload.read_i32("minute")?;
        check_range("minute", "'0..59'", (0..=59).contains(&minute), minute)?;

        let second = payload.read_real("second")?;
        check_range("second", "'0.0..60.0'", (0.0..=60.0).contains(&second), second)?;

        let (whole_second, millisecond) = split_second(second);

        let year = i16::try_from(year)
            .map_err(|_| FamosError::InvalidTimestamp(format!("year {} is out of range", year)))?;

        // A leap second is represented as second 59 plus one second.
        let mut date_time = DateTime::new(
            year,
            month as i8,
            day as i8,
            hour as i8,
            minute as i8,
            whole_second.min(59) as i8,
            millisecond * 1_000_000,
        )
        .map_err(invalid_timestamp)?;

        if whole_second == 60 {
            date_time = date_time
                .checked_add(SignedDuration::from_secs(1))
                .map_err(invalid_timestamp)?;
        }

        let mut time_mode = TimeMode::Unknown;
        if version == 2 {
            let time_zone = payload.read_i32("time zone")?;
            time_mode = TimeMode::try_from(payload.read_i32("time mode")?)?;

            let offset_seconds = time_zone.checked_mul(60).ok_or_else(|| FamosError::OutOfRange {
                field: "time zone",
                expected: "an offset in minutes",
                actual: time_zone.to_string(),
            })?;
            let offset = Offset::from_seconds(offset_seconds).map_err(invalid_timestamp)?;
            let timestamp = offset.to_timestamp(date_time).map_err(invalid_timestamp)?;
            date_time = Offset::UTC.to_datetime(timestamp);
        }

        Ok(Self { date_time, time_mode })
    }

    fn encode(&self, payload: &mut PayloadWriter) -> Result<()> {
        let dt = self.date_time;
        check_range("year", ">= '1980'", dt.year() >= 1980, dt.year())?;

        let second = f64::from(dt.second()) + f64::from(dt.millisecond()) / 1000.0;

        payload.write_i32(i32::from(dt.day()));
        payload.write_i32(i32::from(dt.month()));
        payload.write_i32(i32::from(dt.year()));
        payload.write_i32(i32::from(dt.hour()));
        payload.write_i32(i32::from(dt.minute()));
        payload.write_real("second", second)?;
        // Already normalized to UTC.
        payload.write_i32(0);
        payload.write_i32(self.time_mode.code());
        Ok(())
    }
}
