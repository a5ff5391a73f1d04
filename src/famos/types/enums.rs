//! Enumerations stored as integer codes inside key payloads.

use bitflags::bitflags;

use super::error::{FamosError, Result};

/// Layout of the components of a data field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFieldType {
    /// One or more y-components sharing an equidistant time axis.
    #[default]
    MultipleYToSingleEquidistantTime,
    /// Y-components sharing a monotonous time component.
    MultipleYToSingleMonotonousTime,
    /// Y-components sharing an x-component (or vice versa).
    MultipleYToSingleXOrViceVersa,
    /// Complex data as real and imaginary part.
    ComplexRealImaginary,
    /// Complex data as magnitude and phase.
    ComplexMagnitudePhase,
    /// Complex data as magnitude in dB and phase.
    ComplexMagnitudeDBPhase,
}

impl DataFieldType {
    pub fn code(&self) -> i32 {
        match self {
            Self::MultipleYToSingleEquidistantTime => 1,
            Self::MultipleYToSingleMonotonousTime => 2,
            Self::MultipleYToSingleXOrViceVersa => 3,
            Self::ComplexRealImaginary => 4,
            Self::ComplexMagnitudePhase => 5,
            Self::ComplexMagnitudeDBPhase => 6,
        }
    }

    /// Number of dimensions implied by the field type.
    pub fn dimension(&self) -> i32 {
        match self {
            Self::MultipleYToSingleEquidistantTime => 1,
            _ => 2,
        }
    }
}

impl TryFrom<i32> for DataFieldType {
    type Error = FamosError;
    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Self::MultipleYToSingleEquidistantTime),
            2 => Ok(Self::MultipleYToSingleMonotonousTime),
            3 => Ok(Self::MultipleYToSingleXOrViceVersa),
            4 => Ok(Self::ComplexRealImaginary),
            5 => Ok(Self::ComplexMagnitudePhase),
            6 => Ok(Self::ComplexMagnitudeDBPhase),
            _ => Err(FamosError::InvalidFormat(format!("Unknown data field type: {}", value))),
        }
    }
}

/// How the trigger time relates to wall clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeMode {
    #[default]
    Unknown,
    Normal,
    Summer,
}

impl TimeMode {
    pub fn code(&self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Normal => 1,
            Self::Summer => 2,
        }
    }
}

impl TryFrom<i32> for TimeMode {
    type Error = FamosError;
    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Normal),
            2 => Ok(Self::Summer),
            _ => Err(FamosError::InvalidFormat(format!("Unknown time mode: {}", value))),
        }
    }
}

/// Declared type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Integer,
    Real,
    /// Seconds since 1980-01-01 00:00:00.
    TimeStampInDMFormat,
    Enumeration,
    Boolean,
}

impl PropertyType {
    pub fn code(&self) -> i32 {
        match self {
            Self::String => 0,
            Self::Integer => 1,
            Self::Real => 2,
            Self::TimeStampInDMFormat => 3,
            Self::Enumeration => 4,
            Self::Boolean => 5,
        }
    }
}

impl TryFrom<i32> for PropertyType {
    type Error = FamosError;
    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::String),
            1 => Ok(Self::Integer),
            2 => Ok(Self::Real),
            3 => Ok(Self::TimeStampInDMFormat),
            4 => Ok(Self::Enumeration),
            5 => Ok(Self::Boolean),
            _ => Err(FamosError::InvalidFormat(format!("Invalid property type. Got type '{}'.", value))),
        }
    }
}

bitflags! {
    /// Flags attached to a property.
    ///
    /// Bits without a named constant are retained as read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PropertyFlags: u32 {
        /// The property should not be edited by the user.
        const READ_ONLY = 0b0001;
        /// The property should not be displayed.
        const HIDDEN = 0b0010;
    }
}

/// Whether a component carries analog or digital data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalogDigital {
    #[default]
    Analog,
    Digital,
}

impl AnalogDigital {
    pub fn code(&self) -> i32 {
        match self {
            Self::Analog => 1,
            Self::Digital => 2,
        }
    }
}

impl TryFrom<i32> for AnalogDigital {
    type Error = FamosError;
    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Self::Analog),
            2 => Ok(Self::Digital),
            _ => Err(FamosError::OutOfRange {
                field: "analog/digital",
                expected: "'1..2'",
                actual: value.to_string(),
            }),
        }
    }
}

/// Numeric type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    #[default]
    Float64,
    ImcDevicesTransitionalRecording,
    AsciiTimeStamp,
    Digital16Bit,
    UInt48,
}

impl DataType {
    pub fn code(&self) -> i32 {
        match self {
            Self::UInt8 => 1,
            Self::Int8 => 2,
            Self::UInt16 => 3,
            Self::Int16 => 4,
            Self::UInt32 => 5,
            Self::Int32 => 6,
            Self::Float32 => 7,
            Self::Float64 => 8,
            Self::ImcDevicesTransitionalRecording => 9,
            Self::AsciiTimeStamp => 10,
            Self::Digital16Bit => 11,
            Self::UInt48 => 13,
        }
    }
}

impl TryFrom<i32> for DataType {
    type Error = FamosError;
    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Self::UInt8),
            2 => Ok(Self::Int8),
            3 => Ok(Self::UInt16),
            4 => Ok(Self::Int16),
            5 => Ok(Self::UInt32),
            6 => Ok(Self::Int32),
            7 => Ok(Self::Float32),
            8 => Ok(Self::Float64),
            9 => Ok(Self::ImcDevicesTransitionalRecording),
            10 => Ok(Self::AsciiTimeStamp),
            11 => Ok(Self::Digital16Bit),
            13 => Ok(Self::UInt48),
            _ => Err(FamosError::InvalidFormat(format!("Unknown data type: {}", value))),
        }
    }
}
