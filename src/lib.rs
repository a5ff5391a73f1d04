//! # famos-file
//!
//! Reading and writing the key stream of IMC FAMOS (`.dat`/`.raw`) files.
//!
//! Every key is framed as `|XX,version,length,payload;`. The
//! [`KeyReader`] and [`KeyWriter`] handle that framing, the types in
//! [`famos::keys`] encode individual keys, and [`famos::format`] groups
//! keys back into groups, data fields and components.
//!
//! **Note:** Measurement data itself (`CS` keys) is not decoded.
pub mod famos;

// Re-export the main types for convenience
pub use famos::{
    CodePage, FamosError, Key, KeyHeader, KeyReader, KeyType, KeyWriter, Result, Shared,
    format::{
        fields::{read_data_field, read_data_fields, write_data_field, write_data_fields},
        groups::{read_groups, write_groups, GroupSection},
        Dispatch,
    },
    keys::{
        calibration::Calibration,
        component::Component,
        data_field::{DataField, DataFieldHeader},
        group::Group,
        grouped::{ChannelInfo, SingleValue, Text},
        key_group::KeyGroup,
        property::{Property, PropertyInfo},
        raw::RawKey,
        scaling::{XAxisScaling, ZAxisScaling},
        trigger_time::TriggerTime,
    },
    types::enums::{AnalogDigital, DataFieldType, DataType, PropertyFlags, PropertyType, TimeMode},
};
pub use rust_decimal::Decimal;
