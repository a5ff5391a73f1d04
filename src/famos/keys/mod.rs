//! Entity codecs, one per key type.
//!
//! Every key type has a codec here implementing [`Key`](crate::famos::codec::Key): it knows its
//! tag, the versions it reads and writes, and the layout of its payload.
//! How keys combine into groups and data fields is decided by the
//! dispatchers in [`format`](crate::famos::format).

pub mod calibration;
pub mod component;
pub mod data_field;
pub mod group;
pub mod grouped;
pub mod key_group;
pub mod property;
pub mod raw;
pub mod scaling;
pub mod trigger_time;
