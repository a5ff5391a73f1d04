//! Core FAMOS key-stream module
//!
//! A FAMOS file is a flat sequence of keys, each introduced by a two
//! character tag. This module is split into:
//!
//! - [`types`]: errors, key tags, enumerations and shared handles
//! - [`codec`]: the key header protocol and field encoding
//! - [`keys`]: one codec per key type
//! - [`format`]: dispatchers that rebuild groups and data fields from the
//!   flat stream

pub mod codec;
pub mod format;
pub mod keys;
pub mod types;

pub use codec::code_page::CodePage;
pub use codec::reader::{KeyHeader, KeyReader};
pub use codec::writer::KeyWriter;
pub use codec::Key;
pub use types::error::{FamosError, Result};
pub use types::key_type::KeyType;
pub use types::{detach, shared, Shared};
