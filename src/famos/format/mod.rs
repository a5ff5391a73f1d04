//! Structural parsing layer.
//!
//! Keys carry no explicit nesting: a data field is a `CG` key followed by
//! the keys of its components, and a scaling applies to every component
//! that comes after it. The dispatchers in this module rebuild that
//! structure from the flat key stream.
//!
//! # Grammar
//!
//! ```text
//! groups     := ( CB Np? | CT | CI | CN | unknown )*
//! fields     := ( CG field-body | unknown )*
//! field-body := ( CD | CZ | NT | CC component-body | unknown )*
//! component-body := ( CR | Np | CP | Cb | ND | unknown )*
//! ```
//!
//! Each level stops at the first key it does not own, pushes the tag back
//! and returns, leaving that key to the caller. Unknown keys are skipped at
//! every level.

pub mod component;
pub mod fields;
pub mod groups;

use crate::famos::codec::reader::KeyHeader;
use crate::famos::types::key_type::KeyType;

/// Outcome of offering the next key to one grammar level.
#[derive(Debug)]
pub enum Dispatch<T> {
    /// The key belongs to this level and was decoded.
    Consumed(T),
    /// The key type is unknown and its bytes were skipped.
    Skipped(KeyHeader),
    /// The key belongs to an outer level. Its tag has been pushed back.
    NotMine(KeyType),
    /// No keys remain.
    EndOfStream,
}
