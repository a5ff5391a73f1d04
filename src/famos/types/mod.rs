//! Foundational data structures, error types, and key type definitions.

pub mod enums;
pub mod error;
pub mod key_type;

use std::cell::RefCell;
use std::rc::Rc;

/// A context object referenced by several components at once.
///
/// Axis scalings and trigger times apply to every component that follows
/// them in the key stream, so components hold handles instead of copies.
/// Mutating through one handle is visible through all of them.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps a value in a new [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Copies the value behind a handle into a new, unaliased handle.
pub fn detach<T: Clone>(handle: &Shared<T>) -> Shared<T> {
    shared(handle.borrow().clone())
}
