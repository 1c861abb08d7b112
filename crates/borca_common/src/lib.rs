//! Shared foundational types used across the Borca architecture toolkit.
//!
//! This crate provides interned identifiers, grid locations and cell
//! parameter values.

#![warn(missing_docs)]

pub mod ident;
pub mod loc;
pub mod property;

pub use ident::{Ident, Interner};
pub use loc::Loc;
pub use property::Property;
