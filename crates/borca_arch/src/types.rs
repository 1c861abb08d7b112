//! Declaration records submitted to an architecture context.
//!
//! Each record is built once by a generator, handed to
//! [`ArchContext`](crate::ArchContext), and never mutated afterwards.

use borca_common::{Ident, Loc};
use serde::{Deserialize, Serialize};

/// A timing delay with min/typical/max corners, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delay {
    /// Minimum delay in nanoseconds (fast corner).
    pub min_ns: f64,
    /// Typical delay in nanoseconds (nominal corner).
    pub typ_ns: f64,
    /// Maximum delay in nanoseconds (slow corner).
    pub max_ns: f64,
}

impl Delay {
    /// A zero delay.
    pub const ZERO: Self = Self {
        min_ns: 0.0,
        typ_ns: 0.0,
        max_ns: 0.0,
    };

    /// Creates a new delay with the given min/typ/max values.
    pub fn new(min_ns: f64, typ_ns: f64, max_ns: f64) -> Self {
        Self {
            min_ns,
            typ_ns,
            max_ns,
        }
    }

    /// Creates a delay that is `ns` at every corner.
    pub fn from_ns(ns: f64) -> Self {
        Self::new(ns, ns, ns)
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Direction of a bel pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    /// Driven by the routing fabric.
    Input,
    /// Drives the routing fabric.
    Output,
    /// Both.
    Inout,
}

/// A routing or bel-pin wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDecl {
    /// Unique wire name.
    pub name: Ident,
    /// Wire type tag (e.g. `BEL_INPUT`).
    pub wire_type: Ident,
    /// Tile column.
    pub x: u32,
    /// Tile row.
    pub y: u32,
}

/// A programmable interconnect point between two wires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipDecl {
    /// Unique pip name.
    pub name: Ident,
    /// Pip type tag (e.g. `sq_usb_str_v`).
    pub pip_type: Ident,
    /// Driving wire.
    pub src_wire: Ident,
    /// Driven wire.
    pub dst_wire: Ident,
    /// Propagation delay when the pip is enabled.
    pub delay: Delay,
    /// Grid location of the pip.
    pub loc: Loc,
}

/// A basic element of logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BelDecl {
    /// Unique bel name.
    pub name: Ident,
    /// Bel type tag (e.g. `LUT4`).
    pub bel_type: Ident,
    /// Grid location; `z` is the slot in the tile.
    pub loc: Loc,
    /// Whether the bel is a global buffer.
    pub global_buffer: bool,
}

/// The attachment of a bel pin to a wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BelPinDecl {
    /// Bel the pin belongs to.
    pub bel: Ident,
    /// Pin name (e.g. `I0`).
    pub pin: Ident,
    /// Wire the pin connects to.
    pub wire: Ident,
    /// Pin direction.
    pub direction: PinDirection,
}
