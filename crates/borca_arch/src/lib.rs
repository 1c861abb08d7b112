//! Architecture declarations for the Borca FPGA.
//!
//! Generators in this crate describe the device to an external
//! place-and-route framework through the [`ArchContext`] trait: the
//! universal switch box ([`build_switch_box`]), the logic tile
//! ([`build_tile`]) and the whole grid ([`build_grid`]).
//! [`DeclRecorder`] is an in-memory context that checks and keeps every
//! declaration.
//!
//! # Usage
//!
//! ```
//! use borca_arch::{build_switch_box, expected_pip_count, ArchContext, DeclRecorder, SwitchBox, WireDecl};
//!
//! let mut ctx = DeclRecorder::new();
//! let mut side = |tag: &str| -> Vec<_> {
//!     (0..2)
//!         .map(|i| {
//!             let name = ctx.id(&format!("{tag}{i}"));
//!             let wire_type = ctx.id("ROUTING");
//!             ctx.add_wire(WireDecl { name, wire_type, x: 0, y: 0 }).unwrap();
//!             name
//!         })
//!         .collect()
//! };
//! let (n, e, s, w) = (side("N"), side("E"), side("S"), side("W"));
//! let sb = SwitchBox::square(0, 0, n, e, s, w);
//! let delay = ctx.delay_from_ns(0.05);
//! assert_eq!(build_switch_box(&mut ctx, &sb, delay).unwrap(), expected_pip_count(2));
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod grid;
pub mod recorder;
pub mod switchbox;
pub mod tile;
pub mod types;

pub use context::ArchContext;
pub use error::{ArchError, ArchResult};
pub use grid::{build_grid, GridSummary};
pub use recorder::{ArchDump, DeclCounts, DeclRecorder, PipDump};
pub use switchbox::{
    build_switch_box, expected_pip_count, plan_pips, PipClass, SwitchBox, SwitchBoxKind,
};
pub use tile::{build_tile, BelKind, TileCounts, BELS_PER_TILE};
pub use types::{BelDecl, BelPinDecl, Delay, PinDirection, PipDecl, WireDecl};
