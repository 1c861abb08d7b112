//! Packing of generic netlists into Borca cells.
//!
//! The input [`Netlist`] holds technology-independent cells (`LUT4`,
//! `DFFER`, `GND`/`VCC` drivers and `$nextpnr_*buf` IO buffers). The passes
//! in [`pack`] rewrite them into the cell types the Borca architecture
//! places: `CLB` logic blocks and `DFFER` virtual IO registers.

#![warn(missing_docs)]

pub mod cells;
pub mod error;
pub mod netlist;
pub mod pack;

pub use cells::{create_clb, create_dff_cell, dff_to_lc, lut_to_lc, replace_port, vio_to_dff};
pub use error::{PackError, PackResult};
pub use netlist::{Cell, Net, Netlist, Port, PortDirection, PortRef};
pub use pack::{pack, PackStages, PackSummary};
