//! FASM parameter directives for the Borca FPGA.
//!
//! The external FASM writer asks, for every cell parameter it meets, whether
//! to write it and how. [`ParamMap`] answers with a [`ParameterConfig`] keyed
//! by `(cell type, parameter)`. The stock table comes from
//! [`ParamMap::borca_default`]; `[[bitstream.params]]` in `borca.toml`
//! replaces it.

#![warn(missing_docs)]

pub mod params;

pub use params::{ParamError, ParamKey, ParamMap, ParameterConfig};
