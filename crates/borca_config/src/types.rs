//! Configuration types deserialized from `borca.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `borca.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorcaConfig {
    /// Grid and logic-tile settings.
    #[serde(default)]
    pub arch: ArchConfig,
    /// Switch-box topology and pip delay.
    #[serde(default)]
    pub switchbox: SwitchBoxConfig,
    /// Which packing passes run.
    #[serde(default)]
    pub pack: PackConfig,
    /// FASM parameter table overrides.
    #[serde(default)]
    pub bitstream: BitstreamConfig,
}

/// Device grid settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchConfig {
    /// Number of LUT inputs.
    pub lut_k: u32,
    /// Number of tile columns.
    pub grid_x: u32,
    /// Number of tile rows.
    pub grid_y: u32,
}

impl Default for ArchConfig {
    fn default() -> Self {
        Self {
            lut_k: 4,
            grid_x: 8,
            grid_y: 8,
        }
    }
}

/// Shape of the per-tile switch box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchBoxShape {
    /// Square universal switch box: all four sides carry the same wire count.
    #[default]
    Square,
    /// Rectangular universal switch box: north/south and east/west counts may differ.
    Rectangular,
}

/// Switch-box settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchBoxConfig {
    /// Topology of the box.
    pub kind: SwitchBoxShape,
    /// Wires on each of the north and south sides (all sides for a square box).
    pub wires_per_side: u32,
    /// Wires on the east and west sides of a rectangular box.
    /// Defaults to `wires_per_side`.
    pub horizontal_wires_per_side: Option<u32>,
    /// Propagation delay of every switch-box pip, in nanoseconds.
    pub pip_delay_ns: f64,
}

impl SwitchBoxConfig {
    /// Returns the wire count of the east and west sides.
    pub fn horizontal_wires(&self) -> u32 {
        self.horizontal_wires_per_side.unwrap_or(self.wires_per_side)
    }
}

impl Default for SwitchBoxConfig {
    fn default() -> Self {
        Self {
            kind: SwitchBoxShape::Square,
            wires_per_side: 4,
            horizontal_wires_per_side: None,
            pip_delay_ns: 0.05,
        }
    }
}

/// Packing pass selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Replace GND/VCC driver cells with constant CLBs.
    pub constants: bool,
    /// Pack LUT4 cells into CLBs.
    pub luts: bool,
    /// Pack DFFER cells into CLBs.
    pub ffs: bool,
    /// Turn non-clock IO buffers into DFFER cells.
    pub virtual_io: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            constants: false,
            luts: false,
            ffs: false,
            virtual_io: true,
        }
    }
}

/// Bitstream parameter table settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BitstreamConfig {
    /// Explicit parameter directives. When empty the stock Borca table is used.
    pub params: Vec<ParamEntry>,
}

/// One `[[bitstream.params]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamEntry {
    /// Cell type the parameter belongs to (e.g. `BORCA_SLICE`).
    pub cell_type: String,
    /// Parameter name (e.g. `INIT`).
    pub parameter: String,
    /// Whether the FASM writer emits the parameter at all.
    pub write: bool,
    /// Whether the value is written as a binary number rather than a flag.
    #[serde(default)]
    pub numeric: bool,
    /// Bit width of a numeric value.
    #[serde(default)]
    pub width: Option<u32>,
}
