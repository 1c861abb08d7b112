//! Borca logic tile: bels and their pin wires.

use crate::context::ArchContext;
use crate::error::ArchResult;
use crate::types::{BelDecl, BelPinDecl, PinDirection, WireDecl};
use borca_common::Loc;
use serde::{Deserialize, Serialize};

/// Number of LUT4 slots in a tile.
pub const LUTS_PER_TILE: u32 = 8;
/// Number of DFFER slots in a tile.
pub const FFS_PER_TILE: u32 = 8;
/// Number of MUX slots in a tile.
pub const MUXES_PER_TILE: u32 = 3;
/// Total bel slots in a tile.
pub const BELS_PER_TILE: u32 = LUTS_PER_TILE + FFS_PER_TILE + MUXES_PER_TILE + 1;

/// Wire type tag for pins driven by routing.
pub const BEL_INPUT: &str = "BEL_INPUT";
/// Wire type tag for pins driving routing.
pub const BEL_OUTPUT: &str = "BEL_OUTPUT";

/// Kind of bel occupying a tile slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BelKind {
    /// Four-input lookup table.
    Lut4,
    /// D flip-flop with enable and reset.
    Dffer,
    /// Two-input multiplexer.
    Mux,
    /// Four-bit carry chain.
    Carry4,
}

impl BelKind {
    /// Bel type name.
    pub fn type_name(self) -> &'static str {
        match self {
            BelKind::Lut4 => "LUT4",
            BelKind::Dffer => "DFFER",
            BelKind::Mux => "MUX",
            BelKind::Carry4 => "CARRY4",
        }
    }

    /// Input pin names.
    pub fn inputs(self) -> &'static [&'static str] {
        match self {
            BelKind::Lut4 => &["I0", "I1", "I2", "I3"],
            BelKind::Dffer => &["D", "CLK", "CE", "RST"],
            BelKind::Mux => &["I0", "I1", "SEL"],
            BelKind::Carry4 => &["CI", "G0", "G1", "G2", "G3", "P0", "P1", "P2", "P3"],
        }
    }

    /// Output pin names.
    pub fn outputs(self) -> &'static [&'static str] {
        match self {
            BelKind::Lut4 | BelKind::Mux => &["O"],
            BelKind::Dffer => &["Q"],
            BelKind::Carry4 => &["CO", "S0", "S1", "S2", "S3"],
        }
    }

    /// Kind of the bel at slot `z`, or `None` past the last slot.
    pub fn for_slot(z: u32) -> Option<BelKind> {
        match z {
            z if z < LUTS_PER_TILE => Some(BelKind::Lut4),
            z if z < LUTS_PER_TILE + FFS_PER_TILE => Some(BelKind::Dffer),
            z if z < LUTS_PER_TILE + FFS_PER_TILE + MUXES_PER_TILE => Some(BelKind::Mux),
            z if z < BELS_PER_TILE => Some(BelKind::Carry4),
            _ => None,
        }
    }
}

/// Name of the wire behind a bel pin.
pub fn pin_wire_name(loc: Loc, pin: &str) -> String {
    format!("X{}Y{}Z{}_{pin}", loc.x, loc.y, loc.z)
}

/// Name of a bel.
pub fn bel_name(loc: Loc, kind: BelKind) -> String {
    format!("X{}Y{}Z{}_{}_BEL", loc.x, loc.y, loc.z, kind.type_name())
}

/// Declarations made for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileCounts {
    /// Bels declared.
    pub bels: usize,
    /// Pin wires declared.
    pub wires: usize,
}

/// Declares every bel of tile `(x, y)` together with its pin wires.
pub fn build_tile<C: ArchContext + ?Sized>(ctx: &mut C, x: u32, y: u32) -> ArchResult<TileCounts> {
    let mut counts = TileCounts::default();
    let input_type = ctx.id(BEL_INPUT);
    let output_type = ctx.id(BEL_OUTPUT);

    for z in 0..BELS_PER_TILE {
        let Some(kind) = BelKind::for_slot(z) else {
            break;
        };
        let loc = Loc::new(x, y, z);
        let bel = ctx.id(&bel_name(loc, kind));
        let bel_type = ctx.id(kind.type_name());
        ctx.add_bel(BelDecl {
            name: bel,
            bel_type,
            loc,
            global_buffer: false,
        })?;
        counts.bels += 1;

        let pins = kind
            .inputs()
            .iter()
            .map(|p| (p, input_type, PinDirection::Input))
            .chain(
                kind.outputs()
                    .iter()
                    .map(|p| (p, output_type, PinDirection::Output)),
            );
        for (pin, wire_type, direction) in pins {
            let wire = ctx.id(&pin_wire_name(loc, pin));
            let pin = ctx.id(pin);
            ctx.add_wire(WireDecl {
                name: wire,
                wire_type,
                x,
                y,
            })?;
            ctx.add_bel_pin(BelPinDecl {
                bel,
                pin,
                wire,
                direction,
            })?;
            counts.wires += 1;
        }
    }
    Ok(counts)
}
