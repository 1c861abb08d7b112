//! Universal switch-box pip generation.
//!
//! A square universal switch box connects four equal-length wire lists. Wires
//! are processed in pairs `(i, i + 1)`; each pair yields 24 pips in six type
//! classes, and a lone trailing wire yields 12. The north-east and south-west
//! turns of a pair are cross-coupled (`n[i] -> e[i+1]`, `n[i+1] -> e[i]`),
//! while north-west and south-east turns keep the same index.

use crate::context::ArchContext;
use crate::error::{ArchError, ArchResult};
use crate::types::{Delay, PipDecl};
use borca_common::{Ident, Loc};
use borca_config::SwitchBoxShape;
use serde::{Deserialize, Serialize};
use PipClass::*;
use Side::*;

/// Pips emitted for one pair of wire indices.
pub const PIPS_PER_PAIR: usize = 24;

/// Pips emitted for a lone trailing wire index.
pub const PIPS_PER_SINGLE: usize = 12;

/// A compass side of a switch box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// North.
    North,
    /// East.
    East,
    /// South.
    South,
    /// West.
    West,
}

/// Type class of a switch-box pip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipClass {
    /// North to south and back.
    StraightV,
    /// East to west and back.
    StraightH,
    /// North/east turn.
    NorthEast,
    /// South/west turn.
    SouthWest,
    /// North/west turn.
    NorthWest,
    /// South/east turn.
    SouthEast,
}

impl PipClass {
    /// Every class in emission order.
    pub const ALL: [PipClass; 6] = [
        PipClass::StraightV,
        PipClass::StraightH,
        PipClass::NorthEast,
        PipClass::SouthWest,
        PipClass::NorthWest,
        PipClass::SouthEast,
    ];

    /// Suffix appended to the box type to form the pip type tag.
    pub fn suffix(self) -> &'static str {
        match self {
            PipClass::StraightV => "str_v",
            PipClass::StraightH => "str_h",
            PipClass::NorthEast => "ne",
            PipClass::SouthWest => "sw",
            PipClass::NorthWest => "nw",
            PipClass::SouthEast => "se",
        }
    }
}

/// Topology of a switch box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SwitchBoxKind {
    /// Four equal-length sides.
    #[default]
    Square,
    /// Equal north/south and equal east/west lengths.
    Rectangular,
}

impl SwitchBoxKind {
    /// Box type tag used in box and pip-type names.
    pub fn type_prefix(self) -> &'static str {
        match self {
            SwitchBoxKind::Square => "sq_usb",
            SwitchBoxKind::Rectangular => "rect_usb",
        }
    }
}

impl From<SwitchBoxShape> for SwitchBoxKind {
    fn from(shape: SwitchBoxShape) -> Self {
        match shape {
            SwitchBoxShape::Square => SwitchBoxKind::Square,
            SwitchBoxShape::Rectangular => SwitchBoxKind::Rectangular,
        }
    }
}

/// One switch box: its tile position and the wires on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchBox {
    /// Tile column.
    pub x: u32,
    /// Tile row.
    pub y: u32,
    /// Topology.
    pub kind: SwitchBoxKind,
    /// North-side wires.
    pub north: Vec<Ident>,
    /// East-side wires.
    pub east: Vec<Ident>,
    /// South-side wires.
    pub south: Vec<Ident>,
    /// West-side wires.
    pub west: Vec<Ident>,
}

impl SwitchBox {
    /// Creates a square box.
    pub fn square(
        x: u32,
        y: u32,
        north: Vec<Ident>,
        east: Vec<Ident>,
        south: Vec<Ident>,
        west: Vec<Ident>,
    ) -> Self {
        Self {
            x,
            y,
            kind: SwitchBoxKind::Square,
            north,
            east,
            south,
            west,
        }
    }

    /// Box name, e.g. `sq_usb_x1y2`.
    pub fn name(&self) -> String {
        format!("{}_x{}y{}", self.kind.type_prefix(), self.x, self.y)
    }

    fn side(&self, side: Side) -> &[Ident] {
        match side {
            Side::North => &self.north,
            Side::East => &self.east,
            Side::South => &self.south,
            Side::West => &self.west,
        }
    }

    fn mismatch(&self) -> ArchError {
        ArchError::WireCountMismatch {
            name: self.name(),
            north: self.north.len(),
            east: self.east.len(),
            south: self.south.len(),
            west: self.west.len(),
        }
    }

    /// Checks side lengths for the box kind and returns the wire count.
    pub fn validate(&self) -> ArchResult<usize> {
        let n = self.north.len();
        match self.kind {
            SwitchBoxKind::Square => {
                if self.east.len() != n || self.south.len() != n || self.west.len() != n {
                    return Err(self.mismatch());
                }
                Ok(n)
            }
            SwitchBoxKind::Rectangular => {
                if self.south.len() != n || self.west.len() != self.east.len() {
                    return Err(self.mismatch());
                }
                Err(ArchError::NotImplemented(format!(
                    "rectangular switch box {}",
                    self.name()
                )))
            }
        }
    }
}

struct PipTemplate {
    dir: &'static str,
    class: PipClass,
    src: (Side, usize),
    dst: (Side, usize),
    name_offset: usize,
}

const fn t(
    dir: &'static str,
    class: PipClass,
    src: (Side, usize),
    dst: (Side, usize),
    name_offset: usize,
) -> PipTemplate {
    PipTemplate {
        dir,
        class,
        src,
        dst,
        name_offset,
    }
}

/// Pips of a pair rooted at index `i`, offsets relative to `i`.
const PAIR_TEMPLATES: [PipTemplate; PIPS_PER_PAIR] = [
    t("ns", StraightV, (North, 0), (South, 0), 0),
    t("sn", StraightV, (South, 0), (North, 0), 0),
    t("ns", StraightV, (North, 1), (South, 1), 1),
    t("sn", StraightV, (South, 1), (North, 1), 1),
    t("ew", StraightH, (East, 0), (West, 0), 0),
    t("we", StraightH, (West, 0), (East, 0), 0),
    t("ew", StraightH, (East, 1), (West, 1), 1),
    t("we", StraightH, (West, 1), (East, 1), 1),
    t("ne", NorthEast, (North, 0), (East, 1), 0),
    t("en", NorthEast, (East, 1), (North, 0), 0),
    t("ne", NorthEast, (North, 1), (East, 0), 1),
    t("en", NorthEast, (East, 0), (North, 1), 1),
    t("sw", SouthWest, (South, 0), (West, 1), 0),
    t("ws", SouthWest, (West, 1), (South, 0), 0),
    t("sw", SouthWest, (South, 1), (West, 0), 1),
    t("ws", SouthWest, (West, 0), (South, 1), 1),
    t("nw", NorthWest, (North, 0), (West, 0), 0),
    t("wn", NorthWest, (West, 0), (North, 0), 0),
    t("nw", NorthWest, (North, 1), (West, 1), 1),
    t("wn", NorthWest, (West, 1), (North, 1), 1),
    t("se", SouthEast, (South, 0), (East, 0), 0),
    t("es", SouthEast, (East, 0), (South, 0), 0),
    t("se", SouthEast, (South, 1), (East, 1), 1),
    t("es", SouthEast, (East, 1), (South, 1), 1),
];

/// Number of pips a square box with `n` wires per side produces.
pub fn expected_pip_count(n: usize) -> usize {
    PIPS_PER_PAIR * (n / 2) + PIPS_PER_SINGLE * (n % 2)
}

/// Enumerates every pip of `sb` without submitting anything.
///
/// Returns an error, and no pips, when the side lengths are invalid for the
/// box kind or the kind has no defined topology.
pub fn plan_pips<C: ArchContext + ?Sized>(
    ctx: &C,
    sb: &SwitchBox,
    delay: Delay,
) -> ArchResult<Vec<PipDecl>> {
    let n = sb.validate()?;
    let box_name = sb.name();
    let prefix = sb.kind.type_prefix();
    let loc = Loc::new(sb.x, sb.y, 0);

    let type_tags = PipClass::ALL.map(|c| ctx.id(&format!("{prefix}_{}", c.suffix())));

    let mut pips = Vec::with_capacity(expected_pip_count(n));
    let mut emit = |tpl: &PipTemplate, base: usize, single: bool| {
        let (src_off, dst_off, name_off) = if single {
            (0, 0, 0)
        } else {
            (tpl.src.1, tpl.dst.1, tpl.name_offset)
        };
        pips.push(PipDecl {
            name: ctx.id(&format!("{box_name}{}{}", tpl.dir, base + name_off)),
            pip_type: type_tags[tpl.class as usize],
            src_wire: sb.side(tpl.src.0)[base + src_off],
            dst_wire: sb.side(tpl.dst.0)[base + dst_off],
            delay,
            loc,
        });
    };

    let mut i = 0;
    while i + 1 < n {
        for tpl in &PAIR_TEMPLATES {
            emit(tpl, i, false);
        }
        i += 2;
    }
    if i < n {
        for tpl in PAIR_TEMPLATES.iter().filter(|t| t.name_offset == 0) {
            emit(tpl, i, true);
        }
    }
    Ok(pips)
}

/// Validates `sb`, then declares all of its pips through `ctx`.
///
/// Returns the number of pips declared. Validation failures leave the
/// context untouched.
pub fn build_switch_box<C: ArchContext + ?Sized>(
    ctx: &mut C,
    sb: &SwitchBox,
    delay: Delay,
) -> ArchResult<usize> {
    let pips = plan_pips(ctx, sb, delay)?;
    let count = pips.len();
    for pip in pips {
        ctx.add_pip(pip)?;
    }
    Ok(count)
}
