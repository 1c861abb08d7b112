//! In-memory [`ArchContext`] that records and checks every declaration.

use crate::context::ArchContext;
use crate::error::{ArchError, ArchResult};
use crate::types::{BelDecl, BelPinDecl, PinDirection, PipDecl, WireDecl};
use borca_common::{Ident, Interner, Loc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct WireEntry {
    index: usize,
    downhill: Vec<usize>,
    uphill: Vec<usize>,
    bel_pins: Vec<usize>,
}

/// Records declarations in submission order and enforces the same rules a
/// real context does: unique names, one bel per location, pips and pins only
/// on declared wires.
#[derive(Debug, Default)]
pub struct DeclRecorder {
    interner: Interner,
    wires: Vec<WireDecl>,
    pips: Vec<PipDecl>,
    bels: Vec<BelDecl>,
    bel_pins: Vec<BelPinDecl>,
    wire_index: HashMap<Ident, WireEntry>,
    pip_index: HashMap<Ident, usize>,
    bel_index: HashMap<Ident, usize>,
    bel_by_loc: HashMap<Loc, Ident>,
    pin_names: HashSet<(Ident, Ident)>,
    grid_dims: (u32, u32),
}

/// Object counts of a recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeclCounts {
    /// Declared wires.
    pub wires: usize,
    /// Declared pips.
    pub pips: usize,
    /// Declared bels.
    pub bels: usize,
    /// Declared bel pins.
    pub bel_pins: usize,
}

impl DeclRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the interner backing this recorder's names.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// All wires in declaration order.
    pub fn wires(&self) -> &[WireDecl] {
        &self.wires
    }

    /// All pips in declaration order.
    pub fn pips(&self) -> &[PipDecl] {
        &self.pips
    }

    /// All bels in declaration order.
    pub fn bels(&self) -> &[BelDecl] {
        &self.bels
    }

    /// All bel pins in declaration order.
    pub fn bel_pins(&self) -> &[BelPinDecl] {
        &self.bel_pins
    }

    /// Looks up a wire by name.
    pub fn wire(&self, name: &str) -> Option<&WireDecl> {
        let id = self.interner.get(name)?;
        self.wire_index.get(&id).map(|e| &self.wires[e.index])
    }

    /// Looks up a pip by name.
    pub fn pip(&self, name: &str) -> Option<&PipDecl> {
        let id = self.interner.get(name)?;
        self.pip_index.get(&id).map(|&i| &self.pips[i])
    }

    /// Looks up a bel by name.
    pub fn bel(&self, name: &str) -> Option<&BelDecl> {
        let id = self.interner.get(name)?;
        self.bel_index.get(&id).map(|&i| &self.bels[i])
    }

    /// Returns the bel at `loc`, if any.
    pub fn bel_at(&self, loc: Loc) -> Option<&BelDecl> {
        let name = self.bel_by_loc.get(&loc)?;
        self.bel_index.get(name).map(|&i| &self.bels[i])
    }

    /// Pips driven by `wire`.
    pub fn pips_downhill(&self, wire: Ident) -> impl Iterator<Item = &PipDecl> {
        self.wire_index
            .get(&wire)
            .into_iter()
            .flat_map(|e| e.downhill.iter().map(|&i| &self.pips[i]))
    }

    /// Pips driving `wire`.
    pub fn pips_uphill(&self, wire: Ident) -> impl Iterator<Item = &PipDecl> {
        self.wire_index
            .get(&wire)
            .into_iter()
            .flat_map(|e| e.uphill.iter().map(|&i| &self.pips[i]))
    }

    /// Bel pins attached to `wire`.
    pub fn wire_bel_pins(&self, wire: Ident) -> impl Iterator<Item = &BelPinDecl> {
        self.wire_index
            .get(&wire)
            .into_iter()
            .flat_map(|e| e.bel_pins.iter().map(|&i| &self.bel_pins[i]))
    }

    /// Grid size spanned by declared bels and pips, as (columns, rows).
    pub fn grid_dims(&self) -> (u32, u32) {
        self.grid_dims
    }

    /// Returns object counts.
    pub fn counts(&self) -> DeclCounts {
        DeclCounts {
            wires: self.wires.len(),
            pips: self.pips.len(),
            bels: self.bels.len(),
            bel_pins: self.bel_pins.len(),
        }
    }

    /// Resolves every declaration to strings for serialization.
    pub fn dump(&self) -> ArchDump {
        let name = |id: Ident| self.interner.resolve(id).to_string();
        ArchDump {
            wires: self
                .wires
                .iter()
                .map(|w| WireDump {
                    name: name(w.name),
                    wire_type: name(w.wire_type),
                    x: w.x,
                    y: w.y,
                })
                .collect(),
            pips: self.pips.iter().map(|p| self.resolve_pip(p)).collect(),
            bels: self
                .bels
                .iter()
                .map(|b| BelDump {
                    name: name(b.name),
                    bel_type: name(b.bel_type),
                    loc: b.loc,
                    global_buffer: b.global_buffer,
                })
                .collect(),
            bel_pins: self
                .bel_pins
                .iter()
                .map(|p| BelPinDump {
                    bel: name(p.bel),
                    pin: name(p.pin),
                    wire: name(p.wire),
                    direction: p.direction,
                })
                .collect(),
        }
    }

    /// Resolves a single pip to strings.
    pub fn resolve_pip(&self, pip: &PipDecl) -> PipDump {
        let name = |id: Ident| self.interner.resolve(id).to_string();
        PipDump {
            name: name(pip.name),
            pip_type: name(pip.pip_type),
            src_wire: name(pip.src_wire),
            dst_wire: name(pip.dst_wire),
            delay_ns: pip.delay.typ_ns,
            loc: pip.loc,
        }
    }

    fn extend_grid(&mut self, loc: Loc) {
        self.grid_dims.0 = self.grid_dims.0.max(loc.x.saturating_add(1));
        self.grid_dims.1 = self.grid_dims.1.max(loc.y.saturating_add(1));
    }

    fn unknown_wire(&self, id: Ident) -> ArchError {
        ArchError::UnknownWire(self.interner.resolve(id).to_string())
    }
}

impl ArchContext for DeclRecorder {
    fn id(&self, name: &str) -> Ident {
        self.interner.get_or_intern(name)
    }

    fn name_of(&self, id: Ident) -> &str {
        self.interner.resolve(id)
    }

    fn add_wire(&mut self, wire: WireDecl) -> ArchResult<()> {
        if self.wire_index.contains_key(&wire.name) {
            return Err(ArchError::DuplicateWire(self.name_of(wire.name).to_string()));
        }
        let entry = WireEntry {
            index: self.wires.len(),
            ..WireEntry::default()
        };
        self.wire_index.insert(wire.name, entry);
        self.wires.push(wire);
        Ok(())
    }

    fn add_pip(&mut self, pip: PipDecl) -> ArchResult<()> {
        if self.pip_index.contains_key(&pip.name) {
            return Err(ArchError::DuplicatePip(self.name_of(pip.name).to_string()));
        }
        for wire in [pip.src_wire, pip.dst_wire] {
            if !self.wire_index.contains_key(&wire) {
                return Err(self.unknown_wire(wire));
            }
        }

        let index = self.pips.len();
        if let Some(src) = self.wire_index.get_mut(&pip.src_wire) {
            src.downhill.push(index);
        }
        if let Some(dst) = self.wire_index.get_mut(&pip.dst_wire) {
            dst.uphill.push(index);
        }
        self.pip_index.insert(pip.name, index);
        self.extend_grid(pip.loc);
        self.pips.push(pip);
        Ok(())
    }

    fn add_bel(&mut self, bel: BelDecl) -> ArchResult<()> {
        if self.bel_index.contains_key(&bel.name) {
            return Err(ArchError::DuplicateBel(self.name_of(bel.name).to_string()));
        }
        if self.bel_by_loc.contains_key(&bel.loc) {
            return Err(ArchError::OccupiedBelLoc(bel.loc));
        }
        self.bel_index.insert(bel.name, self.bels.len());
        self.bel_by_loc.insert(bel.loc, bel.name);
        self.extend_grid(bel.loc);
        self.bels.push(bel);
        Ok(())
    }

    fn add_bel_pin(&mut self, pin: BelPinDecl) -> ArchResult<()> {
        if !self.bel_index.contains_key(&pin.bel) {
            return Err(ArchError::UnknownBel(self.name_of(pin.bel).to_string()));
        }
        if !self.wire_index.contains_key(&pin.wire) {
            return Err(self.unknown_wire(pin.wire));
        }
        if !self.pin_names.insert((pin.bel, pin.pin)) {
            return Err(ArchError::DuplicateBelPin {
                bel: self.name_of(pin.bel).to_string(),
                pin: self.name_of(pin.pin).to_string(),
            });
        }
        let index = self.bel_pins.len();
        if let Some(entry) = self.wire_index.get_mut(&pin.wire) {
            entry.bel_pins.push(index);
        }
        self.bel_pins.push(pin);
        Ok(())
    }
}

/// String-resolved snapshot of a recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchDump {
    /// Wires.
    pub wires: Vec<WireDump>,
    /// Pips.
    pub pips: Vec<PipDump>,
    /// Bels.
    pub bels: Vec<BelDump>,
    /// Bel pins.
    pub bel_pins: Vec<BelPinDump>,
}

/// A resolved wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDump {
    /// Wire name.
    pub name: String,
    /// Wire type.
    pub wire_type: String,
    /// Tile column.
    pub x: u32,
    /// Tile row.
    pub y: u32,
}

/// A resolved pip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipDump {
    /// Pip name.
    pub name: String,
    /// Pip type.
    pub pip_type: String,
    /// Source wire.
    pub src_wire: String,
    /// Destination wire.
    pub dst_wire: String,
    /// Typical delay in nanoseconds.
    pub delay_ns: f64,
    /// Location.
    pub loc: Loc,
}

/// A resolved bel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BelDump {
    /// Bel name.
    pub name: String,
    /// Bel type.
    pub bel_type: String,
    /// Location.
    pub loc: Loc,
    /// Global buffer flag.
    pub global_buffer: bool,
}

/// A resolved bel pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BelPinDump {
    /// Bel name.
    pub bel: String,
    /// Pin name.
    pub pin: String,
    /// Wire name.
    pub wire: String,
    /// Direction.
    pub direction: PinDirection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Delay;

    fn wire(ctx: &DeclRecorder, name: &str) -> WireDecl {
        WireDecl {
            name: ctx.id(name),
            wire_type: ctx.id("ROUTING"),
            x: 0,
            y: 0,
        }
    }

    fn pip(ctx: &DeclRecorder, name: &str, src: &str, dst: &str, loc: Loc) -> PipDecl {
        PipDecl {
            name: ctx.id(name),
            pip_type: ctx.id("T"),
            src_wire: ctx.id(src),
            dst_wire: ctx.id(dst),
            delay: Delay::from_ns(0.05),
            loc,
        }
    }

    #[test]
    fn records_wires_and_pips() {
        let mut ctx = DeclRecorder::new();
        ctx.add_wire(wire(&ctx, "A")).unwrap();
        ctx.add_wire(wire(&ctx, "B")).unwrap();
        ctx.add_pip(pip(&ctx, "A_B", "A", "B", Loc::new(2, 5, 0))).unwrap();

        assert_eq!(ctx.counts().wires, 2);
        assert_eq!(ctx.counts().pips, 1);
        let a = ctx.id("A");
        let b = ctx.id("B");
        assert_eq!(ctx.pips_downhill(a).count(), 1);
        assert_eq!(ctx.pips_uphill(b).count(), 1);
        assert_eq!(ctx.pips_uphill(a).count(), 0);
        assert_eq!(ctx.grid_dims(), (3, 6));
        assert!(ctx.pip("A_B").is_some());
    }

    #[test]
    fn grid_dims_saturate_at_edge() {
        let mut ctx = DeclRecorder::new();
        ctx.add_wire(wire(&ctx, "A")).unwrap();
        ctx.add_wire(wire(&ctx, "B")).unwrap();
        let loc = Loc::new(u32::MAX, u32::MAX, 0);
        ctx.add_pip(pip(&ctx, "A_B", "A", "B", loc)).unwrap();
        assert_eq!(ctx.grid_dims(), (u32::MAX, u32::MAX));
    }

    #[test]
    fn duplicate_wire_rejected() {
        let mut ctx = DeclRecorder::new();
        ctx.add_wire(wire(&ctx, "A")).unwrap();
        let err = ctx.add_wire(wire(&ctx, "A")).unwrap_err();
        assert_eq!(err, ArchError::DuplicateWire("A".into()));
    }

    #[test]
    fn pip_on_unknown_wire_rejected() {
        let mut ctx = DeclRecorder::new();
        ctx.add_wire(wire(&ctx, "A")).unwrap();
        let err = ctx
            .add_pip(pip(&ctx, "A_Z", "A", "Z", Loc::default()))
            .unwrap_err();
        assert_eq!(err, ArchError::UnknownWire("Z".into()));
        assert!(ctx.pips().is_empty());
    }

    #[test]
    fn duplicate_pip_rejected() {
        let mut ctx = DeclRecorder::new();
        ctx.add_wire(wire(&ctx, "A")).unwrap();
        ctx.add_wire(wire(&ctx, "B")).unwrap();
        ctx.add_pip(pip(&ctx, "P", "A", "B", Loc::default())).unwrap();
        let err = ctx.add_pip(pip(&ctx, "P", "B", "A", Loc::default())).unwrap_err();
        assert_eq!(err, ArchError::DuplicatePip("P".into()));
    }

    #[test]
    fn bel_location_unique() {
        let mut ctx = DeclRecorder::new();
        let loc = Loc::new(0, 0, 3);
        let first = BelDecl {
            name: ctx.id("B0"),
            bel_type: ctx.id("LUT4"),
            loc,
            global_buffer: false,
        };
        let second = BelDecl {
            name: ctx.id("B1"),
            ..first.clone()
        };
        ctx.add_bel(first).unwrap();
        assert_eq!(ctx.add_bel(second).unwrap_err(), ArchError::OccupiedBelLoc(loc));
        assert_eq!(ctx.bel_at(loc).map(|b| b.name), Some(ctx.id("B0")));
    }

    #[test]
    fn bel_pin_checks() {
        let mut ctx = DeclRecorder::new();
        ctx.add_wire(wire(&ctx, "W")).unwrap();
        let pin = BelPinDecl {
            bel: ctx.id("B"),
            pin: ctx.id("I0"),
            wire: ctx.id("W"),
            direction: PinDirection::Input,
        };
        assert_eq!(
            ctx.add_bel_pin(pin.clone()).unwrap_err(),
            ArchError::UnknownBel("B".into())
        );

        ctx.add_bel(BelDecl {
            name: ctx.id("B"),
            bel_type: ctx.id("LUT4"),
            loc: Loc::default(),
            global_buffer: false,
        })
        .unwrap();
        ctx.add_bel_pin(pin.clone()).unwrap();
        assert!(matches!(
            ctx.add_bel_pin(pin).unwrap_err(),
            ArchError::DuplicateBelPin { .. }
        ));
        let w = ctx.id("W");
        assert_eq!(ctx.wire_bel_pins(w).count(), 1);
    }

    #[test]
    fn dump_resolves_names() {
        let mut ctx = DeclRecorder::new();
        ctx.add_wire(wire(&ctx, "A")).unwrap();
        ctx.add_wire(wire(&ctx, "B")).unwrap();
        ctx.add_pip(pip(&ctx, "A_B", "A", "B", Loc::new(1, 1, 0))).unwrap();
        let dump = ctx.dump();
        assert_eq!(dump.pips[0].name, "A_B");
        assert_eq!(dump.pips[0].src_wire, "A");
        assert_eq!(dump.wires[1].wire_type, "ROUTING");

        let json = serde_json::to_string(&dump).unwrap();
        let back: ArchDump = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pips[0], dump.pips[0]);
    }
}
