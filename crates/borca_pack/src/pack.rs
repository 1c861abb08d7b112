//! Packing passes.

use crate::cells::{
    create_clb, create_dff_cell, dff_to_lc, lut_to_lc, vio_to_dff, CLB, DFFER, IBUF, IOBUF, LUT4,
    OBUF,
};
use crate::error::{PackError, PackResult};
use crate::netlist::{Cell, Net, Netlist, PortRef};
use borca_common::Property;
use borca_config::PackConfig;
use borca_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the ground driver cell.
pub const GND_CELL: &str = "$PACKER_GND";
/// Name of the ground net.
pub const GND_NET: &str = "$PACKER_GND_NET";
/// Name of the supply driver cell.
pub const VCC_CELL: &str = "$PACKER_VCC";
/// Name of the supply net.
pub const VCC_NET: &str = "$PACKER_VCC_NET";

/// Port of a constant CLB that drives its net.
const CONST_PORT: &str = "COMB1_O";

/// Whether `cell` is an unpacked LUT.
pub fn is_lut(cell: &Cell) -> bool {
    cell.cell_type == LUT4
}

/// Whether `cell` is an unpacked flip-flop.
pub fn is_ff(cell: &Cell) -> bool {
    cell.cell_type == DFFER
}

/// Whether `cell` is a packed logic block.
pub fn is_lc(cell: &Cell) -> bool {
    cell.cell_type == CLB
}

/// Whether `cell` is a generic IO buffer.
pub fn is_iob(cell: &Cell) -> bool {
    matches!(cell.cell_type.as_str(), IBUF | OBUF | IOBUF)
}

/// Which passes [`pack`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackStages {
    /// [`pack_constants`].
    pub constants: bool,
    /// [`pack_luts`].
    pub luts: bool,
    /// [`pack_ffs`].
    pub ffs: bool,
    /// [`pack_virtual_io`].
    pub virtual_io: bool,
}

impl Default for PackStages {
    fn default() -> Self {
        Self {
            constants: false,
            luts: false,
            ffs: false,
            virtual_io: true,
        }
    }
}

impl From<&PackConfig> for PackStages {
    fn from(config: &PackConfig) -> Self {
        Self {
            constants: config.constants,
            luts: config.luts,
            ffs: config.ffs,
            virtual_io: config.virtual_io,
        }
    }
}

/// Counts of what [`pack`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackSummary {
    /// Constant driver cells replaced.
    pub constants: usize,
    /// LUTs packed into CLBs.
    pub luts: usize,
    /// Flip-flops packed into CLBs.
    pub ffs: usize,
    /// IO buffers turned into DFFER cells.
    pub virtual_io: usize,
}

fn progress(sink: &DiagnosticSink, message: &str) {
    sink.emit(Diagnostic::note(DiagnosticCode::new(Category::Info, 2), message));
}

fn commit(netlist: &mut Netlist, old: &[String], new: Vec<Cell>) -> PackResult<()> {
    for name in old {
        netlist.remove_cell(name);
    }
    for cell in new {
        netlist.add_cell(cell)?;
    }
    Ok(())
}

fn take_cell(netlist: &mut Netlist, name: &str) -> PackResult<Cell> {
    netlist
        .cells
        .remove(name)
        .ok_or_else(|| PackError::UnknownCell(name.to_string()))
}

/// Builds the replacement of cell `name` and moves its connections over.
///
/// The old cell goes back into the netlist whatever happens, so leftover
/// ports are detached on commit and a failure leaves it where it was.
fn convert_one<M, F>(netlist: &mut Netlist, name: &str, make: &mut M, convert: &mut F) -> PackResult<Cell>
where
    M: FnMut(&mut Netlist, &Cell) -> PackResult<Cell>,
    F: FnMut(&mut BTreeMap<String, Net>, &mut Cell, &mut Cell) -> PackResult<()>,
{
    let mut old = take_cell(netlist, name)?;
    let built = make(netlist, &old).and_then(|new| {
        if netlist.cells.contains_key(&new.name) {
            Err(PackError::DuplicateCell(new.name))
        } else {
            Ok(new)
        }
    });
    let result = built.and_then(|mut new| {
        convert(&mut netlist.nets, &mut old, &mut new)?;
        Ok(new)
    });
    netlist.cells.insert(name.to_string(), old);
    result
}

/// Replaces every cell in `names`, committing the cells converted before
/// any failure so the netlist stays consistent.
fn convert_cells<M, F>(netlist: &mut Netlist, names: &[String], mut make: M, mut convert: F) -> PackResult<usize>
where
    M: FnMut(&mut Netlist, &Cell) -> PackResult<Cell>,
    F: FnMut(&mut BTreeMap<String, Net>, &mut Cell, &mut Cell) -> PackResult<()>,
{
    let mut packed = Vec::with_capacity(names.len());
    for (done, name) in names.iter().enumerate() {
        match convert_one(netlist, name, &mut make, &mut convert) {
            Ok(cell) => packed.push(cell),
            Err(e) => {
                commit(netlist, &names[..done], packed)?;
                return Err(e);
            }
        }
    }
    commit(netlist, names, packed)?;
    Ok(names.len())
}

/// Packs every `LUT4` into its own CLB named `<lut>_LUT4`.
pub fn pack_luts(netlist: &mut Netlist, k: u32, sink: &DiagnosticSink) -> PackResult<usize> {
    progress(sink, "Packing LUTs..");
    let luts: Vec<String> = netlist
        .cells
        .values()
        .filter(|c| is_lut(c))
        .map(|c| c.name.clone())
        .collect();

    convert_cells(
        netlist,
        &luts,
        |nl, lut| {
            let mut lc = create_clb(nl, CLB, Some(&format!("{}_LUT4", lut.name)), k)?;
            lc.attrs.extend(lut.attrs.clone());
            Ok(lc)
        },
        |nets, lut, lc| lut_to_lc(nets, lut, lc, true),
    )
}

/// Packs every `DFFER` into its own CLB named `<ff>_DFF`, with a
/// pass-through LUT in front of it.
pub fn pack_ffs(netlist: &mut Netlist, k: u32, sink: &DiagnosticSink) -> PackResult<usize> {
    progress(sink, "Packing non-LUT FFs..");
    let ffs: Vec<String> = netlist
        .cells
        .values()
        .filter(|c| is_ff(c))
        .map(|c| c.name.clone())
        .collect();

    convert_cells(
        netlist,
        &ffs,
        |nl, dff| {
            let mut lc = create_clb(nl, CLB, Some(&format!("{}_DFF", dff.name)), k)?;
            lc.attrs.extend(dff.attrs.clone());
            Ok(lc)
        },
        |nets, dff, lc| dff_to_lc(nets, dff, lc, true),
    )
}

/// Whether `port` of `cell` is a LUT data input.
fn is_lut_input(cell: &Cell, port: &str) -> bool {
    if is_lut(cell) {
        port.starts_with('I')
    } else if is_lc(cell) {
        port.starts_with("LUT") && port.contains("_I")
    } else {
        false
    }
}

/// Moves every user of `orig` onto `constnet`.
///
/// LUT inputs tied to zero are left unconnected instead, since an unused LUT
/// input reads as zero.
fn set_net_constant(netlist: &mut Netlist, orig: &str, constnet: &mut Net, constval: bool) {
    let Some(net) = netlist.nets.get_mut(orig) else {
        return;
    };
    net.driver = None;
    let users = std::mem::take(&mut net.users);
    for user in users {
        let Some(cell) = netlist.cells.get_mut(&user.cell) else {
            continue;
        };
        let float = !constval && is_lut_input(cell, &user.port);
        let Some(port) = cell.ports.get_mut(&user.port) else {
            continue;
        };
        if float {
            port.net = None;
        } else {
            port.net = Some(constnet.name.clone());
            constnet.users.push(user);
        }
    }
}

/// Replaces `GND` and `VCC` driver cells with constant CLBs.
///
/// The ground CLB is only kept when some net used it; the supply CLB is
/// always added.
pub fn pack_constants(netlist: &mut Netlist, k: u32, sink: &DiagnosticSink) -> PackResult<usize> {
    progress(sink, "Packing constants..");
    let width = 1usize << k.min(16);

    let mut gnd_cell = create_clb(netlist, CLB, Some(GND_CELL), k)?;
    gnd_cell
        .params
        .insert("LUT_INIT".into(), Property::zeros(width));
    let mut gnd_net = Net::new(GND_NET);

    let mut vcc_cell = create_clb(netlist, CLB, Some(VCC_CELL), k)?;
    vcc_cell
        .params
        .insert("LUT_INIT".into(), Property::ones(width));
    let mut vcc_net = Net::new(VCC_NET);

    let mut dead_nets = Vec::new();
    let mut dead_cells = BTreeSet::new();
    let mut gnd_used = false;

    let names: Vec<String> = netlist.nets.keys().cloned().collect();
    for name in names {
        let Some(driver) = netlist.driver_cell(&name) else {
            continue;
        };
        let driver_name = driver.name.clone();
        let driver_type = driver.cell_type.clone();
        match driver_type.as_str() {
            "GND" => {
                set_net_constant(netlist, &name, &mut gnd_net, false);
                gnd_used = true;
            }
            "VCC" => set_net_constant(netlist, &name, &mut vcc_net, true),
            _ => continue,
        }
        dead_nets.push(name);
        dead_cells.insert(driver_name);
    }

    for name in &dead_nets {
        netlist.nets.remove(name);
    }
    for name in &dead_cells {
        netlist.remove_cell(name);
    }

    if gnd_used {
        install_constant(netlist, gnd_cell, gnd_net)?;
    }
    install_constant(netlist, vcc_cell, vcc_net)?;
    Ok(dead_cells.len())
}

fn install_constant(netlist: &mut Netlist, mut cell: Cell, mut net: Net) -> PackResult<()> {
    if let Some(port) = cell.ports.get_mut(CONST_PORT) {
        port.net = Some(net.name.clone());
    }
    net.driver = Some(PortRef::new(&cell.name, CONST_PORT));
    if netlist.nets.contains_key(&net.name) {
        return Err(PackError::DuplicateNet(net.name));
    }
    netlist.add_cell(cell)?;
    netlist.nets.insert(net.name.clone(), net);
    Ok(())
}

/// Turns generic IO buffers into `DFFER` virtual IO registers named
/// `<io>_DFF`.
///
/// Buffers whose net feeds the `CLK` port of a flip-flop are left alone so
/// the clock stays on a dedicated input.
pub fn pack_virtual_io(netlist: &mut Netlist, sink: &DiagnosticSink) -> PackResult<usize> {
    progress(sink, "Packing IOs..");

    let mut clk_iocells = BTreeSet::new();
    for net in netlist.nets.values() {
        let Some(driver) = netlist.driver_cell(&net.name).filter(|c| is_iob(c)) else {
            continue;
        };
        let drives_clock = net.users.iter().any(|user| {
            netlist
                .cells
                .get(&user.cell)
                .is_some_and(|c| is_ff(c) && c.port_net("CLK") == Some(net.name.as_str()))
        });
        if drives_clock {
            clk_iocells.insert(driver.name.clone());
        }
    }

    let iobs: Vec<String> = netlist
        .cells
        .values()
        .filter(|c| is_iob(c) && !clk_iocells.contains(&c.name))
        .map(|c| c.name.clone())
        .collect();

    convert_cells(
        netlist,
        &iobs,
        |nl, io| {
            if io.cell_type == IOBUF {
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::new(Category::Pack, 201),
                        format!("bidirectional buffer '{}' has no virtual IO mapping", io.name),
                    )
                    .on(io.name.clone())
                    .with_note("the DFFER register is created unconnected"),
                );
            }
            create_dff_cell(nl, DFFER, Some(&format!("{}_DFF", io.name)))
        },
        vio_to_dff,
    )
}

fn run_stages(
    netlist: &mut Netlist,
    k: u32,
    stages: PackStages,
    sink: &DiagnosticSink,
) -> PackResult<PackSummary> {
    let mut summary = PackSummary::default();
    if stages.constants {
        summary.constants = pack_constants(netlist, k, sink)?;
    }
    if stages.luts {
        summary.luts = pack_luts(netlist, k, sink)?;
    }
    if stages.ffs {
        summary.ffs = pack_ffs(netlist, k, sink)?;
    }
    if stages.virtual_io {
        summary.virtual_io = pack_virtual_io(netlist, sink)?;
    }
    Ok(summary)
}

/// Runs the enabled passes in order: constants, LUTs, flip-flops, virtual
/// IO. Marks the netlist packed on success.
pub fn pack(
    netlist: &mut Netlist,
    k: u32,
    stages: PackStages,
    sink: &DiagnosticSink,
) -> PackResult<PackSummary> {
    let summary = run_stages(netlist, k, stages, sink).inspect_err(|e| sink.emit(e.to_diagnostic()))?;
    netlist.settings.insert("pack".into(), Property::Int(1));
    Ok(summary)
}
