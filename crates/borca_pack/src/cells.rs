//! Borca cell constructors and the port moves that fill them.

use crate::error::{PackError, PackResult};
use crate::netlist::{Cell, Net, Netlist, Port, PortDirection, PortRef};
use borca_common::Property;
use std::collections::BTreeMap;

/// Cell type of a configurable logic block.
pub const CLB: &str = "CLB";
/// Cell type of a flip-flop with enable and reset.
pub const DFFER: &str = "DFFER";
/// Cell type of a four-input LUT before packing.
pub const LUT4: &str = "LUT4";
/// Generic input buffer.
pub const IBUF: &str = "$nextpnr_ibuf";
/// Generic output buffer.
pub const OBUF: &str = "$nextpnr_obuf";
/// Generic bidirectional buffer.
pub const IOBUF: &str = "$nextpnr_iobuf";

/// LUT slots in a CLB, in port declaration order.
const CLB_LUT_ORDER: [u32; 8] = [1, 0, 3, 2, 5, 4, 7, 6];

/// Adds an unconnected port to `cell`.
pub fn add_port(cell: &mut Cell, name: &str, direction: PortDirection) -> PackResult<()> {
    if cell.ports.contains_key(name) {
        return Err(PackError::DuplicatePort {
            cell: cell.name.clone(),
            port: name.to_string(),
        });
    }
    cell.ports.insert(name.to_string(), Port { direction, net: None });
    Ok(())
}

fn cell_name(netlist: &mut Netlist, cell_type: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => name.to_string(),
        None => netlist.fresh_cell_name(cell_type),
    }
}

/// Builds a `CLB` cell for `k`-input LUTs.
///
/// The cell is returned detached; insert it with
/// [`Netlist::add_cell`] once its ports are wired.
pub fn create_clb(
    netlist: &mut Netlist,
    cell_type: &str,
    name: Option<&str>,
    k: u32,
) -> PackResult<Cell> {
    if cell_type != CLB {
        return Err(PackError::UnsupportedCellType {
            expected: CLB,
            cell_type: cell_type.to_string(),
        });
    }
    let mut cell = Cell::new(cell_name(netlist, cell_type, name), cell_type);
    cell.params.insert("K".into(), Property::Int(i64::from(k)));
    cell.params.insert("LUT_INIT".into(), Property::Int(0));
    cell.params.insert("DFF_INIT".into(), Property::Int(0));
    cell.params.insert("FF_USED".into(), Property::Int(0));

    for lut in CLB_LUT_ORDER {
        for i in 0..k {
            add_port(&mut cell, &format!("LUT{lut}_I{i}"), PortDirection::Input)?;
        }
    }
    for port in ["MUX_I0", "MUX_I1", "CLK", "CE", "RST"] {
        add_port(&mut cell, port, PortDirection::Input)?;
    }
    for kind in ["COMB", "SYNC"] {
        for lut in CLB_LUT_ORDER {
            add_port(&mut cell, &format!("{kind}{lut}_O"), PortDirection::Output)?;
        }
    }
    Ok(cell)
}

/// Builds a `DFFER` cell.
pub fn create_dff_cell(netlist: &mut Netlist, cell_type: &str, name: Option<&str>) -> PackResult<Cell> {
    if cell_type != DFFER {
        return Err(PackError::UnsupportedCellType {
            expected: "DFF",
            cell_type: cell_type.to_string(),
        });
    }
    let mut cell = Cell::new(cell_name(netlist, cell_type, name), cell_type);
    cell.params.insert("INIT".into(), Property::Int(0));
    for port in ["CLK", "CE", "RST", "D"] {
        add_port(&mut cell, port, PortDirection::Input)?;
    }
    add_port(&mut cell, "Q", PortDirection::Output)?;
    Ok(cell)
}

/// Moves the connection of `old.old_port` onto `new.new_port`.
///
/// A missing or unconnected old port moves nothing. The new port must exist
/// and be free.
pub fn replace_port(
    nets: &mut BTreeMap<String, Net>,
    old: &mut Cell,
    old_port: &str,
    new: &mut Cell,
    new_port: &str,
) -> PackResult<()> {
    let Some(net_name) = old.port_net(old_port).map(str::to_string) else {
        return Ok(());
    };
    let target = new.ports.get_mut(new_port).ok_or_else(|| PackError::MissingPort {
        cell: new.name.clone(),
        port: new_port.to_string(),
    })?;
    if target.net.is_some() {
        return Err(PackError::PortInUse {
            cell: new.name.clone(),
            port: new_port.to_string(),
        });
    }
    let net = nets
        .get_mut(&net_name)
        .ok_or_else(|| PackError::UnknownNet(net_name.clone()))?;

    if let Some(p) = old.ports.get_mut(old_port) {
        p.net = None;
    }
    let from = PortRef::new(&old.name, old_port);
    let to = PortRef::new(&new.name, new_port);
    if net.driver.as_ref() == Some(&from) {
        net.driver = Some(to.clone());
    }
    for user in net.users.iter_mut().filter(|u| **u == from) {
        *user = to.clone();
    }
    target.net = Some(net_name);
    Ok(())
}

/// Moves a `LUT4` into LUT slot 1 of `lc`.
///
/// With `no_dff` the combinational output drives `COMB1_O` and the
/// flip-flop stays unused.
pub fn lut_to_lc(
    nets: &mut BTreeMap<String, Net>,
    lut: &mut Cell,
    lc: &mut Cell,
    no_dff: bool,
) -> PackResult<()> {
    let init = lut
        .params
        .get("INIT")
        .cloned()
        .unwrap_or(Property::Int(0));
    lc.params.insert("LUT_INIT".into(), init);

    let max = lc.int_param_or("K", 4);
    let lut_k = lut.int_param_or("K", 4);
    if lut_k > max {
        return Err(PackError::LutTooWide {
            cell: lut.name.clone(),
            k: u32::try_from(lut_k).unwrap_or(u32::MAX),
            max: u32::try_from(max).unwrap_or(u32::MAX),
        });
    }
    for i in 0..lut_k {
        replace_port(nets, lut, &format!("I{i}"), lc, &format!("LUT1_I{i}"))?;
    }

    if no_dff {
        lc.params.insert("FF_USED".into(), Property::Int(0));
        replace_port(nets, lut, "O", lc, "COMB1_O")?;
    }
    Ok(())
}

/// Moves a `DFFER` into the slot-1 flip-flop of `lc`.
///
/// With `pass_thru_lut` the slot-1 LUT is programmed as a buffer of `I0`
/// and the flip-flop's `D` is routed through it.
pub fn dff_to_lc(
    nets: &mut BTreeMap<String, Net>,
    dff: &mut Cell,
    lc: &mut Cell,
    pass_thru_lut: bool,
) -> PackResult<()> {
    lc.params.insert("FF_USED".into(), Property::Int(1));
    let init = dff
        .params
        .get("INIT")
        .cloned()
        .unwrap_or(Property::Int(0));
    lc.params.insert("DFF_INIT".into(), init);

    replace_port(nets, dff, "CLK", lc, "CLK")?;
    replace_port(nets, dff, "CE", lc, "CE")?;
    replace_port(nets, dff, "RST", lc, "RST")?;

    if pass_thru_lut {
        let k = lc.int_param_or("K", 4).clamp(1, 16);
        let size = 1usize << k;
        lc.params
            .insert("LUT_INIT".into(), Property::Bits("10".repeat(size / 2)));
        replace_port(nets, dff, "D", lc, "LUT1_I0")?;
    }

    replace_port(nets, dff, "Q", lc, "SYNC1_O")
}

/// Moves a generic IO buffer onto a `DFFER` virtual IO register.
///
/// Input buffers drive the net from `Q`; output buffers sample it on `D`.
/// Bidirectional buffers have no mapping and move nothing.
pub fn vio_to_dff(nets: &mut BTreeMap<String, Net>, io: &mut Cell, dff: &mut Cell) -> PackResult<()> {
    dff.params.insert("INIT".into(), Property::Int(1));
    match io.cell_type.as_str() {
        IBUF => replace_port(nets, io, "O", dff, "Q"),
        OBUF => replace_port(nets, io, "I", dff, "D"),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lut(nl: &mut Netlist, name: &str) {
        let mut c = Cell::new(name, LUT4);
        for i in 0..4 {
            add_port(&mut c, &format!("I{i}"), PortDirection::Input).unwrap();
        }
        add_port(&mut c, "O", PortDirection::Output).unwrap();
        c.params.insert("INIT".into(), Property::Bits("0110".repeat(4)));
        nl.add_cell(c).unwrap();
    }

    fn driver(nl: &mut Netlist, name: &str, net: &str) {
        let mut c = Cell::new(name, "SRC");
        add_port(&mut c, "Y", PortDirection::Output).unwrap();
        nl.add_cell(c).unwrap();
        nl.connect(net, name, "Y").unwrap();
    }

    #[test]
    fn clb_ports_and_params() {
        let mut nl = Netlist::new();
        let clb = create_clb(&mut nl, CLB, Some("c0"), 4).unwrap();
        assert_eq!(clb.name, "c0");
        // 8 LUTs x 4 inputs + MUX_I0/1 + CLK/CE/RST + 8 COMB + 8 SYNC
        assert_eq!(clb.ports.len(), 32 + 5 + 16);
        assert_eq!(clb.params["K"], Property::Int(4));
        assert_eq!(clb.params["FF_USED"], Property::Int(0));
        assert_eq!(clb.ports["LUT7_I3"].direction, PortDirection::Input);
        assert_eq!(clb.ports["SYNC0_O"].direction, PortDirection::Output);
    }

    #[test]
    fn unnamed_cells_get_fresh_names() {
        let mut nl = Netlist::new();
        let a = create_clb(&mut nl, CLB, None, 4).unwrap();
        let b = create_dff_cell(&mut nl, DFFER, None).unwrap();
        assert_eq!(a.name, "$borca_CLB_0");
        assert_eq!(b.name, "$borca_DFFER_1");
        assert_eq!(b.params["INIT"], Property::Int(0));
        assert_eq!(b.ports.len(), 5);
    }

    #[test]
    fn unsupported_types_rejected() {
        let mut nl = Netlist::new();
        assert!(matches!(
            create_clb(&mut nl, "BORCA_CELL", None, 4),
            Err(PackError::UnsupportedCellType { .. })
        ));
        assert!(matches!(
            create_dff_cell(&mut nl, "DFF", None),
            Err(PackError::UnsupportedCellType { .. })
        ));
    }

    #[test]
    fn duplicate_port_rejected() {
        let mut c = Cell::new("c", "X");
        add_port(&mut c, "A", PortDirection::Input).unwrap();
        assert!(add_port(&mut c, "A", PortDirection::Output).is_err());
    }

    #[test]
    fn replace_port_moves_driver_and_users() {
        let mut nl = Netlist::new();
        lut(&mut nl, "l0");
        driver(&mut nl, "src", "n_in");
        nl.connect("n_in", "l0", "I0").unwrap();
        let mut old = nl.cells.remove("l0").unwrap();

        let mut clb = create_clb(&mut nl, CLB, Some("c0"), 4).unwrap();
        replace_port(&mut nl.nets, &mut old, "I0", &mut clb, "LUT1_I0").unwrap();

        assert_eq!(clb.port_net("LUT1_I0"), Some("n_in"));
        assert_eq!(old.port_net("I0"), None);
        assert_eq!(nl.nets["n_in"].users, vec![PortRef::new("c0", "LUT1_I0")]);
    }

    #[test]
    fn replace_port_unconnected_is_noop() {
        let mut nl = Netlist::new();
        lut(&mut nl, "l0");
        let mut old = nl.cells.remove("l0").unwrap();
        let mut clb = create_clb(&mut nl, CLB, Some("c0"), 4).unwrap();
        replace_port(&mut nl.nets, &mut old, "I3", &mut clb, "LUT1_I3").unwrap();
        replace_port(&mut nl.nets, &mut old, "NOPE", &mut clb, "LUT1_I3").unwrap();
        assert_eq!(clb.port_net("LUT1_I3"), None);
    }

    #[test]
    fn replace_port_into_missing_port_fails() {
        let mut nets = BTreeMap::new();
        nets.insert("n".to_string(), Net::new("n"));
        let mut old = Cell::new("a", "X");
        add_port(&mut old, "A", PortDirection::Input).unwrap();
        old.ports.get_mut("A").unwrap().net = Some("n".into());
        let mut new = Cell::new("b", "X");
        let err = replace_port(&mut nets, &mut old, "A", &mut new, "B").unwrap_err();
        assert!(matches!(err, PackError::MissingPort { .. }));
    }

    #[test]
    fn lut_to_lc_copies_init_and_output() {
        let mut nl = Netlist::new();
        lut(&mut nl, "l0");
        nl.connect("n_out", "l0", "O").unwrap();
        let mut l = nl.cells.remove("l0").unwrap();

        let mut clb = create_clb(&mut nl, CLB, Some("l0_LUT4"), 4).unwrap();
        lut_to_lc(&mut nl.nets, &mut l, &mut clb, true).unwrap();

        assert_eq!(clb.params["LUT_INIT"], Property::Bits("0110".repeat(4)));
        assert_eq!(clb.params["FF_USED"], Property::Int(0));
        assert_eq!(clb.port_net("COMB1_O"), Some("n_out"));
        assert_eq!(nl.nets["n_out"].driver, Some(PortRef::new("l0_LUT4", "COMB1_O")));
    }

    #[test]
    fn lut_wider_than_clb_rejected() {
        let mut nl = Netlist::new();
        let mut l = Cell::new("wide", LUT4);
        l.params.insert("K".into(), Property::Int(6));
        let mut clb = create_clb(&mut nl, CLB, Some("c"), 4).unwrap();
        let err = lut_to_lc(&mut nl.nets, &mut l, &mut clb, true).unwrap_err();
        assert!(matches!(err, PackError::LutTooWide { k: 6, max: 4, .. }));
    }

    #[test]
    fn dff_to_lc_pass_through() {
        let mut nl = Netlist::new();
        let mut dff = create_dff_cell(&mut nl, DFFER, Some("ff")).unwrap();
        dff.params.insert("INIT".into(), Property::Int(1));
        nl.add_cell(dff).unwrap();
        driver(&mut nl, "src", "n_d");
        nl.connect("n_d", "ff", "D").unwrap();
        nl.connect("n_q", "ff", "Q").unwrap();
        let mut dff = nl.cells.remove("ff").unwrap();

        let mut clb = create_clb(&mut nl, CLB, Some("ff_DFF"), 4).unwrap();
        dff_to_lc(&mut nl.nets, &mut dff, &mut clb, true).unwrap();

        assert_eq!(clb.params["FF_USED"], Property::Int(1));
        assert_eq!(clb.params["DFF_INIT"], Property::Int(1));
        assert_eq!(clb.params["LUT_INIT"], Property::Bits("1010101010101010".into()));
        assert_eq!(clb.port_net("LUT1_I0"), Some("n_d"));
        assert_eq!(clb.port_net("SYNC1_O"), Some("n_q"));
        assert_eq!(nl.nets["n_q"].driver, Some(PortRef::new("ff_DFF", "SYNC1_O")));
    }

    #[test]
    fn vio_to_dff_maps_buffers() {
        let mut nl = Netlist::new();
        let mut ibuf = Cell::new("in0", IBUF);
        add_port(&mut ibuf, "O", PortDirection::Output).unwrap();
        nl.add_cell(ibuf).unwrap();
        nl.connect("n_in", "in0", "O").unwrap();
        let mut ibuf = nl.cells.remove("in0").unwrap();

        let mut dff = create_dff_cell(&mut nl, DFFER, Some("in0_DFF")).unwrap();
        vio_to_dff(&mut nl.nets, &mut ibuf, &mut dff).unwrap();
        assert_eq!(dff.params["INIT"], Property::Int(1));
        assert_eq!(dff.port_net("Q"), Some("n_in"));

        let mut obuf = Cell::new("out0", OBUF);
        add_port(&mut obuf, "I", PortDirection::Input).unwrap();
        nl.add_cell(obuf).unwrap();
        nl.connect("n_in", "out0", "I").unwrap();
        let mut obuf = nl.cells.remove("out0").unwrap();
        let mut dff2 = create_dff_cell(&mut nl, DFFER, Some("out0_DFF")).unwrap();
        vio_to_dff(&mut nl.nets, &mut obuf, &mut dff2).unwrap();
        assert_eq!(dff2.port_net("D"), Some("n_in"));
        assert!(nl.nets["n_in"].users.contains(&PortRef::new("out0_DFF", "D")));
    }
}
