//! Netlist model shared by the packing passes.
//!
//! Cells and nets are keyed by name in sorted maps so every pass visits them
//! in a deterministic order. A port stores the name of its net; a net stores
//! its driver and users as `(cell, port)` references. The two sides are kept
//! consistent by [`Netlist::connect`], [`Netlist::disconnect`] and
//! [`replace_port`](crate::cells::replace_port).

use crate::error::{PackError, PackResult};
use borca_common::Property;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of a cell port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// Input.
    Input,
    /// Output.
    Output,
    /// Bidirectional.
    Inout,
}

/// A port on a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Direction.
    pub direction: PortDirection,
    /// Connected net, if any.
    #[serde(default)]
    pub net: Option<String>,
}

/// A `(cell, port)` reference held by a net.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRef {
    /// Cell name.
    pub cell: String,
    /// Port name.
    pub port: String,
}

impl PortRef {
    /// Creates a reference.
    pub fn new(cell: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            cell: cell.into(),
            port: port.into(),
        }
    }
}

/// A cell instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Unique name.
    pub name: String,
    /// Cell type, e.g. `LUT4` or `CLB`.
    #[serde(rename = "type")]
    pub cell_type: String,
    /// Ports by name.
    #[serde(default)]
    pub ports: BTreeMap<String, Port>,
    /// Parameters by name.
    #[serde(default)]
    pub params: BTreeMap<String, Property>,
    /// Attributes by name.
    #[serde(default)]
    pub attrs: BTreeMap<String, Property>,
}

impl Cell {
    /// Creates a cell without ports or parameters.
    pub fn new(name: impl Into<String>, cell_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell_type: cell_type.into(),
            ports: BTreeMap::new(),
            params: BTreeMap::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Net connected to `port`, if the port exists and is connected.
    pub fn port_net(&self, port: &str) -> Option<&str> {
        self.ports.get(port).and_then(|p| p.net.as_deref())
    }

    /// Integer value of parameter `name`, or `default` when absent.
    pub fn int_param_or(&self, name: &str, default: i64) -> i64 {
        self.params
            .get(name)
            .and_then(Property::as_int)
            .unwrap_or(default)
    }
}

/// A net: one optional driver, any number of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    /// Unique name.
    pub name: String,
    /// Driving port.
    #[serde(default)]
    pub driver: Option<PortRef>,
    /// Driven ports.
    #[serde(default)]
    pub users: Vec<PortRef>,
}

impl Net {
    /// Creates an unconnected net.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: None,
            users: Vec::new(),
        }
    }
}

/// The design being packed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    /// Cells by name.
    #[serde(default)]
    pub cells: BTreeMap<String, Cell>,
    /// Nets by name.
    #[serde(default)]
    pub nets: BTreeMap<String, Net>,
    /// Flow settings; `pack = 1` once packing has run.
    #[serde(default)]
    pub settings: BTreeMap<String, Property>,
    #[serde(skip)]
    auto_index: usize,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a cell name not yet used, of the form `$borca_<TYPE>_<n>`.
    pub fn fresh_cell_name(&mut self, cell_type: &str) -> String {
        loop {
            let name = format!("$borca_{cell_type}_{}", self.auto_index);
            self.auto_index += 1;
            if !self.cells.contains_key(&name) {
                return name;
            }
        }
    }

    /// Inserts a cell. Its ports must not reference nets yet.
    pub fn add_cell(&mut self, cell: Cell) -> PackResult<()> {
        if self.cells.contains_key(&cell.name) {
            return Err(PackError::DuplicateCell(cell.name));
        }
        self.cells.insert(cell.name.clone(), cell);
        Ok(())
    }

    /// Connects `cell.port` to `net`, creating the net if needed.
    ///
    /// Output ports become the driver; other directions become users.
    pub fn connect(&mut self, net: &str, cell: &str, port: &str) -> PackResult<()> {
        let c = self
            .cells
            .get_mut(cell)
            .ok_or_else(|| PackError::UnknownCell(cell.to_string()))?;
        let p = c.ports.get_mut(port).ok_or_else(|| PackError::MissingPort {
            cell: cell.to_string(),
            port: port.to_string(),
        })?;
        if p.net.is_some() {
            return Err(PackError::PortInUse {
                cell: cell.to_string(),
                port: port.to_string(),
            });
        }
        let direction = p.direction;
        let n = self
            .nets
            .entry(net.to_string())
            .or_insert_with(|| Net::new(net));
        let pref = PortRef::new(cell, port);
        if direction == PortDirection::Output {
            if let Some(driver) = &n.driver {
                return Err(PackError::MultipleDrivers {
                    net: net.to_string(),
                    driver: format!("{}.{}", driver.cell, driver.port),
                });
            }
            n.driver = Some(pref);
        } else {
            n.users.push(pref);
        }
        p.net = Some(net.to_string());
        Ok(())
    }

    /// Detaches `cell.port` from its net, if connected.
    pub fn disconnect(&mut self, cell: &str, port: &str) {
        let Some(net) = self
            .cells
            .get_mut(cell)
            .and_then(|c| c.ports.get_mut(port))
            .and_then(|p| p.net.take())
        else {
            return;
        };
        if let Some(n) = self.nets.get_mut(&net) {
            if n.driver.as_ref().is_some_and(|d| d.cell == cell && d.port == port) {
                n.driver = None;
            }
            n.users.retain(|u| !(u.cell == cell && u.port == port));
        }
    }

    /// Removes a cell, detaching whatever ports are still connected.
    pub fn remove_cell(&mut self, name: &str) -> Option<Cell> {
        let ports: Vec<String> = self.cells.get(name)?.ports.keys().cloned().collect();
        for port in &ports {
            self.disconnect(name, port);
        }
        self.cells.remove(name)
    }

    /// Cell driving `net`, if any.
    pub fn driver_cell(&self, net: &str) -> Option<&Cell> {
        let driver = self.nets.get(net)?.driver.as_ref()?;
        self.cells.get(&driver.cell)
    }

    /// Whether packing has completed on this netlist.
    pub fn is_packed(&self) -> bool {
        self.settings.get("pack").and_then(Property::as_int) == Some(1)
    }

    /// Checks that every entry is keyed by its own name and that ports and
    /// nets reference each other consistently.
    pub fn check_consistency(&self) -> PackResult<()> {
        let cell_names = self.cells.iter().map(|(k, c)| (k, &c.name));
        let net_names = self.nets.iter().map(|(k, n)| (k, &n.name));
        if let Some((key, name)) = cell_names.chain(net_names).find(|(k, n)| k != n) {
            return Err(PackError::NameMismatch {
                key: key.clone(),
                name: name.clone(),
            });
        }
        for net in self.nets.values() {
            for pref in net.driver.iter().chain(net.users.iter()) {
                let cell = self
                    .cells
                    .get(&pref.cell)
                    .ok_or_else(|| PackError::UnknownCell(pref.cell.clone()))?;
                if cell.port_net(&pref.port) != Some(net.name.as_str()) {
                    return Err(PackError::MissingPort {
                        cell: pref.cell.clone(),
                        port: pref.port.clone(),
                    });
                }
            }
        }
        for cell in self.cells.values() {
            for (port, p) in &cell.ports {
                if let Some(net) = &p.net {
                    if !self.nets.contains_key(net) {
                        return Err(PackError::UnknownNet(format!("{net} (from {}.{port})", cell.name)));
                    }
                }
            }
        }
        Ok(())
    }
}
