//! Packing errors.

use borca_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Result alias for packing operations.
pub type PackResult<T> = Result<T, PackError>;

/// Errors raised while editing or packing a netlist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// A cell constructor was asked for a type it cannot build.
    #[error("unable to create {expected} cell of type '{cell_type}'")]
    UnsupportedCellType {
        /// The family the constructor builds (`CLB`, `DFF`).
        expected: &'static str,
        /// The requested type.
        cell_type: String,
    },

    /// A cell with this name already exists.
    #[error("duplicate cell '{0}'")]
    DuplicateCell(String),

    /// The cell already has a port of this name.
    #[error("cell '{cell}' already has port '{port}'")]
    DuplicatePort {
        /// Cell name.
        cell: String,
        /// Port name.
        port: String,
    },

    /// No cell with this name exists.
    #[error("no cell named '{0}'")]
    UnknownCell(String),

    /// A net with this name already exists.
    #[error("duplicate net '{0}'")]
    DuplicateNet(String),

    /// No net with this name exists.
    #[error("no net named '{0}'")]
    UnknownNet(String),

    /// The cell has no port of this name.
    #[error("cell '{cell}' has no port '{port}'")]
    MissingPort {
        /// Cell name.
        cell: String,
        /// Port name.
        port: String,
    },

    /// The destination port of a move is already connected.
    #[error("port '{cell}.{port}' is already connected")]
    PortInUse {
        /// Cell name.
        cell: String,
        /// Port name.
        port: String,
    },

    /// The net already has a driver.
    #[error("net '{net}' is already driven by '{driver}'")]
    MultipleDrivers {
        /// Net name.
        net: String,
        /// Existing driver, as `cell.port`.
        driver: String,
    },

    /// A cell or net is stored under a key other than its own name.
    #[error("entry '{key}' holds an object named '{name}'")]
    NameMismatch {
        /// Map key.
        key: String,
        /// Name stored in the object.
        name: String,
    },

    /// A LUT has more inputs than the CLB provides.
    #[error("LUT '{cell}' has {k} inputs but the CLB supports {max}")]
    LutTooWide {
        /// LUT cell name.
        cell: String,
        /// The LUT's input count.
        k: u32,
        /// The CLB's input count.
        max: u32,
    },
}

impl PackError {
    /// Returns the diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            PackError::UnsupportedCellType { .. } => 101,
            PackError::DuplicateCell(_) => 102,
            PackError::DuplicatePort { .. } => 103,
            PackError::UnknownCell(_) => 104,
            PackError::UnknownNet(_) => 105,
            PackError::MissingPort { .. } => 106,
            PackError::PortInUse { .. } => 107,
            PackError::MultipleDrivers { .. } => 108,
            PackError::LutTooWide { .. } => 109,
            PackError::DuplicateNet(_) => 110,
            PackError::NameMismatch { .. } => 111,
        };
        DiagnosticCode::new(Category::Pack, number)
    }

    /// Converts the error into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            PackError::DuplicateCell(cell)
            | PackError::UnknownCell(cell)
            | PackError::DuplicatePort { cell, .. }
            | PackError::MissingPort { cell, .. }
            | PackError::PortInUse { cell, .. }
            | PackError::LutTooWide { cell, .. } => diag.on(cell.clone()),
            PackError::NameMismatch { key, .. } => diag.on(key.clone()),
            PackError::UnknownNet(net)
            | PackError::DuplicateNet(net)
            | PackError::MultipleDrivers { net, .. } => {
                diag.on(net.clone())
            }
            PackError::UnsupportedCellType { .. } => diag,
        }
    }
}
