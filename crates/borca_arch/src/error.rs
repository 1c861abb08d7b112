//! Errors raised while declaring architecture objects.

use borca_common::Loc;
use borca_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Result alias for architecture declaration.
pub type ArchResult<T> = Result<T, ArchError>;

/// Errors raised by generators or by the context receiving declarations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArchError {
    /// Switch-box sides that must match in length do not.
    #[error(
        "switch box {name} wire lists differ in length \
         (north {north}, east {east}, south {south}, west {west})"
    )]
    WireCountMismatch {
        /// Box name.
        name: String,
        /// North side length.
        north: usize,
        /// East side length.
        east: usize,
        /// South side length.
        south: usize,
        /// West side length.
        west: usize,
    },

    /// The requested topology has no defined pip pattern.
    #[error("{0} is not implemented")]
    NotImplemented(String),

    /// A tile coordinate has no neighbour in the requested direction.
    #[error("tile x{x}y{y} is at the edge of the coordinate range")]
    CoordinateOverflow {
        /// Tile column.
        x: u32,
        /// Tile row.
        y: u32,
    },

    /// A wire with this name was already declared.
    #[error("duplicate wire '{0}'")]
    DuplicateWire(String),

    /// A pip with this name was already declared.
    #[error("duplicate pip '{0}'")]
    DuplicatePip(String),

    /// A bel with this name was already declared.
    #[error("duplicate bel '{0}'")]
    DuplicateBel(String),

    /// Another bel already occupies this location.
    #[error("bel location {0} already occupied")]
    OccupiedBelLoc(Loc),

    /// The bel already has a pin of this name.
    #[error("bel '{bel}' already has pin '{pin}'")]
    DuplicateBelPin {
        /// Bel name.
        bel: String,
        /// Pin name.
        pin: String,
    },

    /// A declaration references a wire that was never declared.
    #[error("no wire named '{0}'")]
    UnknownWire(String),

    /// A declaration references a bel that was never declared.
    #[error("no bel named '{0}'")]
    UnknownBel(String),
}

impl ArchError {
    /// Returns the diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            ArchError::WireCountMismatch { .. } => 101,
            ArchError::NotImplemented(_) => 102,
            ArchError::CoordinateOverflow { .. } => 103,
            ArchError::DuplicateWire(_) => 110,
            ArchError::DuplicatePip(_) => 111,
            ArchError::DuplicateBel(_) => 112,
            ArchError::OccupiedBelLoc(_) => 113,
            ArchError::DuplicateBelPin { .. } => 114,
            ArchError::UnknownWire(_) => 120,
            ArchError::UnknownBel(_) => 121,
        };
        DiagnosticCode::new(Category::Arch, number)
    }

    /// Converts the error into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            ArchError::WireCountMismatch { name, .. } => diag.on(name.clone()),
            ArchError::OccupiedBelLoc(loc) => diag.at(*loc),
            ArchError::CoordinateOverflow { x, y } => diag.at(Loc::new(*x, *y, 0)),
            ArchError::NotImplemented(_) => {
                diag.with_help("use kind = \"square\" in the [switchbox] section")
            }
            _ => diag,
        }
    }
}
