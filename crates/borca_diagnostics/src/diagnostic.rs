//! Structured diagnostic messages with severity, codes, and locations.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use borca_common::Loc;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Each diagnostic carries a severity, a unique code, a message, and
/// optionally the grid location or object name it concerns, plus notes and
/// help lines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The grid location the diagnostic refers to, if any.
    pub loc: Option<Loc>,
    /// The cell, net, wire, or pip the diagnostic refers to, if any.
    pub object: Option<String>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Actionable suggestions.
    pub help: Vec<String>,
}

impl Diagnostic {
    fn with_severity(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            loc: None,
            object: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, code, message)
    }

    /// Creates a new informational note, used for stage progress.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Note, code, message)
    }

    /// Attaches a grid location.
    pub fn at(mut self, loc: Loc) -> Self {
        self.loc = Some(loc);
        self
    }

    /// Attaches the name of the object concerned.
    pub fn on(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Arch, 101);
        let diag = Diagnostic::error(code, "wire list length mismatch");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "wire list length mismatch");
        assert_eq!(format!("{}", diag.code), "A101");
        assert!(diag.loc.is_none());
    }

    #[test]
    fn create_note() {
        let code = DiagnosticCode::new(Category::Info, 1);
        let diag = Diagnostic::note(code, "Packing IOs..");
        assert_eq!(diag.severity, Severity::Note);
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Pack, 201);
        let diag = Diagnostic::warning(code, "bidirectional IO left unpacked")
            .at(Loc::new(1, 2, 0))
            .on("led_iobuf")
            .with_note("only input and output buffers become DFFER cells")
            .with_help("instantiate BORCA_IOB manually");
        assert_eq!(diag.loc, Some(Loc::new(1, 2, 0)));
        assert_eq!(diag.object.as_deref(), Some("led_iobuf"));
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Arch, 102);
        let diag = Diagnostic::error(code, "not implemented").on("rect_usb_x0y0");
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, "not implemented");
        assert_eq!(back.object.as_deref(), Some("rect_usb_x0y0"));
    }
}
