//! Diagnostic creation, severity management, and rendering.
//!
//! Every Borca stage reports progress and problems as structured
//! [`Diagnostic`] messages collected in a thread-safe [`DiagnosticSink`].
//! The CLI renders them with [`TerminalRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
