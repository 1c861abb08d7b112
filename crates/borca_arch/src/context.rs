//! The narrow interface through which generators declare architecture objects.

use crate::error::ArchResult;
use crate::types::{BelDecl, BelPinDecl, Delay, PipDecl, WireDecl};
use borca_common::Ident;

/// An architecture context that accepts declarations.
///
/// Generators in this crate never look inside the context: they intern names,
/// convert delays, and submit one declaration per call. The place-and-route
/// framework owns the storage; [`DeclRecorder`](crate::DeclRecorder) is the
/// in-memory implementation used by the CLI and tests.
pub trait ArchContext {
    /// Interns a name.
    fn id(&self, name: &str) -> Ident;

    /// Resolves an interned name.
    fn name_of(&self, id: Ident) -> &str;

    /// Declares a wire.
    fn add_wire(&mut self, wire: WireDecl) -> ArchResult<()>;

    /// Declares a pip. Both wires must already exist.
    fn add_pip(&mut self, pip: PipDecl) -> ArchResult<()>;

    /// Declares a bel.
    fn add_bel(&mut self, bel: BelDecl) -> ArchResult<()>;

    /// Attaches a pin of an existing bel to an existing wire.
    fn add_bel_pin(&mut self, pin: BelPinDecl) -> ArchResult<()>;

    /// Converts nanoseconds to the context's delay representation.
    fn delay_from_ns(&self, ns: f64) -> Delay {
        Delay::from_ns(ns)
    }
}
