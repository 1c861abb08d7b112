//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Architecture declaration diagnostics, prefixed with `A`.
    Arch,
    /// Packing diagnostics, prefixed with `P`.
    Pack,
    /// Bitstream parameter table diagnostics, prefixed with `B`.
    Bitstream,
    /// Configuration diagnostics, prefixed with `C`.
    Config,
    /// Progress notes, prefixed with `I`.
    Info,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Arch => 'A',
            Category::Pack => 'P',
            Category::Bitstream => 'B',
            Category::Config => 'C',
            Category::Info => 'I',
        }
    }
}

/// A diagnostic code: category prefix plus a zero-padded 3-digit number,
/// e.g. `A101`, `P203`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Arch.prefix(), 'A');
        assert_eq!(Category::Pack.prefix(), 'P');
        assert_eq!(Category::Bitstream.prefix(), 'B');
        assert_eq!(Category::Config.prefix(), 'C');
        assert_eq!(Category::Info.prefix(), 'I');
    }

    #[test]
    fn display_format() {
        let code = DiagnosticCode::new(Category::Arch, 101);
        assert_eq!(format!("{code}"), "A101");

        let code = DiagnosticCode::new(Category::Pack, 3);
        assert_eq!(format!("{code}"), "P003");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Config, 12);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
