//! The `(cell type, parameter) -> directive` table.

use borca_config::{BitstreamConfig, ParamEntry};
use borca_diagnostics::{Category, Diagnostic, DiagnosticCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How the FASM writer treats one cell parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterConfig {
    /// Whether the parameter is written at all.
    pub write: bool,
    /// Whether the value is written as a binary number.
    pub numeric: bool,
    /// Bit width of a numeric value.
    pub width: Option<u32>,
}

impl ParameterConfig {
    /// A parameter the writer skips.
    pub const fn skip() -> Self {
        Self {
            write: false,
            numeric: false,
            width: None,
        }
    }

    /// A numeric parameter of `width` bits.
    pub const fn numeric(width: u32) -> Self {
        Self {
            write: true,
            numeric: true,
            width: Some(width),
        }
    }
}

impl fmt::Display for ParameterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.write {
            return write!(f, "skip");
        }
        match (self.numeric, self.width) {
            (true, Some(w)) => write!(f, "numeric[{w}]"),
            (true, None) => write!(f, "numeric"),
            (false, _) => write!(f, "flag"),
        }
    }
}

/// Lookup key: cell type and parameter name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParamKey {
    /// Cell type, e.g. `BORCA_SLICE`.
    pub cell_type: String,
    /// Parameter name, e.g. `INIT`.
    pub parameter: String,
}

impl ParamKey {
    /// Creates a key.
    pub fn new(cell_type: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            cell_type: cell_type.into(),
            parameter: parameter.into(),
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.cell_type, self.parameter)
    }
}

/// Errors building a parameter table from explicit entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// The same key appears twice.
    #[error("parameter {0} listed more than once")]
    Duplicate(ParamKey),
    /// A written numeric parameter has no usable width.
    #[error("numeric parameter {0} needs a width greater than zero")]
    MissingWidth(ParamKey),
}

impl ParamError {
    /// Converts the error into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (number, key) = match self {
            ParamError::Duplicate(key) => (101, key),
            ParamError::MissingWidth(key) => (102, key),
        };
        Diagnostic::error(DiagnosticCode::new(Category::Bitstream, number), self.to_string())
            .on(key.to_string())
    }
}

/// Sorted parameter table. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: BTreeMap<ParamKey, ParameterConfig>,
}

impl ParamMap {
    /// The stock Borca table for `k`-input LUTs.
    pub fn borca_default(k: u32) -> Self {
        let slice = "BORCA_SLICE";
        let iob = "BORCA_IOB";
        let entries = [
            (ParamKey::new(slice, "K"), ParameterConfig::skip()),
            (ParamKey::new(slice, "INIT"), ParameterConfig::numeric(1 << k)),
            (ParamKey::new(slice, "FF_USED"), ParameterConfig::numeric(1)),
            (ParamKey::new(iob, "INPUT_USED"), ParameterConfig::numeric(1)),
            (ParamKey::new(iob, "OUTPUT_USED"), ParameterConfig::numeric(1)),
            (ParamKey::new(iob, "ENABLE_USED"), ParameterConfig::numeric(1)),
        ];
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Builds a table from explicit entries.
    pub fn from_entries(entries: &[ParamEntry]) -> Result<Self, ParamError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            let key = ParamKey::new(&entry.cell_type, &entry.parameter);
            if entry.write && entry.numeric && entry.width.unwrap_or(0) == 0 {
                return Err(ParamError::MissingWidth(key));
            }
            let config = ParameterConfig {
                write: entry.write,
                numeric: entry.numeric,
                width: entry.width,
            };
            if map.insert(key.clone(), config).is_some() {
                return Err(ParamError::Duplicate(key));
            }
        }
        Ok(Self { entries: map })
    }

    /// The configured table, or the stock one when `config` lists nothing.
    pub fn from_config(config: &BitstreamConfig, k: u32) -> Result<Self, ParamError> {
        if config.params.is_empty() {
            Ok(Self::borca_default(k))
        } else {
            Self::from_entries(&config.params)
        }
    }

    /// Looks up the directive for `parameter` of `cell_type`.
    pub fn get(&self, cell_type: &str, parameter: &str) -> Option<&ParameterConfig> {
        self.entries.get(&ParamKey::new(cell_type, parameter))
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, &ParameterConfig)> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cell: &str, param: &str, write: bool, numeric: bool, width: Option<u32>) -> ParamEntry {
        ParamEntry {
            cell_type: cell.into(),
            parameter: param.into(),
            write,
            numeric,
            width,
        }
    }

    #[test]
    fn default_table_k4() {
        let map = ParamMap::borca_default(4);
        assert_eq!(map.len(), 6);
        assert_eq!(map.get("BORCA_SLICE", "K"), Some(&ParameterConfig::skip()));
        assert_eq!(
            map.get("BORCA_SLICE", "INIT"),
            Some(&ParameterConfig::numeric(16))
        );
        assert_eq!(
            map.get("BORCA_IOB", "ENABLE_USED"),
            Some(&ParameterConfig::numeric(1))
        );
    }

    #[test]
    fn init_width_follows_k() {
        let map = ParamMap::borca_default(6);
        assert_eq!(map.get("BORCA_SLICE", "INIT").and_then(|c| c.width), Some(64));
    }

    #[test]
    fn unknown_key_is_none() {
        let map = ParamMap::borca_default(4);
        assert!(map.get("BORCA_SLICE", "NOPE").is_none());
        assert!(map.get("BORCA_IOB", "K").is_none());
    }

    #[test]
    fn iteration_sorted() {
        let map = ParamMap::borca_default(4);
        let keys: Vec<String> = map.iter().map(|(k, _)| k.to_string()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys[0], "BORCA_IOB.ENABLE_USED");
    }

    #[test]
    fn explicit_entries_replace_default() {
        let config = BitstreamConfig {
            params: vec![entry("BORCA_SLICE", "INIT", true, true, Some(8))],
        };
        let map = ParamMap::from_config(&config, 4).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("BORCA_SLICE", "INIT").and_then(|c| c.width), Some(8));

        let empty = ParamMap::from_config(&BitstreamConfig::default(), 4).unwrap();
        assert_eq!(empty, ParamMap::borca_default(4));
    }

    #[test]
    fn duplicate_entry_rejected() {
        let entries = [
            entry("BORCA_IOB", "INPUT_USED", true, true, Some(1)),
            entry("BORCA_IOB", "INPUT_USED", false, false, None),
        ];
        let err = ParamMap::from_entries(&entries).unwrap_err();
        assert_eq!(
            err,
            ParamError::Duplicate(ParamKey::new("BORCA_IOB", "INPUT_USED"))
        );
        assert_eq!(err.to_diagnostic().code.to_string(), "B101");
    }

    #[test]
    fn numeric_without_width_rejected() {
        let err = ParamMap::from_entries(&[entry("BORCA_SLICE", "INIT", true, true, None)])
            .unwrap_err();
        assert!(matches!(err, ParamError::MissingWidth(_)));
        let diag = err.to_diagnostic();
        assert_eq!(diag.object.as_deref(), Some("BORCA_SLICE.INIT"));
    }

    #[test]
    fn display_forms() {
        assert_eq!(ParameterConfig::skip().to_string(), "skip");
        assert_eq!(ParameterConfig::numeric(16).to_string(), "numeric[16]");
        let flag = ParameterConfig {
            write: true,
            numeric: false,
            width: None,
        };
        assert_eq!(flag.to_string(), "flag");
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_string(&ParameterConfig::numeric(1)).unwrap();
        assert_eq!(json, r#"{"write":true,"numeric":true,"width":1}"#);
    }
}
