//! Cell parameter values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The value of a cell parameter such as `K`, `INIT`, or `FF_USED`.
///
/// A parameter is either a plain integer or a bit string written most
/// significant bit first (`"1010"` is the value 10 with width 4). The JSON
/// form is untagged: numbers become [`Property::Int`], strings
/// [`Property::Bits`].
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Property {
    /// An integer parameter.
    Int(i64),
    /// A bit-string parameter, MSB first.
    Bits(String),
}

impl Property {
    /// A bit string of `width` zeros.
    pub fn zeros(width: usize) -> Self {
        Property::Bits("0".repeat(width))
    }

    /// A bit string of `width` ones.
    pub fn ones(width: usize) -> Self {
        Property::Bits("1".repeat(width))
    }

    /// Returns the integer value, if representable.
    ///
    /// Bit strings convert when they consist only of `0`/`1` and fit in 63 bits.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Property::Int(v) => Some(*v),
            Property::Bits(s) => {
                let trimmed = s.trim_start_matches('0');
                if trimmed.is_empty() {
                    return s.chars().all(|c| c == '0').then_some(0);
                }
                if trimmed.len() > 63 {
                    return None;
                }
                i64::from_str_radix(trimmed, 2).ok()
            }
        }
    }
}

impl From<i64> for Property {
    fn from(value: i64) -> Self {
        Property::Int(value)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Int(v) => write!(f, "{v}"),
            Property::Bits(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_and_ones() {
        assert_eq!(Property::zeros(4), Property::Bits("0000".into()));
        assert_eq!(Property::ones(3), Property::Bits("111".into()));
        assert_eq!(Property::ones(3).as_int(), Some(7));
        assert_eq!(Property::zeros(4).as_int(), Some(0));
    }

    #[test]
    fn non_binary_string_has_no_int() {
        assert_eq!(Property::Bits("10x1".into()).as_int(), None);
        assert_eq!(Property::Bits("ü1".into()).as_int(), None);
        assert_eq!(Property::Bits("00ü".into()).as_int(), None);
    }

    #[test]
    fn wide_bit_string_has_no_int() {
        let wide = Property::ones(64);
        assert_eq!(wide.as_int(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Property::Int(4).to_string(), "4");
        assert_eq!(Property::Bits("10".into()).to_string(), "10");
    }

    #[test]
    fn json_is_untagged() {
        let int: Property = serde_json::from_str("4").unwrap();
        assert_eq!(int, Property::Int(4));
        let bits: Property = serde_json::from_str("\"1010\"").unwrap();
        assert_eq!(bits, Property::Bits("1010".into()));
        assert_eq!(serde_json::to_string(&Property::Int(1)).unwrap(), "1");
    }
}
