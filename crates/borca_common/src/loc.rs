//! Grid locations of tiles, bels, and pips.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the device grid.
///
/// `x` and `y` select the tile, `z` the slot within it (bel index for bels,
/// always 0 for switch-box pips).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Loc {
    /// Column of the tile.
    pub x: u32,
    /// Row of the tile.
    pub y: u32,
    /// Slot within the tile.
    pub z: u32,
}

impl Loc {
    /// Creates a new location.
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{}Y{}Z{}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_prefix() {
        assert_eq!(Loc::new(3, 5, 19).to_string(), "X3Y5Z19");
    }

    #[test]
    fn ordering_is_column_major() {
        let mut locs = vec![Loc::new(1, 0, 0), Loc::new(0, 1, 0), Loc::new(0, 0, 2)];
        locs.sort();
        assert_eq!(locs[0], Loc::new(0, 0, 2));
        assert_eq!(locs[1], Loc::new(0, 1, 0));
        assert_eq!(locs[2], Loc::new(1, 0, 0));
    }
}
