//! Content flags for collision filtering.
//!
//! Every static brush carries a set of content flags. Contact queries take a
//! mask and only report brushes whose contents intersect it.

use serde::{Deserialize, Serialize};

/// Content flags describe what type of volume a brush is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space - nothing here.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry - maze walls.
    pub const SOLID: Self = Self(1 << 0);

    /// Ground plane.
    pub const FLOOR: Self = Self(1 << 1);

    /// Standard mask for player body contacts.
    pub const MASK_PLAYER_SOLID: Self = Self(Self::SOLID.0 | Self::FLOOR.0);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Combine two flag sets.
    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_flags_operations() {
        let combined = ContentFlags::EMPTY | ContentFlags::SOLID;

        assert!(combined.contains(ContentFlags::SOLID));
        assert!(!combined.contains(ContentFlags::FLOOR));
        assert!(!combined.intersects(ContentFlags::FLOOR));
        assert!(combined.intersects(ContentFlags::SOLID));
        assert_eq!(
            ContentFlags::SOLID.union(ContentFlags::FLOOR),
            ContentFlags::SOLID | ContentFlags::FLOOR
        );
    }

    #[test]
    fn test_player_mask() {
        let mask = ContentFlags::MASK_PLAYER_SOLID;
        assert!(mask.contains(ContentFlags::SOLID));
        assert!(mask.contains(ContentFlags::FLOOR));
        assert!(!mask.intersects(ContentFlags::EMPTY));
    }
}
