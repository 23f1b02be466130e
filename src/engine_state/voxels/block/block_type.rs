//! # Block Type Module
//!
//! This module defines the closed set of block types a voxel cell can hold, together
//! with the per-type data the rest of the engine looks up: the atlas key and the
//! display color used by the hotbar.

use num_derive::FromPrimitive;
use serde::Deserialize;

use super::BlockTypeSize;

/// Enumerates every block type in the voxel world.
///
/// `Empty` is the sentinel for "no voxel present"; every other variant is solid.
/// The discriminants are the compact `BlockTypeSize` values stored in the grid, and
/// the `FromPrimitive` derive converts them back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum BlockType {
    /// No voxel. Non-solid and never drawn.
    Empty = 0,

    /// Top layer of the generated terrain.
    Grass = 1,

    /// Fill below the grass layer.
    Dirt = 2,

    /// Placed by the structure pass and by the player.
    Stone = 3,

    /// Tree trunk.
    Wood = 4,

    /// Tree canopy.
    Leaves = 5,
}

/// Fallback hotbar color for types without an entry in [`BlockType::display_color`].
pub const DEFAULT_DISPLAY_COLOR: [u8; 3] = [100, 100, 100];

impl BlockType {
    /// Every non-empty block type, in discriminant order.
    pub const SOLID_TYPES: [BlockType; 5] = [
        BlockType::Grass,
        BlockType::Dirt,
        BlockType::Stone,
        BlockType::Wood,
        BlockType::Leaves,
    ];

    /// Converts a stored `BlockTypeSize` back into a `BlockType`.
    ///
    /// Unknown values decode as `Empty` rather than panicking, so a corrupted cell reads
    /// as absent instead of taking the frame down.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        num_traits::FromPrimitive::from_u8(btype).unwrap_or(BlockType::Empty)
    }

    /// The compact storage value of this type.
    pub fn as_int(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether this type occupies its cell.
    pub fn is_solid(self) -> bool {
        self != BlockType::Empty
    }

    /// Lowercase name, also the key into the texture atlas table.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Empty => "empty",
            BlockType::Grass => "grass",
            BlockType::Dirt => "dirt",
            BlockType::Stone => "stone",
            BlockType::Wood => "wood",
            BlockType::Leaves => "leaves",
        }
    }

    /// RGB color shown for this type in the hotbar, `None` for `Empty`.
    pub fn display_color(self) -> Option<[u8; 3]> {
        match self {
            BlockType::Empty => None,
            BlockType::Grass => Some([0, 150, 0]),
            BlockType::Dirt => Some([139, 69, 19]),
            BlockType::Stone => Some([128, 128, 128]),
            BlockType::Wood => Some([160, 82, 45]),
            BlockType::Leaves => Some([0, 100, 0]),
        }
    }

    /// Display color with the gray fallback applied.
    pub fn display_color_or_default(self) -> [u8; 3] {
        self.display_color().unwrap_or(DEFAULT_DISPLAY_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_values_round_trip() {
        for block in BlockType::SOLID_TYPES {
            assert_eq!(BlockType::from_int(block.as_int()), block);
        }
        assert_eq!(BlockType::from_int(0), BlockType::Empty);
    }

    #[test]
    fn unknown_storage_value_reads_as_empty() {
        assert_eq!(BlockType::from_int(42), BlockType::Empty);
        assert!(!BlockType::from_int(255).is_solid());
    }

    #[test]
    fn only_empty_lacks_a_display_color() {
        assert_eq!(BlockType::Empty.display_color(), None);
        assert_eq!(BlockType::Empty.display_color_or_default(), DEFAULT_DISPLAY_COLOR);
        assert_eq!(BlockType::Dirt.display_color(), Some([139, 69, 19]));
        for block in BlockType::SOLID_TYPES {
            assert!(block.display_color().is_some());
        }
    }
}
