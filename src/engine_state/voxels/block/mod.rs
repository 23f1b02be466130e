//! # Block Module
//!
//! This module provides the block-related data for the voxel engine: block type
//! definitions, the six block faces, and the texture atlas table mapping each type
//! to its sub-rectangle of the atlas image.

use block_type::BlockType;
use log::warn;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for compact storage of the voxel grid.
pub type BlockTypeSize = u8;

/// A sub-rectangle of the texture atlas in normalized coordinates.
///
/// `v` is measured from the bottom edge of the atlas image, the same convention the
/// atlas packer writes. The block shader flips it when sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    /// Left edge
    pub u_min: f32,
    /// Bottom edge
    pub v_min: f32,
    /// Right edge
    pub u_max: f32,
    /// Top edge
    pub v_max: f32,
}

impl UvRect {
    /// The whole atlas. Used when a block type has no entry in the table.
    pub const FULL: UvRect = UvRect {
        u_min: 0.0,
        v_min: 0.0,
        u_max: 1.0,
        v_max: 1.0,
    };

    /// The per-draw uniform form of this rect: `(u_min, v_min, width, height)`.
    pub fn offset_scale(&self) -> [f32; 4] {
        [
            self.u_min,
            self.v_min,
            self.u_max - self.u_min,
            self.v_max - self.v_min,
        ]
    }

    /// Maps a quad-local UV in `[0, 1]²` into this rect (`offset + uv * scale`).
    pub fn transform(&self, uv: [f32; 2]) -> [f32; 2] {
        let [u_off, v_off, u_scale, v_scale] = self.offset_scale();
        [u_off + uv[0] * u_scale, v_off + uv[1] * v_scale]
    }
}

/// Atlas sub-rectangles keyed by block name.
///
/// The atlas is a vertical strip of five 16x16 tiles, grass on top and leaves at the
/// bottom, so each tile covers a fifth of the `v` range.
pub static ATLAS_UV_COORDINATES: phf::Map<&'static str, UvRect> = phf::phf_map! {
    "grass" => UvRect { u_min: 0.0, v_min: 0.8, u_max: 1.0, v_max: 1.0 },
    "dirt" => UvRect { u_min: 0.0, v_min: 0.6, u_max: 1.0, v_max: 0.8 },
    "stone" => UvRect { u_min: 0.0, v_min: 0.4, u_max: 1.0, v_max: 0.6 },
    "wood" => UvRect { u_min: 0.0, v_min: 0.2, u_max: 1.0, v_max: 0.4 },
    "leaves" => UvRect { u_min: 0.0, v_min: 0.0, u_max: 1.0, v_max: 0.2 },
};

/// Looks up the atlas rect for a block name.
pub fn atlas_rect_by_name(name: &str) -> Option<UvRect> {
    ATLAS_UV_COORDINATES.get(name).copied()
}

/// Atlas rect for a block type, falling back to [`UvRect::FULL`] for unknown keys.
pub fn atlas_rect(block_type: BlockType) -> UvRect {
    match atlas_rect_by_name(block_type.name()) {
        Some(rect) => rect,
        None => {
            warn!(
                "No atlas entry for block type '{}', using full texture",
                block_type.name()
            );
            UvRect::FULL
        }
    }
}
