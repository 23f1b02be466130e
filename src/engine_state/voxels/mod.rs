//! # Voxel Core
//!
//! The data side of the world and the queries run against it.
//!
//! * **Block**: block types, cube faces and the atlas table
//! * **World**: the dense voxel grid and terrain generation
//! * **Collision**: axis-aligned box overlap against solid cells
//! * **Raycast**: the block under the crosshair and the cell in front of it
//!
//! Everything here is plain data and runs without a GPU.

pub mod block;
pub mod collision;
pub mod raycast;
pub mod world;
