//! # World Module
//!
//! This module provides the `VoxelGrid` struct, the single dense block store of a
//! running world. Every other component (collision, raycasting, culling, drawing)
//! reads it through the same small interface, and block break/place goes through
//! [`VoxelGrid::set`].
//!
//! ## Storage
//!
//! Cells are stored as `BlockTypeSize` values in one flat vector, laid out x-major:
//! `index = (x * height + y) * depth + z`. The size is fixed at construction.
//!
//! ## Bounds
//!
//! Reads never fail: any coordinate outside `[0, width) x [0, height) x [0, depth)`
//! reads as `Empty` and is not solid. Writes outside the grid are rejected with
//! [`GridError::OutOfBounds`].

use cgmath::Point3;
use log::info;

use crate::config::WorldConfig;
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::block::BlockTypeSize;
use crate::error::GridError;

/// Blocks placed on top of the terrain after generation, as offsets `(x, dy, z)`
/// where `dy` is measured up from the ground level.
const SURFACE_STRUCTURES: [(i32, i32, i32, BlockType); 6] = [
    (1, 1, 1, BlockType::Stone),
    (2, 1, 2, BlockType::Stone),
    (2, 2, 2, BlockType::Stone),
    (5, 1, 5, BlockType::Wood),
    (5, 2, 5, BlockType::Wood),
    (5, 3, 5, BlockType::Leaves),
];

/// A stone cross buried in the dirt, at absolute coordinates.
const BURIED_STRUCTURES: [(i32, i32, i32, BlockType); 7] = [
    (4, 2, 4, BlockType::Stone),
    (3, 2, 4, BlockType::Stone),
    (5, 2, 4, BlockType::Stone),
    (4, 1, 4, BlockType::Stone),
    (4, 3, 4, BlockType::Stone),
    (4, 2, 3, BlockType::Stone),
    (4, 2, 5, BlockType::Stone),
];

/// Dense three-dimensional grid of block types.
///
/// # Examples
///
/// ```
/// use voxel_viewer::engine_state::voxels::{block::block_type::BlockType, world::VoxelGrid};
///
/// let mut grid = VoxelGrid::new(8, 8, 8);
/// assert!(!grid.is_solid(3, 3, 3));
/// grid.set(3, 3, 3, BlockType::Stone).unwrap();
/// assert!(grid.is_solid(3, 3, 3));
/// assert!(grid.set(8, 0, 0, BlockType::Stone).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    width: usize,
    height: usize,
    depth: usize,
    cells: Vec<BlockTypeSize>,
}

impl VoxelGrid {
    /// Creates a grid of the given dimensions with every cell `Empty`.
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            cells: vec![BlockType::Empty.as_int(); width * height * depth],
        }
    }

    /// Creates and generates the world described by `config`.
    pub fn from_config(config: &WorldConfig) -> Self {
        let mut grid = Self::new(config.width, config.height, config.depth);
        grid.generate();
        info!(
            "Generated {}x{}x{} world, ground level {}, {} solid blocks",
            grid.width,
            grid.height,
            grid.depth,
            grid.ground_level(),
            grid.solid_cells().count()
        );
        grid
    }

    /// Cells along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cells along Y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells along Z.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Y of the grass layer produced by [`VoxelGrid::generate`].
    pub fn ground_level(&self) -> i32 {
        (self.height / 3) as i32
    }

    /// Fills the grid with flat terrain and the fixed decorative structures.
    ///
    /// Every column gets dirt below the ground level and a single grass cell at it;
    /// everything above is emptied. Structure blocks that do not fit inside the grid
    /// are skipped one at a time, so small worlds keep whatever part of the decoration
    /// fits. There is no all-or-nothing size threshold: a 3x3x3 world still gets the
    /// two stone blocks at `(1, ground + 1, 1)` and `(2, ground + 1, 2)`.
    pub fn generate(&mut self) {
        let ground = self.ground_level();

        for x in 0..self.width as i32 {
            for y in 0..self.height as i32 {
                for z in 0..self.depth as i32 {
                    let block = match y.cmp(&ground) {
                        std::cmp::Ordering::Less => BlockType::Dirt,
                        std::cmp::Ordering::Equal => BlockType::Grass,
                        std::cmp::Ordering::Greater => BlockType::Empty,
                    };
                    self.write(x, y, z, block);
                }
            }
        }

        let surface = SURFACE_STRUCTURES
            .iter()
            .map(|&(x, dy, z, block)| (x, ground + dy, z, block));
        for (x, y, z, block) in surface.chain(BURIED_STRUCTURES.iter().copied()) {
            if self.in_bounds(x, y, z) {
                self.write(x, y, z, block);
            }
        }
    }

    /// Whether `(x, y, z)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        (0..self.width as i32).contains(&x)
            && (0..self.height as i32).contains(&y)
            && (0..self.depth as i32).contains(&z)
    }

    /// Whether the point lies inside the grid.
    pub fn contains(&self, position: Point3<i32>) -> bool {
        self.in_bounds(position.x, position.y, position.z)
    }

    /// Block type at `(x, y, z)`, `Empty` outside the grid.
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockType {
        match self.index(x, y, z) {
            Some(index) => BlockType::from_int(self.cells[index]),
            None => BlockType::Empty,
        }
    }

    /// Whether the cell holds a block. Always `false` outside the grid.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_solid()
    }

    /// Replaces the block at `(x, y, z)`.
    ///
    /// # Returns
    ///
    /// The block type previously stored in the cell, or `GridError::OutOfBounds` if
    /// the cell is outside the grid (the grid is left untouched).
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> Result<BlockType, GridError> {
        let index = self.index(x, y, z).ok_or(GridError::OutOfBounds { x, y, z })?;
        let previous = BlockType::from_int(self.cells[index]);
        self.cells[index] = block.as_int();
        Ok(previous)
    }

    /// Iterates over every non-empty cell with its type, in storage order.
    pub fn solid_cells(&self) -> impl Iterator<Item = (Point3<i32>, BlockType)> + '_ {
        let (height, depth) = (self.height, self.depth);
        self.cells.iter().enumerate().filter_map(move |(index, &cell)| {
            let block = BlockType::from_int(cell);
            if !block.is_solid() {
                return None;
            }
            let z = index % depth;
            let y = (index / depth) % height;
            let x = index / (depth * height);
            Some((Point3::new(x as i32, y as i32, z as i32), block))
        })
    }

    fn write(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if let Some(index) = self.index(x, y, z) {
            self.cells[index] = block.as_int();
        }
    }

    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        Some((x * self.height + y) * self.depth + z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure_cells(grid: &VoxelGrid) -> Vec<(i32, i32, i32)> {
        let ground = grid.ground_level();
        SURFACE_STRUCTURES
            .iter()
            .map(|&(x, dy, z, _)| (x, ground + dy, z))
            .chain(BURIED_STRUCTURES.iter().map(|&(x, y, z, _)| (x, y, z)))
            .collect()
    }

    #[test]
    fn out_of_bounds_is_never_solid() {
        let mut grid = VoxelGrid::new(4, 4, 4);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    grid.set(x, y, z, BlockType::Stone).unwrap();
                }
            }
        }

        for (x, y, z) in [(-1, 0, 0), (4, 0, 0), (0, -1, 0), (0, 4, 0), (0, 0, -1), (0, 0, 4), (i32::MIN, i32::MAX, 2)] {
            assert!(!grid.is_solid(x, y, z), "({x}, {y}, {z})");
            assert_eq!(grid.get(x, y, z), BlockType::Empty);
        }
    }

    #[test]
    fn set_outside_the_grid_is_rejected() {
        let mut grid = VoxelGrid::new(3, 3, 3);
        assert_eq!(
            grid.set(3, 0, 0, BlockType::Dirt),
            Err(GridError::OutOfBounds { x: 3, y: 0, z: 0 })
        );
        assert_eq!(grid.set(0, -1, 0, BlockType::Dirt).unwrap_err(), GridError::OutOfBounds { x: 0, y: -1, z: 0 });
        assert_eq!(grid.solid_cells().count(), 0);
    }

    #[test]
    fn set_returns_the_replaced_block() {
        let mut grid = VoxelGrid::new(3, 3, 3);
        assert_eq!(grid.set(1, 2, 0, BlockType::Wood), Ok(BlockType::Empty));
        assert_eq!(grid.set(1, 2, 0, BlockType::Empty), Ok(BlockType::Wood));
        assert!(!grid.is_solid(1, 2, 0));
    }

    #[test]
    fn generated_terrain_is_layered() {
        let config = WorldConfig::default();
        let grid = VoxelGrid::from_config(&config);
        let ground = grid.ground_level();
        assert_eq!(ground, 6);

        let structures = structure_cells(&grid);
        for x in 0..config.width as i32 {
            for z in 0..config.depth as i32 {
                for y in 0..config.height as i32 {
                    if structures.contains(&(x, y, z)) {
                        continue;
                    }
                    let expected = match y {
                        y if y < ground => BlockType::Dirt,
                        y if y == ground => BlockType::Grass,
                        _ => BlockType::Empty,
                    };
                    assert_eq!(grid.get(x, y, z), expected, "({x}, {y}, {z})");
                }
            }
        }
    }

    #[test]
    fn generated_structures_are_placed() {
        let grid = VoxelGrid::from_config(&WorldConfig::default());
        let ground = grid.ground_level();
        assert_eq!(grid.get(5, ground + 1, 5), BlockType::Wood);
        assert_eq!(grid.get(5, ground + 2, 5), BlockType::Wood);
        assert_eq!(grid.get(5, ground + 3, 5), BlockType::Leaves);
        assert_eq!(grid.get(2, ground + 2, 2), BlockType::Stone);
        assert_eq!(grid.get(4, 2, 4), BlockType::Stone);
        assert_eq!(grid.get(4, 2, 5), BlockType::Stone);
    }

    #[test]
    fn small_worlds_keep_the_structures_that_fit() {
        let mut grid = VoxelGrid::new(3, 3, 3);
        grid.generate();
        assert_eq!(grid.ground_level(), 1);
        assert_eq!(grid.get(1, 2, 1), BlockType::Stone);
        assert_eq!(grid.get(2, 2, 2), BlockType::Stone);
        assert_eq!(grid.get(0, 0, 0), BlockType::Dirt);
        assert_eq!(grid.get(0, 1, 2), BlockType::Grass);
    }

    #[test]
    fn solid_cells_reports_coordinates() {
        let mut grid = VoxelGrid::new(2, 5, 3);
        grid.set(1, 4, 2, BlockType::Leaves).unwrap();
        grid.set(0, 1, 0, BlockType::Dirt).unwrap();
        let cells: Vec<_> = grid.solid_cells().collect();
        assert_eq!(
            cells,
            vec![
                (Point3::new(0, 1, 0), BlockType::Dirt),
                (Point3::new(1, 4, 2), BlockType::Leaves),
            ]
        );
    }
}
