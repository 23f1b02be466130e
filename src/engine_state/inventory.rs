//! # Inventory Module
//!
//! Block counts carried by the player and the four-slot hotbar used to choose what
//! gets placed. Breaking a block adds it to the inventory; placing one spends it.

use std::collections::HashMap;

use cgmath::Point3;
use log::debug;

use crate::config::InventoryEntry;

use super::voxels::{block::block_type::BlockType, raycast::RaycastHit, world::VoxelGrid};

/// Block types on the hotbar, selected with keys 1 to 4.
pub const HOTBAR_SLOTS: [BlockType; 4] = [
    BlockType::Grass,
    BlockType::Dirt,
    BlockType::Stone,
    BlockType::Wood,
];

/// Player inventory with hotbar selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    counts: HashMap<BlockType, u32>,
    selected: usize,
}

impl Inventory {
    /// Creates an inventory holding `entries`, with the first hotbar slot selected.
    ///
    /// Repeated block types are summed.
    pub fn new(entries: &[InventoryEntry]) -> Self {
        let mut counts = HashMap::new();
        for entry in entries {
            *counts.entry(entry.block).or_insert(0) += entry.count;
        }
        Self { counts, selected: 0 }
    }

    /// Number of `block` held.
    pub fn count(&self, block: BlockType) -> u32 {
        self.counts.get(&block).copied().unwrap_or(0)
    }

    /// Index of the selected hotbar slot.
    pub fn selected_slot(&self) -> usize {
        self.selected
    }

    /// Block type of the selected hotbar slot.
    pub fn selected_block(&self) -> BlockType {
        HOTBAR_SLOTS[self.selected]
    }

    /// Selects hotbar slot `slot`. Out-of-range slots are ignored.
    pub fn select_slot(&mut self, slot: usize) -> bool {
        if slot < HOTBAR_SLOTS.len() {
            self.selected = slot;
            true
        } else {
            false
        }
    }

    /// Removes the targeted block and adds it to the inventory.
    ///
    /// Returns the type broken, or `None` if the cell was already empty.
    pub fn break_block(&mut self, grid: &mut VoxelGrid, target: &RaycastHit) -> Option<BlockType> {
        let Point3 { x, y, z } = target.hit;
        let block = grid.get(x, y, z);
        if !block.is_solid() {
            return None;
        }

        grid.set(x, y, z, BlockType::Empty).ok()?;
        *self.counts.entry(block).or_insert(0) += 1;
        debug!("Broke {} at ({}, {}, {})", block.name(), x, y, z);
        Some(block)
    }

    /// Places the selected block in the cell in front of the targeted block.
    ///
    /// Refused (returns `None`) when there is no in-bounds previous cell, the cell is
    /// occupied, or none of the selected type is left.
    pub fn place_block(&mut self, grid: &mut VoxelGrid, target: &RaycastHit) -> Option<Point3<i32>> {
        let block = self.selected_block();
        let Some(cell) = target.previous else {
            debug!("Placement refused: no cell in front of the target");
            return None;
        };
        if grid.get(cell.x, cell.y, cell.z) != BlockType::Empty {
            debug!("Placement refused: ({}, {}, {}) is occupied", cell.x, cell.y, cell.z);
            return None;
        }
        if self.count(block) == 0 {
            debug!("Placement refused: no {} left", block.name());
            return None;
        }

        grid.set(cell.x, cell.y, cell.z, block).ok()?;
        if let Some(count) = self.counts.get_mut(&block) {
            *count -= 1;
        }
        debug!("Placed {} at ({}, {}, {})", block.name(), cell.x, cell.y, cell.z);
        Some(cell)
    }

    /// One-line hotbar summary, the selected slot in brackets.
    pub fn hotbar_summary(&self) -> String {
        HOTBAR_SLOTS
            .iter()
            .enumerate()
            .map(|(slot, &block)| {
                let label = format!("{} {}", block.name(), self.count(block));
                if slot == self.selected {
                    format!("[{label}]")
                } else {
                    label
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
