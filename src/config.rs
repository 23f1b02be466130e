//! # Engine Configuration
//!
//! All tunables of the viewer, grouped by concern. Defaults reproduce the stock
//! world: a 30x20x30 grid, a 0.6x1.8x0.6 player box and per-tick physics constants.
//!
//! The configuration is read from a JSON file (`voxel_viewer.json` by default, or the
//! path in `VOXEL_VIEWER_CONFIG`). Every field is optional; anything missing keeps its
//! default. A missing file is normal, a broken one is reported and ignored.

use std::{fs, path::Path};

use log::{info, warn};
use serde::Deserialize;

use crate::{engine_state::voxels::block::block_type::BlockType, error::ConfigError};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "voxel_viewer.json";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "VOXEL_VIEWER_CONFIG";

/// Top level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Voxel grid dimensions
    pub world: WorldConfig,
    /// Player body, physics and controls
    pub player: PlayerConfig,
    /// Window, projection, lighting and asset paths
    pub render: RenderConfig,
    /// Block counts the player starts with
    pub inventory: Vec<InventoryEntry>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            render: RenderConfig::default(),
            inventory: Self::default_inventory(),
        }
    }
}

/// Dimensions of the voxel grid. Fixed for the lifetime of the world.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Cells along X
    pub width: usize,
    /// Cells along Y
    pub height: usize,
    /// Cells along Z
    pub depth: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
            depth: 30,
        }
    }
}

/// Player body and movement tuning. Speeds and accelerations are per simulation tick.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Full AABB extents (width, height, depth)
    pub aabb_dims: [f32; 3],
    /// Vertical velocity lost each tick
    pub gravity: f32,
    /// Vertical velocity set by a jump
    pub jump_strength: f32,
    /// Horizontal distance covered per tick while a movement key is held
    pub move_speed: f32,
    /// Degrees of rotation per pixel of mouse motion
    pub mouse_sensitivity: f32,
    /// Initial yaw in degrees
    pub spawn_yaw: f32,
    /// Initial pitch in degrees
    pub spawn_pitch: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            aabb_dims: [0.6, 1.8, 0.6],
            gravity: 0.015,
            jump_strength: 0.23,
            move_speed: 0.1,
            mouse_sensitivity: 0.1,
            spawn_yaw: 0.0,
            spawn_pitch: -30.0,
        }
    }
}

/// Window, projection and lighting settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Initial window width in pixels
    pub window_width: u32,
    /// Initial window height in pixels
    pub window_height: u32,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    /// Near clip distance
    pub z_near: f32,
    /// Far clip distance
    pub z_far: f32,
    /// Direction towards the light, normalised on use
    pub light_direction: [f32; 3],
    /// Brightness floor of unlit faces, in [0, 1]
    pub ambient_strength: f32,
    /// Clear colour (RGB)
    pub sky_color: [f64; 3],
    /// WGSL source for the block and outline programs
    pub shader_path: String,
    /// PNG texture atlas
    pub atlas_path: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            fov_y: 45.0,
            z_near: 0.1,
            z_far: 100.0,
            light_direction: [0.8, 1.0, 0.6],
            ambient_strength: 0.4,
            sky_color: [0.5, 0.7, 1.0],
            shader_path: String::from("assets/shaders/block.wgsl"),
            atlas_path: String::from("assets/textures/atlas.png"),
        }
    }
}

/// One starting inventory stack.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InventoryEntry {
    /// Block type of the stack
    pub block: BlockType,
    /// Number of blocks
    pub count: u32,
}

impl EngineConfig {
    /// Loads the configuration from `VOXEL_VIEWER_CONFIG` or [`DEFAULT_CONFIG_PATH`],
    /// falling back to defaults when the file is absent or invalid.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load_or_default(&path)
    }

    /// Loads the configuration at `path`, falling back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at '{}', using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded config from '{}'", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config '{}': {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reads and parses the file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Starting stacks used when the file names none.
    pub fn default_inventory() -> Vec<InventoryEntry> {
        vec![
            InventoryEntry { block: BlockType::Dirt, count: 50 },
            InventoryEntry { block: BlockType::Stone, count: 30 },
            InventoryEntry { block: BlockType::Grass, count: 10 },
            InventoryEntry { block: BlockType::Wood, count: 5 },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config.world.width, 30);
        assert_eq!(config.world.height, 20);
        assert_eq!(config.player.aabb_dims, [0.6, 1.8, 0.6]);
        assert_eq!(config.render.ambient_strength, 0.4);
        assert_eq!(config.inventory.len(), 4);
    }

    #[test]
    fn partial_sections_override_only_named_fields() {
        let config =
            EngineConfig::from_json(r#"{ "world": { "height": 9 }, "player": { "gravity": 0.02 } }"#)
                .unwrap();
        assert_eq!(config.world.width, 30);
        assert_eq!(config.world.height, 9);
        assert_eq!(config.player.gravity, 0.02);
        assert_eq!(config.player.jump_strength, 0.23);
    }

    #[test]
    fn inventory_uses_block_names() {
        let config = EngineConfig::from_json(
            r#"{ "inventory": [ { "block": "leaves", "count": 3 } ] }"#,
        )
        .unwrap();
        assert_eq!(config.inventory.len(), 1);
        assert_eq!(config.inventory[0].block, BlockType::Leaves);
        assert_eq!(config.inventory[0].count, 3);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            EngineConfig::from_json("{ world: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = EngineConfig::load_or_default("definitely/not/here.json");
        assert_eq!(config.world.depth, 30);
        assert_eq!(config.inventory.len(), 4);
    }
}
