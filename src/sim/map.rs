//! Tile map data supplied by the host engine
//!
//! Parsing/decoding of the map file is the engine's job; this module receives
//! the already-decoded layers, validates that everything a scene needs is
//! present, and answers solidity queries during movement resolution.
//! A missing required layer is fatal: scene construction aborts and nothing
//! is rendered.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TILE_SIZE;

/// Errors raised while validating engine-supplied map data
#[derive(Debug, Error)]
pub enum MapError {
    /// The ground tile layer was not present in the map
    #[error("ground layer missing from tile map")]
    GroundLayerMissing,

    /// Ground layer tile count does not match the declared dimensions
    #[error("ground layer size mismatch: expected {expected} tiles, got {actual}")]
    GroundLayerSize { expected: usize, actual: usize },

    /// The player object layer was missing or empty
    #[error("player spawn layer missing or empty")]
    PlayerSpawnMissing,

    /// The enemy factory object layer was not present (an empty one is fine)
    #[error("enemy factory layer missing from tile map")]
    EnemyLayerMissing,
}

/// Raw layers handed over by the engine's map loader.
///
/// Optional fields model layers that may be absent from the authored map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapData {
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Per-tile collision flags, row-major
    pub ground: Option<Vec<bool>>,
    /// Player spawn points (pixel coordinates); the first one is used
    pub player_spawns: Option<Vec<Vec2>>,
    /// Enemy factory spawn points (pixel coordinates)
    pub enemy_spawns: Option<Vec<Vec2>>,
}

impl MapData {
    /// A small bordered room used by the headless runner and tests:
    /// solid one-tile walls, the player in the middle, four enemy spawns
    /// in the corners.
    pub fn demo() -> Self {
        let width = 15u32;
        let height = 14u32;
        let mut ground = vec![false; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    ground[(y * width + x) as usize] = true;
                }
            }
        }
        let t = TILE_SIZE;
        Self {
            width,
            height,
            ground: Some(ground),
            player_spawns: Some(vec![Vec2::new(7.5 * t, 7.0 * t)]),
            enemy_spawns: Some(vec![
                Vec2::new(2.5 * t, 2.5 * t),
                Vec2::new(12.5 * t, 2.5 * t),
                Vec2::new(2.5 * t, 11.5 * t),
                Vec2::new(12.5 * t, 11.5 * t),
            ]),
        }
    }
}

/// Validated map ready for simulation queries
#[derive(Debug, Clone)]
pub struct TileMap {
    width: u32,
    height: u32,
    ground: Vec<bool>,
    player_spawn: Vec2,
    enemy_spawns: Vec<Vec2>,
}

impl TileMap {
    pub fn from_data(data: MapData) -> Result<Self, MapError> {
        let ground = data.ground.ok_or(MapError::GroundLayerMissing)?;
        let expected = (data.width * data.height) as usize;
        if ground.len() != expected {
            return Err(MapError::GroundLayerSize {
                expected,
                actual: ground.len(),
            });
        }
        let player_spawn = data
            .player_spawns
            .as_ref()
            .and_then(|spawns| spawns.first().copied())
            .ok_or(MapError::PlayerSpawnMissing)?;
        let enemy_spawns = data.enemy_spawns.ok_or(MapError::EnemyLayerMissing)?;
        Ok(Self {
            width: data.width,
            height: data.height,
            ground,
            player_spawn,
            enemy_spawns,
        })
    }

    pub fn player_spawn(&self) -> Vec2 {
        self.player_spawn
    }

    pub fn enemy_spawns(&self) -> &[Vec2] {
        &self.enemy_spawns
    }

    /// Map extent in pixels; doubles as the physics world bounds
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * TILE_SIZE,
            self.height as f32 * TILE_SIZE,
        )
    }

    /// Whether the tile at the given tile coordinates collides.
    /// Out-of-bounds counts as solid so bodies cannot leave the world.
    pub fn is_solid(&self, tile_x: i32, tile_y: i32) -> bool {
        if tile_x < 0 || tile_y < 0 || tile_x >= self.width as i32 || tile_y >= self.height as i32 {
            return true;
        }
        self.ground[(tile_y as u32 * self.width + tile_x as u32) as usize]
    }

    /// Solidity lookup for a pixel position
    pub fn solid_at(&self, pos: Vec2) -> bool {
        self.is_solid(
            (pos.x / TILE_SIZE).floor() as i32,
            (pos.y / TILE_SIZE).floor() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_map_validates() {
        let map = TileMap::from_data(MapData::demo()).unwrap();
        assert_eq!(map.enemy_spawns().len(), 4);
        assert!(map.solid_at(Vec2::new(1.0, 1.0)));
        assert!(!map.solid_at(map.player_spawn()));
    }

    #[test]
    fn test_missing_ground_layer_is_fatal() {
        let mut data = MapData::demo();
        data.ground = None;
        assert!(matches!(
            TileMap::from_data(data),
            Err(MapError::GroundLayerMissing)
        ));
    }

    #[test]
    fn test_ground_size_mismatch_is_fatal() {
        let mut data = MapData::demo();
        data.ground = Some(vec![false; 3]);
        assert!(matches!(
            TileMap::from_data(data),
            Err(MapError::GroundLayerSize { .. })
        ));
    }

    #[test]
    fn test_empty_player_layer_is_fatal() {
        let mut data = MapData::demo();
        data.player_spawns = Some(Vec::new());
        assert!(matches!(
            TileMap::from_data(data),
            Err(MapError::PlayerSpawnMissing)
        ));
    }

    #[test]
    fn test_empty_enemy_layer_is_allowed() {
        let mut data = MapData::demo();
        data.enemy_spawns = Some(Vec::new());
        let map = TileMap::from_data(data).unwrap();
        assert!(map.enemy_spawns().is_empty());
    }

    #[test]
    fn test_out_of_bounds_is_solid() {
        let map = TileMap::from_data(MapData::demo()).unwrap();
        assert!(map.is_solid(-1, 3));
        assert!(map.is_solid(3, 100));
    }
}
