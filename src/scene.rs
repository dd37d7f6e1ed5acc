//! Read-only per-frame scene snapshot handed to the host for rendering.
//! Nothing here is mutated by the host; it's rebuilt fresh every frame
//! from live World state.

use crate::enums::{Element, EnemyState, Facing, GameState};
use crate::grid::Tile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    pub x: i32,
    pub y: i32,
    pub tile: Tile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySprite {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub hp_fraction: f64,
    pub state: EnemyState,
    pub archetype_id: String,
    pub hit_flash: bool,
    pub is_boss: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileSprite {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub element: Element,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AoeSprite {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub element: Element,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSprite {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingTextSprite {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSprite {
    pub x: f64,
    pub y: f64,
    pub facing: Facing,
    pub is_iframed: bool,
    pub is_dodging: bool,
    pub combo_counter: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hud {
    pub hp: f64,
    pub max_hp: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub stamina: f64,
    pub max_stamina: f64,
    pub level: u32,
    pub xp: u32,
    pub gold: u32,
    pub floor: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub center_x: f64,
    pub center_y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub game_state: GameState,
    pub tile_bounds: (i32, i32, i32, i32),
    pub visible_tiles: Vec<TileView>,
    pub player: PlayerSprite,
    pub enemies: Vec<EnemySprite>,
    pub projectiles: Vec<ProjectileSprite>,
    pub aoe_fields: Vec<AoeSprite>,
    pub particles: Vec<ParticleSprite>,
    pub floating_texts: Vec<FloatingTextSprite>,
    pub camera: Camera,
    pub hud: Hud,
}

/// How many tiles of margin around the camera center are included in
/// `visible_tiles`, matching a 20x15-tile viewport plus a one-tile border.
pub const VIEW_HALF_WIDTH_TILES: i32 = 11;
pub const VIEW_HALF_HEIGHT_TILES: i32 = 9;

pub fn visible_tile_bounds(center_tile: (i32, i32), grid_w: i32, grid_h: i32) -> (i32, i32, i32, i32) {
    let min_x = (center_tile.0 - VIEW_HALF_WIDTH_TILES).max(0);
    let min_y = (center_tile.1 - VIEW_HALF_HEIGHT_TILES).max(0);
    let max_x = (center_tile.0 + VIEW_HALF_WIDTH_TILES).min(grid_w - 1);
    let max_y = (center_tile.1 + VIEW_HALF_HEIGHT_TILES).min(grid_h - 1);
    (min_x, min_y, max_x, max_y)
}
