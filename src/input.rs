//! Host → core command payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSnapshot {
    pub move_x: f64,
    pub move_y: f64,
    pub attack: bool,
    pub dodge: bool,
    pub parry: bool,
    pub ability: [bool; 4],
    pub pause: bool,
    pub inventory: bool,
    pub interact: bool,
}
