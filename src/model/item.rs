use crate::enums::Rarity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Material,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub kind: ItemKind,
    pub id: String,
    pub rarity: Rarity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDrop {
    pub x: f64,
    pub y: f64,
    pub payload: ItemPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingText {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: String,
    pub remaining_lifetime: f64,
    pub vertical_velocity: f64,
}

impl FloatingText {
    pub fn advance(&mut self, dt: f64) {
        self.y += self.vertical_velocity * dt;
        self.remaining_lifetime = (self.remaining_lifetime - dt).max(0.0);
    }

    pub fn expired(&self) -> bool {
        self.remaining_lifetime <= 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub remaining_lifetime: f64,
    pub tag: String,
}

impl Particle {
    pub fn advance(&mut self, dt: f64) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.remaining_lifetime = (self.remaining_lifetime - dt).max(0.0);
    }

    pub fn expired(&self) -> bool {
        self.remaining_lifetime <= 0.0
    }
}
