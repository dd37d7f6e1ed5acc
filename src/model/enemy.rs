use crate::enums::{Archetype, Element, EnemyState};
use crate::model::status::StatusEffect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeParams {
    #[serde(default)]
    pub patrol_anchor: Option<(f64, f64)>,
    #[serde(default)]
    pub patrol_radius: f64,
    #[serde(default)]
    pub ambush_trigger_radius: f64,
    #[serde(default)]
    pub swarm_target: Option<(f64, f64)>,
    #[serde(default)]
    pub preferred_range: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyAttack {
    pub name: String,
    pub damage: f64,
    pub cooldown: f64,
    pub range_px: f64,
    #[serde(default)]
    pub projectile: bool,
    #[serde(default)]
    pub aoe_radius: Option<f64>,
    #[serde(default)]
    pub effect: Option<crate::enums::StatusKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub archetype_id: String,
    pub x: f64,
    pub y: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub damage: f64,
    pub speed: f64,
    pub archetype: Archetype,
    pub attack_range: f64,
    pub aggro_range: f64,
    pub state: EnemyState,
    pub pre_hurt_state: EnemyState,
    pub state_timer: f64,
    pub attack_cooldown: f64,
    pub hit_flash_timer: f64,
    pub params: ArchetypeParams,
    pub statuses: Vec<StatusEffect>,
    pub elemental_affinity: Element,
    pub resistances: HashMap<Element, f64>,
    pub xp_reward: u32,
    pub loot_chance: f64,
    pub attacks: Vec<EnemyAttack>,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0 && self.state != EnemyState::Dead
    }

    pub fn resistance_to(&self, element: Element) -> f64 {
        *self.resistances.get(&element).unwrap_or(&0.0)
    }

    /// Transitions to `to`. Entering `Hurt` captures the outgoing state so
    /// the AI can return to it once the hurt flinch expires.
    pub fn transition(&mut self, to: EnemyState) {
        if to == EnemyState::Hurt && self.state != EnemyState::Hurt {
            self.pre_hurt_state = self.state;
        }
        self.state = to;
        self.state_timer = 0.0;
    }
}
