use crate::enums::{Element, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeaponCost {
    Stamina(u32),
    Mana(u32),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponBonuses {
    #[serde(default)]
    pub crit_chance: f64,
    #[serde(default)]
    pub crit_mult: f64,
    #[serde(default)]
    pub cleave: bool,
    #[serde(default)]
    pub pierce: bool,
    #[serde(default)]
    pub lifesteal: f64,
    #[serde(default)]
    pub stun_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub base_damage: f64,
    pub speed: f64,
    pub range_px: f64,
    pub arc_degrees: f64,
    pub cost: WeaponCost,
    pub element: Element,
    pub rarity: Rarity,
    #[serde(default)]
    pub bonuses: WeaponBonuses,
}

impl Weapon {
    pub fn swing_duration(&self) -> f64 {
        1.0 / self.speed.max(0.01)
    }

    pub fn starter_sword() -> Weapon {
        Weapon {
            id: "starter_sword".to_string(),
            name: "Rusted Shortsword".to_string(),
            base_damage: 8.0,
            speed: 1.5,
            range_px: 48.0,
            arc_degrees: 110.0,
            cost: WeaponCost::Stamina(10),
            element: Element::Physical,
            rarity: Rarity::Common,
            bonuses: WeaponBonuses::default(),
        }
    }
}

/// A time-bounded attack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swing {
    pub owner: crate::enums::OwnerTag,
    pub center_x: f64,
    pub center_y: f64,
    pub facing_dx: f64,
    pub facing_dy: f64,
    pub weapon: Weapon,
    pub remaining: f64,
    pub combo_index: u32,
    pub already_hit: HashSet<u32>,
}

impl Swing {
    pub fn new(owner: crate::enums::OwnerTag, center_x: f64, center_y: f64, facing: (f64, f64), weapon: Weapon, combo_index: u32) -> Self {
        let remaining = weapon.swing_duration();
        Swing {
            owner,
            center_x,
            center_y,
            facing_dx: facing.0,
            facing_dy: facing.1,
            weapon,
            remaining,
            combo_index,
            already_hit: HashSet::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn already_damaged(&self, target_id: u32) -> bool {
        self.already_hit.contains(&target_id)
    }

    pub fn mark_damaged(&mut self, target_id: u32) {
        self.already_hit.insert(target_id);
    }

    /// Swept AABB for the swing's reach and arc, approximated as a square
    /// centered ahead of the swing origin along the facing direction.
    pub fn hitbox(&self) -> crate::combat::Aabb {
        let half = self.weapon.range_px / 2.0;
        let cx = self.center_x + self.facing_dx * half;
        let cy = self.center_y + self.facing_dy * half;
        crate::combat::Aabb::centered(cx, cy, self.weapon.range_px, self.weapon.range_px)
    }
}
