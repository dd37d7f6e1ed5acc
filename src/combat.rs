//! AABB hit testing and the damage formula.

use crate::enums::Element;
use crate::model::status::StatusEffect;
use crate::model::weapon::Weapon;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb {
    pub fn centered(cx: f64, cy: f64, w: f64, h: f64) -> Aabb {
        Aabb { min_x: cx - w / 2.0, min_y: cy - h / 2.0, max_x: cx + w / 2.0, max_y: cy + h / 2.0 }
    }

    /// Two AABBs overlap iff their intervals overlap on both axes.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x <= other.max_x && self.max_x >= other.min_x && self.min_y <= other.max_y && self.max_y >= other.min_y
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

pub struct DamageInputs<'a> {
    pub weapon_base: f64,
    pub rarity_mult: f64,
    pub floor_mult: f64,
    pub stat_scaling: f64,
    pub crit_chance: f64,
    pub crit_mult: f64,
    pub combo_counter: u32,
    pub attacker_element: Element,
    pub defender_element: Element,
    pub defender_defense: f64,
    pub rng: &'a mut crate::rng::Rng,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    pub damage: f64,
    pub is_crit: bool,
    pub combo_multiplier: f64,
    pub element_multiplier: f64,
}

/// damage formula:
/// ```text
/// base   = weapon_base * rarity_mult * floor_mult
/// scaled = base + stat_scaling
/// crit   = roll(crit_chance) ? crit_mult : 1.0
/// combo  = combo_multipliers[min(combo_counter, 4)]
/// elem   = element_effectiveness(attacker_elem, defender_elem)
/// dmg    = floor(max(1, scaled * crit * combo * elem - defender_defense))
/// ```
pub fn compute_damage(inputs: DamageInputs) -> DamageResult {
    let base = inputs.weapon_base * inputs.rarity_mult * inputs.floor_mult;
    let scaled = base + inputs.stat_scaling;
    let is_crit = inputs.rng.next_f64() < inputs.crit_chance;
    let crit = if is_crit { inputs.crit_mult } else { 1.0 };
    let combo = crate::model::player::COMBO_MULTIPLIERS[inputs.combo_counter.min(4) as usize];
    let elem = Element::effectiveness(inputs.attacker_element, inputs.defender_element);
    let damage = (scaled * crit * combo * elem - inputs.defender_defense).max(1.0).floor();
    DamageResult { damage, is_crit, combo_multiplier: combo, element_multiplier: elem }
}

/// Status effect produced by a hit, to be applied by the status system.
#[derive(Debug, Clone)]
pub struct HitStatus {
    pub kind: crate::enums::StatusKind,
    pub duration: f64,
    pub tick_amount: f64,
    pub tick_interval: f64,
}

pub fn rider_status_for_element(element: Element) -> Option<HitStatus> {
    match element {
        Element::Fire => Some(HitStatus { kind: crate::enums::StatusKind::Burn, duration: 3.0, tick_amount: 2.0, tick_interval: 1.0 }),
        Element::Ice => Some(HitStatus { kind: crate::enums::StatusKind::Freeze, duration: 1.5, tick_amount: 0.0, tick_interval: 1.0 }),
        Element::Lightning => Some(HitStatus { kind: crate::enums::StatusKind::Shock, duration: 2.0, tick_amount: 3.0, tick_interval: 1.0 }),
        Element::Poison => Some(HitStatus { kind: crate::enums::StatusKind::Poison, duration: 5.0, tick_amount: 1.5, tick_interval: 1.0 }),
        _ => None,
    }
}

pub fn make_hit_status(effect: HitStatus, source_is_player: bool) -> StatusEffect {
    StatusEffect {
        kind: effect.kind,
        remaining_duration: effect.duration,
        tick_amount: effect.tick_amount,
        tick_interval: effect.tick_interval,
        tick_accumulator: 0.0,
        source: None,
        source_is_player,
    }
}

pub fn weapon_bonuses_crit(weapon: &Weapon) -> (f64, f64) {
    let mult = if weapon.bonuses.crit_mult > 0.0 { weapon.bonuses.crit_mult } else { 1.5 };
    (weapon.bonuses.crit_chance, mult)
}
