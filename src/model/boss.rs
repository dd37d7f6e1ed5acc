use super::enemy::{Enemy, EnemyAttack};
use crate::enums::BossSpecialMove;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossPhase {
    /// Fraction of max hp (0.0-1.0) at which this phase begins.
    pub hp_threshold: f64,
    pub attacks: Vec<EnemyAttack>,
    pub special_moves: Vec<BossSpecialMove>,
    pub movement_speed: f64,
    pub dialogue: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boss {
    pub base: Enemy,
    pub id: String,
    pub phases: Vec<BossPhase>,
    pub phase_index: usize,
    pub special_move_queue: Vec<BossSpecialMove>,
    pub dialogue_cursor: usize,
    pub invincible: bool,
    pub arena_bounds: crate::combat::Aabb,
}

impl Boss {
    pub fn hp_fraction(&self) -> f64 {
        if self.base.max_hp <= 0.0 {
            0.0
        } else {
            (self.base.hp / self.base.max_hp).clamp(0.0, 1.0)
        }
    }

    pub fn current_phase(&self) -> &BossPhase {
        &self.phases[self.phase_index]
    }

    /// A phase transition is triggered the first time hp/max_hp falls
    /// strictly below the next threshold.
    pub fn maybe_advance_phase(&mut self) -> Option<usize> {
        let frac = self.hp_fraction();
        if self.phase_index + 1 < self.phases.len() {
            let next = &self.phases[self.phase_index + 1];
            if frac < next.hp_threshold {
                self.phase_index += 1;
                return Some(self.phase_index);
            }
        }
        None
    }
}
