use crate::enums::StatusKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining_duration: f64,
    pub tick_amount: f64,
    pub tick_interval: f64,
    pub tick_accumulator: f64,
    pub source: Option<crate::model::ids::EnemyId>,
    pub source_is_player: bool,
}

impl StatusEffect {
    pub fn is_heal(&self) -> bool {
        matches!(self.kind, StatusKind::Regen)
    }

    /// Advance by `dt`; returns the amount to apply this tick, if any tick boundary was crossed.
    pub fn tick(&mut self, dt: f64) -> Option<f64> {
        self.remaining_duration = (self.remaining_duration - dt).max(0.0);
        self.tick_accumulator += dt;
        if self.tick_accumulator >= self.tick_interval && self.tick_interval > 0.0 {
            self.tick_accumulator -= self.tick_interval;
            Some(self.tick_amount)
        } else {
            None
        }
    }

    pub fn expired(&self) -> bool {
        self.remaining_duration <= 0.0
    }
}
