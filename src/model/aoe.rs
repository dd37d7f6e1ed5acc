use crate::enums::{Element, OwnerTag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AoeField {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub damage: f64,
    pub element: Element,
    pub owner: OwnerTag,
    pub delay: f64,
    pub tick_interval: f64,
    pub lifetime: f64,
    pub tick_timer: f64,
    pub periodic: bool,
    pub detonated: bool,
}

impl AoeField {
    pub fn is_delayed(&self) -> bool {
        self.delay > 0.0
    }

    pub fn expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    /// Advance timers and return `true` if a damage pulse should be applied this tick.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.delay > 0.0 {
            self.delay = (self.delay - dt).max(0.0);
            return false;
        }
        self.lifetime = (self.lifetime - dt).max(0.0);
        if !self.periodic {
            if !self.detonated && self.lifetime <= 0.0 {
                self.detonated = true;
                return true;
            }
            return false;
        }
        self.tick_timer += dt;
        if self.tick_timer >= self.tick_interval {
            self.tick_timer -= self.tick_interval;
            true
        } else {
            false
        }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}
