use crate::enums::{Element, OwnerTag};
use crate::model::ids::WeakEnemyRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub damage: f64,
    pub element: Element,
    pub owner: OwnerTag,
    pub lifetime: f64,
    pub piercing: bool,
    pub explode_radius: Option<f64>,
    pub homing_target: Option<WeakEnemyRef>,
    pub pierced: std::collections::HashSet<u32>,
    /// Combo counter snapshotted at launch, for the damage formula if the
    /// projectile carries an explode-radius.
    pub combo_index: u32,
    /// The firing enemy's store id, if any (`None` for a boss, which has no
    /// numeric handle). Used to target a parried shot's stagger back at its
    /// source.
    pub source_id: Option<u32>,
}

pub const HOMING_TURN_RATE_RAD: f64 = 0.1;

impl Projectile {
    pub fn integrate(&mut self, dt: f64) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }

    /// Turn toward `(tx, ty)` at a fixed angular rate; degrades to straight
    /// flight automatically when the caller has no live target to pass in
    ///.
    pub fn steer_toward(&mut self, tx: f64, ty: f64) {
        let desired = (ty - self.y).atan2(tx - self.x);
        let current = self.vy.atan2(self.vx);
        let mut delta = desired - current;
        while delta > std::f64::consts::PI {
            delta -= std::f64::consts::TAU;
        }
        while delta < -std::f64::consts::PI {
            delta += std::f64::consts::TAU;
        }
        let applied = delta.clamp(-HOMING_TURN_RATE_RAD, HOMING_TURN_RATE_RAD);
        let new_angle = current + applied;
        self.vx = new_angle.cos() * self.speed;
        self.vy = new_angle.sin() * self.speed;
    }

    pub fn expired(&self) -> bool {
        self.lifetime <= 0.0
    }
}
