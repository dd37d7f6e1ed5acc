//! One-shot notifications the host can react to without polling the scene
//! snapshot every frame.

use crate::enums::{BossSpecialMove, Element, StatusKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Event {
    Hit { attacker_is_player: bool, target_id: Option<u32>, damage: f64, is_crit: bool, element: Element },
    StatusApplied { target_id: Option<u32>, kind: StatusKind },
    EntityDied { target_id: Option<u32>, xp_awarded: u32 },
    FloorGenerated { floor: u32 },
    CheckpointSaved { floor: u32 },
    PhaseChanged { boss_id: String, phase: usize },
    BossSpecialMove { boss_id: String, special: BossSpecialMove },
    DialogueLine { speaker: String, text: String },
    SfxCue { tag: String },
    CameraShake { amplitude: f64, duration: f64 },
    ParrySuccess,
    PlayerDied,
    Victory,
}

/// Drained once per frame by the host after `World::tick` returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    events: Vec<Event>,
}

impl EventQueue {
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
