use super::status::StatusEffect;
use super::weapon::Weapon;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn from_vector(dx: f64, dy: f64) -> Facing {
        if dx.abs() > dy.abs() {
            if dx > 0.0 { Facing::Right } else { Facing::Left }
        } else if dy != 0.0 {
            if dy > 0.0 { Facing::Down } else { Facing::Up }
        } else {
            Facing::Down
        }
    }

    pub fn to_vector(self) -> (f64, f64) {
        match self {
            Facing::Up => (0.0, -1.0),
            Facing::Down => (0.0, 1.0),
            Facing::Left => (-1.0, 0.0),
            Facing::Right => (1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub facing: Facing,
    pub hp: f64,
    pub max_hp: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub stamina: f64,
    pub max_stamina: f64,
    pub level: u32,
    pub xp: u32,
    pub attack_power: f64,
    pub defense: f64,
    pub speed: f64,
    pub weapon: Weapon,
    pub abilities: Vec<String>,

    pub dodge_timer: f64,
    pub iframe_timer: f64,
    pub parry_window_timer: f64,
    pub combo_counter: u32,
    pub combo_timer: f64,

    pub gold: u32,
    pub inventory: Vec<super::item::ItemDrop>,
    pub equipment: std::collections::HashMap<String, String>,
    pub statuses: Vec<StatusEffect>,
}

pub const DODGE_DURATION: f64 = 0.35;
pub const DODGE_COST: f64 = 25.0;
pub const PARRY_WINDOW: f64 = 0.2;
pub const COMBO_WINDOW: f64 = 1.2;
pub const STAMINA_REGEN_PER_SEC: f64 = 18.0;
pub const MANA_REGEN_PER_SEC: f64 = 6.0;
pub const HP_REGEN_NEAR_CAMPFIRE_PER_SEC: f64 = 4.0;
/// [1.0, 1.2, 1.5, 1.8, 2.0] indexed by min(combo_counter, 4).
pub const COMBO_MULTIPLIERS: [f64; 5] = [1.0, 1.2, 1.5, 1.8, 2.0];

impl Player {
    pub fn new(weapon: Weapon) -> Self {
        Player {
            x: 0.0,
            y: 0.0,
            facing: Facing::Down,
            hp: 100.0,
            max_hp: 100.0,
            mana: 50.0,
            max_mana: 50.0,
            stamina: 100.0,
            max_stamina: 100.0,
            level: 1,
            xp: 0,
            attack_power: 10.0,
            defense: 2.0,
            speed: 160.0,
            weapon,
            abilities: Vec::new(),
            dodge_timer: 0.0,
            iframe_timer: 0.0,
            parry_window_timer: 0.0,
            combo_counter: 0,
            combo_timer: 0.0,
            gold: 0,
            inventory: Vec::new(),
            equipment: std::collections::HashMap::new(),
            statuses: Vec::new(),
        }
    }

    pub fn is_iframed(&self) -> bool {
        self.iframe_timer > 0.0
    }

    pub fn is_dodging(&self) -> bool {
        self.dodge_timer > 0.0
    }

    pub fn combo_multiplier(&self) -> f64 {
        COMBO_MULTIPLIERS[self.combo_counter.min(4) as usize]
    }

    /// Invariant: the combo counter only increases while `combo_timer >
    /// 0`, resets to zero when the timer reaches zero, and wraps back to
    /// the start of the curve after the 5th hit in a window.
    pub fn register_hit(&mut self) {
        self.combo_counter = if self.combo_counter >= COMBO_MULTIPLIERS.len() as u32 { 1 } else { self.combo_counter + 1 };
        self.combo_timer = COMBO_WINDOW;
    }

    pub fn decay_combo(&mut self, dt: f64) {
        if self.combo_timer > 0.0 {
            self.combo_timer = (self.combo_timer - dt).max(0.0);
            if self.combo_timer == 0.0 {
                self.combo_counter = 0;
            }
        }
    }
}
