//! Fixed enumerations shared across the engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Element {
    Physical,
    Fire,
    Ice,
    Lightning,
    Poison,
    Holy,
    Dark,
}

impl Element {
    /// fire>ice, ice>lightning, lightning>fire at 1.5x; reverse at 0.75x; else 1.0.
    pub fn effectiveness(attacker: Element, defender: Element) -> f64 {
        use Element::*;
        match (attacker, defender) {
            (Fire, Ice) | (Ice, Lightning) | (Lightning, Fire) => 1.5,
            (Ice, Fire) | (Lightning, Ice) | (Fire, Lightning) => 0.75,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn damage_mult(&self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.1,
            Rarity::Rare => 1.25,
            Rarity::Epic => 1.45,
            Rarity::Legendary => 1.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OwnerTag {
    Player,
    Enemy,
}

impl OwnerTag {
    pub fn opposing(&self) -> OwnerTag {
        match self {
            OwnerTag::Player => OwnerTag::Enemy,
            OwnerTag::Enemy => OwnerTag::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Archetype {
    Patrol,
    Swarm,
    Ambush,
    Ranged,
    Guard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnemyState {
    Idle,
    Patrol,
    Chase,
    Ranged,
    Telegraph,
    Attack,
    Hurt,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusKind {
    Burn,
    Freeze,
    Shock,
    Poison,
    Bleed,
    Regen,
    Haste,
    Shield,
    /// Applied to an attacker whose swing or projectile was parried; no
    /// tick damage of its own, just a duration marker the event stream
    /// reports.
    Stagger,
}

impl StatusKind {
    /// Mutually exclusive kinds cancel each other on (re-)application.
    pub fn excludes(&self, other: StatusKind) -> bool {
        matches!(
            (self, other),
            (StatusKind::Haste, StatusKind::Freeze) | (StatusKind::Freeze, StatusKind::Haste)
        )
    }

    pub fn element(&self) -> Option<Element> {
        match self {
            StatusKind::Burn => Some(Element::Fire),
            StatusKind::Freeze => Some(Element::Ice),
            StatusKind::Shock => Some(Element::Lightning),
            StatusKind::Poison => Some(Element::Poison),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BossSpecialMove {
    SummonAllies,
    Enrage,
    TeleportStrike,
    MeteorBombardment,
    FloorBecomesLava,
    TimeFreeze,
    SummonPreviousBosses,
    CopiesPlayerAbilities,
    TrueForm,
    WorldEndingAttack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FloorTheme {
    Stone,
    Fungal,
    Frozen,
    Volcanic,
    Abyssal,
}

impl FloorTheme {
    pub fn for_floor(floor: u32) -> FloorTheme {
        match floor % 5 {
            0 => FloorTheme::Abyssal,
            1 => FloorTheme::Stone,
            2 => FloorTheme::Fungal,
            3 => FloorTheme::Frozen,
            _ => FloorTheme::Volcanic,
        }
    }

    pub fn allows_water_pools(&self) -> bool {
        matches!(self, FloorTheme::Fungal | FloorTheme::Frozen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn spawn_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
            Difficulty::Nightmare => 1.6,
        }
    }
}

/// Global state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameState {
    Title,
    Playing,
    Paused,
    Inventory,
    SkillTree,
    Crafting,
    Dialogue,
    Death,
    GameOver,
    Victory,
    Transition,
    BossIntro,
}

impl GameState {
    pub fn advances_world_simulation(&self) -> bool {
        matches!(self, GameState::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_effectiveness_closure() {
        let allowed = [0.75_f64, 1.0, 1.5];
        let all = [
            Element::Physical,
            Element::Fire,
            Element::Ice,
            Element::Lightning,
            Element::Poison,
            Element::Holy,
            Element::Dark,
        ];
        for a in all {
            for b in all {
                let eff = Element::effectiveness(a, b);
                assert!(allowed.contains(&eff), "unexpected multiplier {eff} for {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn fire_beats_ice_reverse_is_weak() {
        assert_eq!(Element::effectiveness(Element::Fire, Element::Ice), 1.5);
        assert_eq!(Element::effectiveness(Element::Ice, Element::Fire), 0.75);
    }

    #[test]
    fn haste_and_freeze_are_mutually_exclusive() {
        assert!(StatusKind::Haste.excludes(StatusKind::Freeze));
        assert!(StatusKind::Freeze.excludes(StatusKind::Haste));
        assert!(!StatusKind::Burn.excludes(StatusKind::Poison));
    }
}
