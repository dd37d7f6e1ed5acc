//! Content tables: weapons, armor, consumables, materials, loot, enemy
//! archetypes, boss definitions, spawn tables. Loaded from a
//! `serde_json` document gated by `data_version`, the same pattern the
//! teacher crate uses for preference/config documents (`config.rs`) and for
//! loading `Creature`/`Encounter` content (`model/creature.rs`).

use crate::enums::{Archetype, BossSpecialMove, Element, Rarity};
use crate::error::{EngineError, EngineResult};
use crate::model::{ArchetypeParams, BossPhase, EnemyAttack};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CURRENT_DATA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyArchetypeDef {
    pub id: String,
    pub archetype: Archetype,
    pub base_hp: f64,
    pub base_damage: f64,
    pub speed: f64,
    pub attack_range: f64,
    pub aggro_range: f64,
    #[serde(default)]
    pub params: ArchetypeParams,
    pub attacks: Vec<EnemyAttack>,
    pub elemental_affinity: Element,
    #[serde(default)]
    pub resistances: HashMap<Element, f64>,
    pub xp_reward: u32,
    pub loot_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossDef {
    pub id: String,
    pub base: EnemyArchetypeDef,
    pub phases: Vec<BossPhase>,
    pub floor: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnTableEntry {
    pub archetype_id: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnTable {
    pub floor_min: u32,
    pub floor_max: u32,
    pub entries: Vec<SpawnTableEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponTypeDef {
    pub id: String,
    pub name: String,
    pub base_damage: f64,
    pub speed: f64,
    pub range_px: f64,
    pub rarity: Rarity,
    pub element: Element,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTables {
    pub data_version: u32,
    pub weapon_types: Vec<WeaponTypeDef>,
    pub armor_slots: Vec<String>,
    pub consumable_kinds: Vec<String>,
    pub material_kinds: Vec<String>,
    pub loot_tables: Vec<String>,
    pub enemy_archetypes: Vec<EnemyArchetypeDef>,
    pub boss_definitions: Vec<BossDef>,
    pub spawn_tables: Vec<SpawnTable>,
}

impl DataTables {
    pub fn from_json(text: &str) -> EngineResult<DataTables> {
        let tables: DataTables = serde_json::from_str(text)
            .map_err(|e| EngineError::BadData(format!("failed to parse data document: {e}")))?;
        if tables.data_version != CURRENT_DATA_VERSION {
            return Err(EngineError::BadData(format!(
                "unsupported data_version {} (expected {})",
                tables.data_version, CURRENT_DATA_VERSION
            )));
        }
        if tables.enemy_archetypes.is_empty() {
            return Err(EngineError::BadData("data document has no enemy archetypes".to_string()));
        }
        Ok(tables)
    }

    pub fn archetype(&self, id: &str) -> Option<&EnemyArchetypeDef> {
        self.enemy_archetypes.iter().find(|a| a.id == id)
    }

    pub fn boss(&self, id: &str) -> Option<&BossDef> {
        self.boss_definitions.iter().find(|b| b.id == id)
    }

    pub fn boss_for_floor(&self, floor: u32) -> Option<&BossDef> {
        self.boss_definitions.iter().find(|b| b.floor == floor)
    }

    pub fn spawn_table_for_floor(&self, floor: u32) -> Option<&SpawnTable> {
        self.spawn_tables.iter().find(|t| floor >= t.floor_min && floor <= t.floor_max)
    }

    /// The baked-in default content, so `new_run` works without the host
    /// supplying a data document up front.
    pub fn builtin() -> DataTables {
        let skeleton = EnemyArchetypeDef {
            id: "skeleton_warrior".to_string(),
            archetype: Archetype::Patrol,
            base_hp: 30.0,
            base_damage: 6.0,
            speed: 70.0,
            attack_range: 40.0,
            aggro_range: 160.0,
            params: ArchetypeParams { patrol_radius: 96.0, ..Default::default() },
            attacks: vec![EnemyAttack {
                name: "slash".to_string(),
                damage: 6.0,
                cooldown: 1.2,
                range_px: 40.0,
                projectile: false,
                aoe_radius: None,
                effect: None,
            }],
            elemental_affinity: Element::Dark,
            resistances: HashMap::new(),
            xp_reward: 12,
            loot_chance: 0.2,
        };

        let cave_rat = EnemyArchetypeDef {
            id: "cave_rat".to_string(),
            archetype: Archetype::Swarm,
            base_hp: 14.0,
            base_damage: 3.0,
            speed: 110.0,
            attack_range: 24.0,
            aggro_range: 140.0,
            params: ArchetypeParams::default(),
            attacks: vec![EnemyAttack {
                name: "bite".to_string(),
                damage: 3.0,
                cooldown: 0.8,
                range_px: 24.0,
                projectile: false,
                aoe_radius: None,
                effect: None,
            }],
            elemental_affinity: Element::Poison,
            resistances: HashMap::new(),
            xp_reward: 5,
            loot_chance: 0.1,
        };

        let bone_archer = EnemyArchetypeDef {
            id: "bone_archer".to_string(),
            archetype: Archetype::Ranged,
            base_hp: 20.0,
            base_damage: 8.0,
            speed: 65.0,
            attack_range: 220.0,
            aggro_range: 260.0,
            params: ArchetypeParams { preferred_range: 180.0, ..Default::default() },
            attacks: vec![EnemyAttack {
                name: "bone_shot".to_string(),
                damage: 8.0,
                cooldown: 1.6,
                range_px: 220.0,
                projectile: true,
                aoe_radius: None,
                effect: None,
            }],
            elemental_affinity: Element::Physical,
            resistances: HashMap::new(),
            xp_reward: 14,
            loot_chance: 0.25,
        };

        let ambusher = EnemyArchetypeDef {
            id: "shade_ambusher".to_string(),
            archetype: Archetype::Ambush,
            base_hp: 22.0,
            base_damage: 10.0,
            speed: 150.0,
            attack_range: 36.0,
            aggro_range: 90.0,
            params: ArchetypeParams { ambush_trigger_radius: 64.0, ..Default::default() },
            attacks: vec![EnemyAttack {
                name: "rend".to_string(),
                damage: 10.0,
                cooldown: 1.4,
                range_px: 36.0,
                projectile: false,
                aoe_radius: None,
                effect: Some(crate::enums::StatusKind::Bleed),
            }],
            elemental_affinity: Element::Dark,
            resistances: HashMap::new(),
            xp_reward: 18,
            loot_chance: 0.3,
        };

        let guard = EnemyArchetypeDef {
            id: "crypt_guard".to_string(),
            archetype: Archetype::Guard,
            base_hp: 45.0,
            base_damage: 9.0,
            speed: 55.0,
            attack_range: 44.0,
            aggro_range: 140.0,
            params: ArchetypeParams::default(),
            attacks: vec![EnemyAttack {
                name: "shield_bash".to_string(),
                damage: 9.0,
                cooldown: 1.8,
                range_px: 44.0,
                projectile: false,
                aoe_radius: None,
                effect: None,
            }],
            elemental_affinity: Element::Physical,
            resistances: HashMap::from([(Element::Physical, 0.2)]),
            xp_reward: 22,
            loot_chance: 0.35,
        };

        let grave_warden = BossDef {
            id: "grave_warden".to_string(),
            floor: 5,
            base: EnemyArchetypeDef {
                id: "grave_warden".to_string(),
                archetype: Archetype::Guard,
                base_hp: 420.0,
                base_damage: 18.0,
                speed: 70.0,
                attack_range: 70.0,
                aggro_range: 400.0,
                params: ArchetypeParams::default(),
                attacks: vec![EnemyAttack {
                    name: "grave_slam".to_string(),
                    damage: 18.0,
                    cooldown: 2.0,
                    range_px: 70.0,
                    projectile: false,
                    aoe_radius: Some(80.0),
                    effect: None,
                }],
                elemental_affinity: Element::Dark,
                resistances: HashMap::from([(Element::Dark, 0.5)]),
                xp_reward: 500,
                loot_chance: 1.0,
            },
            phases: vec![
                BossPhase {
                    hp_threshold: 1.0,
                    attacks: vec![EnemyAttack {
                        name: "grave_slam".to_string(),
                        damage: 18.0,
                        cooldown: 2.0,
                        range_px: 70.0,
                        projectile: false,
                        aoe_radius: Some(80.0),
                        effect: None,
                    }],
                    special_moves: vec![],
                    movement_speed: 70.0,
                    dialogue: "The dead do not rest twice.".to_string(),
                },
                BossPhase {
                    hp_threshold: 0.6,
                    attacks: vec![EnemyAttack {
                        name: "bone_barrage".to_string(),
                        damage: 14.0,
                        cooldown: 1.4,
                        range_px: 260.0,
                        projectile: true,
                        aoe_radius: None,
                        effect: None,
                    }],
                    special_moves: vec![BossSpecialMove::SummonAllies],
                    movement_speed: 85.0,
                    dialogue: "Rise, my kin.".to_string(),
                },
                BossPhase {
                    hp_threshold: 0.25,
                    attacks: vec![EnemyAttack {
                        name: "grave_slam".to_string(),
                        damage: 26.0,
                        cooldown: 1.6,
                        range_px: 70.0,
                        projectile: false,
                        aoe_radius: Some(100.0),
                        effect: None,
                    }],
                    special_moves: vec![BossSpecialMove::Enrage],
                    movement_speed: 100.0,
                    dialogue: "ENOUGH.".to_string(),
                },
            ],
        };

        DataTables {
            data_version: CURRENT_DATA_VERSION,
            weapon_types: vec![WeaponTypeDef {
                id: "starter_sword".to_string(),
                name: "Rusted Shortsword".to_string(),
                base_damage: 8.0,
                speed: 1.5,
                range_px: 48.0,
                rarity: Rarity::Common,
                element: Element::Physical,
            }],
            armor_slots: vec![
                "head", "chest", "hands", "legs", "feet", "ring", "amulet",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            consumable_kinds: vec![
                "health_potion",
                "mana_potion",
                "stamina_elixir",
                "antidote",
                "scroll_of_haste",
                "bomb",
                "throwing_knife",
                "revive_feather",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            material_kinds: vec![
                "bone_shard", "ectoplasm", "iron_ore", "frost_crystal", "ember_dust", "spider_silk",
                "ancient_coin", "dragon_scale",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            loot_tables: vec!["floors_1_5", "floors_6_10", "floors_11_15", "boss_drops"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            enemy_archetypes: vec![cave_rat, skeleton, bone_archer, ambusher, guard],
            boss_definitions: vec![grave_warden],
            spawn_tables: vec![SpawnTable {
                floor_min: 1,
                floor_max: 1000,
                entries: vec![
                    SpawnTableEntry { archetype_id: "cave_rat".to_string(), weight: 3.0 },
                    SpawnTableEntry { archetype_id: "skeleton_warrior".to_string(), weight: 3.0 },
                    SpawnTableEntry { archetype_id: "bone_archer".to_string(), weight: 2.0 },
                    SpawnTableEntry { archetype_id: "shade_ambusher".to_string(), weight: 1.5 },
                    SpawnTableEntry { archetype_id: "crypt_guard".to_string(), weight: 1.0 },
                ],
            }],
        }
    }
}
