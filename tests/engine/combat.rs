//! Subsystem-level combat tests: damage formula, elemental matchups,
//! i-frames, dodge/parry windows, and splash damage — exercised directly
//! against the `combat`/`combat_system`/`player_controller` public API
//! rather than through `World`, since precise positioning (who stands where,
//! exactly when a window is open) isn't steerable through `World`'s
//! black-box surface.

use depths_of_the_abyss_core::combat::{compute_damage, DamageInputs};
use depths_of_the_abyss_core::combat_system::{apply_hit_to_player, resolve_projectile_explosion, resolve_swing_vs_enemies};
use depths_of_the_abyss_core::enums::{Archetype, Element, EnemyState, OwnerTag, StatusKind};
use depths_of_the_abyss_core::grid::TileGrid;
use depths_of_the_abyss_core::input::InputSnapshot;
use depths_of_the_abyss_core::model::player::{DODGE_COST, PARRY_WINDOW};
use depths_of_the_abyss_core::model::{ArchetypeParams, Enemy, Player, Projectile, StatusEffect, Swing, Weapon};
use depths_of_the_abyss_core::rng::Rng;
use depths_of_the_abyss_core::status::{apply_status, tick_statuses};
use depths_of_the_abyss_core::store::Store;

fn enemy_at(x: f64, y: f64, element: Element) -> Enemy {
    Enemy {
        archetype_id: "cave_rat".to_string(),
        x,
        y,
        hp: 40.0,
        max_hp: 40.0,
        damage: 4.0,
        speed: 90.0,
        archetype: Archetype::Swarm,
        attack_range: 24.0,
        aggro_range: 140.0,
        state: EnemyState::Idle,
        pre_hurt_state: EnemyState::Idle,
        state_timer: 0.0,
        attack_cooldown: 0.0,
        hit_flash_timer: 0.0,
        params: ArchetypeParams::default(),
        statuses: Vec::new(),
        elemental_affinity: element,
        resistances: std::collections::HashMap::new(),
        xp_reward: 5,
        loot_chance: 0.1,
        attacks: Vec::new(),
    }
}

#[test]
fn fire_swing_overkills_ice_enemy_via_1_5x_effectiveness() {
    let mut rng = Rng::seed(1);
    let neutral = compute_damage(DamageInputs {
        weapon_base: 10.0,
        rarity_mult: 1.0,
        floor_mult: 1.0,
        stat_scaling: 0.0,
        crit_chance: 0.0,
        crit_mult: 1.0,
        combo_counter: 0,
        attacker_element: Element::Fire,
        defender_element: Element::Fire,
        defender_defense: 0.0,
        rng: &mut rng,
    });
    let favorable = compute_damage(DamageInputs {
        weapon_base: 10.0,
        rarity_mult: 1.0,
        floor_mult: 1.0,
        stat_scaling: 0.0,
        crit_chance: 0.0,
        crit_mult: 1.0,
        combo_counter: 0,
        attacker_element: Element::Fire,
        defender_element: Element::Ice,
        defender_defense: 0.0,
        rng: &mut rng,
    });
    assert_eq!(favorable.damage, neutral.damage * 1.5);
}

#[test]
fn cleave_weapon_hits_every_enemy_in_one_swing_non_cleave_hits_only_first() {
    let player = Player::new(Weapon::starter_sword());

    let mut cleaving = Weapon::starter_sword();
    cleaving.bonuses.cleave = true;
    let mut enemies: Store<Enemy> = Store::new(10);
    enemies.spawn(enemy_at(4.0, 0.0, Element::Physical));
    enemies.spawn(enemy_at(-4.0, 0.0, Element::Physical));
    let mut swing = Swing::new(OwnerTag::Player, 0.0, 0.0, (1.0, 0.0), cleaving, 0);
    let mut rng = Rng::seed(5);
    let hits = resolve_swing_vs_enemies(&mut swing, &player, &mut enemies, &mut rng);
    assert_eq!(hits.len(), 2, "a cleaving weapon should hit both overlapping enemies");

    let mut single: Store<Enemy> = Store::new(10);
    single.spawn(enemy_at(4.0, 0.0, Element::Physical));
    single.spawn(enemy_at(-4.0, 0.0, Element::Physical));
    let mut non_cleave = Swing::new(OwnerTag::Player, 0.0, 0.0, (1.0, 0.0), Weapon::starter_sword(), 0);
    let hits = resolve_swing_vs_enemies(&mut non_cleave, &player, &mut single, &mut rng);
    assert_eq!(hits.len(), 1, "a non-cleaving weapon stops at the first enemy hit");
}

#[test]
fn fire_rider_applies_burn_status_on_hit() {
    let mut player = Player::new(Weapon::starter_sword());
    let hp_before = player.hp;
    apply_hit_to_player(&mut player, (10.0, 0.0), Element::Fire, 20.0);
    assert!(player.hp < hp_before);
    assert!(player.statuses.iter().any(|s| s.kind == StatusKind::Burn));
}

#[test]
fn hit_knocks_the_player_back_away_from_the_source() {
    let mut player = Player::new(Weapon::starter_sword());
    player.x = 0.0;
    player.y = 0.0;
    apply_hit_to_player(&mut player, (10.0, 0.0), Element::Physical, 5.0);
    assert!(player.x < 0.0, "player should be pushed away from a source to its right");
}

#[test]
fn dodge_grants_iframes_and_spends_stamina() {
    let mut player = Player::new(Weapon::starter_sword());
    let grid = {
        let mut g = TileGrid::new(10, 10);
        for (x, y) in g.iter_coords() {
            g.set(x, y, depths_of_the_abyss_core::grid::Tile::Floor);
        }
        g
    };
    let before_stamina = player.stamina;
    let input = InputSnapshot { dodge: true, move_x: 1.0, ..Default::default() };
    let outcome = depths_of_the_abyss_core::player_controller::update(&mut player, &grid, &input, 0.016);
    assert!(outcome.dodge_triggered);
    assert!(player.is_iframed());
    assert_eq!(player.stamina, before_stamina - DODGE_COST);
}

#[test]
fn parry_input_opens_a_window_of_the_documented_length() {
    let mut player = Player::new(Weapon::starter_sword());
    let grid = TileGrid::new(10, 10);
    let input = InputSnapshot { parry: true, ..Default::default() };
    let outcome = depths_of_the_abyss_core::player_controller::update(&mut player, &grid, &input, 0.016);
    assert!(outcome.parry_opened);
    assert_eq!(player.parry_window_timer, PARRY_WINDOW);
}

#[test]
fn iframed_player_cannot_trigger_another_attack() {
    let mut player = Player::new(Weapon::starter_sword());
    player.iframe_timer = 0.2;
    let grid = TileGrid::new(10, 10);
    let input = InputSnapshot { attack: true, ..Default::default() };
    let outcome = depths_of_the_abyss_core::player_controller::update(&mut player, &grid, &input, 0.016);
    assert!(!outcome.attack_triggered);
}

#[test]
fn stagger_status_carries_no_damage_pulse_and_expires() {
    let mut statuses = Vec::new();
    apply_status(
        &mut statuses,
        StatusEffect { kind: StatusKind::Stagger, remaining_duration: 1.0, tick_amount: 0.0, tick_interval: 1.0, tick_accumulator: 0.0, source: None, source_is_player: true },
    );
    let pulses = tick_statuses(&mut statuses, 0.5);
    assert!(pulses.is_empty(), "a stagger tick should never deal damage");
    assert_eq!(statuses.len(), 1);

    let pulses = tick_statuses(&mut statuses, 1.0);
    assert!(pulses.is_empty());
    assert!(statuses.is_empty(), "stagger should expire once its duration elapses");
}

#[test]
fn enemy_fired_explosive_catches_player_in_blast_radius() {
    let enemies: Store<Enemy> = Store::new(10);
    let player = Player::new(Weapon::starter_sword());
    let mut rng = Rng::seed(3);
    let projectile = Projectile {
        x: player.x + 20.0,
        y: player.y,
        vx: 0.0,
        vy: 0.0,
        speed: 0.0,
        max_speed: 0.0,
        damage: 30.0,
        element: Element::Fire,
        owner: OwnerTag::Enemy,
        lifetime: 0.0,
        piercing: false,
        explode_radius: Some(64.0),
        homing_target: None,
        pierced: std::collections::HashSet::new(),
        combo_index: 0,
        source_id: Some(1),
    };
    let (enemy_hits, player_hit) = resolve_projectile_explosion(&projectile, &enemies, &player, &mut rng);
    assert!(enemy_hits.is_empty());
    assert!(player_hit.is_some());
    assert!(player_hit.unwrap() > 0.0);
}

#[test]
fn explosion_outside_radius_does_not_reach_the_player() {
    let enemies: Store<Enemy> = Store::new(10);
    let player = Player::new(Weapon::starter_sword());
    let mut rng = Rng::seed(3);
    let projectile = Projectile {
        x: player.x + 500.0,
        y: player.y,
        vx: 0.0,
        vy: 0.0,
        speed: 0.0,
        max_speed: 0.0,
        damage: 30.0,
        element: Element::Fire,
        owner: OwnerTag::Enemy,
        lifetime: 0.0,
        piercing: false,
        explode_radius: Some(64.0),
        homing_target: None,
        pierced: std::collections::HashSet::new(),
        combo_index: 0,
        source_id: Some(1),
    };
    let (_, player_hit) = resolve_projectile_explosion(&projectile, &enemies, &player, &mut rng);
    assert!(player_hit.is_none());
}
