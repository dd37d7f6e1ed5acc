//! Wires the pure damage formula and hitbox primitives in `combat.rs` to the
//! live entity stores: swing vs. enemy/boss, projectile/aoe vs. any target,
//! enemy attack vs. player.

use crate::combat::{compute_damage, make_hit_status, rider_status_for_element, weapon_bonuses_crit, Aabb, DamageInputs};
use crate::enums::{Element, OwnerTag};
use crate::model::{AoeField, Boss, Enemy, Player, Projectile, Swing};
use crate::rng::Rng;
use crate::status::apply_status;
use crate::store::Store;

pub const ENEMY_HITBOX_SIZE: f64 = 28.0;
pub const PLAYER_HITBOX_SIZE: f64 = 24.0;
pub const KNOCKBACK_STRENGTH: f64 = 36.0;

pub fn enemy_aabb(enemy: &Enemy) -> Aabb {
    Aabb::centered(enemy.x, enemy.y, ENEMY_HITBOX_SIZE, ENEMY_HITBOX_SIZE)
}

pub fn player_aabb(player: &Player) -> Aabb {
    Aabb::centered(player.x, player.y, PLAYER_HITBOX_SIZE, PLAYER_HITBOX_SIZE)
}

/// The result of one successful hit, enough for the caller to queue an
/// `Event::Hit`, a floating text, and a death check.
#[derive(Debug, Clone)]
pub struct HitOutcome {
    pub damage: f64,
    pub is_crit: bool,
    pub element: Element,
    pub hp_after: f64,
    pub killed: bool,
}

fn nudge(x: &mut f64, y: &mut f64, source: (f64, f64), strength: f64) {
    let dx = *x - source.0;
    let dy = *y - source.1;
    let len = (dx * dx + dy * dy).sqrt().max(1e-6);
    *x += dx / len * strength;
    *y += dy / len * strength;
}

/// Applies one hit's damage, resistance, rider status and knockback to an
/// enemy's `base` fields, returning the outcome. `defense` is the flat
/// mitigation term in the damage formula; elemental resistance is a separate
/// enrichment on top (a percentage reduction applied after the formula, not
/// part of it) so `combat::compute_damage` stays a pure function of its inputs.
fn apply_hit_to_enemy(
    enemy: &mut Enemy,
    source: (f64, f64),
    attacker_element: Element,
    base_damage: f64,
    rarity_mult: f64,
    floor_mult: f64,
    stat_scaling: f64,
    crit_chance: f64,
    crit_mult: f64,
    combo_counter: u32,
    rng: &mut Rng,
) -> HitOutcome {
    let result = compute_damage(DamageInputs {
        weapon_base: base_damage,
        rarity_mult,
        floor_mult,
        stat_scaling,
        crit_chance,
        crit_mult,
        combo_counter,
        attacker_element,
        defender_element: enemy.elemental_affinity,
        defender_defense: 0.0,
        rng,
    });
    let resistance = enemy.resistance_to(attacker_element);
    let damage = (result.damage * (1.0 - resistance)).max(1.0);

    enemy.hp = (enemy.hp - damage).max(0.0);
    enemy.hit_flash_timer = 0.12;
    if let Some(rider) = rider_status_for_element(attacker_element) {
        apply_status(&mut enemy.statuses, make_hit_status(rider, true));
    }
    nudge(&mut enemy.x, &mut enemy.y, source, KNOCKBACK_STRENGTH);

    let killed = enemy.hp <= 0.0;
    if killed {
        enemy.transition(crate::enums::EnemyState::Dead);
    } else {
        enemy.transition(crate::enums::EnemyState::Hurt);
    }

    HitOutcome { damage, is_crit: result.is_crit, element: attacker_element, hp_after: enemy.hp, killed }
}

/// Resolves one active player swing against the enemy store, honoring the
/// once-per-target-per-swing invariant. Returns `(enemy_id, HitOutcome)` pairs.
pub fn resolve_swing_vs_enemies(
    swing: &mut Swing,
    player: &Player,
    enemies: &mut Store<Enemy>,
    rng: &mut Rng,
) -> Vec<(u32, HitOutcome)> {
    let mut hits = Vec::new();
    if !swing.is_active() || swing.owner != OwnerTag::Player {
        return hits;
    }
    let hitbox = swing.hitbox();
    let (crit_chance, crit_mult) = weapon_bonuses_crit(&swing.weapon);
    for (id, enemy) in enemies.iter_mut() {
        if !enemy.is_alive() || swing.already_damaged(id) {
            continue;
        }
        if !hitbox.overlaps(&enemy_aabb(enemy)) {
            continue;
        }
        swing.mark_damaged(id);
        let outcome = apply_hit_to_enemy(
            enemy,
            (swing.center_x, swing.center_y),
            swing.weapon.element,
            swing.weapon.base_damage,
            swing.weapon.rarity.damage_mult(),
            1.0,
            player.attack_power,
            crit_chance,
            crit_mult,
            swing.combo_index,
            rng,
        );
        hits.push((id, outcome));
        if !swing.weapon.bonuses.cleave {
            break;
        }
    }
    hits
}

/// Resolves one active player swing against the boss, if present and in
/// range. Reuses the swing's `already_hit` set with the sentinel id
/// `u32::MAX`, which no `Store<Enemy>` handle ever issues.
pub fn resolve_swing_vs_boss(swing: &mut Swing, player: &Player, boss: &mut Boss, rng: &mut Rng) -> Option<HitOutcome> {
    if !swing.is_active() || swing.owner != OwnerTag::Player || boss.invincible || swing.already_damaged(u32::MAX) {
        return None;
    }
    if !swing.hitbox().overlaps(&enemy_aabb(&boss.base)) {
        return None;
    }
    swing.mark_damaged(u32::MAX);
    let (crit_chance, crit_mult) = weapon_bonuses_crit(&swing.weapon);
    Some(apply_hit_to_enemy(
        &mut boss.base,
        (swing.center_x, swing.center_y),
        swing.weapon.element,
        swing.weapon.base_damage,
        swing.weapon.rarity.damage_mult(),
        1.0,
        player.attack_power,
        crit_chance,
        crit_mult,
        swing.combo_index,
        rng,
    ))
}

/// Resolves one enemy attack/projectile/aoe hit against the player, applying
/// any elemental rider directly onto the player's own status vec.
pub fn apply_hit_to_player(
    player: &mut Player,
    source: (f64, f64),
    attacker_element: Element,
    flat_damage: f64,
) -> HitOutcome {
    let elem = Element::effectiveness(attacker_element, Element::Physical);
    let mitigated = (flat_damage * elem - player.defense).max(1.0);
    player.hp = (player.hp - mitigated).max(0.0);
    if let Some(rider) = rider_status_for_element(attacker_element) {
        apply_status(&mut player.statuses, make_hit_status(rider, false));
    }
    nudge(&mut player.x, &mut player.y, source, KNOCKBACK_STRENGTH * 0.6);
    HitOutcome { damage: mitigated, is_crit: false, element: attacker_element, hp_after: player.hp, killed: player.hp <= 0.0 }
}

/// Advances a projectile and, if it now overlaps `target_box`, returns the
/// damage to apply (caller resolves against player or enemy store).
pub fn projectile_hits(projectile: &Projectile, target_box: &Aabb, already_hit: &std::collections::HashSet<u32>, target_id: u32) -> bool {
    if already_hit.contains(&target_id) {
        return false;
    }
    let point_box = Aabb::centered(projectile.x, projectile.y, 6.0, 6.0);
    point_box.overlaps(target_box)
}

/// One target caught in a projectile's death-blast, with the flat damage to
/// apply (resistance/defense already folded in by the caller per target kind).
pub struct ExplosionHit {
    pub enemy_id: Option<u32>,
    pub damage: f64,
}

/// A projectile carrying an explode-radius spawns a one-shot blast on death
/// (wall impact or lifetime end), dealing `0.7 * damage` scaled by the usual
/// element/combo formula to every enemy caught in the radius. The player is
/// also checked, since enemy-fired explosives should be able to catch the
/// player in the blast.
pub fn resolve_projectile_explosion(
    projectile: &Projectile,
    enemies: &Store<Enemy>,
    player: &Player,
    rng: &mut Rng,
) -> (Vec<ExplosionHit>, Option<f64>) {
    let radius = match projectile.explode_radius {
        Some(r) => r,
        None => return (Vec::new(), None),
    };
    let mut hits = Vec::new();
    let mut player_hit = None;

    match projectile.owner {
        OwnerTag::Player => {
            for (id, enemy) in enemies.iter() {
                if !enemy.is_alive() {
                    continue;
                }
                let dx = enemy.x - projectile.x;
                let dy = enemy.y - projectile.y;
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let result = compute_damage(DamageInputs {
                    weapon_base: projectile.damage * 0.7,
                    rarity_mult: 1.0,
                    floor_mult: 1.0,
                    stat_scaling: 0.0,
                    crit_chance: 0.0,
                    crit_mult: 1.0,
                    combo_counter: projectile.combo_index,
                    attacker_element: projectile.element,
                    defender_element: enemy.elemental_affinity,
                    defender_defense: 0.0,
                    rng,
                });
                let resistance = enemy.resistance_to(projectile.element);
                hits.push(ExplosionHit { enemy_id: Some(id), damage: (result.damage * (1.0 - resistance)).max(1.0) });
            }
        }
        OwnerTag::Enemy => {
            let dx = player.x - projectile.x;
            let dy = player.y - projectile.y;
            if dx * dx + dy * dy <= radius * radius {
                let result = compute_damage(DamageInputs {
                    weapon_base: projectile.damage * 0.7,
                    rarity_mult: 1.0,
                    floor_mult: 1.0,
                    stat_scaling: 0.0,
                    crit_chance: 0.0,
                    crit_mult: 1.0,
                    combo_counter: projectile.combo_index,
                    attacker_element: projectile.element,
                    defender_element: Element::Physical,
                    defender_defense: player.defense,
                    rng,
                });
                player_hit = Some(result.damage);
            }
        }
    }
    (hits, player_hit)
}

/// Returns true if `field` should deal damage to a point this tick (delayed
/// / periodic timing already resolved by `AoeField::tick`; this only checks
/// spatial containment).
pub fn aoe_hits(field: &AoeField, x: f64, y: f64) -> bool {
    field.contains_point(x, y)
}
