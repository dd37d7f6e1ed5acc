//! Per-archetype enemy state machine.
//!
//! Transition table, independent of archetype:
//! `Idle|Patrol -> Chase|Ranged` on aggro+LOS, `Chase -> Telegraph` on range,
//! `Telegraph -> Attack` on timer, `Attack -> Chase` after the swing/
//! projectile fires and its cooldown starts, any -> `Hurt` on damage (then
//! back to `pre_hurt_state`), any -> `Dead` on hp <= 0.

use crate::enums::{Archetype, EnemyState};
use crate::grid::TileGrid;
use crate::model::{Enemy, Projectile};
use crate::rng::Rng;

const TELEGRAPH_DURATION: f64 = 0.45;
const HURT_DURATION: f64 = 0.25;
const HURT_FLINCH_CHANCE: f64 = 0.0;
/// How long after breaking ambush the speed burst lasts, in seconds.
const AMBUSH_BURST_DURATION: f64 = 0.35;
const AMBUSH_BURST_MULTIPLIER: f64 = 1.8;
const SWARM_SEPARATION_RADIUS: f64 = 48.0;

pub enum AiAction {
    None,
    MeleeAttack { attack_index: usize },
    SpawnProjectile { attack_index: usize, dx: f64, dy: f64 },
}

fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

fn step_toward(enemy: &mut Enemy, target: (f64, f64), speed: f64, dt: f64, grid: &TileGrid) {
    let dx = target.0 - enemy.x;
    let dy = target.1 - enemy.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return;
    }
    let (nx, ny) = (dx / len, dy / len);
    let try_x = enemy.x + nx * speed * dt;
    if grid.is_walkable(grid.pixel_to_tile(try_x, enemy.y).0, grid.pixel_to_tile(try_x, enemy.y).1) {
        enemy.x = try_x;
    }
    let try_y = enemy.y + ny * speed * dt;
    if grid.is_walkable(grid.pixel_to_tile(enemy.x, try_y).0, grid.pixel_to_tile(enemy.x, try_y).1) {
        enemy.y = try_y;
    }
}

/// Advances one enemy's FSM and movement for one tick; returns the attack
/// action to perform this frame, if the state machine fired one.
///
/// `allies` is the current position of every other live enemy, used only by
/// the Swarm archetype's separation steering.
pub fn update(enemy: &mut Enemy, grid: &TileGrid, player_pos: (f64, f64), allies: &[(f64, f64)], rng: &mut Rng, dt: f64) -> AiAction {
    enemy.state_timer += dt;
    if enemy.attack_cooldown > 0.0 {
        enemy.attack_cooldown = (enemy.attack_cooldown - dt).max(0.0);
    }
    if enemy.hit_flash_timer > 0.0 {
        enemy.hit_flash_timer = (enemy.hit_flash_timer - dt).max(0.0);
    }

    if enemy.state == EnemyState::Dead {
        return AiAction::None;
    }

    if enemy.state == EnemyState::Hurt {
        if enemy.state_timer >= HURT_DURATION {
            let back_to = enemy.pre_hurt_state;
            enemy.state = back_to;
            enemy.state_timer = 0.0;
        }
        return AiAction::None;
    }

    let to_player = dist((enemy.x, enemy.y), player_pos);
    let is_ranged = enemy.archetype == Archetype::Ranged;
    let preferred_range = if enemy.params.preferred_range > 0.0 { enemy.params.preferred_range } else { enemy.attack_range };

    match enemy.state {
        EnemyState::Idle | EnemyState::Patrol => {
            // Ambush archetypes stay hidden until the player is well inside
            // the generic aggro range; everyone else aggroes at the usual
            // distance.
            let trigger_range = if enemy.archetype == Archetype::Ambush && enemy.params.ambush_trigger_radius > 0.0 {
                enemy.params.ambush_trigger_radius
            } else {
                enemy.aggro_range
            };
            if to_player <= trigger_range {
                enemy.transition(if is_ranged { EnemyState::Ranged } else { EnemyState::Chase });
            } else {
                patrol(enemy, grid, rng, dt);
            }
        }
        EnemyState::Chase => {
            if enemy.archetype == Archetype::Guard {
                chase_guard(enemy, grid, player_pos, to_player, dt);
            } else if enemy.archetype == Archetype::Swarm {
                chase_swarm(enemy, grid, player_pos, allies, to_player, dt);
            } else if enemy.archetype == Archetype::Ambush {
                chase_ambush(enemy, grid, player_pos, to_player, dt);
            } else if to_player <= enemy.attack_range {
                enemy.transition(EnemyState::Telegraph);
            } else if to_player > enemy.aggro_range * 1.5 {
                enemy.transition(EnemyState::Idle);
            } else {
                step_toward(enemy, player_pos, enemy.speed, dt, grid);
            }
        }
        EnemyState::Ranged => {
            if to_player <= enemy.attack_range && to_player >= preferred_range * 0.6 {
                enemy.transition(EnemyState::Telegraph);
            } else if to_player < preferred_range * 0.6 {
                // back away to preferred range
                let away = (enemy.x * 2.0 - player_pos.0, enemy.y * 2.0 - player_pos.1);
                step_toward(enemy, away, enemy.speed, dt, grid);
            } else if to_player > enemy.aggro_range * 1.5 {
                enemy.transition(EnemyState::Idle);
            } else {
                step_toward(enemy, player_pos, enemy.speed, dt, grid);
            }
        }
        EnemyState::Telegraph => {
            if enemy.state_timer >= TELEGRAPH_DURATION {
                enemy.transition(EnemyState::Attack);
            }
        }
        EnemyState::Attack => {
            if enemy.attack_cooldown <= 0.0 && !enemy.attacks.is_empty() {
                let idx = (enemy.state_timer as usize) % enemy.attacks.len();
                let attack = &enemy.attacks[idx];
                enemy.attack_cooldown = attack.cooldown;
                enemy.transition(EnemyState::Chase);
                if attack.projectile {
                    let dx = player_pos.0 - enemy.x;
                    let dy = player_pos.1 - enemy.y;
                    let len = (dx * dx + dy * dy).sqrt().max(1e-6);
                    return AiAction::SpawnProjectile { attack_index: idx, dx: dx / len, dy: dy / len };
                }
                return AiAction::MeleeAttack { attack_index: idx };
            }
        }
        EnemyState::Hurt | EnemyState::Dead => unreachable!(),
    }

    let _ = HURT_FLINCH_CHANCE;
    AiAction::None
}

/// Guard never abandons its anchor room: once the player leads it past
/// `patrol_radius` from `patrol_anchor`, it gives up the chase and walks
/// back instead of following indefinitely.
fn chase_guard(enemy: &mut Enemy, grid: &TileGrid, player_pos: (f64, f64), to_player: f64, dt: f64) {
    let anchor = enemy.params.patrol_anchor.unwrap_or((enemy.x, enemy.y));
    let leash = enemy.params.patrol_radius.max(enemy.attack_range);
    if dist(anchor, player_pos) > leash {
        if dist((enemy.x, enemy.y), anchor) > 4.0 {
            step_toward(enemy, anchor, enemy.speed, dt, grid);
        } else {
            enemy.transition(EnemyState::Idle);
        }
        return;
    }
    if to_player <= enemy.attack_range {
        enemy.transition(EnemyState::Telegraph);
    } else {
        step_toward(enemy, player_pos, enemy.speed, dt, grid);
    }
}

/// Swarm steers toward the player while pushing away from nearby allies, so
/// a pack doesn't collapse onto the same tile.
fn chase_swarm(enemy: &mut Enemy, grid: &TileGrid, player_pos: (f64, f64), allies: &[(f64, f64)], to_player: f64, dt: f64) {
    if to_player <= enemy.attack_range {
        enemy.transition(EnemyState::Telegraph);
        return;
    }
    if to_player > enemy.aggro_range * 1.5 {
        enemy.transition(EnemyState::Idle);
        return;
    }
    let mut push_x = 0.0;
    let mut push_y = 0.0;
    for &(ax, ay) in allies {
        let ddx = enemy.x - ax;
        let ddy = enemy.y - ay;
        let d = (ddx * ddx + ddy * ddy).sqrt();
        if d > 1e-6 && d < SWARM_SEPARATION_RADIUS {
            let w = (SWARM_SEPARATION_RADIUS - d) / SWARM_SEPARATION_RADIUS;
            push_x += ddx / d * w;
            push_y += ddy / d * w;
        }
    }
    let target = (player_pos.0 + push_x * SWARM_SEPARATION_RADIUS, player_pos.1 + push_y * SWARM_SEPARATION_RADIUS);
    enemy.params.swarm_target = Some(target);
    step_toward(enemy, target, enemy.speed, dt, grid);
}

/// Ambush bursts out at elevated speed for a short window right after it
/// breaks cover, then settles back into a normal chase.
fn chase_ambush(enemy: &mut Enemy, grid: &TileGrid, player_pos: (f64, f64), to_player: f64, dt: f64) {
    if to_player <= enemy.attack_range {
        enemy.transition(EnemyState::Telegraph);
        return;
    }
    if to_player > enemy.aggro_range * 1.5 {
        enemy.transition(EnemyState::Idle);
        return;
    }
    let speed = if enemy.state_timer < AMBUSH_BURST_DURATION { enemy.speed * AMBUSH_BURST_MULTIPLIER } else { enemy.speed };
    step_toward(enemy, player_pos, speed, dt, grid);
}

fn patrol(enemy: &mut Enemy, grid: &TileGrid, rng: &mut Rng, dt: f64) {
    let Some(anchor) = enemy.params.patrol_anchor else {
        return;
    };
    if enemy.archetype != Archetype::Patrol {
        return;
    }
    if dist((enemy.x, enemy.y), anchor) > enemy.params.patrol_radius {
        step_toward(enemy, anchor, enemy.speed * 0.6, dt, grid);
        return;
    }
    // Gentle random wander inside the patrol radius.
    let angle = rng.next_f64() * std::f64::consts::TAU;
    let target = (anchor.0 + angle.cos() * enemy.params.patrol_radius, anchor.1 + angle.sin() * enemy.params.patrol_radius);
    step_toward(enemy, target, enemy.speed * 0.4, dt, grid);
}

/// Converts a fired melee/ranged `AiAction` into a damage application
/// directly against the player (melee) or a `Projectile` to spawn (ranged).
/// `source_id` is the firing enemy's store handle, or `None` for a boss, so a
/// parried shot can apply its stagger back to the right attacker.
pub fn spawn_projectile_for_attack(enemy: &Enemy, attack_index: usize, dx: f64, dy: f64, source_id: Option<u32>) -> Option<Projectile> {
    let attack = enemy.attacks.get(attack_index)?;
    let speed = 240.0;
    Some(Projectile {
        x: enemy.x,
        y: enemy.y,
        vx: dx * speed,
        vy: dy * speed,
        speed,
        max_speed: speed,
        damage: attack.damage,
        element: enemy.elemental_affinity,
        owner: crate::enums::OwnerTag::Enemy,
        lifetime: 4.0,
        piercing: false,
        explode_radius: attack.aoe_radius,
        homing_target: None,
        pierced: std::collections::HashSet::new(),
        combo_index: 0,
        source_id,
    })
}
