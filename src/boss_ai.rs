//! Boss phase scripting: phase transitions, special-move
//! dispatch, dialogue emission, arena confinement.

use crate::enums::BossSpecialMove;
use crate::grid::TileGrid;
use crate::model::{Boss, Projectile};
use crate::rng::Rng;

pub enum BossAction {
    None,
    PhaseChanged { phase: usize, dialogue: String },
    MeleeAttack { attack_index: usize },
    SpawnProjectile { attack_index: usize, dx: f64, dy: f64 },
    SpecialMove(BossSpecialMove),
}

fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

fn clamp_to_arena(boss: &mut Boss) {
    let arena = boss.arena_bounds;
    boss.base.x = boss.base.x.clamp(arena.min_x, arena.max_x);
    boss.base.y = boss.base.y.clamp(arena.min_y, arena.max_y);
}

/// Advances the boss's phase and AI for one tick. Movement/attack selection
/// reuses the generic enemy FSM via `enemy_ai::update` on `boss.base`; this
/// layer only handles what's boss-specific: phase scripts, specials, arena
/// confinement.
pub fn update(boss: &mut Boss, grid: &TileGrid, player_pos: (f64, f64), rng: &mut Rng, dt: f64) -> BossAction {
    if let Some(new_phase) = boss.maybe_advance_phase() {
        let phase = boss.phases[new_phase].clone();
        boss.base.attacks = phase.attacks;
        boss.base.speed = phase.movement_speed;
        boss.special_move_queue = phase.special_moves;
        log::debug!("boss {} entering phase {new_phase} at hp_fraction {:.2}", boss.id, boss.hp_fraction());
        return BossAction::PhaseChanged { phase: new_phase, dialogue: phase.dialogue };
    }

    if !boss.special_move_queue.is_empty() && boss.base.state == crate::enums::EnemyState::Chase && rng.next_f64() < 0.01 {
        let mv = boss.special_move_queue.remove(0);
        return BossAction::SpecialMove(mv);
    }

    let action = crate::enemy_ai::update(&mut boss.base, grid, player_pos, &[], rng, dt);
    clamp_to_arena(boss);

    match action {
        crate::enemy_ai::AiAction::None => BossAction::None,
        crate::enemy_ai::AiAction::MeleeAttack { attack_index } => BossAction::MeleeAttack { attack_index },
        crate::enemy_ai::AiAction::SpawnProjectile { attack_index, dx, dy } => BossAction::SpawnProjectile { attack_index, dx, dy },
    }
}

pub fn spawn_projectile_for_attack(boss: &Boss, attack_index: usize, dx: f64, dy: f64) -> Option<Projectile> {
    crate::enemy_ai::spawn_projectile_for_attack(&boss.base, attack_index, dx, dy, None)
}

/// Distance-gated helper so callers can decide whether the player is close
/// enough for the boss's current attack to actually connect.
pub fn in_attack_range(boss: &Boss, player_pos: (f64, f64)) -> bool {
    dist((boss.base.x, boss.base.y), player_pos) <= boss.base.attack_range
}
