//! Player movement, dodge i-frames, stamina, attack/parry triggers.

use crate::grid::TileGrid;
use crate::input::InputSnapshot;
use crate::model::player::{DODGE_COST, DODGE_DURATION, HP_REGEN_NEAR_CAMPFIRE_PER_SEC, MANA_REGEN_PER_SEC, PARRY_WINDOW, STAMINA_REGEN_PER_SEC};
use crate::model::weapon::WeaponCost;
use crate::model::{Facing, Player, Swing};

pub struct PlayerTickOutcome {
    pub attack_triggered: bool,
    pub dodge_triggered: bool,
    pub parry_opened: bool,
}

/// Move `player` by `speed * dir * dt` with axis-separated sliding collision
/// against walkable tiles.
fn slide_move(player: &mut Player, grid: &TileGrid, dx: f64, dy: f64) {
    let try_x = player.x + dx;
    if grid.is_walkable(grid.pixel_to_tile(try_x, player.y).0, grid.pixel_to_tile(try_x, player.y).1) {
        player.x = try_x;
    }
    let try_y = player.y + dy;
    if grid.is_walkable(grid.pixel_to_tile(player.x, try_y).0, grid.pixel_to_tile(player.x, try_y).1) {
        player.y = try_y;
    }
}

pub fn update(player: &mut Player, grid: &TileGrid, input: &InputSnapshot, dt: f64) -> PlayerTickOutcome {
    let mut outcome = PlayerTickOutcome { attack_triggered: false, dodge_triggered: false, parry_opened: false };

    if player.dodge_timer > 0.0 {
        player.dodge_timer = (player.dodge_timer - dt).max(0.0);
    }
    if player.iframe_timer > 0.0 {
        player.iframe_timer = (player.iframe_timer - dt).max(0.0);
    }
    if player.parry_window_timer > 0.0 {
        player.parry_window_timer = (player.parry_window_timer - dt).max(0.0);
    }

    let has_move_input = input.move_x != 0.0 || input.move_y != 0.0;
    if has_move_input {
        player.facing = Facing::from_vector(input.move_x, input.move_y);
    }

    if input.dodge && player.stamina >= DODGE_COST && !player.is_dodging() {
        player.stamina -= DODGE_COST;
        player.dodge_timer = DODGE_DURATION;
        player.iframe_timer = DODGE_DURATION;
        outcome.dodge_triggered = true;
        // Dodge direction is the current movement direction; a minimum
        // impulse applies if idle.
        let (dx, dy) = if has_move_input { (input.move_x, input.move_y) } else { player.facing.to_vector() };
        let len = (dx * dx + dy * dy).sqrt().max(1e-6);
        let impulse = player.speed * 2.2;
        slide_move(player, grid, dx / len * impulse * dt, dy / len * impulse * dt);
    } else if !player.is_dodging() {
        slide_move(player, grid, input.move_x * player.speed * dt, input.move_y * player.speed * dt);
    }

    if input.parry && player.parry_window_timer <= 0.0 && !player.is_dodging() {
        player.parry_window_timer = PARRY_WINDOW;
        outcome.parry_opened = true;
    }

    // While i-framed the player cannot attack.
    if input.attack && !player.is_iframed() {
        outcome.attack_triggered = true;
    }

    let near_campfire = grid.get(grid.pixel_to_tile(player.x, player.y).0, grid.pixel_to_tile(player.x, player.y).1) == crate::grid::Tile::Campfire;

    if !player.is_dodging() && !outcome.attack_triggered {
        player.stamina = (player.stamina + STAMINA_REGEN_PER_SEC * dt).min(player.max_stamina);
    }
    player.mana = (player.mana + MANA_REGEN_PER_SEC * dt).min(player.max_mana);
    if near_campfire {
        player.hp = (player.hp + HP_REGEN_NEAR_CAMPFIRE_PER_SEC * dt).min(player.max_hp);
    }

    player.decay_combo(dt);

    outcome
}

/// Spends the weapon's stamina/mana cost and spawns a `Swing`, continuing the
/// combo counter. Returns `None` if the
/// player can't afford the attack; the caller should treat that as a no-op,
/// not an error.
pub fn trigger_attack(player: &mut Player) -> Option<Swing> {
    match player.weapon.cost {
        WeaponCost::Stamina(cost) => {
            if player.stamina < cost as f64 {
                return None;
            }
            player.stamina -= cost as f64;
        }
        WeaponCost::Mana(cost) => {
            if player.mana < cost as f64 {
                return None;
            }
            player.mana -= cost as f64;
        }
    }

    player.register_hit();
    let combo_index = player.combo_counter - 1;
    let facing = player.facing.to_vector();
    Some(Swing::new(
        crate::enums::OwnerTag::Player,
        player.x,
        player.y,
        facing,
        player.weapon.clone(),
        combo_index,
    ))
}
