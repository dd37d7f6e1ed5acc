//! Integration-level dungeon generation checks: invariants that span the
//! whole generated floor rather than one BSP step, using only `generator`'s
//! public surface.

use depths_of_the_abyss_core::data::DataTables;
use depths_of_the_abyss_core::enums::{Difficulty, FloorTheme};
use depths_of_the_abyss_core::generator::{self, GeneratedFloor};
use depths_of_the_abyss_core::grid::Tile;

fn tables() -> DataTables {
    DataTables::builtin()
}

fn dist2(a: (i32, i32), b: (i32, i32)) -> i64 {
    let dx = (a.0 - b.0) as i64;
    let dy = (a.1 - b.1) as i64;
    dx * dx + dy * dy
}

#[test]
fn no_enemy_spawns_inside_the_safe_radius_around_the_player() {
    let floor = generator::generate(2, 2024, Difficulty::Hard, &tables());
    for enemy in &floor.enemy_spawns {
        assert!(dist2((enemy.x, enemy.y), floor.spawn) >= 10 * 10, "enemy spawned inside the safe radius around the player start");
    }
}

#[test]
fn enemy_spawns_are_never_on_top_of_each_other() {
    let floor = generator::generate(3, 555, Difficulty::Nightmare, &tables());
    for (i, a) in floor.enemy_spawns.iter().enumerate() {
        for b in &floor.enemy_spawns[i + 1..] {
            assert!(dist2((a.x, a.y), (b.x, b.y)) >= 3 * 3, "two enemies spawned within the minimum separation");
        }
    }
}

#[test]
fn harder_difficulty_spawns_at_least_as_many_enemies() {
    let easy = generator::generate(4, 9000, Difficulty::Easy, &tables());
    let nightmare = generator::generate(4, 9000, Difficulty::Nightmare, &tables());
    assert!(nightmare.enemy_spawns.len() >= easy.enemy_spawns.len());
}

#[test]
fn water_pools_only_appear_on_themes_that_allow_them() {
    for floor_num in 1..=10u32 {
        let floor = generator::generate(floor_num, 321, Difficulty::Normal, &tables());
        if !floor.theme.allows_water_pools() {
            assert!(floor.water.is_empty(), "floor {floor_num} with theme {:?} should have no water", floor.theme);
        }
        for &(x, y) in &floor.water {
            assert_eq!(floor.grid.get(x, y), Tile::Water);
        }
    }
}

#[test]
fn theme_cycles_with_floor_number() {
    assert_eq!(FloorTheme::for_floor(1), FloorTheme::Stone);
    assert_eq!(FloorTheme::for_floor(5), FloorTheme::Abyssal);
    assert_eq!(FloorTheme::for_floor(6), FloorTheme::Stone);
}

#[test]
fn chests_and_traps_never_sit_on_spawn_stairs_or_campfire() {
    let floor = generator::generate(3, 1234, Difficulty::Normal, &tables());
    let reserved: Vec<(i32, i32)> = [Some(floor.spawn), floor.stairs_down, floor.stairs_up, floor.campfire].into_iter().flatten().collect();
    for &pos in floor.chests.iter().chain(floor.traps.iter()) {
        assert!(!reserved.contains(&pos), "chest/trap placed on a reserved tile");
    }
}

#[test]
fn stairs_down_tile_is_reachable_from_spawn_when_present() {
    let floor: GeneratedFloor = generator::generate(2, 42, Difficulty::Normal, &tables());
    if let Some(stairs) = floor.stairs_down {
        let reachable = floor.grid.reachable_from(floor.spawn);
        assert!(reachable.contains(&stairs));
    }
}

#[test]
fn floor_grows_every_ten_floors() {
    let small = generator::generate(1, 1, Difficulty::Normal, &tables());
    let big = generator::generate(11, 1, Difficulty::Normal, &tables());
    assert!(big.grid.width >= small.grid.width);
    assert!(big.grid.height >= small.grid.height);
}
