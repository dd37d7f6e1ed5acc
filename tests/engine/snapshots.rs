//! Snapshot tests for simulation regression: these pin down a generated
//! floor's rendered layout and spawn manifest so a change to the generator
//! shows up as a diff to review rather than a silently different dungeon.

use depths_of_the_abyss_core::data::DataTables;
use depths_of_the_abyss_core::enums::Difficulty;
use depths_of_the_abyss_core::generator;
use serde::Serialize;

#[derive(Serialize)]
struct FloorSnapshot {
    theme: String,
    width: i32,
    height: i32,
    spawn: (i32, i32),
    stairs_down: Option<(i32, i32)>,
    enemy_count: usize,
    boss_id: Option<String>,
    render: String,
}

fn snapshot_for(floor: u32, seed: u64, difficulty: Difficulty) -> FloorSnapshot {
    let tables = DataTables::builtin();
    let generated = generator::generate(floor, seed, difficulty, &tables);
    FloorSnapshot {
        theme: format!("{:?}", generated.theme),
        width: generated.grid.width,
        height: generated.grid.height,
        spawn: generated.spawn,
        stairs_down: generated.stairs_down,
        enemy_count: generated.enemy_spawns.len(),
        boss_id: generated.boss_spawn.map(|b| b.boss_id),
        render: generated.grid.render_ascii(),
    }
}

#[test]
fn snapshot_floor_one_layout() {
    let data = snapshot_for(1, 777, Difficulty::Normal);
    insta::assert_json_snapshot!("floor_one_layout", data);
}

#[test]
fn snapshot_boss_floor_layout() {
    let data = snapshot_for(5, 777, Difficulty::Normal);
    insta::assert_json_snapshot!("boss_floor_layout", data);
}

#[test]
fn snapshot_nightmare_difficulty_spawn_density() {
    let data = snapshot_for(3, 9001, Difficulty::Nightmare);
    insta::assert_json_snapshot!("nightmare_floor_three_layout", data);
}
