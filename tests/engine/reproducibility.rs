//! Determinism: same seed in, bit-identical output out.

use depths_of_the_abyss_core::enums::Difficulty;
use depths_of_the_abyss_core::input::InputSnapshot;
use depths_of_the_abyss_core::world::World;
use depths_of_the_abyss_core::{generator, DataTables};

#[test]
fn generation_is_bit_identical_for_the_same_seed_and_floor() {
    let tables = DataTables::builtin();
    let a = generator::generate(3, 12345, Difficulty::Normal, &tables);
    let b = generator::generate(3, 12345, Difficulty::Normal, &tables);

    assert_eq!(a.spawn, b.spawn);
    assert_eq!(a.stairs_down, b.stairs_down);
    assert_eq!(a.enemy_spawns.len(), b.enemy_spawns.len());
    for (x, y) in a.enemy_spawns.iter().zip(b.enemy_spawns.iter()) {
        assert_eq!(x.archetype_id, y.archetype_id);
        assert_eq!((x.x, x.y), (y.x, y.y));
    }
    for coords in a.grid.iter_coords() {
        assert_eq!(a.grid.get(coords.0, coords.1), b.grid.get(coords.0, coords.1));
    }
}

#[test]
fn generation_diverges_across_different_seeds() {
    let tables = DataTables::builtin();
    let a = generator::generate(3, 1, Difficulty::Normal, &tables);
    let b = generator::generate(3, 2, Difficulty::Normal, &tables);
    assert!(a.spawn != b.spawn || a.enemy_spawns.len() != b.enemy_spawns.len(), "two different seeds produced an identical floor");
}

/// Drives the same seed through the same scripted input log twice and checks
/// the resulting `Hit` event sequence matches exactly, which is what a host
/// replay/netcode feature depends on.
#[test]
fn hit_event_sequence_is_bit_identical_for_the_same_seed_and_inputs() {
    fn run() -> Vec<String> {
        let mut world = World::new_run(777, Difficulty::Normal, DataTables::builtin());
        let mut log = Vec::new();
        let mut input = InputSnapshot::default();
        for frame in 0..240 {
            input.attack = frame % 20 == 0;
            input.move_x = 1.0;
            world.tick(&input, 1.0 / 60.0);
            for event in world.drain_events() {
                log.push(format!("{event:?}"));
            }
        }
        log
    }

    assert_eq!(run(), run());
}
