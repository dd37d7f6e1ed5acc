//! Save/load/checkpoint round-tripping, driven entirely through `World`'s
//! public API plus `SaveState`'s own (de)serialization.

use depths_of_the_abyss_core::enums::{Difficulty, GameState};
use depths_of_the_abyss_core::save::SaveState;
use depths_of_the_abyss_core::world::World;
use depths_of_the_abyss_core::DataTables;

#[test]
fn full_save_round_trips_through_json() {
    let mut world = World::new_run(101, Difficulty::Normal, DataTables::builtin());
    world.run_stats_mut().kills = 3;
    world.run_stats_mut().gold_collected = 42;

    let json = world.save_full_json().unwrap();
    let reloaded = World::load(&json, DataTables::builtin()).unwrap();

    assert_eq!(reloaded.scene().hud.gold, world.scene().hud.gold);
    assert_eq!(reloaded.scene().hud.floor, world.scene().hud.floor);
    assert_eq!(reloaded.scene().game_state, GameState::Playing);
}

#[test]
fn load_rejects_malformed_json() {
    let err = World::load("not json", DataTables::builtin());
    assert!(err.is_err());
}

#[test]
fn load_rejects_unknown_format_version() {
    let mut state = SaveState::new_run(1, depths_of_the_abyss_core::model::Player::new(depths_of_the_abyss_core::model::Weapon::starter_sword()), Difficulty::Normal);
    state.format_version = 99;
    let json = state.to_json().unwrap();
    assert!(World::load(&json, DataTables::builtin()).is_err());
}

#[test]
fn checkpoint_archives_the_previous_one_and_rollback_restores_it() {
    let mut world = World::new_run(202, Difficulty::Normal, DataTables::builtin());
    world.save_checkpoint();
    let spawn_pos = (world.scene().player.x, world.scene().player.y);

    // A room is carved well larger than one frame's move distance, so a
    // few dozen ticks of movement input reliably displaces the player.
    for _ in 0..40 {
        world.tick(&depths_of_the_abyss_core::InputSnapshot { move_x: 1.0, move_y: 0.4, ..Default::default() }, 0.05);
    }
    let moved_pos = (world.scene().player.x, world.scene().player.y);
    assert_ne!(moved_pos, spawn_pos, "player should have moved away from spawn");

    world.save_checkpoint();
    world.rollback_checkpoint().unwrap();

    assert_eq!((world.scene().player.x, world.scene().player.y), spawn_pos);
    assert_eq!(world.scene().game_state, GameState::Playing);
}

#[test]
fn rollback_with_no_checkpoint_history_is_an_error() {
    let mut world = World::new_run(303, Difficulty::Normal, DataTables::builtin());
    assert!(world.rollback_checkpoint().is_err());
}

#[test]
fn descend_stairs_errors_when_the_player_is_not_on_the_tile() {
    let mut world = World::new_run(404, Difficulty::Normal, DataTables::builtin());
    assert!(world.descend_stairs().is_err());
}

#[test]
fn emits_checkpoint_saved_event() {
    let mut world = World::new_run(505, Difficulty::Normal, DataTables::builtin());
    world.save_checkpoint();
    let events = world.drain_events();
    assert!(events.iter().any(|e| matches!(e, depths_of_the_abyss_core::Event::CheckpointSaved { floor: 1 })));
}
