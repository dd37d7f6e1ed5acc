//! Deterministic simulation core for a top-down action-roguelike.
//!
//! The crate is split the same way the engine's frame loop is split: data
//! definitions (`model`, `data`, `enums`, `grid`), pure subsystems that take
//! `&mut` references to that data and a timestep (`combat`, `combat_system`,
//! `status`, `player_controller`, `enemy_ai`, `boss_ai`, `generator`), and the
//! `World` that owns everything and sequences the subsystems every frame.
//! `wasm_api` is the only module aware it's running inside a browser; every
//! other module is plain, host-agnostic Rust and is exercised directly by the
//! test suite.

pub mod boss_ai;
pub mod combat;
pub mod combat_system;
pub mod data;
pub mod enemy_ai;
pub mod enums;
pub mod error;
pub mod events;
pub mod generator;
pub mod grid;
pub mod input;
pub mod model;
pub mod player_controller;
pub mod rng;
pub mod save;
pub mod scene;
pub mod state_machine;
pub mod status;
pub mod store;
pub mod wasm_api;
pub mod world;

pub use data::DataTables;
pub use enums::{Difficulty, GameState};
pub use error::{EngineError, EngineResult};
pub use events::Event;
pub use input::InputSnapshot;
pub use save::{MemorySaveIo, SaveIo, SaveState};
pub use scene::Scene;
pub use state_machine::StateTransition;
pub use wasm_api::Engine;
pub use world::World;
