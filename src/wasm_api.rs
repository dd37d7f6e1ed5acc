//! The `wasm-bindgen` surface. Everything else in the crate is
//! plain, host-agnostic Rust; this is the only module that knows it's
//! running inside a browser.
//!
//! Unlike the rest of the crate, this boundary is a single stateful
//! `Engine` wrapping a `World`, not a set of free functions - the host
//! owns one `Engine` per run and drives it with `tick()` every frame,
//! matching the Commands/Queries split: `new_run`, `tick`,
//! `save_checkpoint`, `save_full`, `load`, `rollback_checkpoint`,
//! `descend_stairs` are commands; `scene` and `events` are the only
//! queries.

use crate::data::DataTables;
use crate::enums::Difficulty;
use crate::input::InputSnapshot;
use crate::world::World;
use wasm_bindgen::prelude::*;

/// Wires the panic hook and the `log` facade to the browser console. The
/// host calls this once, before constructing any `Engine`.
#[wasm_bindgen]
pub fn init_panic_hook_and_logger() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct Engine {
    world: World,
}

#[wasm_bindgen]
impl Engine {
    /// Starts a fresh run. `difficulty` and `data_tables` are passed as
    /// plain JS values so the host can supply its own enemy/boss roster
    /// without recompiling the engine.
    #[wasm_bindgen(js_name = newRun)]
    pub fn new_run(run_seed: f64, difficulty: JsValue, data_tables: JsValue) -> Result<Engine, JsValue> {
        let difficulty: Difficulty = parse_js_value(difficulty, "difficulty")?;
        let tables: DataTables = parse_js_value(data_tables, "dataTables")?;
        Ok(Engine { world: World::new_run(run_seed as u64, difficulty, tables) })
    }

    /// Advances the simulation by one frame. `input` is an `InputSnapshot`;
    /// `raw_dt_seconds` is clamped internally to a 50ms cap.
    pub fn tick(&mut self, input: JsValue, raw_dt_seconds: f64) -> Result<(), JsValue> {
        let input: InputSnapshot = parse_js_value(input, "input")?;
        self.world.tick(&input, raw_dt_seconds);
        Ok(())
    }

    /// Archives the previous checkpoint and installs a fresh one from live
    /// state. Call at a Campfire; does not return anything -
    /// the host fetches the serialized blob with `save_full`.
    #[wasm_bindgen(js_name = saveCheckpoint)]
    pub fn save_checkpoint(&mut self) {
        self.world.save_checkpoint();
    }

    /// Serializes the full save state (checkpoint plus run stats) for the
    /// host to persist through its own storage.
    #[wasm_bindgen(js_name = saveFull)]
    pub fn save_full(&self) -> Result<String, JsValue> {
        self.world.save_full_json().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Reconstructs an `Engine` from a blob previously returned by
    /// `save_full`.
    pub fn load(save_json: &str, data_tables: JsValue) -> Result<Engine, JsValue> {
        let tables: DataTables = parse_js_value(data_tables, "dataTables")?;
        let world = World::load(save_json, tables).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Engine { world })
    }

    /// Restores the checkpoint archived before the current one. Errors if
    /// there is no history to roll back to.
    #[wasm_bindgen(js_name = rollbackCheckpoint)]
    pub fn rollback_checkpoint(&mut self) -> Result<(), JsValue> {
        self.world.rollback_checkpoint().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Leaves the current floor for the next one, regenerating it from the
    /// run's seed. Errors if called on the final floor or outside the
    /// `Playing` state.
    #[wasm_bindgen(js_name = descendStairs)]
    pub fn descend_stairs(&mut self) -> Result<(), JsValue> {
        self.world.descend_stairs().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Read-only per-frame snapshot for the host's renderer.
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        serialize_result(&self.world.scene())
    }

    /// Drains and returns the events produced since the last call (hits,
    /// deaths, dialogue lines, SFX cues, ...).
    pub fn events(&mut self) -> Result<JsValue, JsValue> {
        serialize_result(&self.world.drain_events())
    }
}

fn parse_js_value<T: serde::de::DeserializeOwned>(value: JsValue, name: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&format!("failed to parse {name}: {e}")))
}

fn serialize_result<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    serde::Serialize::serialize(value, &serializer).map_err(|e| JsValue::from_str(&format!("failed to serialize result: {e}")))
}
