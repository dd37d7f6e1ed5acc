//! Headless CLI harness for the simulation core.
//!
//! Three subcommands: `generate` dumps a floor layout without touching a
//! `World` at all, `replay` drives a run from a recorded input log exactly
//! like a host's per-frame loop would, and `inspect-save` loads a save blob
//! off disk and prints it. None of this touches wasm-bindgen; it's the
//! same crate, just driven from a terminal instead of a browser.

use clap::{Parser, Subcommand};
use depths_of_the_abyss_core::data::DataTables;
use depths_of_the_abyss_core::enums::Difficulty;
use depths_of_the_abyss_core::error::{EngineError, EngineResult};
use depths_of_the_abyss_core::generator;
use depths_of_the_abyss_core::input::InputSnapshot;
use depths_of_the_abyss_core::save::{SaveIo, SaveState};
use depths_of_the_abyss_core::world::World;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dungeon_cli", about = "Headless driver for the Depths of the Abyss simulation core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a single floor and print an ASCII map plus its spawn lists.
    Generate {
        #[arg(long)]
        floor: u32,
        /// RNG seed. A fresh v4 UUID-derived seed is used and logged if omitted.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Replay a recorded input log against a fresh run and print the event stream.
    Replay {
        #[arg(long)]
        seed: u64,
        #[arg(long = "input-log")]
        input_log: PathBuf,
    },
    /// Load a save file from disk and pretty-print its contents.
    InspectSave {
        path: PathBuf,
    },
}

#[derive(serde::Deserialize)]
struct ReplayFrame {
    dt: f64,
    input: InputSnapshot,
}

/// Filesystem-backed `SaveIo`, the CLI's analogue of the host's local
/// storage: one slot per file, directory created on first write.
struct FileSaveIo {
    dir: PathBuf,
}

impl FileSaveIo {
    fn new(dir: impl Into<PathBuf>) -> Self {
        FileSaveIo { dir: dir.into() }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SaveIo for FileSaveIo {
    fn write(&mut self, slot: &str, contents: &str) -> EngineResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| EngineError::SaveIo(format!("create_dir_all failed: {e}")))?;
        fs::write(self.slot_path(slot), contents).map_err(|e| EngineError::SaveIo(format!("write failed: {e}")))
    }

    fn read(&self, slot: &str) -> EngineResult<String> {
        fs::read_to_string(self.slot_path(slot)).map_err(|e| EngineError::SaveIo(format!("read failed: {e}")))
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate { floor, seed } => cmd_generate(floor, seed),
        Command::Replay { seed, input_log } => cmd_replay(seed, &input_log),
        Command::InspectSave { path } => cmd_inspect_save(&path),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn cmd_generate(floor: u32, seed: Option<u64>) -> Result<(), String> {
    let seed = seed.unwrap_or_else(|| {
        let generated = uuid::Uuid::new_v4().as_u128() as u64;
        log::info!("no --seed given, using UUID-derived seed {generated} (record it to reproduce this layout)");
        generated
    });
    let tables = DataTables::builtin();
    let floor_data = generator::generate(floor, seed, Difficulty::Normal, &tables);

    println!("floor {floor} seed {seed} theme {:?} ({}x{})", floor_data.theme, floor_data.grid.width, floor_data.grid.height);
    print_ascii_map(&floor_data.grid);
    println!("spawn: {:?}", floor_data.spawn);
    println!("stairs_down: {:?}", floor_data.stairs_down);
    println!("campfire: {:?}", floor_data.campfire);
    println!("enemies ({}):", floor_data.enemy_spawns.len());
    for spawn in &floor_data.enemy_spawns {
        println!("  {} at ({}, {})", spawn.archetype_id, spawn.x, spawn.y);
    }
    if let Some(boss) = &floor_data.boss_spawn {
        println!("boss: {} at ({}, {})", boss.boss_id, boss.x, boss.y);
    }
    Ok(())
}

fn print_ascii_map(grid: &depths_of_the_abyss_core::grid::TileGrid) {
    print!("{}", grid.render_ascii());
}

fn cmd_replay(seed: u64, input_log: &Path) -> Result<(), String> {
    let text = fs::read_to_string(input_log).map_err(|e| format!("failed to read {}: {e}", input_log.display()))?;
    let frames: Vec<ReplayFrame> = serde_json::from_str(&text).map_err(|e| format!("failed to parse input log: {e}"))?;

    let mut world = World::new_run(seed, Difficulty::Normal, DataTables::builtin());
    for (i, frame) in frames.iter().enumerate() {
        world.tick(&frame.input, frame.dt);
        for event in world.drain_events() {
            println!("frame {i}: {}", serde_json::to_string(&event).unwrap_or_default());
        }
    }
    println!("replay complete: {} frames", frames.len());
    Ok(())
}

fn cmd_inspect_save(path: &Path) -> Result<(), String> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let slot = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| format!("bad save path: {}", path.display()))?;
    let io = FileSaveIo::new(dir);
    let json = io.read(slot).map_err(|e| e.to_string())?;
    let save = SaveState::from_json(&json).map_err(|e| e.to_string())?;
    let pretty = serde_json::to_string_pretty(&save).map_err(|e| format!("failed to pretty-print: {e}"))?;
    println!("{pretty}");
    Ok(())
}
