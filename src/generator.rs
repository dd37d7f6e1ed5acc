//! Seeded BSP dungeon generation.
//!
//! For a given `(floor, seed)` the pipeline below is fully deterministic:
//! every random decision is drawn from the floor's own `Rng` stream in a
//! fixed order, so two calls with the same inputs produce bit-identical
//! output.

use crate::data::DataTables;
use crate::enums::{Difficulty, FloorTheme};
use crate::grid::{Tile, TileGrid};
use crate::rng::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MIN_LEAF: i32 = 14;
const SAFE_RADIUS: i32 = 10;
const MIN_SPAWN_SEPARATION: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

enum BspNode {
    Leaf { bounds: Rect, room: Option<Rect> },
    Split { left: Box<BspNode>, right: Box<BspNode> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorKind {
    Crack,
    Moss,
    Bones,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub archetype_id: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossSpawn {
    pub boss_id: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedFloor {
    pub grid: TileGrid,
    pub theme: FloorTheme,
    pub spawn: (i32, i32),
    pub stairs_down: Option<(i32, i32)>,
    pub stairs_up: Option<(i32, i32)>,
    pub campfire: Option<(i32, i32)>,
    pub boss_gate: Option<(i32, i32)>,
    pub chests: Vec<(i32, i32)>,
    pub traps: Vec<(i32, i32)>,
    pub water: Vec<(i32, i32)>,
    pub decor: HashMap<(i32, i32), DecorKind>,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub boss_spawn: Option<BossSpawn>,
}

/// Step 1: `W = min(80 + floor(floor/10)*20, 100)`, `H = min(60 + floor(floor/10)*15, 80)`.
fn floor_dimensions(floor: u32) -> (i32, i32) {
    let band = (floor / 10) as i32;
    let w = (80 + band * 20).min(100);
    let h = (60 + band * 15).min(80);
    (w, h)
}

fn split_node(bounds: Rect, rng: &mut Rng) -> BspNode {
    let can_split_w = bounds.w >= 2 * MIN_LEAF;
    let can_split_h = bounds.h >= 2 * MIN_LEAF;
    if !can_split_w && !can_split_h {
        return BspNode::Leaf { bounds, room: None };
    }

    let aspect = bounds.w as f64 / bounds.h as f64;
    let split_vertical = if !can_split_h {
        true
    } else if !can_split_w {
        false
    } else if aspect > 1.25 {
        true
    } else if aspect < 0.8 {
        false
    } else {
        rng.range_int(0, 1) == 0
    };

    if split_vertical {
        let pos = rng.range_int((bounds.x + MIN_LEAF) as i64, (bounds.x + bounds.w - MIN_LEAF) as i64) as i32;
        let left = Rect { x: bounds.x, y: bounds.y, w: pos - bounds.x, h: bounds.h };
        let right = Rect { x: pos, y: bounds.y, w: bounds.x + bounds.w - pos, h: bounds.h };
        BspNode::Split { left: Box::new(split_node(left, rng)), right: Box::new(split_node(right, rng)) }
    } else {
        let pos = rng.range_int((bounds.y + MIN_LEAF) as i64, (bounds.y + bounds.h - MIN_LEAF) as i64) as i32;
        let top = Rect { x: bounds.x, y: bounds.y, w: bounds.w, h: pos - bounds.y };
        let bottom = Rect { x: bounds.x, y: pos, w: bounds.w, h: bounds.y + bounds.h - pos };
        BspNode::Split { left: Box::new(split_node(top, rng)), right: Box::new(split_node(bottom, rng)) }
    }
}

fn carve_rooms(node: &mut BspNode, grid: &mut TileGrid, rng: &mut Rng) {
    match node {
        BspNode::Leaf { bounds, room } => {
            let max_w = (bounds.w - 1).max(4);
            let max_h = (bounds.h - 1).max(4);
            let w = rng.range_int(4, max_w as i64) as i32;
            let h = rng.range_int(4, max_h as i64) as i32;
            let x = bounds.x + rng.range_int(0, (bounds.w - w).max(0) as i64) as i32;
            let y = bounds.y + rng.range_int(0, (bounds.h - h).max(0) as i64) as i32;
            let r = Rect { x, y, w, h };
            for ty in r.y..r.y + r.h {
                for tx in r.x..r.x + r.w {
                    grid.set(tx, ty, Tile::Floor);
                }
            }
            wrap_with_walls(grid, r);
            *room = Some(r);
        }
        BspNode::Split { left, right } => {
            carve_rooms(left, grid, rng);
            carve_rooms(right, grid, rng);
        }
    }
}

fn wrap_with_walls(grid: &mut TileGrid, r: Rect) {
    for ty in (r.y - 1)..=(r.y + r.h) {
        for tx in (r.x - 1)..=(r.x + r.w) {
            if grid.get(tx, ty) == Tile::Void {
                grid.set(tx, ty, Tile::Wall);
            }
        }
    }
}

fn carve_corridor(grid: &mut TileGrid, a: (i32, i32), b: (i32, i32), horizontal_first: bool) {
    let (ax, ay) = a;
    let (bx, by) = b;
    if horizontal_first {
        carve_h_line(grid, ax, bx, ay);
        carve_v_line(grid, ay, by, bx);
    } else {
        carve_v_line(grid, ay, by, ax);
        carve_h_line(grid, ax, bx, by);
    }
}

fn carve_h_line(grid: &mut TileGrid, x0: i32, x1: i32, y: i32) {
    let (lo, hi) = (x0.min(x1), x0.max(x1));
    for x in lo..=hi {
        grid.set(x, y, Tile::Floor);
        for dy in -1..=1 {
            if grid.get(x, y + dy) == Tile::Void {
                grid.set(x, y + dy, Tile::Wall);
            }
        }
    }
}

fn carve_v_line(grid: &mut TileGrid, y0: i32, y1: i32, x: i32) {
    let (lo, hi) = (y0.min(y1), y0.max(y1));
    for y in lo..=hi {
        grid.set(x, y, Tile::Floor);
        for dx in -1..=1 {
            if grid.get(x + dx, y) == Tile::Void {
                grid.set(x + dx, y, Tile::Wall);
            }
        }
    }
}

/// Bottom-up sibling connection; returns every room in this subtree so the
/// parent can keep picking one representative per side.
fn connect_siblings(node: &BspNode, grid: &mut TileGrid, rng: &mut Rng) -> Vec<Rect> {
    match node {
        BspNode::Leaf { room, .. } => room.iter().copied().collect(),
        BspNode::Split { left, right } => {
            let left_rooms = connect_siblings(left, grid, rng);
            let right_rooms = connect_siblings(right, grid, rng);
            if let (Some(a), Some(b)) = (rng.choose(&left_rooms), rng.choose(&right_rooms)) {
                let horizontal_first = rng.range_int(0, 1) == 0;
                carve_corridor(grid, a.center(), b.center(), horizontal_first);
            }
            let mut all = left_rooms;
            all.extend(right_rooms);
            all
        }
    }
}

fn promote_doors(grid: &mut TileGrid) {
    let mut promotions = Vec::new();
    for (x, y) in grid.iter_coords() {
        if grid.get(x, y) != Tile::Wall {
            continue;
        }
        let floor_neighbors = [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .iter()
            .filter(|(dx, dy)| grid.get(x + dx, y + dy) == Tile::Floor)
            .count();
        if floor_neighbors >= 2 {
            promotions.push((x, y));
        }
    }
    for (x, y) in promotions {
        grid.set(x, y, Tile::Door);
    }
}

fn dist2(a: (i32, i32), b: (i32, i32)) -> i64 {
    let dx = (a.0 - b.0) as i64;
    let dy = (a.1 - b.1) as i64;
    dx * dx + dy * dy
}

fn place_boss_arena(grid: &mut TileGrid, stairs_room: Rect, rng: &mut Rng) -> (Rect, (i32, i32)) {
    let arena = Rect { x: grid.width - 25, y: grid.height / 2 - 7, w: 20, h: 15 };
    for ty in arena.y..arena.y + arena.h {
        for tx in arena.x..arena.x + arena.w {
            grid.set(tx, ty, Tile::Floor);
        }
    }
    wrap_with_walls(grid, arena);

    let gate = (arena.x, arena.y + arena.h / 2);
    grid.set(gate.0, gate.1, Tile::BossGate);

    let horizontal_first = rng.range_int(0, 1) == 0;
    carve_corridor(grid, stairs_room.center(), arena.center(), horizontal_first);

    for (cx, cy) in [
        (arena.x + 2, arena.y + 2),
        (arena.x + arena.w - 4, arena.y + 2),
        (arena.x + 2, arena.y + arena.h - 4),
        (arena.x + arena.w - 4, arena.y + arena.h - 4),
    ] {
        for dy in 0..2 {
            for dx in 0..2 {
                grid.set(cx + dx, cy + dy, Tile::Wall);
            }
        }
    }

    (arena, gate)
}

fn place_water_pools(grid: &mut TileGrid, rooms: &[Rect], rng: &mut Rng) -> Vec<(i32, i32)> {
    let mut placed = Vec::new();
    let pool_count = rng.range_int(1, 3);
    for _ in 0..pool_count {
        let Some(room) = rng.choose(rooms) else { break };
        let size = rng.range_int(2, 4) as i32;
        let ox = room.x + rng.range_int(0, (room.w - size).max(0) as i64) as i32;
        let oy = room.y + rng.range_int(0, (room.h - size).max(0) as i64) as i32;
        for dy in 0..size {
            for dx in 0..size {
                let (x, y) = (ox + dx, oy + dy);
                if grid.get(x, y) == Tile::Floor {
                    grid.set(x, y, Tile::Water);
                    placed.push((x, y));
                }
            }
        }
    }
    placed
}

fn random_floor_tiles(grid: &TileGrid, count: i32, rng: &mut Rng, avoid: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let mut candidates: Vec<(i32, i32)> =
        grid.iter_coords().filter(|&(x, y)| grid.get(x, y) == Tile::Floor && !avoid.contains(&(x, y))).collect();
    rng.shuffle_in_place(&mut candidates);
    candidates.into_iter().take(count.max(0) as usize).collect()
}

fn decorate(grid: &TileGrid, rng: &mut Rng) -> HashMap<(i32, i32), DecorKind> {
    let mut decor = HashMap::new();
    for (x, y) in grid.iter_coords() {
        if grid.get(x, y) != Tile::Floor {
            continue;
        }
        let roll = rng.next_f64();
        if roll < 0.02 {
            decor.insert((x, y), DecorKind::Crack);
        } else if roll < 0.035 {
            decor.insert((x, y), DecorKind::Moss);
        } else if roll < 0.045 {
            decor.insert((x, y), DecorKind::Bones);
        }
    }
    decor
}

fn spawn_enemies(
    grid: &TileGrid,
    spawn: (i32, i32),
    floor: u32,
    difficulty: Difficulty,
    tables: &DataTables,
    rng: &mut Rng,
) -> Vec<EnemySpawn> {
    let count = ((8.0 + 2.0 * floor as f64) * difficulty.spawn_multiplier()).floor() as i32;
    let Some(table) = tables.spawn_table_for_floor(floor) else { return Vec::new() };
    let weights: Vec<f64> = table.entries.iter().map(|e| e.weight).collect();

    let mut chosen: Vec<(i32, i32)> = Vec::new();
    let mut attempts = 0;
    while (chosen.len() as i32) < count && attempts < count * 50 + 200 {
        attempts += 1;
        let x = rng.range_int(1, (grid.width - 2) as i64) as i32;
        let y = rng.range_int(1, (grid.height - 2) as i64) as i32;
        if !grid.is_walkable(x, y) {
            continue;
        }
        if dist2((x, y), spawn) < (SAFE_RADIUS * SAFE_RADIUS) as i64 {
            continue;
        }
        if chosen.iter().any(|&p| dist2(p, (x, y)) < (MIN_SPAWN_SEPARATION * MIN_SPAWN_SEPARATION) as i64) {
            continue;
        }
        chosen.push((x, y));
    }

    chosen
        .into_iter()
        .filter_map(|(x, y)| {
            rng.weighted_choose(&table.entries, &weights).map(|e| EnemySpawn { archetype_id: e.archetype_id.clone(), x, y })
        })
        .collect()
}

pub fn generate(floor: u32, run_seed: u64, difficulty: Difficulty, tables: &DataTables) -> GeneratedFloor {
    let floor_seed = run_seed.wrapping_add(floor as u64 * 1000);
    let mut rng = Rng::seed(floor_seed);

    let (w, h) = floor_dimensions(floor);
    let mut grid = TileGrid::new(w, h);
    let interior = Rect { x: 1, y: 1, w: w - 2, h: h - 2 };

    let mut tree = split_node(interior, &mut rng);
    carve_rooms(&mut tree, &mut grid, &mut rng);
    let rooms = connect_siblings(&tree, &mut grid, &mut rng);
    promote_doors(&mut grid);

    let theme = FloorTheme::for_floor(floor);
    let is_boss_floor = floor % 5 == 0;

    let first_room = *rooms.first().unwrap_or(&Rect { x: interior.x, y: interior.y, w: 4, h: 4 });
    let spawn = first_room.center();

    let stairs_up = if floor > 1 { Some(spawn) } else { None };

    // Whether this StairsDown is actually usable (vs. the "final floor"
    // triggering Victory instead) is a host/data-table decision made in
    // `world::World::descend_stairs`, not a generation-time concept.
    let stairs_down_room = rooms.iter().max_by_key(|r| dist2(r.center(), spawn)).copied();
    let stairs_down = stairs_down_room.map(|r| r.center());
    if let Some((x, y)) = stairs_down {
        grid.set(x, y, Tile::StairsDown);
    }

    let campfire_room = if rooms.len() > 2 { rooms.get(rooms.len() / 2) } else { rooms.last() };
    let campfire = campfire_room.map(|r| r.center());
    if let Some((x, y)) = campfire {
        grid.set(x, y, Tile::Campfire);
    }

    let mut boss_gate = None;
    if is_boss_floor {
        let stairs_room = stairs_down_room.unwrap_or(first_room);
        let (_arena, gate) = place_boss_arena(&mut grid, stairs_room, &mut rng);
        boss_gate = Some(gate);
    }

    let mut avoid: Vec<(i32, i32)> = vec![spawn];
    avoid.extend(stairs_down);
    avoid.extend(stairs_up);
    avoid.extend(campfire);

    let chest_count = 2 + (rng.next_f64() * 3.0).floor() as i32;
    let chests = random_floor_tiles(&grid, chest_count, &mut rng, &avoid);
    for &(x, y) in &chests {
        grid.set(x, y, Tile::Chest { opened: false });
    }
    avoid.extend(chests.iter().copied());

    let trap_count = 3 + (rng.next_f64() * 4.0).floor() as i32;
    let traps = random_floor_tiles(&grid, trap_count, &mut rng, &avoid);
    for &(x, y) in &traps {
        grid.set(x, y, Tile::Trap { triggered: false });
    }

    let water = if theme.allows_water_pools() { place_water_pools(&mut grid, &rooms, &mut rng) } else { Vec::new() };

    let decor = decorate(&grid, &mut rng);

    let enemy_spawns = spawn_enemies(&grid, spawn, floor, difficulty, tables, &mut rng);

    let boss_spawn = if is_boss_floor {
        tables.boss_for_floor(floor).and_then(|b| {
            boss_gate.map(|(gx, gy)| BossSpawn { boss_id: b.id.clone(), x: gx + 8, y: gy })
        })
    } else {
        None
    };

    log::debug!(
        "generated floor {floor} (seed {floor_seed}): {}x{} grid, {} rooms, {} enemies, boss={}",
        w,
        h,
        rooms.len(),
        enemy_spawns.len(),
        boss_spawn.as_ref().map(|b| b.boss_id.as_str()).unwrap_or("none")
    );

    GeneratedFloor {
        grid,
        theme,
        spawn,
        stairs_down,
        stairs_up,
        campfire,
        boss_gate,
        chests,
        traps,
        water,
        decor,
        enemy_spawns,
        boss_spawn,
    }
}
