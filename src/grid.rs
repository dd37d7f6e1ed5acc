//! Dense row-major tile grid.

use serde::{Deserialize, Serialize};

pub const TILE_SIZE_PX: f64 = 32.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Tile {
    Void,
    Floor,
    Wall,
    Door,
    StairsDown,
    StairsUp,
    Campfire,
    Chest { opened: bool },
    Trap { triggered: bool },
    Water,
    BossGate,
}

impl Tile {
    pub fn is_walkable(&self) -> bool {
        matches!(
            self,
            Tile::Floor
                | Tile::Door
                | Tile::StairsDown
                | Tile::StairsUp
                | Tile::Campfire
                | Tile::Chest { .. }
                | Tile::Trap { .. }
                | Tile::Water
                | Tile::BossGate
        )
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Tile::Void | Tile::Wall)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Tile>,
}

impl TileGrid {
    pub fn new(width: i32, height: i32) -> Self {
        TileGrid { width, height, cells: vec![Tile::Void; (width * height) as usize] }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some((y * self.width + x) as usize)
        }
    }

    /// Out-of-bounds reads return Void.
    pub fn get(&self, x: i32, y: i32) -> Tile {
        self.index(x, y).map(|i| self.cells[i]).unwrap_or(Tile::Void)
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = tile;
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_walkable()
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_solid()
    }

    pub fn open_chest(&mut self, x: i32, y: i32) {
        if let Tile::Chest { .. } = self.get(x, y) {
            self.set(x, y, Tile::Chest { opened: true });
        }
    }

    pub fn trigger_trap(&mut self, x: i32, y: i32) {
        if let Tile::Trap { .. } = self.get(x, y) {
            self.set(x, y, Tile::Trap { triggered: true });
        }
    }

    pub fn pixel_to_tile(&self, px: f64, py: f64) -> (i32, i32) {
        ((px / TILE_SIZE_PX).floor() as i32, (py / TILE_SIZE_PX).floor() as i32)
    }

    pub fn tile_to_pixel(&self, x: i32, y: i32) -> (f64, f64) {
        (x as f64 * TILE_SIZE_PX, y as f64 * TILE_SIZE_PX)
    }

    pub fn tile_center_pixel(&self, x: i32, y: i32) -> (f64, f64) {
        ((x as f64 + 0.5) * TILE_SIZE_PX, (y as f64 + 0.5) * TILE_SIZE_PX)
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let w = self.width;
        let h = self.height;
        (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }

    /// BFS reachability from `spawn`, restricted to walkable cells. Used both
    /// by generation invariants and by `is_walkable`-gated carving.
    pub fn reachable_from(&self, spawn: (i32, i32)) -> std::collections::HashSet<(i32, i32)> {
        use std::collections::VecDeque;
        let mut seen = std::collections::HashSet::new();
        if !self.is_walkable(spawn.0, spawn.1) {
            return seen;
        }
        let mut queue = VecDeque::new();
        queue.push_back(spawn);
        seen.insert(spawn);
        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let n = (x + dx, y + dy);
                if self.is_walkable(n.0, n.1) && !seen.contains(&n) {
                    seen.insert(n);
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    /// One character per tile, one row per line — the same glyph table the
    /// `dungeon_cli generate` subcommand prints, reused here for snapshot
    /// testing so a rendering change can't silently go untested.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(match self.get(x, y) {
                    Tile::Void => ' ',
                    Tile::Floor => '.',
                    Tile::Wall => '#',
                    Tile::Door => '+',
                    Tile::StairsDown => '>',
                    Tile::StairsUp => '<',
                    Tile::Campfire => 'C',
                    Tile::Chest { opened: false } => '$',
                    Tile::Chest { opened: true } => '%',
                    Tile::Trap { .. } => '^',
                    Tile::Water => '~',
                    Tile::BossGate => 'B',
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_void() {
        let g = TileGrid::new(10, 10);
        assert_eq!(g.get(-1, 0), Tile::Void);
        assert_eq!(g.get(100, 100), Tile::Void);
    }

    #[test]
    fn chest_open_is_stateful() {
        let mut g = TileGrid::new(5, 5);
        g.set(2, 2, Tile::Chest { opened: false });
        g.open_chest(2, 2);
        assert_eq!(g.get(2, 2), Tile::Chest { opened: true });
    }

    #[test]
    fn pixel_roundtrip() {
        let g = TileGrid::new(10, 10);
        let (x, y) = (3, 4);
        let (px, py) = g.tile_to_pixel(x, y);
        assert_eq!(g.pixel_to_tile(px, py), (x, y));
    }
}
