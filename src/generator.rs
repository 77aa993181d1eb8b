//! Procedural level generation.
//!
//! A map is built in a fixed order so that one random stream always yields
//! the same level: terrain blocks, then the free-cell pool, then egg
//! markers, then orbs. Items are only ever drawn from the pool, so they
//! never land on walls or on each other.

use std::collections::VecDeque;
use std::str::FromStr;

use log::{debug, trace, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::grid::{Grid, Size};
use crate::tile::TileId;
use crate::tilemap::Tilemap;

pub const MIN_MAP_SIDE: usize = 3;
pub const MAX_MAP_SIDE: usize = 256;

/// Cells within this Chebyshev distance of the spawn stay clear of walls.
const SPAWN_RADIUS: i32 = 1;
/// Preferred minimum Chebyshev distance between the spawn and an egg.
const EGG_DISTANCE: i32 = 3;
/// Random guesses per item before falling back to a full pool scan.
const PICK_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase", try_from = "DifficultyRepr")
)]
pub enum Difficulty {
    Easy,
    #[default]
    Hard,
    Extreme,
}

/// Generation knobs for one difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierParameters {
    /// Fraction of the map the terrain pass tries to cover with walls.
    pub wall_coverage: f32,
    /// Largest wall block side.
    pub max_block: i32,
    pub eggs: usize,
    /// Orbs placed per free cell.
    pub orb_ratio: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Hard, Difficulty::Extreme];

    /// Nearest tier for a numeric level: 0 and below is easy, 2 and above
    /// is extreme.
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=0 => Difficulty::Easy,
            1 => Difficulty::Hard,
            _ => Difficulty::Extreme,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    pub fn parameters(self) -> TierParameters {
        match self {
            Difficulty::Easy => TierParameters {
                wall_coverage: 0.12,
                max_block: 2,
                eggs: 1,
                orb_ratio: 0.08,
            },
            Difficulty::Hard => TierParameters {
                wall_coverage: 0.22,
                max_block: 3,
                eggs: 2,
                orb_ratio: 0.10,
            },
            Difficulty::Extreme => TierParameters {
                wall_coverage: 0.32,
                max_block: 4,
                eggs: 4,
                orb_ratio: 0.12,
            },
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();

        if let Ok(level) = value.parse::<i64>() {
            return Ok(Difficulty::from_level(level));
        }

        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(value))
            .ok_or(format!("invalid difficulty: {}", s))
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum DifficultyRepr {
    Level(i64),
    Name(String),
}

#[cfg(feature = "serde")]
impl TryFrom<DifficultyRepr> for Difficulty {
    type Error = String;

    fn try_from(value: DifficultyRepr) -> Result<Self, Self::Error> {
        match value {
            DifficultyRepr::Level(level) => Ok(Difficulty::from_level(level)),
            DifficultyRepr::Name(name) => name.parse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    pub difficulty: Difficulty,
    pub size: Size,
}

impl Config {
    pub fn new(difficulty: Difficulty, size: Size) -> Self {
        Self { difficulty, size }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            size: Size::new(32, 24),
        }
    }
}

/// The stream the binary and the tests generate levels from.
pub fn seeded_rng(seed: u64) -> XorShiftRng {
    XorShiftRng::seed_from_u64(seed)
}

impl Tilemap {
    /// Replace the map, free-cell pool and orb counters with a new level.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &Config) {
        let width = config.size.width.clamp(MIN_MAP_SIDE, MAX_MAP_SIDE);
        let height = config.size.height.clamp(MIN_MAP_SIDE, MAX_MAP_SIDE);
        let parameters = config.difficulty.parameters();

        if width != config.size.width || height != config.size.height {
            warn!(
                "Map size {}x{} clamped to {}x{}",
                config.size.width, config.size.height, width, height
            );
        }

        self.grid = Grid::filled(width, height, TileId::Empty);
        self.free_cells.clear();
        self.total_orbs = 0;
        self.orbs_collected = 0;

        let spawn = self.spawn();
        let walls = self.carve_terrain(rng, &parameters, spawn);

        self.free_cells = self
            .grid
            .iter()
            .enumerate()
            .filter(|&(_, (_, _, &id))| id == TileId::Empty)
            .map(|(index, _)| index)
            .collect();

        self.place_eggs(rng, parameters.eggs, spawn);
        self.place_orbs(rng, parameters.orb_ratio, spawn);

        let sealed = self.seal_unreachable(spawn);

        if sealed > 0 {
            warn!("Sealed {} unreachable cells", sealed);
        }

        debug!(
            "Generated {}x{} {} map: {} walls, {} orbs, {} free cells",
            width,
            height,
            config.difficulty.name(),
            walls + sealed,
            self.total_orbs,
            self.free_cells.len()
        );
    }

    /// Drop wall blocks until the tier's coverage is met or the attempts
    /// run out. Blocks stay off the outer ring, keep an empty margin to
    /// each other and avoid the spawn zone, which keeps every open cell
    /// connected.
    fn carve_terrain<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        parameters: &TierParameters,
        spawn: (i32, i32),
    ) -> usize {
        let (width, height) = (self.width(), self.height());
        let area = self.grid.size();
        let target = (area as f32 * parameters.wall_coverage) as usize;
        let max_block = parameters.max_block.max(1);
        let mut walls = 0;

        for _ in 0..area {
            if walls >= target {
                break;
            }

            let block_width = rng.gen_range(1..=max_block);
            let block_height = rng.gen_range(1..=max_block);

            if block_width > width - 2 || block_height > height - 2 {
                continue;
            }

            let x = rng.gen_range(1..=width - 1 - block_width);
            let y = rng.gen_range(1..=height - 1 - block_height);

            if !self.block_fits(x, y, block_width, block_height, spawn) {
                continue;
            }

            trace!("Wall block {}x{} at ({}, {})", block_width, block_height, x, y);

            self.set_area(x, y, block_width, block_height, TileId::Wall);
            walls += (block_width * block_height) as usize;
        }

        walls
    }

    fn block_fits(&self, x: i32, y: i32, width: i32, height: i32, spawn: (i32, i32)) -> bool {
        let (sx, sy) = spawn;

        let touches_spawn = x <= sx + SPAWN_RADIUS
            && x + width - 1 >= sx - SPAWN_RADIUS
            && y <= sy + SPAWN_RADIUS
            && y + height - 1 >= sy - SPAWN_RADIUS;

        if touches_spawn {
            return false;
        }

        for cy in y - 1..=y + height {
            for cx in x - 1..=x + width {
                if self.get(cx, cy) != TileId::Empty {
                    return false;
                }
            }
        }

        true
    }

    fn place_eggs<R: Rng + ?Sized>(&mut self, rng: &mut R, eggs: usize, spawn: (i32, i32)) {
        let eggs = eggs.min(self.free_cells_excluding(spawn) / 2);

        for _ in 0..eggs {
            let far = |x: i32, y: i32| chebyshev((x, y), spawn) >= EGG_DISTANCE;
            let elsewhere = |x: i32, y: i32| (x, y) != spawn;

            let slot = match self.pick_free_slot(rng, far) {
                Some(slot) => Some(slot),
                None => self.pick_free_slot(rng, elsewhere),
            };

            match slot {
                Some(slot) => self.spawn_egg(slot),
                None => break,
            }
        }
    }

    fn place_orbs<R: Rng + ?Sized>(&mut self, rng: &mut R, ratio: f32, spawn: (i32, i32)) {
        let available = self.free_cells_excluding(spawn);
        let wanted = (self.free_cells.len() as f32 * ratio).round() as usize;
        let orbs = wanted.max(1).min(available);

        for _ in 0..orbs {
            match self.pick_free_slot(rng, |x, y| (x, y) != spawn) {
                Some(slot) => self.spawn_orb(slot),
                None => break,
            }
        }
    }

    fn free_cells_excluding(&self, cell: (i32, i32)) -> usize {
        let excluded = self.index_of(cell.0, cell.1);

        self.free_cells
            .iter()
            .filter(|&&index| Some(index) != excluded)
            .count()
    }

    /// Uniformly pick a pool slot whose cell passes `accept`.
    fn pick_free_slot<R, F>(&self, rng: &mut R, accept: F) -> Option<usize>
    where
        R: Rng + ?Sized,
        F: Fn(i32, i32) -> bool,
    {
        let accepts = |index: usize| self.position_of(index).map_or(false, |(x, y)| accept(x, y));

        if self.free_cells.is_empty() {
            return None;
        }

        // Most cells pass, so guess a few times before scanning the pool
        for _ in 0..PICK_ATTEMPTS {
            let slot = rng.gen_range(0..self.free_cells.len());

            if accepts(self.free_cells[slot]) {
                return Some(slot);
            }
        }

        let candidates: Vec<usize> = self
            .free_cells
            .iter()
            .enumerate()
            .filter(|&(_, &index)| accepts(index))
            .map(|(slot, _)| slot)
            .collect();

        candidates.choose(rng).copied()
    }

    fn spawn_orb(&mut self, slot: usize) {
        let index = self.free_cells.swap_remove(slot);

        if self.grid.set_index(index, TileId::Orb).is_ok() {
            self.total_orbs += 1;
        }
    }

    fn spawn_egg(&mut self, slot: usize) {
        let index = self.free_cells.swap_remove(slot);
        let _ = self.grid.set_index(index, TileId::Marker);
    }

    /// Wall off every non-wall cell the spawn cannot reach, keeping the
    /// pool and orb count in step. Returns the number of cells sealed.
    fn seal_unreachable(&mut self, spawn: (i32, i32)) -> usize {
        let reachable = self.flood_fill(spawn);
        let mut sealed = 0;

        for index in 0..self.grid.size() {
            let id = self.grid.as_slice()[index];

            if reachable[index] || id.is_wall() {
                continue;
            }

            match id {
                TileId::Orb => self.total_orbs -= 1,
                TileId::Empty => self.free_cells.retain(|&free| free != index),
                _ => {}
            }

            let _ = self.grid.set_index(index, TileId::Wall);
            sealed += 1;
        }

        sealed
    }

    /// Cells reachable from `start` through non-wall cells, by index.
    fn flood_fill(&self, start: (i32, i32)) -> Vec<bool> {
        let mut reachable = vec![false; self.grid.size()];
        let mut queue = VecDeque::new();

        if let Some(index) = self.index_of(start.0, start.1) {
            if !self.grid.as_slice()[index].is_wall() {
                reachable[index] = true;
                queue.push_back((start.0 as usize, start.1 as usize));
            }
        }

        while let Some((x, y)) = queue.pop_front() {
            for (nx, ny) in self.grid.get_neighbor_positions(x, y) {
                let index = match self.grid.index(nx, ny) {
                    Some(index) => index,
                    None => continue,
                };

                if reachable[index] || self.grid.as_slice()[index].is_wall() {
                    continue;
                }

                reachable[index] = true;
                queue.push_back((nx, ny));
            }
        }

        debug!(
            "{} cells reachable from ({}, {})",
            reachable.iter().filter(|&&r| r).count(),
            start.0,
            start.1
        );

        reachable
    }
}

fn chebyshev(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs().max((a.1 - b.1).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_helpers_move_cells_out_of_the_pool() {
        let mut map = Tilemap::new();
        map.grid = Grid::filled(3, 1, TileId::Empty);
        map.free_cells = vec![0, 1, 2];

        map.spawn_orb(0);
        map.spawn_egg(0);

        assert_eq!(map.get(0, 0), TileId::Orb);
        assert_eq!(map.get(2, 0), TileId::Marker);
        assert_eq!(map.free_cells, vec![1]);
        assert_eq!(map.total_orbs(), 1);
    }

    #[test]
    fn sealing_removes_pocket_from_pool_and_counters() {
        let mut map = Tilemap::new();
        map.grid = Grid::filled(5, 1, TileId::Empty);
        map.set(1, 0, TileId::Wall);
        map.set(3, 0, TileId::Orb);
        map.free_cells = vec![0, 2, 4];
        map.total_orbs = 1;

        let sealed = map.seal_unreachable((0, 0));

        assert_eq!(sealed, 3);
        assert_eq!(map.free_cells, vec![0]);
        assert_eq!(map.total_orbs(), 0);
        assert_eq!(map.get(4, 0), TileId::Wall);
    }

    #[test]
    fn pick_free_slot_honours_filter() {
        let mut map = Tilemap::new();
        map.grid = Grid::filled(4, 1, TileId::Empty);
        map.free_cells = vec![0, 1, 2, 3];
        let mut rng = seeded_rng(7);

        for _ in 0..20 {
            let slot = map.pick_free_slot(&mut rng, |x, _| x == 2);
            assert_eq!(slot, Some(2));
        }

        assert_eq!(map.pick_free_slot(&mut rng, |_, _| false), None);
    }
}
