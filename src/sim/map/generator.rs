//! Pluggable base-terrain generators
//!
//! A generator fills a pre-allocated grid in place. Room overlay and
//! connectivity are applied afterwards by [`GameMap`](super::GameMap), so a
//! generator does not need to guarantee either.

use rand::{Rng, RngCore};

use super::Grid;
use crate::consts::*;

/// Strategy for filling a grid with walls and open cells
pub trait MapGenerator {
    fn generate(&self, grid: &mut Grid, rng: &mut dyn RngCore);
}

/// Cave-like terrain from random seeding plus majority-vote smoothing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellularAutomataGenerator {
    pub wall_chance: f32,
    pub iterations: u32,
}

impl Default for CellularAutomataGenerator {
    fn default() -> Self {
        Self {
            wall_chance: DEFAULT_WALL_CHANCE,
            iterations: DEFAULT_SMOOTHING_ITERATIONS,
        }
    }
}

impl CellularAutomataGenerator {
    pub fn new(wall_chance: f32, iterations: u32) -> Self {
        Self {
            wall_chance,
            iterations,
        }
    }

    fn seed_walls(&self, grid: &mut Grid, rng: &mut dyn RngCore) {
        let size = grid.size();
        for y in 0..size {
            for x in 0..size {
                let wall = rng.random::<f32>() < self.wall_chance;
                grid.set(x, y, if wall { WALL_GENERIC } else { 0 });
            }
        }
    }

    fn smooth(&self, grid: &mut Grid) {
        for _ in 0..self.iterations {
            let next = smooth_pass(grid);
            *grid = next;
        }
    }
}

impl MapGenerator for CellularAutomataGenerator {
    fn generate(&self, grid: &mut Grid, rng: &mut dyn RngCore) {
        self.seed_walls(grid, rng);
        set_borders(grid);
        self.smooth(grid);
    }
}

/// Border walls around an otherwise open grid
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyMapGenerator;

impl MapGenerator for EmptyMapGenerator {
    fn generate(&self, grid: &mut Grid, _rng: &mut dyn RngCore) {
        grid.fill(0);
        set_borders(grid);
    }
}

fn set_borders(grid: &mut Grid) {
    let size = grid.size();
    if size == 0 {
        return;
    }
    for i in 0..size {
        grid.set(i, 0, WALL_GENERIC);
        grid.set(i, size - 1, WALL_GENERIC);
        grid.set(0, i, WALL_GENERIC);
        grid.set(size - 1, i, WALL_GENERIC);
    }
}

/// Count walls among the 8 neighbours of an interior cell
fn count_wall_neighbors(grid: &Grid, x: usize, y: usize) -> u32 {
    let mut count = 0;
    for dy in [-1i32, 0, 1] {
        for dx in [-1i32, 0, 1] {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = (x as i32 + dx) as usize;
            let ny = (y as i32 + dy) as usize;
            if grid.get(nx, ny) > 0 {
                count += 1;
            }
        }
    }
    count
}

/// One smoothing pass computed against a snapshot of `grid`
fn smooth_pass(grid: &Grid) -> Grid {
    let size = grid.size();
    let mut next = grid.clone();
    for y in 1..size.saturating_sub(1) {
        for x in 1..size.saturating_sub(1) {
            let walls = count_wall_neighbors(grid, x, y);
            if walls > 4 {
                next.set(x, y, WALL_GENERIC);
            } else if walls < 4 {
                next.set(x, y, 0);
            }
        }
    }
    next
}
