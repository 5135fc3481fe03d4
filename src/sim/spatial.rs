//! Spatial hash grid for proximity queries
//!
//! The grid is a derived index: it is cleared and refilled from the
//! authoritative entity list once per tick, never edited in place.

use std::collections::HashMap;

use glam::Vec2;

use crate::consts::GRID_CELL_SIZE;
use crate::error::ContractViolation;

/// Anything with a 2D position
pub trait Positioned {
    fn position(&self) -> Vec2;
}

impl Positioned for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

/// Uniform bucket grid keyed by `(floor(x / cell), floor(y / cell))`
#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<T>>,
    len: usize,
}

impl<T> Default for SpatialGrid<T> {
    fn default() -> Self {
        Self {
            cell_size: GRID_CELL_SIZE,
            cells: HashMap::new(),
            len: 0,
        }
    }
}

impl<T: Positioned + Clone> SpatialGrid<T> {
    pub fn new(cell_size: f32) -> Result<Self, ContractViolation> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ContractViolation::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    fn key(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, item: T) {
        let pos = item.position();
        let key = self.key(pos.x, pos.y);
        self.cells.entry(key).or_default().push(item);
        self.len += 1;
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }

    /// Clear and bulk reinsert
    pub fn update(&mut self, items: impl IntoIterator<Item = T>) {
        self.clear();
        for item in items {
            self.insert(item);
        }
    }

    /// Everything in the 3x3 block of cells around the cell containing `(x, y)`
    pub fn get_nearby(&self, x: f32, y: f32) -> Vec<T> {
        let (cx, cy) = self.key(x, y);
        let mut out = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                    out.extend(bucket.iter().cloned());
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
