//! Contract violations
//!
//! Construction-time checks fail fast with one of these. They are
//! programmer errors, never raised by a running simulation step.

use thiserror::Error;

/// A broken construction-time contract
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("map size {size} is below the minimum of {min}")]
    MapTooSmall { size: usize, min: usize },
    #[error("grid row {row} has {len} cells, expected {size}")]
    NonSquareGrid { row: usize, len: usize, size: usize },
    #[error("spatial grid cell size must be positive, got {0}")]
    InvalidCellSize(f32),
    #[error("projectile speed must be positive, got {0}")]
    InvalidSpeed(f32),
    #[error("damage must be non-negative, got {0}")]
    NegativeDamage(i32),
    #[error("wall chance must be within [0, 1], got {0}")]
    InvalidWallChance(f32),
    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
