//! Arena Sim - simulation core for grid-based raycaster arena shooters
//!
//! Core modules:
//! - `sim`: Deterministic simulation (map generation, ray casting, AI, combat)
//! - `settings`: Difficulty presets and data-driven simulation config
//! - `error`: Contract violations raised at construction time

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ContractViolation;
pub use settings::{Difficulty, SimConfig};

use glam::Vec2;

/// Simulation tuning constants
pub mod consts {
    /// Simulation rate (all timers count frames at this rate)
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Map defaults
    pub const DEFAULT_MAP_SIZE: usize = 40;
    pub const MIN_MAP_SIZE: usize = 5;
    pub const DEFAULT_WALL_CHANCE: f32 = 0.45;
    pub const DEFAULT_SMOOTHING_ITERATIONS: u32 = 5;
    /// Whole-map regeneration budget
    pub const MAX_GENERATION_ATTEMPTS: u32 = 20;
    /// Minimum share of open cells for a generated map to be accepted
    pub const MIN_WALKABLE_RATIO: f32 = 0.15;

    /// Wall cell values
    pub const WALL_GENERIC: u8 = 1;
    pub const WALL_SECRET: u8 = 5;
    pub const ROOM_WALL_TYPES: [u8; 3] = [2, 3, 4];

    /// Ray casting
    pub const LOS_EPSILON: f32 = 0.1;
    pub const MAX_RAY_DISTANCE: f32 = 100.0;

    /// Spatial partitioning
    pub const GRID_CELL_SIZE: f32 = 5.0;

    /// Player
    pub const PLAYER_HEALTH: i32 = 100;
    pub const DEFAULT_PLAYER_SPAWN: (f32, f32, f32) = (2.5, 2.5, 0.0);
    pub const STAMINA_MAX: f32 = 100.0;
    pub const STAMINA_REGEN: f32 = 0.5;
    pub const DASH_STAMINA_COST: f32 = 20.0;
    pub const DASH_DURATION: u32 = 10;
    pub const DASH_COOLDOWN: u32 = 60;
    pub const DASH_SPEED_MULT: f32 = 2.5;
    pub const SHIELD_MAX_DURATION: u32 = 600;
    pub const SHIELD_COOLDOWN_NORMAL: u32 = 600;
    pub const SHIELD_COOLDOWN_DEPLETED: u32 = 900;
    pub const BOMBS_START: u32 = 3;
    pub const BOMB_COOLDOWN: u32 = 1800;
    pub const SECONDARY_COOLDOWN: u32 = 600;
    pub const RESPAWN_DELAY_FRAMES: u32 = 180;
    pub const INVINCIBILITY_FRAMES: u32 = 300;

    /// Bots
    pub const BOT_SPEED: f32 = 0.02;
    pub const BASE_BOT_HEALTH: i32 = 30;
    pub const BASE_BOT_DAMAGE: i32 = 2;
    pub const BOT_ATTACK_RANGE: f32 = 5.0;
    pub const BOT_ATTACK_COOLDOWN: u32 = 60;
    pub const BOT_PROJECTILE_SPEED: f32 = 0.08;
    pub const BOT_PROJECTILE_DAMAGE: i32 = 5;
    pub const MAX_COLLISION_DIST: f32 = 2.0;
    pub const DEATH_ANIMATION_FRAMES: u32 = 30;
    pub const DISINTEGRATE_FRAMES: u32 = 60;
    pub const PAIN_STUN_FRAMES: u32 = 15;
    /// Flinch tuning (empirical)
    pub const PAIN_DAMAGE_THRESHOLD: i32 = 20;
    pub const PAIN_CHANCE: f64 = 0.3;
    pub const HEADSHOT_MULTIPLIER: i32 = 3;
    pub const BOT_COLLISION_RADIUS: f32 = 0.5;
    pub const BEAST_COLLISION_RADIUS: f32 = 1.0;
    pub const SHOOT_ANIM_FRAMES: u32 = 10;
    pub const WALK_EPSILON: f32 = 0.001;
    pub const WALK_PHASE_STEP: f32 = 0.3;
    pub const MINIGUNNER_RANGE: f32 = 12.0;
    pub const SNIPER_RANGE: f32 = 40.0;
    pub const BEAST_RANGE: f32 = 15.0;
    pub const BALL_ACCEL: f32 = 0.001;
    /// Velocity kept (and reversed) on a wall bounce
    pub const BALL_BOUNCE: f32 = 0.8;
    pub const BALL_CONTACT_RANGE: f32 = 1.0;
    pub const NINJA_CONTACT_RANGE: f32 = 1.2;
    pub const NINJA_ATTACK_COOLDOWN: u32 = 30;
    pub const FREEZE_DURATION: u32 = 180;

    /// Projectiles
    pub const PROJECTILE_START_HEIGHT: f32 = 0.5;

    /// Items
    pub const PICKUP_RADIUS: f32 = 0.8;
    pub const HEALTH_PACK_AMOUNT: i32 = 50;

    /// Projectile hit radii (squared)
    pub const ENEMY_PROJECTILE_HIT_RADIUS_SQ: f32 = 0.25;
    pub const PLAYER_PROJECTILE_HIT_RADIUS_SQ: f32 = 0.64;

    /// Hitscan
    pub const SPREAD_BASE: f32 = 0.05;
    pub const SPREAD_ZOOM: f32 = 0.005;
    pub const HIT_ANGLE_TOLERANCE: f32 = 0.15;
    pub const HEADSHOT_THRESHOLD: f32 = 0.05;
    pub const MIN_RANGE_FACTOR: f32 = 0.3;
    pub const MIN_ACCURACY_FACTOR: f32 = 0.5;
    pub const SECONDARY_RANGE: f32 = 100.0;

    /// Area effects
    pub const BOMB_RADIUS: f32 = 10.0;
    pub const BOMB_DAMAGE: i32 = 1000;
    pub const LASER_AOE_RADIUS: f32 = 8.0;
    pub const LASER_DAMAGE: i32 = 500;
    pub const PLASMA_AOE_RADIUS: f32 = 3.0;
    pub const ROCKET_AOE_RADIUS: f32 = 6.0;

    /// Kill combos
    pub const COMBO_TIMER_FRAMES: u32 = 180;
    pub const KILL_SCORE: u32 = 100;

    /// Level exit
    pub const PORTAL_RADIUS: f32 = 1.0;

    /// Player input scaling (per frame at full stick)
    pub const PLAYER_MOVE_SPEED: f32 = 0.08;
    pub const PLAYER_TURN_SPEED: f32 = 0.05;

    /// Spawning
    pub const SPAWN_SAFE_ZONE_RADIUS: f32 = 10.0;
    pub const MIN_BOSS_DISTANCE: f32 = 10.0;
    pub const MAX_ENEMIES_PER_LEVEL: u32 = 50;
    pub const BASE_ENEMIES_PER_LEVEL: u32 = 5;
    pub const ENEMY_SPAWN_ATTEMPTS: u32 = 50;
    /// Attempts from this index on use a quarter of the safe radius
    pub const ENEMY_RELAX_AFTER: u32 = 40;
    pub const BOSS_SPAWN_ATTEMPTS: u32 = 100;
    pub const BOSS_RELAX_AFTER: u32 = 70;
    pub const PICKUP_CHANCE: f64 = 0.4;
    pub const ITEM_COUNT: u32 = 8;
    pub const BOSS_REINFORCEMENT_THRESHOLD: usize = 2;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Absolute angular difference between two bearings, in [0, π]
#[inline]
pub fn angle_between(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Bearing from `from` toward `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_across_zero() {
        let diff = angle_between(0.05, 2.0 * PI - 0.05);
        assert!((diff - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_bearing_east() {
        let b = bearing(Vec2::new(1.0, 1.0), Vec2::new(4.0, 1.0));
        assert!(b.abs() < 1e-6);
    }
}
