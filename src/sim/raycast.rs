//! Grid ray marching (DDA) and line-of-sight

use glam::Vec2;

use super::map::GameMap;
use crate::consts::*;
use crate::{bearing, direction};

/// Stand-in for an infinite per-axis delta when the ray is parallel to that axis
const PARALLEL_DELTA: f32 = 1e30;

/// Which grid line the ray crossed last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    /// Crossed a vertical grid line (x step)
    X,
    /// Crossed a horizontal grid line (y step)
    Y,
}

/// Result of a single ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance travelled along the ray, never above the requested maximum
    pub distance: f32,
    /// Wall value hit (0 when nothing was hit within range)
    pub wall_type: u8,
    /// `origin + dir * distance`
    pub hit: Vec2,
    pub side: HitSide,
}

impl RayHit {
    #[inline]
    pub fn is_wall(&self) -> bool {
        self.wall_type != 0
    }
}

/// March a ray from `origin` along `angle` until it hits a wall, leaves the
/// grid or travels further than `max_distance`
pub fn cast_ray(origin: Vec2, angle: f32, map: &GameMap, max_distance: f32) -> RayHit {
    let dir = direction(angle);
    let size = map.size() as i32;

    let mut cell_x = origin.x.floor() as i32;
    let mut cell_y = origin.y.floor() as i32;

    let delta_x = if dir.x == 0.0 { PARALLEL_DELTA } else { (1.0 / dir.x).abs() };
    let delta_y = if dir.y == 0.0 { PARALLEL_DELTA } else { (1.0 / dir.y).abs() };

    let (step_x, mut side_x) = if dir.x < 0.0 {
        (-1, (origin.x - cell_x as f32) * delta_x)
    } else {
        (1, (cell_x as f32 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if dir.y < 0.0 {
        (-1, (origin.y - cell_y as f32) * delta_y)
    } else {
        (1, (cell_y as f32 + 1.0 - origin.y) * delta_y)
    };

    let finish = |distance: f32, wall_type: u8, side: HitSide| RayHit {
        distance,
        wall_type,
        hit: origin + dir * distance,
        side,
    };

    let max_steps = (1.5 * max_distance).ceil().max(0.0) as u32 + 2;
    let mut side = HitSide::X;

    for _ in 0..max_steps {
        let distance;
        if side_x < side_y {
            distance = side_x;
            side_x += delta_x;
            cell_x += step_x;
            side = HitSide::X;
        } else {
            distance = side_y;
            side_y += delta_y;
            cell_y += step_y;
            side = HitSide::Y;
        }

        if distance > max_distance {
            return finish(max_distance, 0, side);
        }
        if cell_x < 0 || cell_y < 0 || cell_x >= size || cell_y >= size {
            return finish(distance, WALL_GENERIC, side);
        }
        if let Some(wall) = map.cell(cell_x, cell_y).filter(|&c| c != 0) {
            return finish(distance, wall, side);
        }
    }

    finish(max_distance, 0, side)
}

/// True when nothing blocks the straight segment between two points
pub fn has_line_of_sight(from: Vec2, to: Vec2, map: &GameMap) -> bool {
    let separation = from.distance(to);
    if separation == 0.0 {
        return true;
    }
    let ray = cast_ray(from, bearing(from, to), map, separation);
    ray.distance >= separation - LOS_EPSILON
}
