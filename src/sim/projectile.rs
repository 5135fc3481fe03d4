//! Projectiles with a ballistic height arc

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::map::GameMap;
use crate::consts::*;
use crate::direction;
use crate::error::ContractViolation;

/// Projectile behaviour tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    #[default]
    Normal,
    Plasma,
    Rocket,
    Bomb,
    Freezer,
    Flame,
}

impl WeaponKind {
    /// Dies on ground contact instead of sliding along at height 0
    pub fn dies_on_ground(&self) -> bool {
        matches!(self, WeaponKind::Bomb | WeaponKind::Freezer)
    }

    /// Explosion radius when the projectile ends, if it explodes at all
    pub fn explosion_radius(&self) -> Option<f32> {
        match self {
            WeaponKind::Plasma => Some(PLASMA_AOE_RADIUS),
            WeaponKind::Rocket => Some(ROCKET_AOE_RADIUS),
            WeaponKind::Bomb => Some(BOMB_RADIUS),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Fixed travel bearing
    pub angle: f32,
    /// Horizontal distance per tick
    pub speed: f32,
    pub damage: i32,
    /// Fired by the player (otherwise by a bot)
    pub is_player: bool,
    pub kind: WeaponKind,
    /// Height above the floor
    pub z: f32,
    pub vz: f32,
    pub gravity: f32,
    pub alive: bool,
    /// Secret wall cell this projectile ended on
    pub hit_secret: Option<(i32, i32)>,
    /// Overrides the kind's explosion radius
    pub aoe_radius: Option<f32>,
}

impl Projectile {
    pub fn new(
        pos: Vec2,
        angle: f32,
        speed: f32,
        damage: i32,
        is_player: bool,
        kind: WeaponKind,
    ) -> Result<Self, ContractViolation> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ContractViolation::InvalidSpeed(speed));
        }
        if damage < 0 {
            return Err(ContractViolation::NegativeDamage(damage));
        }
        Ok(Self {
            pos,
            angle,
            speed,
            damage,
            is_player,
            kind,
            z: PROJECTILE_START_HEIGHT,
            vz: 0.0,
            gravity: 0.0,
            alive: true,
            hit_secret: None,
            aoe_radius: None,
        })
    }

    /// Launch on an arc
    pub fn with_arc(mut self, z: f32, vz: f32, gravity: f32) -> Self {
        self.z = z;
        self.vz = vz;
        self.gravity = gravity;
        self
    }

    pub fn with_aoe_radius(mut self, radius: f32) -> Self {
        self.aoe_radius = Some(radius);
        self
    }

    /// Explosion radius on end of life (before any player modifier)
    pub fn explosion_radius(&self) -> Option<f32> {
        match self.aoe_radius {
            Some(r) => Some(r),
            None => self.kind.explosion_radius(),
        }
    }

    /// Advance one tick
    pub fn update(&mut self, map: &GameMap) {
        if !self.alive {
            return;
        }

        let next = self.pos + direction(self.angle) * self.speed;

        self.z += self.vz;
        self.vz -= self.gravity;
        if self.z <= 0.0 {
            self.z = 0.0;
            if self.kind.dies_on_ground() {
                self.alive = false;
                return;
            }
        }

        let wall = map.wall_type(next.x, next.y);
        if wall != 0 {
            self.alive = false;
            if wall == WALL_SECRET {
                self.hit_secret = Some((next.x as i32, next.y as i32));
            }
            return;
        }

        self.pos = next;
    }
}
