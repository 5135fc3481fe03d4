//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by bot index)
//! - No rendering or audio dependencies; presentation goes through [`EffectSink`]

pub mod bot;
pub mod combat;
pub mod effects;
pub mod entities;
pub mod map;
pub mod player;
pub mod projectile;
pub mod raycast;
pub mod spatial;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bot::{Behavior, Bot, EnemyKind, EnemyStats, VisualClass};
pub use combat::{CombatResolver, ShotOutcome, area_damage, hitscan_damage};
pub use effects::{EffectSink, NullEffects, SoundCue};
pub use entities::{EntityManager, Kill, ProjectileReport};
pub use map::{CellularAutomataGenerator, EmptyMapGenerator, GameMap, Grid, MapGenerator};
pub use player::{PickupEffect, Player, WeaponState, WeaponType};
pub use projectile::{Projectile, WeaponKind};
pub use raycast::{HitSide, RayHit, cast_ray, has_line_of_sight};
pub use spatial::{Positioned, SpatialGrid};
pub use spawn::{SpawnPlanner, SpawnSummary};
pub use state::{GameState, LevelPhase, find_safe_spawn};
pub use tick::{TickInput, tick};
