//! Level-start placement of enemies, bosses, weapon pickups and items

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use super::bot::{Bot, EnemyKind};
use super::entities::EntityManager;
use super::map::GameMap;
use crate::consts::*;
use crate::settings::Difficulty;

/// What a spawn pass placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnSummary {
    pub enemies: usize,
    pub bosses: usize,
    pub pickups: usize,
    pub items: usize,
}

/// Uniform integer in `[lo, hi]`, with `hi` clamped up to `lo` on tiny maps
fn rand_cell(rng: &mut dyn RngCore, lo: i64, hi: i64) -> i64 {
    rng.random_range(lo..=hi.max(lo))
}

#[derive(Debug, Clone)]
pub struct SpawnPlanner {
    pub level: u32,
    pub difficulty: Difficulty,
    /// A reinforcement boss has already arrived this level
    reinforcement_spawned: bool,
}

impl SpawnPlanner {
    pub fn new(level: u32, difficulty: Difficulty) -> Self {
        Self {
            level,
            difficulty,
            reinforcement_spawned: false,
        }
    }

    /// Enemies for a level, capped at [`MAX_ENEMIES_PER_LEVEL`]
    pub fn enemy_count(level: u32, difficulty: Difficulty) -> u32 {
        let raw = BASE_ENEMIES_PER_LEVEL as f32 + level as f32 * 2.0 * difficulty.score_mult();
        raw.min(MAX_ENEMIES_PER_LEVEL as f32) as u32
    }

    /// Populate a fresh level
    pub fn spawn_all(
        &mut self,
        map: &GameMap,
        player_pos: Vec2,
        entities: &mut EntityManager,
        rng: &mut dyn RngCore,
    ) -> SpawnSummary {
        self.reinforcement_spawned = false;

        let enemies = self.spawn_enemies(map, player_pos, rng);
        let boss = self.spawn_boss(map, player_pos, rng);
        let pickups = self.spawn_pickups(map, rng);
        let items = self.spawn_items(map, rng);

        let summary = SpawnSummary {
            enemies: enemies.len(),
            bosses: usize::from(boss.is_some()),
            pickups: pickups.len(),
            items: items.len(),
        };
        for bot in enemies.into_iter().chain(boss).chain(pickups).chain(items) {
            entities.add_bot(bot);
        }

        log::info!(
            "Level {} spawned: {} enemies, {} boss, {} pickups, {} items",
            self.level,
            summary.enemies,
            summary.bosses,
            summary.pickups,
            summary.items
        );
        summary
    }

    fn make_bot(&self, kind: EnemyKind, x: i64, y: i64) -> Bot {
        Bot::new(
            kind,
            Vec2::new(x as f32 + 0.5, y as f32 + 0.5),
            self.level,
            self.difficulty,
        )
    }

    /// Regular enemies, keeping clear of the player's safe zone
    pub fn spawn_enemies(&self, map: &GameMap, player_pos: Vec2, rng: &mut dyn RngCore) -> Vec<Bot> {
        let count = Self::enemy_count(self.level, self.difficulty);
        let size = map.size() as i64;
        let safe_sq = SPAWN_SAFE_ZONE_RADIUS * SPAWN_SAFE_ZONE_RADIUS;
        let mut bots = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let mut cell = None;
            for attempt in 0..ENEMY_SPAWN_ATTEMPTS {
                let bx = rand_cell(rng, 2, size - 2);
                let by = rand_cell(rng, 2, size - 2);

                let min_sq = if attempt < ENEMY_RELAX_AFTER { safe_sq } else { safe_sq * 0.25 };
                let dist_sq = Vec2::new(bx as f32, by as f32).distance_squared(player_pos);
                if dist_sq < min_sq && attempt < ENEMY_SPAWN_ATTEMPTS - 1 {
                    continue;
                }
                if !map.is_wall(bx as f32, by as f32) {
                    cell = Some((bx, by));
                    break;
                }
            }

            let Some((x, y)) = cell.or_else(|| corner_fallback(map)) else {
                log::warn!("No open cell for enemy spawn, skipping");
                continue;
            };
            let kind = *EnemyKind::REGULAR_SPAWNS
                .choose(&mut *rng)
                .unwrap_or(&EnemyKind::Zombie);
            bots.push(self.make_bot(kind, x, y));
        }
        bots
    }

    /// One boss, placed far from the player
    pub fn spawn_boss(&self, map: &GameMap, player_pos: Vec2, rng: &mut dyn RngCore) -> Option<Bot> {
        let kind = *EnemyKind::BOSS_OPTIONS.choose(&mut *rng)?;
        let upper = (map.size() as i64 - 3).max(2);

        for attempt in 0..BOSS_SPAWN_ATTEMPTS {
            let cx = rand_cell(rng, 2, upper);
            let cy = rand_cell(rng, 2, upper);

            let min_dist = if attempt < BOSS_RELAX_AFTER {
                MIN_BOSS_DISTANCE
            } else {
                MIN_BOSS_DISTANCE * 0.7
            };
            let dist_sq = Vec2::new(cx as f32, cy as f32).distance_squared(player_pos);
            if !map.is_wall(cx as f32, cy as f32) && dist_sq > min_dist * min_dist {
                log::debug!("Boss {} at ({}, {})", kind.as_str(), cx, cy);
                return Some(self.make_bot(kind, cx, cy));
            }
        }
        log::warn!("Failed to place boss after {} attempts", BOSS_SPAWN_ATTEMPTS);
        None
    }

    /// Each weapon pickup appears with [`PICKUP_CHANCE`]
    pub fn spawn_pickups(&self, map: &GameMap, rng: &mut dyn RngCore) -> Vec<Bot> {
        let size = map.size() as i64;
        let mut out = Vec::new();
        for kind in EnemyKind::WEAPON_PICKUPS {
            if !rng.random_bool(PICKUP_CHANCE) {
                continue;
            }
            let rx = rand_cell(rng, 5, size - 5);
            let ry = rand_cell(rng, 5, size - 5);
            if !map.is_wall(rx as f32, ry as f32) {
                out.push(self.make_bot(kind, rx, ry));
            }
        }
        out
    }

    /// Health packs, ammo boxes and bombs
    pub fn spawn_items(&self, map: &GameMap, rng: &mut dyn RngCore) -> Vec<Bot> {
        let size = map.size() as i64;
        let mut out = Vec::new();
        for _ in 0..ITEM_COUNT {
            let rx = rand_cell(rng, 5, size - 5);
            let ry = rand_cell(rng, 5, size - 5);
            if map.is_wall(rx as f32, ry as f32) {
                continue;
            }
            let roll = rng.random::<f32>();
            let kind = if roll < 0.2 {
                EnemyKind::BombItem
            } else if roll < 0.7 {
                EnemyKind::AmmoBox
            } else {
                EnemyKind::HealthPack
            };
            out.push(self.make_bot(kind, rx, ry));
        }
        out
    }

    /// Send in a boss once the level is nearly cleared
    pub fn maybe_spawn_reinforcement_boss(
        &mut self,
        map: &GameMap,
        player_pos: Vec2,
        entities: &mut EntityManager,
        rng: &mut dyn RngCore,
    ) -> bool {
        if self.reinforcement_spawned
            || entities.active_enemies() == 0
            || entities.active_enemies() > BOSS_REINFORCEMENT_THRESHOLD
            || entities.has_active_boss()
        {
            return false;
        }
        self.reinforcement_spawned = true;
        match self.spawn_boss(map, player_pos, rng) {
            Some(boss) => {
                log::info!("Reinforcement boss: {}", boss.kind.as_str());
                entities.add_bot(boss);
                true
            }
            None => false,
        }
    }
}

/// First open cell scanning back from the far corner
fn corner_fallback(map: &GameMap) -> Option<(i64, i64)> {
    let size = map.size() as i64;
    let start = size - 2;
    for y in (1..=start).rev() {
        for x in (1..=start).rev() {
            if !map.is_wall(x as f32, y as f32) {
                log::warn!("Enemy spawn fell back to corner cell ({}, {})", x, y);
                return Some((x, y));
            }
        }
    }
    None
}
