//! Entity container: canonical bot and projectile lists plus their per-tick update

use glam::Vec2;
use rand::RngCore;

use super::bot::{Bot, BotContext, EnemyKind, Neighbor};
use super::effects::{EffectSink, SoundCue, colors};
use super::map::GameMap;
use super::player::Player;
use super::projectile::{Projectile, WeaponKind};
use super::spatial::{Positioned, SpatialGrid};
use crate::consts::*;

/// Spatial-grid handle for a bot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotRef {
    pub index: usize,
    pub pos: Vec2,
}

impl Positioned for BotRef {
    fn position(&self) -> Vec2 {
        self.pos
    }
}

/// A bot killed by a projectile this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub index: usize,
    pub pos: Vec2,
    pub kind: EnemyKind,
}

/// Outcome of one projectile pass
#[derive(Debug, Clone, Default)]
pub struct ProjectileReport {
    pub kills: Vec<Kill>,
    /// Projectiles whose life ended this tick, for explosion dispatch
    pub ended: Vec<Projectile>,
    /// Secret wall cells discovered
    pub secrets: Vec<(i32, i32)>,
    /// Damage that landed on the player
    pub player_hit: i32,
}

#[derive(Debug, Clone, Default)]
pub struct EntityManager {
    bots: Vec<Bot>,
    projectiles: Vec<Projectile>,
    grid: SpatialGrid<BotRef>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }

    pub fn bots_mut(&mut self) -> &mut [Bot] {
        &mut self.bots
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn add_bot(&mut self, bot: Bot) {
        self.bots.push(bot);
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn reset(&mut self) {
        self.bots.clear();
        self.projectiles.clear();
        self.grid.clear();
    }

    fn rebuild_grid(&mut self) {
        self.grid.update(
            self.bots
                .iter()
                .enumerate()
                .filter(|(_, b)| b.alive)
                .map(|(index, b)| BotRef { index, pos: b.pos }),
        );
    }

    /// Indices of living bots in the 3x3 grid neighbourhood of a point
    pub fn get_nearby_bots(&self, x: f32, y: f32) -> Vec<usize> {
        self.grid
            .get_nearby(x, y)
            .into_iter()
            .map(|r| r.index)
            .filter(|&i| self.bots.get(i).is_some_and(|b| b.alive))
            .collect()
    }

    /// Run one AI step for every bot, collect their shots and evict removed bots
    pub fn update_bots(&mut self, map: &GameMap, player: &mut Player, effects: &mut dyn EffectSink) {
        self.rebuild_grid();
        let mut emitted = Vec::new();

        for i in 0..self.bots.len() {
            if self.bots[i].removed {
                continue;
            }
            let pos = self.bots[i].pos;
            let neighbors: Vec<Neighbor> = self
                .grid
                .get_nearby(pos.x, pos.y)
                .into_iter()
                .filter(|r| r.index != i)
                .map(|r| {
                    let other = &self.bots[r.index];
                    Neighbor {
                        index: r.index,
                        pos: other.pos,
                        radius: other.radius(),
                    }
                })
                .collect();

            let mut ctx = BotContext {
                map,
                dist_sq: pos.distance_squared(player.pos),
                player: &mut *player,
                neighbors: &neighbors,
                pushes: Vec::new(),
            };

            if let Some(shot) = self.bots[i].update(&mut ctx) {
                emitted.push(shot);
                effects.play(SoundCue::EnemyShoot);
            }

            for (index, delta) in ctx.pushes {
                if let Some(other) = self.bots.get_mut(index) {
                    other.pos += delta;
                }
            }
        }

        self.projectiles.extend(emitted);

        let before = self.bots.len();
        self.bots.retain(|b| !b.removed);
        if self.bots.len() != before {
            log::debug!("Evicted {} bots", before - self.bots.len());
        }
    }

    /// Advance every projectile and resolve wall, player and bot hits
    pub fn update_projectiles(
        &mut self,
        map: &GameMap,
        player: &mut Player,
        rng: &mut dyn RngCore,
        effects: &mut dyn EffectSink,
    ) -> ProjectileReport {
        self.rebuild_grid();
        let mut report = ProjectileReport::default();

        for p in self.projectiles.iter_mut() {
            if !p.alive {
                continue;
            }
            p.update(map);

            if !p.alive {
                if let Some(cell) = p.hit_secret {
                    report.secrets.push(cell);
                }
                effects.world_burst(p.pos, p.z, 5, impact_color(p.kind));
                report.ended.push(p.clone());
                continue;
            }

            if !p.is_player {
                if p.pos.distance_squared(player.pos) < ENEMY_PROJECTILE_HIT_RADIUS_SQ {
                    p.alive = false;
                    if player.take_damage(p.damage) {
                        report.player_hit += p.damage;
                        effects.play(SoundCue::PlayerHurt);
                    }
                }
                continue;
            }

            let target = self
                .grid
                .get_nearby(p.pos.x, p.pos.y)
                .into_iter()
                .filter(|r| self.bots[r.index].is_active_enemy())
                .map(|r| (r.index, self.bots[r.index].pos.distance_squared(p.pos)))
                .filter(|&(_, d)| d < PLAYER_PROJECTILE_HIT_RADIUS_SQ)
                .min_by(|a, b| a.1.total_cmp(&b.1));

            if let Some((index, _)) = target {
                let bot = &mut self.bots[index];
                p.alive = false;
                let killed = bot.take_damage(p.damage, false, rng);
                if p.kind == WeaponKind::Freezer {
                    bot.freeze(FREEZE_DURATION);
                }
                let color = if p.kind == WeaponKind::Freezer { colors::FROST } else { colors::BLOOD };
                effects.world_burst(bot.pos, 0.5, 8, color);
                if killed {
                    report.kills.push(Kill {
                        index,
                        pos: bot.pos,
                        kind: bot.kind,
                    });
                }
                report.ended.push(p.clone());
            }
        }

        self.projectiles.retain(|p| p.alive);
        report
    }

    /// Hand items within reach to the player. Returns what was collected.
    pub fn collect_pickups(&mut self, player: &mut Player, effects: &mut dyn EffectSink) -> Vec<EnemyKind> {
        let mut collected = Vec::new();
        if !player.alive {
            return collected;
        }
        for bot in self.bots.iter_mut() {
            if bot.removed || bot.pos.distance(player.pos) >= PICKUP_RADIUS {
                continue;
            }
            let Some(effect) = bot.kind.pickup_effect() else {
                continue;
            };
            if player.apply_pickup(effect) {
                bot.removed = true;
                bot.alive = false;
                collected.push(bot.kind);
                effects.play(SoundCue::Pickup);
                log::debug!("Collected {}", bot.kind.as_str());
            }
        }
        self.bots.retain(|b| !b.removed);
        collected
    }

    /// Living, non-item bots
    pub fn active_enemies(&self) -> usize {
        self.bots.iter().filter(|b| b.is_active_enemy()).count()
    }

    pub fn has_active_boss(&self) -> bool {
        self.bots.iter().any(|b| b.is_active_enemy() && b.kind.is_boss())
    }

    pub fn nearest_enemy_distance(&self, x: f32, y: f32) -> Option<f32> {
        let p = Vec2::new(x, y);
        self.bots
            .iter()
            .filter(|b| b.is_active_enemy())
            .map(|b| b.pos.distance(p))
            .min_by(|a, b| a.total_cmp(b))
    }
}

fn impact_color(kind: WeaponKind) -> [u8; 3] {
    match kind {
        WeaponKind::Plasma => colors::PLASMA,
        WeaponKind::Freezer => colors::FROST,
        _ => colors::SPARK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::effects::RecordingEffects;
    use crate::sim::map::tests::open_map;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn zombie(x: f32, y: f32) -> Bot {
        Bot::new(EnemyKind::Zombie, Vec2::new(x, y), 1, Difficulty::Normal)
    }

    #[test]
    fn test_nearby_bots_by_index() {
        let map = open_map(30);
        let mut player = Player::new(Vec2::new(28.5, 28.5), 0.0);
        let mut em = EntityManager::new();
        em.add_bot(zombie(2.5, 2.5));
        em.add_bot(zombie(3.5, 2.5));
        em.add_bot(zombie(20.5, 20.5));
        em.update_bots(&map, &mut player, &mut RecordingEffects::default());
        let mut near = em.get_nearby_bots(2.5, 2.5);
        near.sort();
        assert_eq!(near, vec![0, 1]);
    }

    #[test]
    fn test_removed_bots_evicted() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(18.5, 18.5), 0.0);
        let mut em = EntityManager::new();
        em.add_bot(zombie(2.5, 2.5));
        em.add_bot(zombie(4.5, 2.5));
        em.bots_mut()[0].removed = true;
        em.update_bots(&map, &mut player, &mut RecordingEffects::default());
        assert_eq!(em.bots().len(), 1);
        assert!(em.bots()[0].pos.x >= 4.5);
    }

    #[test]
    fn test_bot_shots_are_collected() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(6.5, 5.5), 0.0);
        let mut em = EntityManager::new();
        em.add_bot(zombie(3.5, 5.5));
        let mut fx = RecordingEffects::default();
        em.update_bots(&map, &mut player, &mut fx);
        assert_eq!(em.projectiles().len(), 1);
        assert_eq!(fx.played(SoundCue::EnemyShoot), 1);
    }

    #[test]
    fn test_enemy_projectile_hits_player() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(6.5, 5.5), 0.0);
        let mut em = EntityManager::new();
        em.add_projectile(Projectile::new(Vec2::new(5.9, 5.5), 0.0, 0.2, 7, false, WeaponKind::Normal).unwrap());
        let mut rng = Pcg32::seed_from_u64(0);
        let report = em.update_projectiles(&map, &mut player, &mut rng, &mut RecordingEffects::default());
        assert_eq!(report.player_hit, 7);
        assert_eq!(player.health, PLAYER_HEALTH - 7);
        assert!(em.projectiles().is_empty());
    }

    #[test]
    fn test_player_projectile_kills_nearest_bot() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(2.5, 2.5), 0.0);
        let mut em = EntityManager::new();
        em.add_bot(zombie(10.5, 5.5));
        em.add_bot(zombie(11.5, 5.5));
        em.add_projectile(Projectile::new(Vec2::new(9.6, 5.5), 0.0, 0.5, 500, true, WeaponKind::Rocket).unwrap());
        let mut rng = Pcg32::seed_from_u64(0);
        let report = em.update_projectiles(&map, &mut player, &mut rng, &mut RecordingEffects::default());
        assert_eq!(report.kills.len(), 1);
        assert_eq!(report.kills[0].index, 0);
        assert_eq!(report.ended.len(), 1);
        assert_eq!(report.ended[0].kind, WeaponKind::Rocket);
        assert!(em.bots()[1].alive);
        assert_eq!(em.active_enemies(), 1);
    }

    #[test]
    fn test_wall_hit_reports_secret() {
        let mut map = open_map(10);
        map.set_cell(6, 5, WALL_SECRET);
        let mut player = Player::new(Vec2::new(2.5, 2.5), 0.0);
        let mut em = EntityManager::new();
        em.add_projectile(Projectile::new(Vec2::new(5.5, 5.5), 0.0, 0.6, 10, true, WeaponKind::Normal).unwrap());
        let mut rng = Pcg32::seed_from_u64(0);
        let report = em.update_projectiles(&map, &mut player, &mut rng, &mut RecordingEffects::default());
        assert_eq!(report.secrets, vec![(6, 5)]);
        assert_eq!(report.ended.len(), 1);
        assert!(em.projectiles().is_empty());
    }

    #[test]
    fn test_freezer_freezes_target() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(2.5, 2.5), 0.0);
        let mut em = EntityManager::new();
        em.add_bot(Bot::new(EnemyKind::Boss, Vec2::new(10.5, 5.5), 1, Difficulty::Normal));
        let freezer = Projectile::new(Vec2::new(9.8, 5.5), 0.0, 0.3, 1, true, WeaponKind::Freezer)
            .unwrap()
            .with_arc(1.0, 0.0, 0.0);
        em.add_projectile(freezer);
        let mut rng = Pcg32::seed_from_u64(0);
        em.update_projectiles(&map, &mut player, &mut rng, &mut RecordingEffects::default());
        assert!(em.bots()[0].frozen);
        assert_eq!(em.bots()[0].frozen_timer, FREEZE_DURATION);
    }

    #[test]
    fn test_collect_pickups() {
        let mut player = Player::new(Vec2::new(5.5, 5.5), 0.0);
        let mut em = EntityManager::new();
        em.add_bot(Bot::new(EnemyKind::BombItem, Vec2::new(5.7, 5.5), 1, Difficulty::Normal));
        em.add_bot(Bot::new(EnemyKind::HealthPack, Vec2::new(5.5, 5.7), 1, Difficulty::Normal));
        em.add_bot(zombie(5.5, 5.4));
        let mut fx = RecordingEffects::default();
        let collected = em.collect_pickups(&mut player, &mut fx);
        // Health is already full, so the pack stays
        assert_eq!(collected, vec![EnemyKind::BombItem]);
        assert_eq!(player.bombs, BOMBS_START + 1);
        assert_eq!(em.bots().len(), 2);
        assert_eq!(em.active_enemies(), 1);
    }

    #[test]
    fn test_nearest_enemy_skips_items_and_dead() {
        let mut em = EntityManager::new();
        em.add_bot(Bot::new(EnemyKind::AmmoBox, Vec2::new(1.0, 0.0), 1, Difficulty::Normal));
        let mut dead = zombie(2.0, 0.0);
        dead.take_damage(1000, false, &mut Pcg32::seed_from_u64(0));
        em.add_bot(dead);
        em.add_bot(zombie(0.0, 5.0));
        assert_eq!(em.nearest_enemy_distance(0.0, 0.0), Some(5.0));
        em.reset();
        assert_eq!(em.nearest_enemy_distance(0.0, 0.0), None);
    }
}
