//! Combat resolution: hitscan, damage formulas, explosions and kill bookkeeping

use glam::Vec2;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::bot::Bot;
use super::effects::{EffectSink, SoundCue, colors};
use super::entities::EntityManager;
use super::map::GameMap;
use super::player::Player;
use super::projectile::Projectile;
use super::raycast::cast_ray;
use crate::consts::*;
use crate::{angle_between, bearing};

/// Hitscan damage: falls off with range and with aim error
pub fn hitscan_damage(base: i32, distance: f32, range: f32, angle_diff: f32) -> i32 {
    let range_factor = if range > 0.0 {
        (1.0 - distance / range).max(MIN_RANGE_FACTOR)
    } else {
        MIN_RANGE_FACTOR
    };
    let accuracy_factor = (1.0 - angle_diff / HIT_ANGLE_TOLERANCE).max(MIN_ACCURACY_FACTOR);
    (base as f32 * range_factor * accuracy_factor) as i32
}

/// Linear area falloff: full at the center, zero at and beyond `radius`
pub fn area_damage(base: i32, distance: f32, radius: f32) -> i32 {
    if distance >= radius {
        return 0;
    }
    (base as f32 * (1.0 - distance / radius)) as i32
}

/// Result of a single hitscan ray
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShotOutcome {
    /// Index of the bot that was hit
    pub target: Option<usize>,
    pub damage: i32,
    pub headshot: bool,
    pub killed: bool,
    /// Distance to the bot hit, or to the wall
    pub distance: f32,
}

/// Kill and combo bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatResolver {
    pub kills: u32,
    pub combo: u32,
    pub combo_timer: u32,
    /// Where the most recent kill happened
    pub last_death_pos: Option<Vec2>,
}

impl CombatResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decay the combo window
    pub fn tick(&mut self) {
        if self.combo_timer > 0 {
            self.combo_timer -= 1;
            if self.combo_timer == 0 {
                self.combo = 0;
            }
        }
    }

    pub fn handle_kill(&mut self, pos: Vec2, effects: &mut dyn EffectSink) {
        self.kills += 1;
        self.combo += 1;
        self.combo_timer = COMBO_TIMER_FRAMES;
        self.last_death_pos = Some(pos);
        effects.play(SoundCue::Scream);
        log::debug!("Kill #{} (combo x{})", self.kills, self.combo);
    }

    /// Pull the trigger on the current weapon
    pub fn fire_weapon(
        &mut self,
        player: &mut Player,
        entities: &mut EntityManager,
        map: &GameMap,
        rng: &mut dyn RngCore,
        effects: &mut dyn EffectSink,
    ) -> Vec<ShotOutcome> {
        if !player.shoot() {
            return Vec::new();
        }
        effects.play(SoundCue::Shoot);
        let spec = player.current_weapon.spec();

        if let Some(launch) = spec.projectile {
            let damage = (spec.damage as f32 * player.damage_mult) as i32;
            match Projectile::new(player.pos, player.angle, launch.speed, damage, true, launch.kind) {
                Ok(mut projectile) => {
                    if let Some(radius) = launch.aoe_radius {
                        projectile = projectile.with_aoe_radius(radius);
                    }
                    entities.add_projectile(projectile);
                }
                Err(e) => log::warn!("Dropped {} shot: {}", player.current_weapon.as_str(), e),
            }
            return Vec::new();
        }

        if spec.pellets > 1 {
            let last = (spec.pellets - 1) as f32;
            (0..spec.pellets)
                .map(|i| {
                    let offset = -spec.spread + 2.0 * spec.spread * i as f32 / last;
                    self.fire_hitscan(player, entities.bots_mut(), map, rng, effects, Some(offset))
                })
                .collect()
        } else {
            vec![self.fire_hitscan(player, entities.bots_mut(), map, rng, effects, None)]
        }
    }

    /// Resolve one hitscan ray from the player
    pub fn fire_hitscan(
        &mut self,
        player: &Player,
        bots: &mut [Bot],
        map: &GameMap,
        rng: &mut dyn RngCore,
        effects: &mut dyn EffectSink,
        angle_offset: Option<f32>,
    ) -> ShotOutcome {
        let spec = player.current_weapon.spec();
        let aim = match angle_offset {
            Some(offset) => player.angle + offset,
            None => {
                let spread = if player.zoomed { SPREAD_ZOOM } else { SPREAD_BASE };
                player.angle + rng.random_range(-spread..=spread)
            }
        };

        let ray = cast_ray(player.pos, aim, map, spec.range);
        let wall_dist = ray.distance.min(spec.range);

        let mut best: Option<(usize, f32, f32)> = None;
        for (i, bot) in bots.iter().enumerate() {
            if !bot.is_active_enemy() {
                continue;
            }
            let dist = player.pos.distance(bot.pos);
            if dist > wall_dist {
                continue;
            }
            let diff = angle_between(bearing(player.pos, bot.pos), aim);
            if diff < HIT_ANGLE_TOLERANCE && best.is_none_or(|(_, d, _)| dist < d) {
                best = Some((i, dist, diff));
            }
        }

        let Some((index, dist, diff)) = best else {
            effects.trace(player.pos, ray.hit, colors::TRACER);
            if ray.is_wall() {
                effects.world_burst(ray.hit, 0.5, 4, colors::SPARK);
            }
            return ShotOutcome {
                distance: wall_dist,
                ..Default::default()
            };
        };

        let headshot = diff < HEADSHOT_THRESHOLD;
        let accuracy_diff = angle_between(bearing(player.pos, bots[index].pos), player.angle);
        let base = (spec.damage as f32 * player.damage_mult) as i32;
        let damage = hitscan_damage(base, dist, spec.range, accuracy_diff);

        let bot = &mut bots[index];
        let killed = bot.take_damage(damage, headshot, rng);
        let hit_pos = bot.pos;
        effects.trace(player.pos, hit_pos, colors::TRACER);
        effects.burst(if headshot { 20 } else { 10 }, colors::BLOOD);
        if killed {
            self.handle_kill(hit_pos, effects);
        }

        ShotOutcome {
            target: Some(index),
            damage,
            headshot,
            killed,
            distance: dist,
        }
    }

    /// Secondary laser: detonates at the first bot or wall along the facing
    pub fn fire_secondary(
        &mut self,
        player: &mut Player,
        bots: &mut [Bot],
        map: &GameMap,
        rng: &mut dyn RngCore,
        effects: &mut dyn EffectSink,
    ) -> bool {
        if !player.fire_secondary() {
            return false;
        }
        let ray = cast_ray(player.pos, player.angle, map, SECONDARY_RANGE);

        let impact = bots
            .iter()
            .filter(|b| b.is_active_enemy())
            .filter(|b| angle_between(bearing(player.pos, b.pos), player.angle) < HIT_ANGLE_TOLERANCE)
            .map(|b| (b.pos, player.pos.distance(b.pos)))
            .filter(|&(_, d)| d <= ray.distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(ray.hit, |(pos, _)| pos);

        effects.trace(player.pos, impact, colors::LASER);
        effects.play(SoundCue::Laser);
        self.explode_laser(impact, player, bots, rng, effects);
        true
    }

    /// Linear-falloff explosion. Returns the number of kills.
    pub fn explode_at(
        &mut self,
        center: Vec2,
        base: i32,
        radius: f32,
        bots: &mut [Bot],
        rng: &mut dyn RngCore,
        effects: &mut dyn EffectSink,
    ) -> u32 {
        effects.world_burst(center, 0.5, 30, colors::EXPLOSION);
        effects.play(SoundCue::Explosion);
        let mut kills = 0;
        for bot in bots.iter_mut().filter(|b| b.is_active_enemy()) {
            let damage = area_damage(base, bot.pos.distance(center), radius);
            if damage > 0 && bot.take_damage(damage, false, rng) {
                kills += 1;
                self.handle_kill(bot.pos, effects);
            }
        }
        kills
    }

    /// Same damage to every living bot within `radius`
    fn explode_flat(
        &mut self,
        center: Vec2,
        damage: i32,
        radius: f32,
        bots: &mut [Bot],
        rng: &mut dyn RngCore,
        effects: &mut dyn EffectSink,
    ) -> u32 {
        let mut kills = 0;
        for bot in bots.iter_mut().filter(|b| b.is_active_enemy()) {
            if bot.pos.distance(center) < radius && bot.take_damage(damage, false, rng) {
                kills += 1;
                self.handle_kill(bot.pos, effects);
            }
        }
        kills
    }

    pub fn explode_laser(
        &mut self,
        center: Vec2,
        player: &Player,
        bots: &mut [Bot],
        rng: &mut dyn RngCore,
        effects: &mut dyn EffectSink,
    ) -> u32 {
        effects.world_burst(center, 0.5, 40, colors::LASER);
        let radius = LASER_AOE_RADIUS * player.aoe_radius_mult;
        self.explode_flat(center, LASER_DAMAGE, radius, bots, rng, effects)
    }

    /// Screen-clearing bomb around the player
    pub fn explode_bomb(
        &mut self,
        player: &Player,
        bots: &mut [Bot],
        rng: &mut dyn RngCore,
        effects: &mut dyn EffectSink,
    ) -> u32 {
        effects.world_burst(player.pos, 0.5, 60, colors::EXPLOSION);
        effects.play(SoundCue::Bomb);
        let radius = BOMB_RADIUS * player.aoe_radius_mult;
        let kills = self.explode_flat(player.pos, BOMB_DAMAGE, radius, bots, rng, effects);
        log::info!("Bomb detonated: {} kills", kills);
        kills
    }

    /// End-of-life explosion for plasma, rockets and bombs
    pub fn explode_projectile(
        &mut self,
        projectile: &Projectile,
        player: &Player,
        bots: &mut [Bot],
        rng: &mut dyn RngCore,
        effects: &mut dyn EffectSink,
    ) -> u32 {
        let Some(radius) = projectile.explosion_radius() else {
            return 0;
        };
        let mult = if projectile.is_player { player.aoe_radius_mult } else { 1.0 };
        self.explode_at(projectile.pos, projectile.damage, radius * mult, bots, rng, effects)
    }
}
