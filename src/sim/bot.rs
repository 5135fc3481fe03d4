//! Enemy bots: type table, per-type behavior and status effects

use glam::Vec2;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::map::GameMap;
use super::player::{PickupEffect, Player, WeaponType};
use super::projectile::{Projectile, WeaponKind};
use super::raycast::has_line_of_sight;
use crate::consts::*;
use crate::settings::Difficulty;
use crate::{bearing, direction};

/// How a bot is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualClass {
    Monster,
    Ghost,
    Baby,
    Ball,
    Beast,
    CyberDemon,
    Item,
}

/// Per-type stat multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health_mult: f32,
    pub speed_mult: f32,
    pub damage_mult: f32,
    pub visual: VisualClass,
}

const fn stats(health_mult: f32, speed_mult: f32, damage_mult: f32, visual: VisualClass) -> EnemyStats {
    EnemyStats {
        health_mult,
        speed_mult,
        damage_mult,
        visual,
    }
}

const ITEM_STATS: EnemyStats = stats(1.0, 0.0, 0.0, VisualClass::Item);

/// Every bot type, including collectible items that share the bot list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Zombie,
    Ghost,
    Boss,
    Demon,
    Dinosaur,
    Raider,
    Ninja,
    Sniper,
    BabyZombie,
    MutantBaby,
    Minigunner,
    Ball,
    Beast,
    CyberDemon,
    HealthPack,
    AmmoBox,
    BombItem,
    PickupRifle,
    PickupShotgun,
    PickupPlasma,
    PickupMinigun,
    PickupRocket,
    PickupFlamethrower,
}

/// Per-type AI routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Standard,
    Minigunner,
    Sniper,
    Beast,
    Ball,
    Ninja,
    Inert,
}

impl EnemyKind {
    /// Types placed by regular level spawning
    pub const REGULAR_SPAWNS: [EnemyKind; 10] = [
        EnemyKind::Zombie,
        EnemyKind::Ghost,
        EnemyKind::Dinosaur,
        EnemyKind::Raider,
        EnemyKind::Ninja,
        EnemyKind::Sniper,
        EnemyKind::BabyZombie,
        EnemyKind::MutantBaby,
        EnemyKind::Minigunner,
        EnemyKind::CyberDemon,
    ];

    pub const BOSS_OPTIONS: [EnemyKind; 2] = [EnemyKind::Ball, EnemyKind::Beast];

    pub const WEAPON_PICKUPS: [EnemyKind; 4] = [
        EnemyKind::PickupRifle,
        EnemyKind::PickupShotgun,
        EnemyKind::PickupPlasma,
        EnemyKind::PickupMinigun,
    ];

    pub fn stats(&self) -> EnemyStats {
        use VisualClass as V;
        match self {
            EnemyKind::Zombie => stats(1.0, 0.8, 1.0, V::Monster),
            EnemyKind::Ghost => stats(0.6, 0.6, 1.5, V::Ghost),
            EnemyKind::Boss => stats(5.0, 0.5, 2.0, V::Monster),
            EnemyKind::Demon => stats(0.5, 1.2, 1.5, V::Monster),
            EnemyKind::Dinosaur => stats(2.0, 0.9, 1.0, V::Monster),
            EnemyKind::Raider => stats(1.1, 1.0, 1.2, V::Monster),
            EnemyKind::Ninja => stats(0.5, 1.5, 1.2, V::Ghost),
            EnemyKind::Sniper => stats(0.5, 0.9, 3.0, V::Ghost),
            EnemyKind::BabyZombie => stats(0.4, 1.3, 0.5, V::Baby),
            EnemyKind::MutantBaby => stats(0.6, 1.1, 0.7, V::Baby),
            EnemyKind::Minigunner => stats(2.0, 0.5, 0.8, V::Monster),
            EnemyKind::Ball => stats(3.0, 2.5, 3.0, V::Ball),
            EnemyKind::Beast => stats(6.0, 0.4, 2.5, V::Beast),
            EnemyKind::CyberDemon => stats(15.0, 0.3, 4.0, V::CyberDemon),
            _ => ITEM_STATS,
        }
    }

    pub fn behavior(&self) -> Behavior {
        match self {
            EnemyKind::Minigunner => Behavior::Minigunner,
            EnemyKind::Sniper => Behavior::Sniper,
            EnemyKind::Beast => Behavior::Beast,
            EnemyKind::Ball => Behavior::Ball,
            EnemyKind::Ninja => Behavior::Ninja,
            k if k.is_item() => Behavior::Inert,
            _ => Behavior::Standard,
        }
    }

    pub fn is_item(&self) -> bool {
        self.stats().visual == VisualClass::Item
    }

    pub fn is_boss(&self) -> bool {
        Self::BOSS_OPTIONS.contains(self)
    }

    /// Effect on the player when collected, items only
    pub fn pickup_effect(&self) -> Option<PickupEffect> {
        match self {
            EnemyKind::HealthPack => Some(PickupEffect::Health(HEALTH_PACK_AMOUNT)),
            EnemyKind::AmmoBox => Some(PickupEffect::Ammo),
            EnemyKind::BombItem => Some(PickupEffect::Bomb),
            EnemyKind::PickupRifle => Some(PickupEffect::Weapon(WeaponType::Rifle)),
            EnemyKind::PickupShotgun => Some(PickupEffect::Weapon(WeaponType::Shotgun)),
            EnemyKind::PickupPlasma => Some(PickupEffect::Weapon(WeaponType::Plasma)),
            EnemyKind::PickupMinigun => Some(PickupEffect::Weapon(WeaponType::Minigun)),
            EnemyKind::PickupRocket => Some(PickupEffect::Weapon(WeaponType::Rocket)),
            EnemyKind::PickupFlamethrower => Some(PickupEffect::Weapon(WeaponType::Flamethrower)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Zombie => "zombie",
            EnemyKind::Ghost => "ghost",
            EnemyKind::Boss => "boss",
            EnemyKind::Demon => "demon",
            EnemyKind::Dinosaur => "dinosaur",
            EnemyKind::Raider => "raider",
            EnemyKind::Ninja => "ninja",
            EnemyKind::Sniper => "sniper",
            EnemyKind::BabyZombie => "baby_zombie",
            EnemyKind::MutantBaby => "mutant_baby",
            EnemyKind::Minigunner => "minigunner",
            EnemyKind::Ball => "ball",
            EnemyKind::Beast => "beast",
            EnemyKind::CyberDemon => "cyber_demon",
            EnemyKind::HealthPack => "health_pack",
            EnemyKind::AmmoBox => "ammo_box",
            EnemyKind::BombItem => "bomb_item",
            EnemyKind::PickupRifle => "pickup_rifle",
            EnemyKind::PickupShotgun => "pickup_shotgun",
            EnemyKind::PickupPlasma => "pickup_plasma",
            EnemyKind::PickupMinigun => "pickup_minigun",
            EnemyKind::PickupRocket => "pickup_rocket",
            EnemyKind::PickupFlamethrower => "pickup_flamethrower",
        }
    }
}

/// Another bot as seen during this bot's update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index in the owning entity list
    pub index: usize,
    pub pos: Vec2,
    pub radius: f32,
}

/// Everything a behavior handler may read or touch
pub struct BotContext<'a> {
    pub map: &'a GameMap,
    pub player: &'a mut Player,
    /// Squared distance from the bot to the player
    pub dist_sq: f32,
    pub neighbors: &'a [Neighbor],
    /// Displacements to apply to neighbours after the update, by entity index
    pub pushes: Vec<(usize, Vec2)>,
}

type Handler = fn(&mut Bot, &mut BotContext) -> Option<Projectile>;

/// Behavior lookup table
fn handler(behavior: Behavior) -> Handler {
    match behavior {
        Behavior::Standard => standard_behavior,
        Behavior::Minigunner => minigunner_behavior,
        Behavior::Sniper => sniper_behavior,
        Behavior::Beast => beast_behavior,
        Behavior::Ball => ball_behavior,
        Behavior::Ninja => ninja_behavior,
        Behavior::Inert => inert_behavior,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub pos: Vec2,
    pub z: f32,
    pub angle: f32,
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub speed: f32,
    pub momentum: Vec2,
    pub alive: bool,
    pub dead: bool,
    pub removed: bool,
    pub frozen: bool,
    pub frozen_timer: u32,
    pub pain_timer: u32,
    pub death_timer: u32,
    pub disintegrate_timer: u32,
    pub attack_cooldown: u32,
    pub walk_phase: f32,
    pub shoot_anim: u32,
    pub prev_pos: Vec2,
    pub level: u32,
}

impl Bot {
    pub fn new(kind: EnemyKind, pos: Vec2, level: u32, difficulty: Difficulty) -> Self {
        let stats = kind.stats();
        let level_bonus = level.saturating_sub(1) as i32;

        let base_health = (BASE_BOT_HEALTH as f32 * stats.health_mult) as i32;
        let health = ((base_health + level_bonus * 3) as f32 * difficulty.health_mult()) as i32;

        let base_damage = (BASE_BOT_DAMAGE as f32 * stats.damage_mult) as i32;
        let mut damage = ((base_damage + level_bonus * 2) as f32 * difficulty.damage_mult()) as i32;
        if kind == EnemyKind::Ball {
            damage = (damage as f32 * 1.5) as i32;
        }

        Self {
            pos,
            z: 0.0,
            angle: 0.0,
            kind,
            health,
            max_health: health,
            damage,
            speed: BOT_SPEED * stats.speed_mult,
            momentum: Vec2::ZERO,
            alive: true,
            dead: false,
            removed: false,
            frozen: false,
            frozen_timer: 0,
            pain_timer: 0,
            death_timer: 0,
            disintegrate_timer: 0,
            attack_cooldown: 0,
            walk_phase: 0.0,
            shoot_anim: 0,
            prev_pos: pos,
            level,
        }
    }

    /// Body radius used for bot-bot collision
    pub fn radius(&self) -> f32 {
        if self.kind == EnemyKind::Beast {
            BEAST_COLLISION_RADIUS
        } else {
            BOT_COLLISION_RADIUS
        }
    }

    /// Living, non-item bot
    pub fn is_active_enemy(&self) -> bool {
        self.alive && !self.dead && !self.kind.is_item()
    }

    pub fn freeze(&mut self, duration: u32) {
        if duration == 0 || self.dead {
            return;
        }
        self.frozen = true;
        self.frozen_timer = duration;
    }

    /// Apply damage. Returns `true` exactly once, on the killing blow.
    ///
    /// The flinch check reads the base amount, before the headshot multiplier.
    pub fn take_damage(&mut self, amount: i32, is_headshot: bool, rng: &mut dyn RngCore) -> bool {
        if self.dead {
            return false;
        }
        self.health -= if is_headshot { amount * HEADSHOT_MULTIPLIER } else { amount };

        if self.health <= 0 {
            self.health = 0;
            self.dead = true;
            self.alive = false;
            self.frozen = false;
            self.death_timer = 0;
            self.disintegrate_timer = 0;
            log::debug!("{} killed at ({:.1}, {:.1})", self.kind.as_str(), self.pos.x, self.pos.y);
            return true;
        }

        if amount > PAIN_DAMAGE_THRESHOLD || rng.random_bool(PAIN_CHANCE) {
            self.pain_timer = PAIN_STUN_FRAMES;
        }
        false
    }

    /// One AI step. Returns a projectile when the bot fires.
    pub fn update(&mut self, ctx: &mut BotContext) -> Option<Projectile> {
        self.prev_pos = self.pos;

        if self.kind.is_item() {
            return None;
        }

        if self.frozen {
            self.frozen_timer = self.frozen_timer.saturating_sub(1);
            if self.frozen_timer == 0 {
                self.frozen = false;
            }
            return None;
        }

        if self.pain_timer > 0 {
            self.pain_timer -= 1;
            return None;
        }

        if self.dead {
            self.death_timer += 1;
            if self.death_timer > DEATH_ANIMATION_FRAMES {
                self.disintegrate_timer += 1;
                if self.disintegrate_timer > DISINTEGRATE_FRAMES {
                    self.removed = true;
                }
            }
            return None;
        }

        self.shoot_anim = self.shoot_anim.saturating_sub(1);

        handler(self.kind.behavior())(self, ctx)
    }

    /// Fire at the player when in range, off cooldown and in view
    fn try_attack(&mut self, ctx: &BotContext, attack: &Attack) -> Option<Projectile> {
        if ctx.dist_sq >= attack.range * attack.range || self.attack_cooldown > 0 {
            return None;
        }
        if !ctx.player.alive || !has_line_of_sight(self.pos, ctx.player.pos, ctx.map) {
            return None;
        }
        let angle = bearing(self.pos, ctx.player.pos);
        let projectile =
            Projectile::new(self.pos, angle, attack.speed, attack.damage, false, WeaponKind::Normal).ok()?;
        self.angle = angle;
        self.attack_cooldown = attack.cooldown;
        self.shoot_anim = SHOOT_ANIM_FRAMES;
        Some(projectile)
    }

    /// Would moving to `target` push this bot into a neighbour
    fn blocked_by(&self, target: Vec2, n: &Neighbor) -> bool {
        let d = n.pos - target;
        if d.x.abs() > MAX_COLLISION_DIST || d.y.abs() > MAX_COLLISION_DIST {
            return false;
        }
        let min = self.radius() + n.radius;
        // Overlapping bots may still separate
        d.length_squared() < min * min && d.length_squared() < n.pos.distance_squared(self.pos)
    }

    /// Try one axis of a step. A beast shoves the first neighbour in its way
    /// along the same axis by twice the step, if that spot is open.
    fn step_axis(&mut self, delta: Vec2, ctx: &mut BotContext) {
        let target = self.pos + delta;
        if ctx.map.is_wall(target.x, target.y) {
            return;
        }
        let Some(n) = ctx.neighbors.iter().find(|n| self.blocked_by(target, n)) else {
            self.pos = target;
            return;
        };
        if self.kind == EnemyKind::Beast {
            let pushed = n.pos + delta * 2.0;
            if !ctx.map.is_wall(pushed.x, pushed.y) {
                ctx.pushes.push((n.index, delta * 2.0));
            }
        }
    }

    /// Walk toward the player with per-axis wall and bot collision
    fn default_movement(&mut self, ctx: &mut BotContext) {
        self.angle = bearing(self.pos, ctx.player.pos);
        let step = direction(self.angle) * self.speed;
        let start = self.pos;

        self.step_axis(Vec2::new(step.x, 0.0), ctx);
        self.step_axis(Vec2::new(0.0, step.y), ctx);

        if self.pos.distance(start) > WALK_EPSILON {
            self.walk_phase = (self.walk_phase + WALK_PHASE_STEP) % std::f32::consts::TAU;
        }
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
    }
}

/// Ranged attack parameters
struct Attack {
    range: f32,
    speed: f32,
    damage: i32,
    cooldown: u32,
}

fn standard_behavior(bot: &mut Bot, ctx: &mut BotContext) -> Option<Projectile> {
    let attack = Attack {
        range: BOT_ATTACK_RANGE,
        speed: BOT_PROJECTILE_SPEED,
        damage: BOT_PROJECTILE_DAMAGE + bot.damage,
        cooldown: BOT_ATTACK_COOLDOWN,
    };
    let shot = bot.try_attack(ctx, &attack);
    if shot.is_none() {
        bot.default_movement(ctx);
    }
    shot
}

fn minigunner_behavior(bot: &mut Bot, ctx: &mut BotContext) -> Option<Projectile> {
    let attack = Attack {
        range: MINIGUNNER_RANGE,
        speed: 0.2,
        damage: bot.damage,
        cooldown: 10,
    };
    let shot = bot.try_attack(ctx, &attack);
    if shot.is_none() {
        bot.default_movement(ctx);
    }
    shot
}

fn sniper_behavior(bot: &mut Bot, ctx: &mut BotContext) -> Option<Projectile> {
    let attack = Attack {
        range: SNIPER_RANGE,
        speed: 0.4,
        damage: bot.damage,
        cooldown: 180,
    };
    let shot = bot.try_attack(ctx, &attack);
    if shot.is_none() {
        bot.default_movement(ctx);
    }
    shot
}

/// Heavy shots; walking into other bots shoves them aside
fn beast_behavior(bot: &mut Bot, ctx: &mut BotContext) -> Option<Projectile> {
    let attack = Attack {
        range: BEAST_RANGE,
        speed: 0.15,
        damage: bot.damage * 2,
        cooldown: 120,
    };
    let shot = bot.try_attack(ctx, &attack);
    if shot.is_none() {
        bot.default_movement(ctx);
    }
    shot
}

fn ball_behavior(bot: &mut Bot, ctx: &mut BotContext) -> Option<Projectile> {
    let to_player = ctx.player.pos - bot.pos;
    let dist = to_player.length();
    if dist > 0.0 {
        bot.momentum += to_player / dist * (BALL_ACCEL * bot.speed);
    }
    let max_speed = bot.speed * 2.0;
    if bot.momentum.length() > max_speed {
        bot.momentum = bot.momentum.normalize_or_zero() * max_speed;
    }

    let nx = bot.pos.x + bot.momentum.x;
    if ctx.map.is_wall(nx, bot.pos.y) {
        bot.momentum.x *= -BALL_BOUNCE;
    } else {
        bot.pos.x = nx;
    }
    let ny = bot.pos.y + bot.momentum.y;
    if ctx.map.is_wall(bot.pos.x, ny) {
        bot.momentum.y *= -BALL_BOUNCE;
    } else {
        bot.pos.y = ny;
    }

    if bot.momentum != Vec2::ZERO {
        bot.angle = bot.momentum.y.atan2(bot.momentum.x);
    }

    if bot.pos.distance(ctx.player.pos) < BALL_CONTACT_RANGE {
        ctx.player.take_damage(bot.damage);
        bot.momentum = -bot.momentum;
    }
    None
}

fn ninja_behavior(bot: &mut Bot, ctx: &mut BotContext) -> Option<Projectile> {
    if ctx.dist_sq < NINJA_CONTACT_RANGE * NINJA_CONTACT_RANGE && bot.attack_cooldown == 0 {
        bot.angle = bearing(bot.pos, ctx.player.pos);
        ctx.player.take_damage(bot.damage);
        bot.attack_cooldown = NINJA_ATTACK_COOLDOWN;
        bot.shoot_anim = SHOOT_ANIM_FRAMES;
        return None;
    }
    bot.default_movement(ctx);
    None
}

fn inert_behavior(_bot: &mut Bot, _ctx: &mut BotContext) -> Option<Projectile> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::tests::open_map;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bot_at(kind: EnemyKind, x: f32, y: f32) -> Bot {
        Bot::new(kind, Vec2::new(x, y), 1, Difficulty::Normal)
    }

    fn run(bot: &mut Bot, map: &GameMap, player: &mut Player, neighbors: &[Neighbor]) -> (Option<Projectile>, Vec<(usize, Vec2)>) {
        let dist_sq = bot.pos.distance_squared(player.pos);
        let mut ctx = BotContext {
            map,
            player,
            dist_sq,
            neighbors,
            pushes: Vec::new(),
        };
        let shot = bot.update(&mut ctx);
        (shot, ctx.pushes)
    }

    #[test]
    fn test_stats_scale_with_level_and_difficulty() {
        let z = Bot::new(EnemyKind::Zombie, Vec2::ZERO, 1, Difficulty::Normal);
        assert_eq!(z.health, 30);
        assert_eq!(z.damage, 2);
        let z = Bot::new(EnemyKind::Zombie, Vec2::ZERO, 3, Difficulty::Hard);
        assert_eq!(z.health, 54); // (30 + 6) * 1.5
        assert_eq!(z.damage, 9); // (2 + 4) * 1.5
        let ghost = Bot::new(EnemyKind::Ghost, Vec2::ZERO, 1, Difficulty::Normal);
        assert_eq!(ghost.health, 18);
        assert_eq!(ghost.damage, 3);
        let ball = Bot::new(EnemyKind::Ball, Vec2::ZERO, 1, Difficulty::Normal);
        assert_eq!(ball.damage, 9); // trunc(6 * 1.5)
        assert!((ball.speed - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_headshot_kill_fires_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bot = bot_at(EnemyKind::Zombie, 5.0, 5.0);
        let h = bot.health;
        assert!(bot.take_damage(h / 3 + 1, true, &mut rng));
        assert_eq!(bot.health, 0);
        assert!(bot.dead);
        assert!(!bot.alive);
        let snapshot = (bot.health, bot.pain_timer, bot.death_timer);
        assert!(!bot.take_damage(100, true, &mut rng));
        assert_eq!(snapshot, (bot.health, bot.pain_timer, bot.death_timer));
    }

    #[test]
    fn test_heavy_hit_always_flinches() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut bot = bot_at(EnemyKind::Boss, 5.0, 5.0);
        assert!(!bot.take_damage(25, false, &mut rng));
        assert_eq!(bot.pain_timer, PAIN_STUN_FRAMES);
    }

    /// Always draws the top of the range, so every chance roll fails
    struct HighRng;

    impl RngCore for HighRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xff);
        }
    }

    #[test]
    fn test_headshot_flinch_uses_base_damage() {
        let mut bot = bot_at(EnemyKind::Boss, 5.0, 5.0);
        let before = bot.health;
        assert!(!bot.take_damage(8, true, &mut HighRng));
        assert_eq!(bot.health, before - 8 * HEADSHOT_MULTIPLIER);
        assert_eq!(bot.pain_timer, 0);

        assert!(!bot.take_damage(PAIN_DAMAGE_THRESHOLD + 1, false, &mut HighRng));
        assert_eq!(bot.pain_timer, PAIN_STUN_FRAMES);
    }

    #[test]
    fn test_pain_skips_logic() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(15.5, 10.5), 0.0);
        let mut bot = bot_at(EnemyKind::Zombie, 5.5, 10.5);
        bot.pain_timer = 2;
        let (shot, _) = run(&mut bot, &map, &mut player, &[]);
        assert!(shot.is_none());
        assert_eq!(bot.pos, Vec2::new(5.5, 10.5));
        assert_eq!(bot.pain_timer, 1);
    }

    #[test]
    fn test_freeze_skips_logic_then_thaws() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(15.5, 10.5), 0.0);
        let mut bot = bot_at(EnemyKind::Zombie, 5.5, 10.5);
        bot.freeze(2);
        run(&mut bot, &map, &mut player, &[]);
        assert!(bot.frozen);
        run(&mut bot, &map, &mut player, &[]);
        assert!(!bot.frozen);
        assert_eq!(bot.pos, Vec2::new(5.5, 10.5));
        run(&mut bot, &map, &mut player, &[]);
        assert!(bot.pos.x > 5.5);
    }

    #[test]
    fn test_death_then_disintegrate_then_removed() {
        let map = open_map(10);
        let mut player = Player::new(Vec2::new(8.5, 8.5), 0.0);
        let mut bot = bot_at(EnemyKind::Zombie, 2.5, 2.5);
        bot.take_damage(1000, false, &mut Pcg32::seed_from_u64(0));
        let mut frames = 0;
        while !bot.removed {
            run(&mut bot, &map, &mut player, &[]);
            frames += 1;
            assert!(frames < 500);
        }
        assert_eq!(frames, DEATH_ANIMATION_FRAMES + DISINTEGRATE_FRAMES + 1);
    }

    #[test]
    fn test_standard_attacks_in_range_with_sight() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(8.5, 10.5), 0.0);
        let mut bot = bot_at(EnemyKind::Zombie, 5.5, 10.5);
        let (shot, _) = run(&mut bot, &map, &mut player, &[]);
        let shot = shot.expect("in range");
        assert!(!shot.is_player);
        assert_eq!(shot.damage, BOT_PROJECTILE_DAMAGE + bot.damage);
        assert_eq!(bot.attack_cooldown, BOT_ATTACK_COOLDOWN);
        // On cooldown it walks instead
        let (shot, _) = run(&mut bot, &map, &mut player, &[]);
        assert!(shot.is_none());
        assert!(bot.pos.x > 5.5);
    }

    #[test]
    fn test_standard_holds_fire_behind_wall() {
        let mut map = open_map(20);
        map.set_cell(7, 10, WALL_GENERIC);
        let mut player = Player::new(Vec2::new(8.5, 10.5), 0.0);
        let mut bot = bot_at(EnemyKind::Zombie, 5.5, 10.5);
        let (shot, _) = run(&mut bot, &map, &mut player, &[]);
        assert!(shot.is_none());
    }

    #[test]
    fn test_movement_blocked_by_neighbor() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(15.5, 10.5), 0.0);
        let mut bot = bot_at(EnemyKind::Zombie, 5.5, 10.5);
        let wall = [Neighbor {
            index: 1,
            pos: Vec2::new(6.4, 10.5),
            radius: BOT_COLLISION_RADIUS,
        }];
        run(&mut bot, &map, &mut player, &wall);
        assert_eq!(bot.pos, Vec2::new(5.5, 10.5));
        assert_eq!(bot.walk_phase, 0.0);
        run(&mut bot, &map, &mut player, &[]);
        assert!(bot.walk_phase > 0.0);
    }

    #[test]
    fn test_ball_bounces_off_wall() {
        let map = open_map(10);
        let mut player = Player::new(Vec2::new(5.5, 5.5), 0.0);
        let mut ball = bot_at(EnemyKind::Ball, 8.95, 5.5);
        ball.momentum = Vec2::new(0.08, 0.0);
        run(&mut ball, &map, &mut player, &[]);
        assert!(ball.momentum.x < 0.0);
        assert!(ball.pos.x <= 8.95);
    }

    #[test]
    fn test_ball_contact_damages_and_recoils() {
        let map = open_map(10);
        let mut player = Player::new(Vec2::new(5.5, 5.5), 0.0);
        let mut ball = bot_at(EnemyKind::Ball, 5.9, 5.5);
        run(&mut ball, &map, &mut player, &[]);
        assert!(player.health < PLAYER_HEALTH);
        assert!(ball.momentum.x > 0.0);
    }

    #[test]
    fn test_ninja_melee_on_cooldown() {
        let map = open_map(10);
        let mut player = Player::new(Vec2::new(5.5, 5.5), 0.0);
        let mut ninja = bot_at(EnemyKind::Ninja, 6.5, 5.5);
        run(&mut ninja, &map, &mut player, &[]);
        assert_eq!(player.health, PLAYER_HEALTH - ninja.damage);
        assert_eq!(ninja.attack_cooldown, NINJA_ATTACK_COOLDOWN);
        run(&mut ninja, &map, &mut player, &[]);
        assert_eq!(player.health, PLAYER_HEALTH - ninja.damage);
    }

    #[test]
    fn test_beast_pushes_neighbors() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(18.5, 10.5), 0.0);
        let mut beast = bot_at(EnemyKind::Beast, 2.5, 10.5);
        let others = [Neighbor {
            index: 7,
            pos: Vec2::new(3.6, 10.5),
            radius: BOT_COLLISION_RADIUS,
        }];
        let (shot, pushes) = run(&mut beast, &map, &mut player, &others);
        assert!(shot.is_none());
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, 7);
        assert!((pushes[0].1.x - beast.speed * 2.0).abs() < 1e-6);
        assert_eq!(pushes[0].1.y, 0.0);
        // Blocked on x this tick; the shove clears the way
        assert_eq!(beast.pos, Vec2::new(2.5, 10.5));
    }

    #[test]
    fn test_beast_push_stays_on_blocked_axis() {
        let map = open_map(20);
        // Player straight down: only the y axis moves
        let mut player = Player::new(Vec2::new(2.5, 18.5), 0.0);
        let mut beast = bot_at(EnemyKind::Beast, 2.5, 2.5);
        let others = [Neighbor {
            index: 3,
            pos: Vec2::new(2.5, 3.6),
            radius: BOT_COLLISION_RADIUS,
        }];
        let (shot, pushes) = run(&mut beast, &map, &mut player, &others);
        assert!(shot.is_none());
        assert_eq!(pushes.len(), 1);
        assert!(pushes[0].1.x.abs() < 1e-6);
        assert!(pushes[0].1.y > 0.0);
    }

    #[test]
    fn test_beast_does_not_push_into_wall() {
        let mut map = open_map(20);
        map.set_cell(3, 10, WALL_GENERIC);
        let mut player = Player::new(Vec2::new(18.5, 10.5), 0.0);
        let mut beast = bot_at(EnemyKind::Beast, 1.5, 10.5);
        let others = [Neighbor {
            index: 4,
            pos: Vec2::new(2.99, 10.5),
            radius: BOT_COLLISION_RADIUS,
        }];
        let (_, pushes) = run(&mut beast, &map, &mut player, &others);
        assert!(pushes.is_empty());
        assert_eq!(beast.pos, Vec2::new(1.5, 10.5));
    }

    #[test]
    fn test_ranged_types_fire_their_own_damage() {
        let map = open_map(20);
        let mut player = Player::new(Vec2::new(10.5, 10.5), 0.0);

        let mut minigunner = bot_at(EnemyKind::Minigunner, 4.5, 10.5);
        let (shot, _) = run(&mut minigunner, &map, &mut player, &[]);
        assert_eq!(shot.expect("minigunner in range").damage, minigunner.damage);

        let mut sniper = bot_at(EnemyKind::Sniper, 4.5, 10.5);
        let (shot, _) = run(&mut sniper, &map, &mut player, &[]);
        assert_eq!(shot.expect("sniper in range").damage, sniper.damage);

        let mut beast = bot_at(EnemyKind::Beast, 4.5, 10.5);
        let (shot, _) = run(&mut beast, &map, &mut player, &[]);
        assert_eq!(shot.expect("beast in range").damage, beast.damage * 2);
    }

    #[test]
    fn test_items_never_act() {
        let map = open_map(10);
        let mut player = Player::new(Vec2::new(5.5, 5.5), 0.0);
        let mut item = bot_at(EnemyKind::HealthPack, 5.6, 5.5);
        let (shot, _) = run(&mut item, &map, &mut player, &[]);
        assert!(shot.is_none());
        assert_eq!(item.pos, Vec2::new(5.6, 5.5));
        assert_eq!(item.kind.behavior(), Behavior::Inert);
    }

    #[test]
    fn test_spawn_tables() {
        assert!(EnemyKind::REGULAR_SPAWNS.iter().all(|k| !k.is_item() && !k.is_boss()));
        assert!(EnemyKind::WEAPON_PICKUPS.iter().all(|k| k.is_item()));
        assert!(EnemyKind::PickupRocket.pickup_effect().is_some());
        assert!(EnemyKind::Zombie.pickup_effect().is_none());
    }
}
