//! Player state: weapons, shield, dash, bombs and respawn

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::map::GameMap;
use super::projectile::WeaponKind;
use crate::consts::*;

/// Player weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    Pistol,
    Rifle,
    Shotgun,
    Minigun,
    Plasma,
    Laser,
    Rocket,
    Bfg,
    Flamethrower,
}

/// Heat model for weapons that overheat instead of reloading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSpec {
    pub per_shot: f32,
    pub max: f32,
    pub cooling: f32,
    /// Lockout after overheating, in frames
    pub penalty: u32,
}

/// Weapons that fire a travelling projectile instead of a hitscan ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub speed: f32,
    pub kind: WeaponKind,
    pub aoe_radius: Option<f32>,
}

/// Static weapon data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub damage: i32,
    pub range: f32,
    pub clip_size: u32,
    /// Reserve ammo granted with the weapon
    pub ammo: u32,
    pub cooldown: u32,
    pub reload_time: u32,
    pub pellets: u32,
    pub spread: f32,
    /// Frames of spin before the first shot
    pub spin_up: u32,
    pub heat: Option<HeatSpec>,
    pub projectile: Option<ProjectileSpec>,
}

const BASE_SPEC: WeaponSpec = WeaponSpec {
    damage: 0,
    range: 0.0,
    clip_size: 0,
    ammo: 0,
    cooldown: 0,
    reload_time: 0,
    pellets: 1,
    spread: 0.0,
    spin_up: 0,
    heat: None,
    projectile: None,
};

impl WeaponType {
    pub const ALL: [WeaponType; 9] = [
        WeaponType::Pistol,
        WeaponType::Rifle,
        WeaponType::Shotgun,
        WeaponType::Minigun,
        WeaponType::Plasma,
        WeaponType::Laser,
        WeaponType::Rocket,
        WeaponType::Bfg,
        WeaponType::Flamethrower,
    ];

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponType::Pistol => "pistol",
            WeaponType::Rifle => "rifle",
            WeaponType::Shotgun => "shotgun",
            WeaponType::Minigun => "minigun",
            WeaponType::Plasma => "plasma",
            WeaponType::Laser => "laser",
            WeaponType::Rocket => "rocket",
            WeaponType::Bfg => "bfg",
            WeaponType::Flamethrower => "flamethrower",
        }
    }

    pub fn spec(&self) -> WeaponSpec {
        match self {
            WeaponType::Pistol => WeaponSpec {
                damage: 25,
                range: 15.0,
                clip_size: 12,
                ammo: 48,
                cooldown: 10,
                reload_time: 60,
                ..BASE_SPEC
            },
            WeaponType::Rifle => WeaponSpec {
                damage: 40,
                range: 25.0,
                clip_size: 15,
                ammo: 90,
                cooldown: 8,
                reload_time: 120,
                ..BASE_SPEC
            },
            WeaponType::Shotgun => WeaponSpec {
                damage: 20,
                range: 12.0,
                clip_size: 2,
                ammo: 24,
                cooldown: 30,
                reload_time: 80,
                pellets: 8,
                spread: 0.15,
                ..BASE_SPEC
            },
            WeaponType::Minigun => WeaponSpec {
                damage: 12,
                range: 20.0,
                clip_size: 100,
                ammo: 200,
                cooldown: 3,
                reload_time: 150,
                spin_up: 30,
                ..BASE_SPEC
            },
            WeaponType::Plasma => WeaponSpec {
                damage: 100,
                range: 30.0,
                clip_size: 999,
                cooldown: 8,
                heat: Some(HeatSpec {
                    per_shot: 0.25,
                    max: 1.0,
                    cooling: 0.01,
                    penalty: 180,
                }),
                projectile: Some(ProjectileSpec {
                    speed: 0.5,
                    kind: WeaponKind::Plasma,
                    aoe_radius: None,
                }),
                ..BASE_SPEC
            },
            WeaponType::Laser => WeaponSpec {
                damage: 50,
                range: 50.0,
                clip_size: 100,
                ammo: 100,
                cooldown: 5,
                reload_time: 100,
                ..BASE_SPEC
            },
            WeaponType::Rocket => WeaponSpec {
                damage: 150,
                range: 100.0,
                clip_size: 1,
                ammo: 10,
                cooldown: 45,
                reload_time: 180,
                projectile: Some(ProjectileSpec {
                    speed: 0.3,
                    kind: WeaponKind::Rocket,
                    aoe_radius: Some(ROCKET_AOE_RADIUS),
                }),
                ..BASE_SPEC
            },
            WeaponType::Bfg => WeaponSpec {
                damage: 500,
                range: 100.0,
                clip_size: 1,
                ammo: 5,
                cooldown: 60,
                reload_time: 200,
                projectile: Some(ProjectileSpec {
                    speed: 0.2,
                    kind: WeaponKind::Rocket,
                    aoe_radius: Some(15.0),
                }),
                ..BASE_SPEC
            },
            WeaponType::Flamethrower => WeaponSpec {
                damage: 8,
                range: 18.0,
                clip_size: 100,
                ammo: 300,
                cooldown: 2,
                reload_time: 180,
                projectile: Some(ProjectileSpec {
                    speed: 0.35,
                    kind: WeaponKind::Flame,
                    aoe_radius: None,
                }),
                ..BASE_SPEC
            },
        }
    }
}

/// Per-weapon mutable state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponState {
    pub owned: bool,
    pub clip: u32,
    pub reserve: u32,
    pub heat: f32,
    pub reloading: bool,
    pub reload_timer: u32,
    pub overheated: bool,
    pub overheat_timer: u32,
    pub spin: u32,
}

impl WeaponState {
    fn fresh(weapon: WeaponType, owned: bool) -> Self {
        let spec = weapon.spec();
        Self {
            owned,
            clip: spec.clip_size,
            reserve: spec.ammo,
            heat: 0.0,
            reloading: false,
            reload_timer: 0,
            overheated: false,
            overheat_timer: 0,
            spin: 0,
        }
    }

    /// Advance reload, cooling and spin decay for one frame
    fn update(&mut self, spec: &WeaponSpec) {
        if self.reloading {
            self.reload_timer = self.reload_timer.saturating_sub(1);
            if self.reload_timer == 0 {
                let fill = (spec.clip_size - self.clip).min(self.reserve);
                self.clip += fill;
                self.reserve -= fill;
                self.reloading = false;
            }
        }

        if let Some(heat) = spec.heat {
            if self.overheated {
                self.overheat_timer = self.overheat_timer.saturating_sub(1);
                if self.overheat_timer == 0 {
                    self.overheated = false;
                    self.heat = 0.0;
                }
            } else {
                self.heat = (self.heat - heat.cooling).max(0.0);
            }
        }

        self.spin = self.spin.saturating_sub(1);
    }
}

/// What a collected item does to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupEffect {
    Health(i32),
    Ammo,
    Bomb,
    Weapon(WeaponType),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub angle: f32,
    pub pitch: f32,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub weapons: Vec<WeaponState>,
    pub current_weapon: WeaponType,
    /// Global cooldown between shots
    pub shoot_cooldown: u32,
    pub shield_active: bool,
    /// Remaining shield energy in frames
    pub shield_timer: u32,
    pub shield_recharge_delay: u32,
    pub dash_active: bool,
    pub dash_timer: u32,
    pub dash_cooldown: u32,
    pub stamina: f32,
    pub bombs: u32,
    pub bomb_cooldown: u32,
    pub secondary_cooldown: u32,
    pub zoomed: bool,
    pub god_mode: bool,
    pub invincibility_timer: u32,
    pub respawn_timer: u32,
    pub spawn_pos: Vec2,
    pub spawn_angle: f32,
    /// Scales weapon damage
    pub damage_mult: f32,
    /// Scales area-effect radii of this player's explosions
    pub aoe_radius_mult: f32,
}

impl Player {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        let weapons = WeaponType::ALL
            .iter()
            .map(|&w| WeaponState::fresh(w, w == WeaponType::Pistol))
            .collect();
        Self {
            pos,
            angle,
            pitch: 0.0,
            health: PLAYER_HEALTH,
            max_health: PLAYER_HEALTH,
            alive: true,
            weapons,
            current_weapon: WeaponType::Pistol,
            shoot_cooldown: 0,
            shield_active: false,
            shield_timer: SHIELD_MAX_DURATION,
            shield_recharge_delay: 0,
            dash_active: false,
            dash_timer: 0,
            dash_cooldown: 0,
            stamina: STAMINA_MAX,
            bombs: BOMBS_START,
            bomb_cooldown: 0,
            secondary_cooldown: 0,
            zoomed: false,
            god_mode: false,
            invincibility_timer: 0,
            respawn_timer: 0,
            spawn_pos: pos,
            spawn_angle: angle,
            damage_mult: 1.0,
            aoe_radius_mult: 1.0,
        }
    }

    pub fn weapon(&self) -> &WeaponState {
        &self.weapons[self.current_weapon.index()]
    }

    pub fn weapon_mut(&mut self) -> &mut WeaponState {
        let idx = self.current_weapon.index();
        &mut self.weapons[idx]
    }

    /// Apply incoming damage. Returns whether it landed.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive || self.god_mode || self.shield_active || self.invincibility_timer > 0 {
            return false;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.alive = false;
            self.shield_active = false;
            self.respawn_timer = RESPAWN_DELAY_FRAMES;
            log::info!("Player died");
        }
        true
    }

    pub fn respawn(&mut self) {
        self.pos = self.spawn_pos;
        self.angle = self.spawn_angle;
        self.health = self.max_health;
        self.alive = true;
        self.shield_active = false;
        self.dash_active = false;
        self.invincibility_timer = INVINCIBILITY_FRAMES;
        log::info!("Player respawned at ({:.1}, {:.1})", self.pos.x, self.pos.y);
    }

    /// Consume ammo (or heat) for one trigger pull. Returns whether a shot fires.
    pub fn shoot(&mut self) -> bool {
        if !self.alive || self.shoot_cooldown > 0 {
            return false;
        }
        let spec = self.current_weapon.spec();
        let state = self.weapon_mut();
        if state.reloading || state.overheated {
            return false;
        }

        if spec.spin_up > 0 && state.spin < spec.spin_up {
            state.spin = (state.spin + 2).min(spec.spin_up);
            return false;
        }

        if let Some(heat) = spec.heat {
            state.heat += heat.per_shot;
            if state.heat >= heat.max {
                state.overheated = true;
                state.overheat_timer = heat.penalty;
            }
        } else {
            if state.clip == 0 {
                self.reload();
                return false;
            }
            state.clip -= 1;
            if state.clip == 0 {
                self.reload();
            }
        }

        if spec.spin_up > 0 {
            // Keep the barrel spinning while the trigger is held
            let state = self.weapon_mut();
            state.spin = (state.spin + 2).min(spec.spin_up);
        }

        self.shoot_cooldown = spec.cooldown;
        true
    }

    /// Start reloading the current weapon
    pub fn reload(&mut self) -> bool {
        let spec = self.current_weapon.spec();
        let state = self.weapon_mut();
        if spec.heat.is_some()
            || state.reloading
            || state.clip >= spec.clip_size
            || state.reserve == 0
        {
            return false;
        }
        state.reloading = true;
        state.reload_timer = spec.reload_time;
        true
    }

    pub fn switch_weapon(&mut self, weapon: WeaponType) -> bool {
        if !self.weapons[weapon.index()].owned || weapon == self.current_weapon {
            return false;
        }
        self.current_weapon = weapon;
        self.zoomed = false;
        log::debug!("Switched to {}", weapon.as_str());
        true
    }

    /// Trigger the area bomb. Also raises the shield.
    pub fn activate_bomb(&mut self) -> bool {
        if !self.alive || self.bomb_cooldown > 0 || self.bombs == 0 {
            return false;
        }
        self.bombs -= 1;
        self.bomb_cooldown = BOMB_COOLDOWN;
        if self.shield_timer > 0 {
            self.shield_active = true;
        }
        true
    }

    /// Start the secondary-fire cooldown if it is ready
    pub fn fire_secondary(&mut self) -> bool {
        if !self.alive || self.secondary_cooldown > 0 {
            return false;
        }
        self.secondary_cooldown = SECONDARY_COOLDOWN;
        true
    }

    pub fn set_shield(&mut self, active: bool) {
        if active {
            if !self.shield_active && self.alive && self.shield_recharge_delay == 0 && self.shield_timer > 0 {
                self.shield_active = true;
            }
        } else if self.shield_active {
            self.shield_active = false;
            self.shield_recharge_delay = SHIELD_COOLDOWN_NORMAL;
        }
    }

    pub fn dash(&mut self) -> bool {
        if !self.alive || self.dash_cooldown > 0 || self.stamina < DASH_STAMINA_COST {
            return false;
        }
        self.stamina -= DASH_STAMINA_COST;
        self.dash_active = true;
        self.dash_timer = DASH_DURATION;
        self.dash_cooldown = DASH_COOLDOWN;
        true
    }

    /// Move with per-axis wall sliding
    pub fn try_move(&mut self, delta: Vec2, map: &GameMap) {
        if !self.alive {
            return;
        }
        let delta = if self.dash_active { delta * DASH_SPEED_MULT } else { delta };
        let nx = self.pos.x + delta.x;
        if !map.is_wall(nx, self.pos.y) {
            self.pos.x = nx;
        }
        let ny = self.pos.y + delta.y;
        if !map.is_wall(self.pos.x, ny) {
            self.pos.y = ny;
        }
    }

    pub fn apply_pickup(&mut self, effect: PickupEffect) -> bool {
        match effect {
            PickupEffect::Health(amount) => {
                if self.health >= self.max_health {
                    return false;
                }
                self.health = (self.health + amount).min(self.max_health);
            }
            PickupEffect::Ammo => {
                let spec = self.current_weapon.spec();
                if spec.heat.is_some() {
                    return false;
                }
                self.weapon_mut().reserve += spec.clip_size * 2;
            }
            PickupEffect::Bomb => self.bombs += 1,
            PickupEffect::Weapon(weapon) => {
                let spec = weapon.spec();
                let state = &mut self.weapons[weapon.index()];
                if state.owned {
                    state.reserve += spec.ammo;
                } else {
                    *state = WeaponState::fresh(weapon, true);
                    self.current_weapon = weapon;
                }
            }
        }
        true
    }

    /// Advance all timers by one frame
    pub fn update(&mut self) {
        if !self.alive {
            self.respawn_timer = self.respawn_timer.saturating_sub(1);
            if self.respawn_timer == 0 {
                self.respawn();
            }
            return;
        }

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        self.invincibility_timer = self.invincibility_timer.saturating_sub(1);
        self.bomb_cooldown = self.bomb_cooldown.saturating_sub(1);
        self.secondary_cooldown = self.secondary_cooldown.saturating_sub(1);

        for (weapon, state) in WeaponType::ALL.iter().zip(self.weapons.iter_mut()) {
            state.update(&weapon.spec());
        }

        if self.shield_active {
            self.shield_timer = self.shield_timer.saturating_sub(1);
            if self.shield_timer == 0 {
                self.shield_active = false;
                self.shield_recharge_delay = SHIELD_COOLDOWN_DEPLETED;
            }
        } else if self.shield_recharge_delay > 0 {
            self.shield_recharge_delay -= 1;
        } else if self.shield_timer < SHIELD_MAX_DURATION {
            self.shield_timer += 1;
        }

        if self.dash_active {
            self.dash_timer = self.dash_timer.saturating_sub(1);
            if self.dash_timer == 0 {
                self.dash_active = false;
            }
        } else {
            self.stamina = (self.stamina + STAMINA_REGEN).min(STAMINA_MAX);
        }
        self.dash_cooldown = self.dash_cooldown.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::tests::open_map;

    fn player() -> Player {
        Player::new(Vec2::new(5.5, 5.5), 0.0)
    }

    #[test]
    fn test_shield_blocks_damage() {
        let mut p = player();
        p.set_shield(true);
        assert!(!p.take_damage(50));
        assert_eq!(p.health, PLAYER_HEALTH);
        p.set_shield(false);
        assert_eq!(p.shield_recharge_delay, SHIELD_COOLDOWN_NORMAL);
        assert!(p.take_damage(50));
        assert_eq!(p.health, 50);
    }

    #[test]
    fn test_god_mode_and_invincibility() {
        let mut p = player();
        p.god_mode = true;
        assert!(!p.take_damage(10));
        p.god_mode = false;
        p.invincibility_timer = 5;
        assert!(!p.take_damage(10));
        assert_eq!(p.health, PLAYER_HEALTH);
    }

    #[test]
    fn test_death_and_respawn() {
        let mut p = player();
        p.pos = Vec2::new(8.0, 8.0);
        assert!(p.take_damage(150));
        assert!(!p.alive);
        assert_eq!(p.health, 0);
        assert!(!p.take_damage(10));
        for _ in 0..RESPAWN_DELAY_FRAMES {
            p.update();
        }
        assert!(p.alive);
        assert_eq!(p.health, PLAYER_HEALTH);
        assert_eq!(p.pos, Vec2::new(5.5, 5.5));
        assert_eq!(p.invincibility_timer, INVINCIBILITY_FRAMES);
    }

    #[test]
    fn test_shield_depletes_then_recharges() {
        let mut p = player();
        p.set_shield(true);
        for _ in 0..SHIELD_MAX_DURATION {
            p.update();
        }
        assert!(!p.shield_active);
        assert_eq!(p.shield_timer, 0);
        assert_eq!(p.shield_recharge_delay, SHIELD_COOLDOWN_DEPLETED);
        p.set_shield(true);
        assert!(!p.shield_active);
        for _ in 0..SHIELD_COOLDOWN_DEPLETED + 10 {
            p.update();
        }
        assert_eq!(p.shield_timer, 10);
    }

    #[test]
    fn test_pistol_clip_and_auto_reload() {
        let mut p = player();
        for _ in 0..12 {
            assert!(p.shoot());
            p.shoot_cooldown = 0;
        }
        assert_eq!(p.weapon().clip, 0);
        assert!(p.weapon().reloading);
        assert!(!p.shoot());
        for _ in 0..60 {
            p.update();
        }
        assert!(!p.weapon().reloading);
        assert_eq!(p.weapon().clip, 12);
        assert_eq!(p.weapon().reserve, 36);
    }

    #[test]
    fn test_global_cooldown() {
        let mut p = player();
        assert!(p.shoot());
        assert!(!p.shoot());
        for _ in 0..10 {
            p.update();
        }
        assert!(p.shoot());
    }

    #[test]
    fn test_plasma_overheats() {
        let mut p = player();
        p.apply_pickup(PickupEffect::Weapon(WeaponType::Plasma));
        assert_eq!(p.current_weapon, WeaponType::Plasma);
        for _ in 0..4 {
            assert!(p.shoot());
            p.shoot_cooldown = 0;
        }
        assert!(p.weapon().overheated);
        assert!(!p.shoot());
        for _ in 0..180 {
            p.update();
        }
        assert!(!p.weapon().overheated);
        assert_eq!(p.weapon().heat, 0.0);
        assert!(p.shoot());
    }

    #[test]
    fn test_minigun_spins_up() {
        let mut p = player();
        p.apply_pickup(PickupEffect::Weapon(WeaponType::Minigun));
        let mut frames = 0;
        while !p.shoot() {
            p.update();
            frames += 1;
            assert!(frames < 100);
        }
        assert!(frames >= 15);
        assert_eq!(p.weapon().clip, 99);
    }

    #[test]
    fn test_bomb_requires_stock_and_cooldown() {
        let mut p = player();
        assert!(p.activate_bomb());
        assert!(p.shield_active);
        assert_eq!(p.bombs, BOMBS_START - 1);
        assert!(!p.activate_bomb());
        p.bomb_cooldown = 0;
        p.bombs = 0;
        assert!(!p.activate_bomb());
    }

    #[test]
    fn test_dash_costs_stamina() {
        let mut p = player();
        assert!(p.dash());
        assert_eq!(p.stamina, STAMINA_MAX - DASH_STAMINA_COST);
        assert!(!p.dash());
        for _ in 0..DASH_DURATION {
            p.update();
        }
        assert!(!p.dash_active);
        p.update();
        assert!(p.stamina > STAMINA_MAX - DASH_STAMINA_COST);
    }

    #[test]
    fn test_switch_requires_ownership() {
        let mut p = player();
        assert!(!p.switch_weapon(WeaponType::Rifle));
        p.apply_pickup(PickupEffect::Weapon(WeaponType::Rifle));
        assert!(p.switch_weapon(WeaponType::Pistol));
        assert!(p.switch_weapon(WeaponType::Rifle));
    }

    #[test]
    fn test_move_slides_along_wall() {
        let map = open_map(10);
        let mut p = Player::new(Vec2::new(1.5, 5.5), 0.0);
        p.try_move(Vec2::new(-1.0, 0.5), &map);
        assert_eq!(p.pos.x, 1.5);
        assert_eq!(p.pos.y, 6.0);
    }

    #[test]
    fn test_health_pickup_caps() {
        let mut p = player();
        assert!(!p.apply_pickup(PickupEffect::Health(25)));
        p.health = 90;
        assert!(p.apply_pickup(PickupEffect::Health(25)));
        assert_eq!(p.health, PLAYER_HEALTH);
    }
}
