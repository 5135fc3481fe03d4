//! Fixed timestep simulation tick
//!
//! Advances one frame: enemies, projectiles, player actions, pickups, timers,
//! then the level-exit check. Every random draw comes from the state's RNG.

use glam::Vec2;

use super::effects::{EffectSink, SoundCue};
use super::player::WeaponType;
use super::state::{GameState, LevelPhase};
use crate::consts::*;
use crate::{direction, normalize_angle};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Forward (+) or backward (-), in [-1, 1]
    pub forward: f32,
    /// Strafe right (+) or left (-), in [-1, 1]
    pub strafe: f32,
    /// Turn right (+) or left (-), in [-1, 1]
    pub turn: f32,
    pub fire: bool,
    pub secondary: bool,
    pub bomb: bool,
    /// Raise (`Some(true)`) or drop (`Some(false)`) the shield
    pub shield: Option<bool>,
    pub dash: bool,
    pub reload: bool,
    pub zoom: bool,
    pub switch_weapon: Option<WeaponType>,
    /// Freeze every active enemy (debug/testing)
    pub freeze_all: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, effects: &mut dyn EffectSink) {
    state.time_ticks += 1;
    let kills_before = state.combat.kills;

    apply_movement(state, input);

    state.entities.update_bots(&state.map, &mut state.player, effects);

    let report =
        state
            .entities
            .update_projectiles(&state.map, &mut state.player, &mut state.rng, effects);
    for kill in &report.kills {
        state.combat.handle_kill(kill.pos, effects);
    }
    for projectile in &report.ended {
        state.combat.explode_projectile(
            projectile,
            &state.player,
            state.entities.bots_mut(),
            &mut state.rng,
            effects,
        );
    }
    for &(x, y) in &report.secrets {
        reveal_secret(state, x, y, effects);
    }

    apply_actions(state, input, effects);

    state.entities.collect_pickups(&mut state.player, effects);
    state.player.update();
    state.combat.tick();

    if state.config.boss_reinforcements && state.phase == LevelPhase::Playing {
        state.spawner.maybe_spawn_reinforcement_boss(
            &state.map,
            state.player.pos,
            &mut state.entities,
            &mut state.rng,
        );
    }

    state.award_kills(state.combat.kills - kills_before);
    check_level_exit(state, effects);
}

fn apply_movement(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    if !player.alive {
        return;
    }
    player.angle = normalize_angle(player.angle + input.turn.clamp(-1.0, 1.0) * PLAYER_TURN_SPEED);
    player.zoomed = input.zoom;

    let facing = direction(player.angle);
    let right = Vec2::new(-facing.y, facing.x);
    let wish = facing * input.forward.clamp(-1.0, 1.0) + right * input.strafe.clamp(-1.0, 1.0);
    if wish.length_squared() > 0.0 {
        player.try_move(wish.clamp_length_max(1.0) * PLAYER_MOVE_SPEED, &state.map);
    }
}

fn apply_actions(state: &mut GameState, input: &TickInput, effects: &mut dyn EffectSink) {
    if let Some(weapon) = input.switch_weapon {
        state.player.switch_weapon(weapon);
    }
    if input.reload {
        state.player.reload();
    }
    if let Some(raise) = input.shield {
        state.player.set_shield(raise);
    }
    if input.dash {
        state.player.dash();
    }

    if input.fire {
        state.combat.fire_weapon(
            &mut state.player,
            &mut state.entities,
            &state.map,
            &mut state.rng,
            effects,
        );
    }

    if input.secondary {
        state.combat.fire_secondary(
            &mut state.player,
            state.entities.bots_mut(),
            &state.map,
            &mut state.rng,
            effects,
        );
    }

    if input.bomb && state.player.activate_bomb() {
        state.combat.explode_bomb(
            &state.player,
            state.entities.bots_mut(),
            &mut state.rng,
            effects,
        );
    }

    if input.freeze_all {
        for bot in state.entities.bots_mut().iter_mut().filter(|b| b.is_active_enemy()) {
            bot.freeze(FREEZE_DURATION);
        }
    }
}

fn reveal_secret(state: &mut GameState, x: i32, y: i32, effects: &mut dyn EffectSink) {
    if state.secrets_found.contains(&(x, y)) || x < 0 || y < 0 {
        return;
    }
    state.secrets_found.push((x, y));
    state.map.set_cell(x as usize, y as usize, 0);
    effects.play(SoundCue::SecretFound);
    log::info!("Secret found at ({}, {})", x, y);
}

fn check_level_exit(state: &mut GameState, effects: &mut dyn EffectSink) {
    match state.phase {
        LevelPhase::Playing => {
            if state.entities.active_enemies() == 0 {
                let portal = state.portal_position();
                state.portal = Some(portal);
                state.phase = LevelPhase::Cleared;
                effects.play(SoundCue::LevelComplete);
                log::info!(
                    "Level {} cleared at tick {} (score {})",
                    state.level,
                    state.time_ticks,
                    state.score
                );
            }
        }
        LevelPhase::Cleared => {
            let Some(portal) = state.portal else {
                return;
            };
            if state.player.alive && state.player.pos.distance(portal) < PORTAL_RADIUS {
                if let Err(e) = state.next_level() {
                    log::warn!("Failed to build level {}: {}", state.level, e);
                }
            }
        }
    }
}
