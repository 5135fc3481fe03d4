//! Game state and level lifecycle
//!
//! Everything one simulation run owns lives here, including the seeded RNG,
//! so two states built from the same config and seed evolve identically.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::combat::CombatResolver;
use super::entities::EntityManager;
use super::map::{CellularAutomataGenerator, GameMap};
use super::player::Player;
use super::spawn::{SpawnPlanner, SpawnSummary};
use crate::consts::*;
use crate::direction;
use crate::error::ContractViolation;
use crate::settings::SimConfig;

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    /// Enemies remain
    Playing,
    /// Every enemy is down and the exit portal is open
    Cleared,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: SimConfig,
    /// Current level (1-based)
    pub level: u32,
    pub phase: LevelPhase,
    pub map: GameMap,
    pub player: Player,
    pub entities: EntityManager,
    pub combat: CombatResolver,
    pub spawner: SpawnPlanner,
    /// Exit portal, open once the level is cleared
    pub portal: Option<Vec2>,
    pub secrets_found: Vec<(i32, i32)>,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Build the first level from a validated config
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ContractViolation> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let map = generate_map(&config, &mut rng)?;

        let (x, y, angle) = DEFAULT_PLAYER_SPAWN;
        let spawn = find_safe_spawn(&map, Vec2::new(x, y));
        let player = Player::new(spawn, angle);

        let mut state = Self {
            seed,
            level: config.start_level,
            phase: LevelPhase::Playing,
            map,
            player,
            entities: EntityManager::new(),
            combat: CombatResolver::new(),
            spawner: SpawnPlanner::new(config.start_level, config.difficulty),
            portal: None,
            secrets_found: Vec::new(),
            score: 0,
            time_ticks: 0,
            rng,
            config,
        };
        state.populate();
        log::info!(
            "New run: seed={} size={} difficulty={}",
            seed,
            state.config.map_size,
            state.config.difficulty.as_str()
        );
        Ok(state)
    }

    fn populate(&mut self) -> SpawnSummary {
        self.spawner
            .spawn_all(&self.map, self.player.pos, &mut self.entities, &mut self.rng)
    }

    /// Advance to the next level on a freshly generated map
    pub fn next_level(&mut self) -> Result<SpawnSummary, ContractViolation> {
        self.level += 1;
        self.map = generate_map(&self.config, &mut self.rng)?;
        self.entities.reset();

        let (x, y, angle) = DEFAULT_PLAYER_SPAWN;
        let spawn = find_safe_spawn(&self.map, Vec2::new(x, y));
        self.player.pos = spawn;
        self.player.angle = angle;
        self.player.spawn_pos = spawn;
        self.player.spawn_angle = angle;

        self.spawner = SpawnPlanner::new(self.level, self.config.difficulty);
        self.phase = LevelPhase::Playing;
        self.portal = None;
        self.secrets_found.clear();
        self.combat.last_death_pos = None;

        log::info!("Entering level {}", self.level);
        Ok(self.populate())
    }

    /// Credit kills, scaled by the live combo and difficulty
    pub(crate) fn award_kills(&mut self, kills: u32) {
        if kills == 0 {
            return;
        }
        let combo = self.combat.combo.max(1) as f32;
        let points = kills as f32 * KILL_SCORE as f32 * combo * self.config.difficulty.score_mult();
        self.score += points as u64;
    }

    /// Exit portal position: the last kill, or the nearest open spot around the player
    pub(crate) fn portal_position(&self) -> Vec2 {
        if let Some(pos) = self.combat.last_death_pos {
            return pos;
        }
        for r in 2..10 {
            for deg in (0..360).step_by(45) {
                let offset = direction((deg as f32).to_radians()) * r as f32;
                let cell = (self.player.pos + offset).floor();
                if !self.map.is_wall(cell.x, cell.y) {
                    return cell + Vec2::splat(0.5);
                }
            }
        }
        self.player.pos
    }
}

fn generate_map(config: &SimConfig, rng: &mut Pcg32) -> Result<GameMap, ContractViolation> {
    let generator =
        CellularAutomataGenerator::new(config.generator.wall_chance, config.generator.iterations);
    GameMap::new(config.map_size, &generator, rng)
}

/// Nearest open position around `base`, searching outward in rings
pub fn find_safe_spawn(map: &GameMap, base: Vec2) -> Vec2 {
    let limit = map.size() as f32 - 2.0;
    for attempt in 0..10 {
        let radius = (attempt * 2) as f32;
        for step in 0..8 {
            let test = base + direction(step as f32 * std::f32::consts::FRAC_PI_4) * radius;
            let inside = test.x >= 2.0 && test.x < limit && test.y >= 2.0 && test.y < limit;
            if inside && !map.is_wall(test.x, test.y) {
                return test;
            }
        }
    }

    match map.open_cells().first() {
        Some(&(x, y)) => Vec2::new(x as f32 + 0.5, y as f32 + 0.5),
        None => base,
    }
}
