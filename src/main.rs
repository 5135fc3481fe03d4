//! Arena Sim headless runner
//!
//! Plays the simulation with a simple autopilot and logs a run summary.
//!
//! Usage: `arena-sim [CONFIG] [--seed N] [--ticks N]`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use arena_sim::sim::{GameState, LevelPhase, NullEffects, TickInput, tick};
use arena_sim::{SimConfig, bearing, normalize_angle};
use clap::Parser;

const DEFAULT_TICKS: u64 = 60 * 60 * 5;

/// Headless Arena Sim runner
#[derive(Parser, Debug)]
#[command(name = "arena-sim")]
#[command(about = "Play the arena simulation with an autopilot and print a run summary")]
struct Args {
    /// JSON config file (defaults apply when omitted)
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Number of frames to simulate
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,
}

fn load_config(path: Option<&Path>) -> Result<SimConfig, String> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    SimConfig::from_json(&json).map_err(|e| e.to_string())
}

/// Steer toward the nearest enemy (or the portal) and shoot when lined up
fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player;
    let target = match state.phase {
        LevelPhase::Cleared => state.portal,
        LevelPhase::Playing => state
            .entities
            .bots()
            .iter()
            .filter(|b| b.is_active_enemy())
            .min_by(|a, b| {
                a.pos
                    .distance_squared(player.pos)
                    .total_cmp(&b.pos.distance_squared(player.pos))
            })
            .map(|b| b.pos),
    };
    let Some(target) = target else {
        return TickInput::default();
    };

    let error = normalize_angle(bearing(player.pos, target) - player.angle);
    let aligned = error.abs() < 0.1;
    let distance = player.pos.distance(target);
    TickInput {
        turn: (error * 4.0).clamp(-1.0, 1.0),
        forward: if aligned && (state.phase == LevelPhase::Cleared || distance > 4.0) { 1.0 } else { 0.0 },
        fire: aligned && state.phase == LevelPhase::Playing,
        bomb: state.player.health < 30,
        reload: state.player.weapon().clip == 0,
        ..Default::default()
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let result = load_config(args.config.as_deref()).and_then(|config| {
        GameState::new(config, args.seed).map_err(|e| e.to_string())
    });
    let ticks = args.ticks;
    let mut state = match result {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("arena-sim: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("Arena Sim (headless) starting: {} ticks", ticks);
    let mut effects = NullEffects;
    for _ in 0..ticks {
        let input = autopilot(&state);
        tick(&mut state, &input, &mut effects);
    }

    log::info!(
        "Run finished: level {} score {} kills {} enemies left {}",
        state.level,
        state.score,
        state.combat.kills,
        state.entities.active_enemies()
    );
    println!(
        "level={} score={} kills={} health={}",
        state.level, state.score, state.combat.kills, state.player.health
    );
    ExitCode::SUCCESS
}
