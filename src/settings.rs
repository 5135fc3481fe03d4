//! Difficulty presets and simulation configuration
//!
//! Level/seed configuration is handed in by the game shell as plain data,
//! optionally loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ContractViolation;

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
            Difficulty::Nightmare => "NIGHTMARE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "nightmare" => Some(Difficulty::Nightmare),
            _ => None,
        }
    }

    /// Multiplier applied to enemy damage
    pub fn damage_mult(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Nightmare => 2.5,
        }
    }

    /// Multiplier applied to enemy health
    pub fn health_mult(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Nightmare => 2.0,
        }
    }

    /// Score multiplier (also scales enemy count per level)
    pub fn score_mult(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 2.0,
            Difficulty::Nightmare => 4.0,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::from_str(s).ok_or_else(|| ContractViolation::UnknownDifficulty(s.to_string()))
    }
}

/// Cellular automata parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Probability a cell starts as wall
    pub wall_chance: f32,
    /// Smoothing passes
    pub iterations: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            wall_chance: DEFAULT_WALL_CHANCE,
            iterations: DEFAULT_SMOOTHING_ITERATIONS,
        }
    }
}

/// Simulation configuration supplied by the game shell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square arena grid
    pub map_size: usize,
    pub difficulty: Difficulty,
    /// First level (1-based)
    pub start_level: u32,
    pub generator: GeneratorConfig,
    /// Spawn a boss when only a handful of enemies remain
    pub boss_reinforcements: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            map_size: DEFAULT_MAP_SIZE,
            difficulty: Difficulty::Normal,
            start_level: 1,
            generator: GeneratorConfig::default(),
            boss_reinforcements: true,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ContractViolation> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| ContractViolation::InvalidConfig(e.to_string()))?;
        config.validate()?;
        log::info!(
            "Loaded config: size={} difficulty={} level={}",
            config.map_size,
            config.difficulty.as_str(),
            config.start_level
        );
        Ok(config)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> String {
        // Plain data with string keys only; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Check every field against its contract
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.map_size < MIN_MAP_SIZE {
            return Err(ContractViolation::MapTooSmall {
                size: self.map_size,
                min: MIN_MAP_SIZE,
            });
        }
        if !(0.0..=1.0).contains(&self.generator.wall_chance) {
            return Err(ContractViolation::InvalidWallChance(self.generator.wall_chance));
        }
        if self.start_level == 0 {
            return Err(ContractViolation::InvalidConfig(
                "start_level is 1-based".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("NIGHTMARE"), Some(Difficulty::Nightmare));
        assert_eq!(Difficulty::from_str("insane"), None);
        assert_eq!(Difficulty::from_str("med"), None);
        assert!("insane".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_config_from_json_partial() {
        let config = SimConfig::from_json(r#"{"map_size": 30, "difficulty": "HARD"}"#).unwrap();
        assert_eq!(config.map_size, 30);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.start_level, 1);
        assert_eq!(config.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_config_rejects_tiny_map() {
        let err = SimConfig::from_json(r#"{"map_size": 2}"#).unwrap_err();
        assert_eq!(err, ContractViolation::MapTooSmall { size: 2, min: MIN_MAP_SIZE });
    }

    #[test]
    fn test_config_rejects_bad_json() {
        assert!(matches!(
            SimConfig::from_json("{not json"),
            Err(ContractViolation::InvalidConfig(_))
        ));
    }
}
