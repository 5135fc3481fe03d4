//! Outbound effect hooks (particles and sound cues)
//!
//! The simulation only calls into an [`EffectSink`]; drawing and playback
//! belong to the host.

use glam::Vec2;

/// Named sound cues the simulation can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Shoot,
    EnemyShoot,
    Scream,
    PlayerHurt,
    Explosion,
    Laser,
    Bomb,
    Pickup,
    SecretFound,
    LevelComplete,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::EnemyShoot => "enemy_shoot",
            SoundCue::Scream => "scream",
            SoundCue::PlayerHurt => "player_hurt",
            SoundCue::Explosion => "explosion",
            SoundCue::Laser => "laser",
            SoundCue::Bomb => "bomb",
            SoundCue::Pickup => "pickup",
            SoundCue::SecretFound => "secret_found",
            SoundCue::LevelComplete => "level_complete",
        }
    }
}

/// Receiver for visual and audio side effects
pub trait EffectSink {
    /// Screen-space burst at the crosshair, e.g. a hit marker
    fn burst(&mut self, count: u32, color: [u8; 3]);
    /// Line trace in world space (bullet tracer, laser beam)
    fn trace(&mut self, from: Vec2, to: Vec2, color: [u8; 3]);
    /// 3D burst at a world position and height
    fn world_burst(&mut self, pos: Vec2, z: f32, count: u32, color: [u8; 3]);
    fn play(&mut self, cue: SoundCue);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn burst(&mut self, _count: u32, _color: [u8; 3]) {}
    fn trace(&mut self, _from: Vec2, _to: Vec2, _color: [u8; 3]) {}
    fn world_burst(&mut self, _pos: Vec2, _z: f32, _count: u32, _color: [u8; 3]) {}
    fn play(&mut self, _cue: SoundCue) {}
}

/// Effect colors
pub mod colors {
    pub const BLOOD: [u8; 3] = [200, 0, 0];
    pub const SPARK: [u8; 3] = [255, 220, 120];
    pub const TRACER: [u8; 3] = [255, 255, 180];
    pub const LASER: [u8; 3] = [255, 0, 0];
    pub const EXPLOSION: [u8; 3] = [255, 140, 0];
    pub const PLASMA: [u8; 3] = [0, 255, 255];
    pub const FROST: [u8; 3] = [150, 220, 255];
}

/// Records every call, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingEffects {
    pub bursts: u32,
    pub traces: Vec<(Vec2, Vec2)>,
    pub world_bursts: Vec<Vec2>,
    pub cues: Vec<SoundCue>,
}

#[cfg(test)]
impl EffectSink for RecordingEffects {
    fn burst(&mut self, _count: u32, _color: [u8; 3]) {
        self.bursts += 1;
    }
    fn trace(&mut self, from: Vec2, to: Vec2, _color: [u8; 3]) {
        self.traces.push((from, to));
    }
    fn world_burst(&mut self, pos: Vec2, _z: f32, _count: u32, _color: [u8; 3]) {
        self.world_bursts.push(pos);
    }
    fn play(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}

#[cfg(test)]
impl RecordingEffects {
    pub fn played(&self, cue: SoundCue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }
}
