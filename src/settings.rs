//! Simulation settings and tuning
//!
//! Everything the simulation reads at session start. Defaults come from
//! [`crate::consts`]; a JSON file may override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Visible area in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl ViewportSettings {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Origin sphere, rock generation and chunking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub sphere_center: Vec2,
    pub sphere_radius: f32,
    /// Base frequency of the density noise
    pub noise_scale: f64,
    /// Summed density above this is solid rock
    pub rock_threshold: f32,
    /// Chunk edge length in world units
    pub chunk_size: f32,
    /// Rock cell edge length inside a chunk
    pub cell_size: f32,
    /// Chunks kept visible around the camera chunk, per axis
    pub render_distance: i32,
    /// Edge length of the tunnel lookup buckets
    pub tunnel_bucket_size: f32,
    /// Drop cached chunks farther than this (in chunks) from the camera.
    /// `None` keeps every chunk ever generated.
    pub chunk_eviction_radius: Option<i32>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            sphere_center: Vec2::new(SPHERE_CENTER_X, SPHERE_CENTER_Y),
            sphere_radius: SPHERE_RADIUS,
            noise_scale: NOISE_SCALE,
            rock_threshold: ROCK_THRESHOLD,
            chunk_size: CHUNK_SIZE,
            cell_size: CELL_SIZE,
            render_distance: RENDER_DISTANCE,
            tunnel_bucket_size: TUNNEL_BUCKET_SIZE,
            chunk_eviction_radius: None,
        }
    }
}

/// Hero motion tuning (per-tick units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroSettings {
    pub radius: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    pub stop_threshold: f32,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            radius: HERO_RADIUS,
            max_speed: HERO_MAX_SPEED,
            acceleration: HERO_ACCELERATION,
            friction: HERO_FRICTION,
            stop_threshold: HERO_STOP_THRESHOLD,
        }
    }
}

/// Digging and rock pile placement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigSettings {
    pub radius: f32,
    /// Max hero distance to a pile that can be re-dug
    pub interaction_range: f32,
    /// Max hero distance to an excavation target
    pub max_dig_distance: f32,
    pub ring_samples: usize,
    pub path_samples: usize,
    pub tunnel_spacing: f32,
    pub duplicate_tunnel_factor: f32,
    pub pile_compression: f32,
    pub placement_attempts: usize,
    pub placement_ring_samples: usize,
    pub placement_band: f32,
    pub pile_margin: f32,
    pub agent_margin: f32,
    pub relocate_cue_ms: f64,
    pub excavate_cue_ms: f64,
}

impl Default for DigSettings {
    fn default() -> Self {
        Self {
            radius: DIG_RADIUS,
            interaction_range: INTERACTION_RANGE,
            max_dig_distance: MAX_DIG_DISTANCE,
            ring_samples: DIG_RING_SAMPLES,
            path_samples: PATH_SAMPLES,
            tunnel_spacing: TUNNEL_SPACING,
            duplicate_tunnel_factor: DUPLICATE_TUNNEL_FACTOR,
            pile_compression: PILE_COMPRESSION,
            placement_attempts: PLACEMENT_ATTEMPTS,
            placement_ring_samples: PLACEMENT_RING_SAMPLES,
            placement_band: PLACEMENT_BAND,
            pile_margin: PILE_MARGIN,
            agent_margin: AGENT_MARGIN,
            relocate_cue_ms: RELOCATE_CUE_MS,
            excavate_cue_ms: EXCAVATE_CUE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub smoothing: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            smoothing: CAMERA_SMOOTHING,
        }
    }
}

/// Complete session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seeds both the density noise and the placement RNG
    pub seed: u64,
    pub viewport: ViewportSettings,
    pub world: WorldSettings,
    pub hero: HeroSettings,
    pub dig: DigSettings,
    pub camera: CameraSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            viewport: ViewportSettings::default(),
            world: WorldSettings::default(),
            hero: HeroSettings::default(),
            dig: DigSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl Settings {
    /// Default settings with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Could not read settings {}: {}", path.display(), err);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Invalid settings {}: {}; using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Replace degenerate values that would stall chunking or sampling
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.world.cell_size > 0.0 && self.world.cell_size.is_finite()) {
            log::warn!("cell_size {} invalid, using default", self.world.cell_size);
            self.world.cell_size = defaults.world.cell_size;
        }
        if !(self.world.chunk_size >= self.world.cell_size && self.world.chunk_size.is_finite()) {
            log::warn!("chunk_size {} invalid, using default", self.world.chunk_size);
            self.world.chunk_size = defaults.world.chunk_size.max(self.world.cell_size);
        }
        if self.world.chunk_size / self.world.cell_size > MAX_CELLS_PER_CHUNK_SIDE {
            let cell_size = self.world.chunk_size / MAX_CELLS_PER_CHUNK_SIDE;
            log::warn!("cell_size {} too fine for the chunk, using {}", self.world.cell_size, cell_size);
            self.world.cell_size = cell_size;
        }
        if !(self.world.tunnel_bucket_size > 0.0) {
            self.world.tunnel_bucket_size = defaults.world.tunnel_bucket_size;
        }
        if self.world.render_distance < 0 {
            self.world.render_distance = 0;
        }
        if !(self.dig.radius > 0.0) {
            log::warn!("dig radius {} invalid, using default", self.dig.radius);
            self.dig.radius = defaults.dig.radius;
        }
        if !(self.dig.tunnel_spacing > 0.0) {
            self.dig.tunnel_spacing = defaults.dig.tunnel_spacing;
        }
        self.dig.ring_samples = self.dig.ring_samples.max(1);
        self.dig.path_samples = self.dig.path_samples.max(1);
        self.dig.placement_ring_samples = self.dig.placement_ring_samples.max(1);
        if !(self.hero.max_speed >= 0.0) {
            self.hero.max_speed = defaults.hero.max_speed;
        }
        let hero = &mut self.hero;
        for (name, value, default) in [
            ("radius", &mut hero.radius, defaults.hero.radius),
            ("max_speed", &mut hero.max_speed, defaults.hero.max_speed),
            ("acceleration", &mut hero.acceleration, defaults.hero.acceleration),
            ("friction", &mut hero.friction, defaults.hero.friction),
            ("stop_threshold", &mut hero.stop_threshold, defaults.hero.stop_threshold),
        ] {
            if !value.is_finite() {
                log::warn!("hero {} {} not finite, using default", name, value);
                *value = default;
            }
        }
        self.camera.smoothing = self.camera.smoothing.clamp(0.0, 1.0);

        self
    }
}
