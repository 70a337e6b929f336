//! Game state and core simulation types
//!
//! One exclusively owned [`GameState`] per session. Every mutation happens
//! inside [`super::tick::tick`] or [`super::dig::dig`]; the shell only reads.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::camera::Camera;
use super::chunk::{Chunk, ChunkStore};
use super::world::GeometryWorld;
use crate::settings::Settings;

/// Read-only per-tick summary for HUD and renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    /// Hero position rounded to whole units
    pub position: [f32; 2],
    /// Hero velocity rounded to one decimal
    pub velocity: [f32; 2],
    pub speed: f32,
    pub tunnel_count: usize,
    pub pile_count: usize,
    pub chunk_count: usize,
    pub is_digging: bool,
    /// Hero stands in open space and may dig
    pub can_dig: bool,
    pub pointer: [f32; 2],
    pub camera: [f32; 2],
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock in milliseconds
    pub clock_ms: f64,
    pub agent: Agent,
    pub camera: Camera,
    pub world: GeometryWorld,
    pub chunks: ChunkStore,
    /// Last latched pointer position (world space)
    pub pointer: Vec2,
    /// Digging cue stays on until the clock passes this
    pub(crate) digging_until: f64,
    /// Placement sampling RNG
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new session; the hero starts at the sphere center
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let seed = settings.seed;
        let start = settings.world.sphere_center;
        let viewport = settings.viewport.size();

        log::info!(
            "New session: seed={}, sphere r={} at ({}, {})",
            seed,
            settings.world.sphere_radius,
            start.x,
            start.y
        );

        Self {
            seed,
            time_ticks: 0,
            clock_ms: 0.0,
            agent: Agent::new(start, &settings.hero),
            camera: Camera::centered_on(start, viewport),
            world: GeometryWorld::from_settings(seed, &settings.world),
            chunks: ChunkStore::from_settings(&settings.world),
            pointer: start,
            digging_until: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            settings,
        }
    }

    /// Cosmetic digging cue; never consulted by simulation logic
    pub fn is_digging(&self) -> bool {
        self.clock_ms < self.digging_until
    }

    /// Keep the digging cue lit for `duration_ms` from now
    pub fn flash_digging(&mut self, duration_ms: f64) {
        self.digging_until = self.digging_until.max(self.clock_ms + duration_ms);
    }

    /// Rock chunks around the camera, generated on first sight
    pub fn visible_chunks(&mut self) -> Vec<&Chunk> {
        self.chunks.visible_chunks(&self.world.density, self.camera.pos)
    }

    pub fn snapshot(&self) -> Snapshot {
        let round1 = |v: f32| (v * 10.0).round() / 10.0;
        Snapshot {
            tick: self.time_ticks,
            position: [self.agent.pos.x.round(), self.agent.pos.y.round()],
            velocity: [round1(self.agent.vel.x), round1(self.agent.vel.y)],
            speed: self.agent.speed(),
            tunnel_count: self.world.tunnels().len(),
            pile_count: self.world.piles().len(),
            chunk_count: self.chunks.len(),
            is_digging: self.is_digging(),
            can_dig: self.world.is_traversable(self.agent.pos),
            pointer: self.pointer.to_array(),
            camera: self.camera.pos.to_array(),
        }
    }
}
