//! Core Explorer - procedural rock excavation simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (density field, chunks, tunnels, rock piles, hero motion)
//! - `settings`: Data-driven tuning and world parameters
//!
//! Rendering and input wiring live outside this crate. A shell feeds pointer
//! and dig events through [`sim::InputLatch`], calls [`sim::tick`] once per
//! display refresh, and paints [`sim::GameState`] / [`sim::Snapshot`].

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Nominal frame duration (one tick per 60 Hz display refresh)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Viewport dimensions in world units
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// The hollow "living" core the hero starts in
    pub const SPHERE_CENTER_X: f32 = 400.0;
    pub const SPHERE_CENTER_Y: f32 = 300.0;
    pub const SPHERE_RADIUS: f32 = 200.0;

    /// Procedural rock
    pub const NOISE_SCALE: f64 = 0.01;
    pub const ROCK_THRESHOLD: f32 = 0.6;
    pub const CHUNK_SIZE: f32 = 400.0;
    pub const CELL_SIZE: f32 = 8.0;
    pub const RENDER_DISTANCE: i32 = 2;
    /// Upper bound on rasterized cells along one chunk edge
    pub const MAX_CELLS_PER_CHUNK_SIDE: f32 = 1024.0;
    /// Bucket edge for the tunnel lookup grid
    pub const TUNNEL_BUCKET_SIZE: f32 = 64.0;

    /// Hero defaults (per-tick units)
    pub const HERO_RADIUS: f32 = 4.0;
    pub const HERO_MAX_SPEED: f32 = 4.0;
    pub const HERO_ACCELERATION: f32 = 0.15;
    pub const HERO_FRICTION: f32 = 0.92;
    pub const HERO_STOP_THRESHOLD: f32 = 0.1;

    /// Pointer closer than this is treated as "arrived"
    pub const DEAD_ZONE: f32 = 3.0;
    /// Acceleration ramps down linearly inside this distance
    pub const ACCEL_FALLOFF: f32 = 50.0;
    /// Velocity multiplier applied inside the dead zone
    pub const DEAD_ZONE_DAMPING: f32 = 0.8;
    /// Velocity multiplier when every move direction is blocked
    pub const BLOCKED_DECAY: f32 = 0.1;
    /// Fraction of the reflected normal component kept on a pile bounce
    pub const PILE_RESTITUTION: f32 = 0.6;

    /// Digging
    pub const DIG_RADIUS: f32 = 15.0;
    pub const INTERACTION_RANGE: f32 = 120.0;
    pub const MAX_DIG_DISTANCE: f32 = 120.0;
    pub const DIG_RING_SAMPLES: usize = 12;
    pub const PATH_SAMPLES: usize = 20;
    /// Carve points are spaced `dig_radius * TUNNEL_SPACING` apart
    pub const TUNNEL_SPACING: f32 = 1.2;
    /// A carve point this close (in dig radii) to a tunnel center is skipped
    pub const DUPLICATE_TUNNEL_FACTOR: f32 = 0.8;
    /// Displaced rock packs tighter than the hole it came from
    pub const PILE_COMPRESSION: f32 = 0.6;

    /// Rock pile placement (rejection sampling)
    pub const PLACEMENT_ATTEMPTS: usize = 50;
    pub const PLACEMENT_RING_SAMPLES: usize = 16;
    pub const PLACEMENT_BAND: f32 = 100.0;
    pub const PILE_MARGIN: f32 = 10.0;
    pub const AGENT_MARGIN: f32 = 15.0;

    /// Digging cue durations (presentation only)
    pub const RELOCATE_CUE_MS: f64 = 200.0;
    pub const EXCAVATE_CUE_MS: f64 = 300.0;

    /// Camera exponential smoothing factor
    pub const CAMERA_SMOOTHING: f32 = 0.1;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Evenly spaced points on a circle, starting at angle 0
pub fn ring_points(center: Vec2, radius: f32, samples: usize) -> impl Iterator<Item = Vec2> {
    let samples = samples.max(1);
    (0..samples).map(move |i| {
        let theta = i as f32 / samples as f32 * std::f32::consts::TAU;
        center + polar_to_cartesian(radius, theta)
    })
}
