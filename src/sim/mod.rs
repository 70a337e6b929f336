//! Deterministic simulation module
//!
//! All excavation logic lives here. This module must be pure and deterministic:
//! - Seeded noise and seeded RNG only
//! - Stable iteration order (by insertion / entity ID)
//! - Frame duration only feeds the clock, never the physics
//! - No rendering or platform dependencies

pub mod agent;
pub mod camera;
pub mod chunk;
pub mod collision;
pub mod density;
pub mod dig;
pub mod grid;
pub mod state;
pub mod tick;
pub mod world;

pub use agent::Agent;
pub use camera::Camera;
pub use chunk::{Chunk, ChunkCoord, ChunkStore, RockCell};
pub use collision::{CollisionResult, bounce_velocity, circle_circle_collision, reflect_velocity};
pub use density::{DensityField, Sphere};
pub use dig::{DigOutcome, Ineligible, PileOutcome, PlacementFailed, dig, find_pile_placement};
pub use grid::BucketGrid;
pub use state::{GameState, Snapshot};
pub use tick::{InputLatch, TickInput, tick};
pub use world::{GeometryWorld, RockPile, Tunnel};
