//! Procedural rock density
//!
//! A hollow sphere of permanently empty space surrounded by layered noise.
//! Pure and deterministic for a given seed: the same point always gives the
//! same answer, which is what lets chunks be rasterized lazily.

use std::fmt;

use glam::Vec2;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::settings::WorldSettings;

/// (frequency multiplier, weight) per octave
const OCTAVES: [(f64, f32); 3] = [(1.0, 1.0), (2.0, 0.5), (4.0, 0.25)];

/// The origin sphere: always empty, never rock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec2,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance_squared(self.center) <= self.radius * self.radius
    }
}

#[derive(Clone)]
pub struct DensityField {
    noise: Perlin,
    pub sphere: Sphere,
    pub noise_scale: f64,
    pub threshold: f32,
}

impl fmt::Debug for DensityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DensityField")
            .field("sphere", &self.sphere)
            .field("noise_scale", &self.noise_scale)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl DensityField {
    pub fn new(seed: u64, sphere: Sphere, noise_scale: f64, threshold: f32) -> Self {
        // Fold the high bits in so seeds differing only above 32 bits still diverge
        let seed = (seed ^ (seed >> 32)) as u32;
        Self {
            noise: Perlin::new(seed),
            sphere,
            noise_scale,
            threshold,
        }
    }

    pub fn from_settings(seed: u64, world: &WorldSettings) -> Self {
        Self::new(
            seed,
            Sphere::new(world.sphere_center, world.sphere_radius),
            world.noise_scale,
            world.rock_threshold,
        )
    }

    /// Single noise sample remapped into [0, 1)
    #[inline]
    fn sample(&self, x: f64, y: f64) -> f32 {
        let n = self.noise.get([x, y]);
        (((n + 1.0) * 0.5) as f32).clamp(0.0, 1.0 - f32::EPSILON)
    }

    /// Summed multi-octave density at a world point (0 inside the sphere)
    pub fn density_at(&self, p: Vec2) -> f32 {
        if self.sphere.contains(p) {
            return 0.0;
        }

        let (x, y) = (p.x as f64, p.y as f64);
        OCTAVES
            .iter()
            .map(|&(freq, weight)| {
                let s = self.noise_scale * freq;
                self.sample(x * s, y * s) * weight
            })
            .sum()
    }

    /// True if the point is solid rock
    #[inline]
    pub fn solid_rock_at(&self, p: Vec2) -> bool {
        if self.sphere.contains(p) {
            return false;
        }
        self.density_at(p) > self.threshold
    }
}
