//! Carved geometry: origin sphere, tunnels and rock piles
//!
//! The authoritative answer to "can the hero be here?". Rock comes from the
//! density field; the sphere and tunnels carve through it. Rock piles are
//! solid obstacles floating in carved space and are handled separately by
//! hero collision and pile placement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::density::{DensityField, Sphere};
use super::grid::BucketGrid;
use crate::ring_points;
use crate::settings::WorldSettings;

/// A circular void carved into rock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tunnel {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Simulation clock (ms) at creation
    pub created_at: f64,
    /// Index of the carve point along its excavation path
    pub segment: u32,
    /// Number of segments the excavation path was divided into
    pub total_segments: u32,
}

/// Displaced rock floating in already-empty space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RockPile {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Simulation clock (ms) at creation or last relocation
    pub created_at: f64,
    /// Carve points on the excavation path that produced this pile
    pub source_segments: u32,
}

impl RockPile {
    /// True if a disk at `p` with `radius` overlaps this pile
    #[inline]
    pub fn overlaps(&self, p: Vec2, radius: f32) -> bool {
        p.distance(self.pos) < self.radius + radius
    }
}

#[derive(Debug, Clone)]
pub struct GeometryWorld {
    pub density: DensityField,
    tunnels: Vec<Tunnel>,
    tunnel_grid: BucketGrid,
    piles: Vec<RockPile>,
    next_id: u32,
}

impl GeometryWorld {
    pub fn new(density: DensityField, tunnel_bucket_size: f32) -> Self {
        Self {
            density,
            tunnels: Vec::new(),
            tunnel_grid: BucketGrid::new(tunnel_bucket_size),
            piles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn from_settings(seed: u64, world: &WorldSettings) -> Self {
        Self::new(
            DensityField::from_settings(seed, world),
            world.tunnel_bucket_size,
        )
    }

    #[inline]
    pub fn sphere(&self) -> &Sphere {
        &self.density.sphere
    }

    pub fn tunnels(&self) -> &[Tunnel] {
        &self.tunnels
    }

    pub fn piles(&self) -> &[RockPile] {
        &self.piles
    }

    pub fn pile(&self, id: u32) -> Option<&RockPile> {
        self.piles.iter().find(|p| p.id == id)
    }

    pub fn pile_mut(&mut self, id: u32) -> Option<&mut RockPile> {
        self.piles.iter_mut().find(|p| p.id == id)
    }

    /// Allocate a new entity ID (shared by tunnels and piles)
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a tunnel. Returns its id.
    pub fn add_tunnel(
        &mut self,
        pos: Vec2,
        radius: f32,
        created_at: f64,
        segment: u32,
        total_segments: u32,
    ) -> u32 {
        let id = self.next_entity_id();
        self.tunnel_grid.insert(self.tunnels.len(), pos, radius);
        self.tunnels.push(Tunnel {
            id,
            pos,
            radius,
            created_at,
            segment,
            total_segments,
        });
        id
    }

    /// Append a rock pile. Returns its id.
    pub fn add_pile(&mut self, pos: Vec2, radius: f32, created_at: f64, source_segments: u32) -> u32 {
        let id = self.next_entity_id();
        self.piles.push(RockPile {
            id,
            pos,
            radius,
            created_at,
            source_segments,
        });
        id
    }

    /// True if `p` lies inside (or on the edge of) any tunnel
    pub fn in_tunnel(&self, p: Vec2) -> bool {
        self.tunnel_grid.at_point(p).iter().any(|&i| {
            let t = &self.tunnels[i];
            p.distance(t.pos) <= t.radius
        })
    }

    /// True if any tunnel center lies strictly within `distance` of `p`
    pub fn tunnel_within(&self, p: Vec2, distance: f32) -> bool {
        self.tunnel_grid
            .near(p, distance)
            .any(|i| p.distance(self.tunnels[i].pos) < distance)
    }

    /// Can the hero occupy `p`? Sphere, then tunnels, then the density field.
    pub fn is_traversable(&self, p: Vec2) -> bool {
        if self.density.sphere.contains(p) {
            return true;
        }
        if self.in_tunnel(p) {
            return true;
        }
        !self.density.solid_rock_at(p)
    }

    #[inline]
    pub fn is_in_rock(&self, p: Vec2) -> bool {
        !self.is_traversable(p)
    }

    /// True if any of `samples` points on the circle is in rock
    pub fn ring_touches_rock(&self, center: Vec2, radius: f32, samples: usize) -> bool {
        ring_points(center, radius, samples).any(|p| self.is_in_rock(p))
    }

    /// True if the disk center and its sampled rim are all free of rock
    pub fn disk_is_clear(&self, center: Vec2, radius: f32, samples: usize) -> bool {
        self.is_traversable(center) && !self.ring_touches_rock(center, radius, samples)
    }

    /// Sample the straight line `from -> to`, stopping once within `stop_radius`
    /// of `to`. False if any earlier sample is in rock.
    pub fn has_clear_path(&self, from: Vec2, to: Vec2, stop_radius: f32, samples: usize) -> bool {
        let samples = samples.max(1);
        for i in 0..=samples {
            let t = i as f32 / samples as f32;
            let p = from.lerp(to, t);
            if p.distance(to) <= stop_radius {
                break;
            }
            if self.is_in_rock(p) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Everything outside the sphere is rock
    fn solid_world() -> GeometryWorld {
        let density = DensityField::new(7, Sphere::new(Vec2::new(400.0, 300.0), 200.0), 0.01, -1.0);
        GeometryWorld::new(density, 64.0)
    }

    #[test]
    fn test_sphere_then_rock() {
        let world = solid_world();
        assert!(world.is_traversable(Vec2::new(400.0, 300.0)));
        assert!(world.is_traversable(Vec2::new(400.0, 100.0)));
        assert!(world.is_in_rock(Vec2::new(400.0, 99.0)));
        assert!(world.is_in_rock(Vec2::new(-3000.0, 9000.0)));
    }

    #[test]
    fn test_tunnel_carves_rock() {
        let mut world = solid_world();
        let p = Vec2::new(700.0, 300.0);
        assert!(world.is_in_rock(p));

        let id = world.add_tunnel(p, 15.0, 0.0, 0, 1);
        assert_eq!(world.tunnels().len(), 1);
        assert_eq!(world.tunnels()[0].id, id);
        assert!(world.is_traversable(p));
        assert!(world.is_traversable(p + Vec2::new(15.0, 0.0)));
        assert!(world.is_in_rock(p + Vec2::new(15.5, 0.0)));
    }

    #[test]
    fn test_tunnel_within() {
        let mut world = solid_world();
        world.add_tunnel(Vec2::new(700.0, 300.0), 15.0, 0.0, 0, 1);
        assert!(world.tunnel_within(Vec2::new(710.0, 300.0), 12.0));
        assert!(!world.tunnel_within(Vec2::new(712.0, 300.0), 12.0));
        assert!(!world.tunnel_within(Vec2::new(100.0, 300.0), 12.0));
    }

    #[test]
    fn test_ids_are_shared_and_increasing() {
        let mut world = solid_world();
        let t = world.add_tunnel(Vec2::new(700.0, 300.0), 15.0, 0.0, 0, 1);
        let p = world.add_pile(Vec2::new(400.0, 300.0), 5.0, 0.0, 1);
        let t2 = world.add_tunnel(Vec2::new(720.0, 300.0), 15.0, 0.0, 1, 1);
        assert!(t < p && p < t2);
        assert_eq!(world.pile(p).map(|pile| pile.radius), Some(5.0));
    }

    #[test]
    fn test_ring_and_disk_checks() {
        let world = solid_world();
        let center = Vec2::new(400.0, 300.0);
        assert!(!world.ring_touches_rock(center, 50.0, 12));
        assert!(world.disk_is_clear(center, 50.0, 16));
        // Ring crosses the sphere wall
        let near_wall = Vec2::new(590.0, 300.0);
        assert!(world.ring_touches_rock(near_wall, 15.0, 12));
        assert!(!world.disk_is_clear(near_wall, 15.0, 16));
    }

    #[test]
    fn test_clear_path() {
        let mut world = solid_world();
        let hero = Vec2::new(400.0, 300.0);
        // Inside the sphere, nothing blocks
        assert!(world.has_clear_path(hero, Vec2::new(500.0, 300.0), 10.0, 20));
        // Through rock to a point outside
        let outside = Vec2::new(700.0, 300.0);
        assert!(!world.has_clear_path(hero, outside, 10.0, 20));
        // Carve a corridor and the path opens
        let mut x = 590.0;
        while x <= 700.0 {
            world.add_tunnel(Vec2::new(x, 300.0), 15.0, 0.0, 0, 1);
            x += 10.0;
        }
        assert!(world.has_clear_path(hero, outside, 10.0, 20));
    }

    #[test]
    fn test_clear_path_ignores_target_interior() {
        let world = solid_world();
        // Target is in rock but the samples stop at its edge, which lies inside the sphere
        let target = Vec2::new(620.0, 300.0);
        assert!(world.has_clear_path(Vec2::new(400.0, 300.0), target, 25.0, 20));
    }

    proptest! {
        #[test]
        fn prop_tunnels_never_remove_traversability(
            tunnels in prop::collection::vec((300.0f32..900.0, 0.0f32..600.0, 5.0f32..30.0), 1..20),
            probes in prop::collection::vec((200.0f32..1000.0, -100.0f32..700.0), 1..40),
            growth in 0.0f32..150.0,
        ) {
            let mut world = GeometryWorld::from_settings(99, &WorldSettings::default());
            let probes: Vec<Vec2> = probes.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
            let before: Vec<bool> = probes.iter().map(|&p| world.is_traversable(p)).collect();

            for (x, y, r) in tunnels {
                world.add_tunnel(Vec2::new(x, y), r, 0.0, 0, 1);
            }
            world.density.sphere.radius += growth;

            for (p, was) in probes.iter().zip(before) {
                if was {
                    prop_assert!(world.is_traversable(*p));
                }
            }
        }
    }
}
