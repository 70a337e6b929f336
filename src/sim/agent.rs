//! Hero kinematics
//!
//! The hero chases the pointer with eased acceleration, friction and a speed
//! cap, slides along rock walls one axis at a time, and bounces off rock piles.
//! A tick never leaves the hero somewhere it cannot be.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{bounce_velocity, circle_circle_collision};
use super::world::GeometryWorld;
use crate::consts::*;
use crate::settings::HeroSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub pos: Vec2,
    /// World units per tick
    pub vel: Vec2,
    pub radius: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    pub stop_threshold: f32,
}

impl Agent {
    pub fn new(pos: Vec2, hero: &HeroSettings) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: hero.radius,
            max_speed: hero.max_speed,
            acceleration: hero.acceleration,
            friction: hero.friction,
            stop_threshold: hero.stop_threshold,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Advance one tick toward `target`
    pub fn step(&mut self, target: Vec2, world: &GeometryWorld) {
        let start = self.pos;

        self.steer(target);
        self.move_against_rock(world);
        self.resolve_piles(world);

        // Pile push-out can shove the hero into rock or another pile
        if !self.position_is_valid(world) {
            self.pos = start;
            self.vel *= BLOCKED_DECAY;
        }
    }

    /// Accelerate toward the target, then friction, snap and clamp
    fn steer(&mut self, target: Vec2) {
        let to_target = target - self.pos;
        let distance = to_target.length();

        if distance > DEAD_ZONE {
            let dir = to_target / distance;
            let accel = if distance > ACCEL_FALLOFF {
                self.acceleration
            } else {
                self.acceleration * (distance / ACCEL_FALLOFF)
            };
            self.vel += dir * accel;
        } else {
            self.vel *= DEAD_ZONE_DAMPING;
        }

        self.vel *= self.friction;

        if self.vel.x.abs() < self.stop_threshold {
            self.vel.x = 0.0;
        }
        if self.vel.y.abs() < self.stop_threshold {
            self.vel.y = 0.0;
        }

        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel = self.vel / speed * self.max_speed;
        }
    }

    /// Full move, else slide along one axis, else stall
    fn move_against_rock(&mut self, world: &GeometryWorld) {
        let next = self.pos + self.vel;

        if world.is_traversable(next) {
            self.pos = next;
        } else if world.is_traversable(Vec2::new(next.x, self.pos.y)) {
            self.pos.x = next.x;
            self.vel.y = 0.0;
        } else if world.is_traversable(Vec2::new(self.pos.x, next.y)) {
            self.pos.y = next.y;
            self.vel.x = 0.0;
        } else {
            self.vel *= BLOCKED_DECAY;
        }
    }

    /// Push out of overlapping piles and bounce off them
    fn resolve_piles(&mut self, world: &GeometryWorld) {
        for pile in world.piles() {
            let hit = circle_circle_collision(self.pos, self.radius, pile.pos, pile.radius, -self.vel);
            if !hit.hit {
                continue;
            }
            self.pos += hit.normal * hit.penetration;
            self.vel = bounce_velocity(self.vel, hit.normal, PILE_RESTITUTION);
        }
    }

    /// Traversable and clear of every pile
    pub fn position_is_valid(&self, world: &GeometryWorld) -> bool {
        world.is_traversable(self.pos)
            && world
                .piles()
                .iter()
                .all(|pile| !pile.overlaps(self.pos, self.radius - PILE_CONTACT_SLOP))
    }
}

/// Touching contact after a push-out may land a hair inside the pile
const PILE_CONTACT_SLOP: f32 = 1e-3;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::density::{DensityField, Sphere};
    use proptest::prelude::*;

    const CENTER: Vec2 = Vec2::new(400.0, 300.0);

    fn world(threshold: f32) -> GeometryWorld {
        GeometryWorld::new(
            DensityField::new(11, Sphere::new(CENTER, 200.0), 0.01, threshold),
            64.0,
        )
    }

    fn hero(pos: Vec2) -> Agent {
        Agent::new(pos, &HeroSettings::default())
    }

    #[test]
    fn test_accelerates_toward_target() {
        let world = world(-1.0);
        let mut agent = hero(CENTER);
        agent.step(CENTER + Vec2::new(100.0, 0.0), &world);
        assert!(agent.vel.x > 0.0);
        assert_eq!(agent.vel.y, 0.0);
        assert!(agent.pos.x > CENTER.x);
    }

    #[test]
    fn test_first_tick_snaps_small_velocity() {
        let world = world(-1.0);
        let mut agent = hero(CENTER);
        // 0.15 * 0.92 = 0.138 survives, but the y component is zero anyway
        agent.step(CENTER + Vec2::new(0.0, 100.0), &world);
        assert_eq!(agent.vel.x, 0.0);
        assert!((agent.vel.y - 0.138).abs() < 1e-4);

        // Inside the falloff the push is tiny and gets snapped away
        let mut agent = hero(CENTER);
        agent.step(CENTER + Vec2::new(10.0, 0.0), &world);
        assert_eq!(agent.vel, Vec2::ZERO);
        assert_eq!(agent.pos, CENTER);
    }

    #[test]
    fn test_dead_zone_bleeds_velocity() {
        let world = world(-1.0);
        let mut agent = hero(CENTER);
        agent.vel = Vec2::new(2.0, 0.0);
        agent.step(CENTER + Vec2::new(1.0, 0.0), &world);
        assert!((agent.vel.x - 2.0 * 0.8 * 0.92).abs() < 1e-4);
    }

    #[test]
    fn test_speed_clamped() {
        let world = world(-1.0);
        let mut agent = hero(CENTER);
        agent.vel = Vec2::new(30.0, -40.0);
        agent.step(CENTER + Vec2::new(0.0, 150.0), &world);
        assert!(agent.speed() <= agent.max_speed + 1e-4);
    }

    #[test]
    fn test_slides_along_wall() {
        let world = world(-1.0);
        // Just inside the right edge of the sphere, moving up and to the right
        let start = CENTER + Vec2::new(199.0, 0.0);
        let mut agent = hero(start);
        agent.vel = Vec2::new(3.0, -2.0);
        agent.step(start + Vec2::new(300.0, -200.0), &world);
        assert!(world.is_traversable(agent.pos));
        assert_eq!(agent.pos.x, start.x, "horizontal motion blocked by rock");
        assert!(agent.pos.y < start.y, "slid vertically");
        assert_eq!(agent.vel.x, 0.0);
    }

    #[test]
    fn test_stalls_when_boxed_in() {
        let world = world(-1.0);
        // Right at the sphere's rightmost point: any step right is rock
        let start = CENTER + Vec2::new(200.0, 0.0);
        let mut agent = hero(start);
        agent.vel = Vec2::new(4.0, 0.0);
        agent.step(start + Vec2::new(300.0, 0.0), &world);
        assert_eq!(agent.pos, start);
        assert!(agent.speed() < 1.0);
    }

    #[test]
    fn test_bounces_off_pile() {
        let mut world = world(-1.0);
        world.add_pile(CENTER + Vec2::new(20.0, 0.0), 10.0, 0.0, 1);
        let mut agent = hero(CENTER + Vec2::new(4.0, 0.0));
        agent.vel = Vec2::new(3.0, 0.0);
        agent.step(CENTER + Vec2::new(100.0, 0.0), &world);

        let pile = &world.piles()[0];
        assert!(agent.pos.distance(pile.pos) >= pile.radius + agent.radius - 1e-3);
        assert!(agent.vel.x < 0.0, "bounced back, got {:?}", agent.vel);
        assert!(agent.position_is_valid(&world));
    }

    #[test]
    fn test_pile_push_out_lands_at_contact() {
        let mut world = world(-1.0);
        let pile_pos = CENTER + Vec2::new(30.0, 10.0);
        world.add_pile(pile_pos, 15.0, 0.0, 1);
        // Start clear of the pile and drift straight into it
        let start = CENTER + Vec2::new(10.0, 10.0);
        let mut agent = hero(start);
        agent.vel = Vec2::new(3.0, 0.0);
        agent.step(start + Vec2::new(100.0, 0.0), &world);

        assert!((agent.pos.distance(pile_pos) - 19.0).abs() < 1e-3);
        assert!(agent.pos.x < pile_pos.x);
        assert!((agent.pos.y - pile_pos.y).abs() < 1e-4);
        assert!(agent.position_is_valid(&world));
    }

    #[test]
    fn test_settles_against_rock_scenario() {
        // Pointer buried in rock well beyond the sphere wall
        let world = world(-1.0);
        let mut agent = hero(CENTER);
        let target = CENTER + Vec2::new(400.0, 0.0);
        for _ in 0..600 {
            agent.step(target, &world);
            assert!(world.is_traversable(agent.pos));
            assert!(agent.speed() <= agent.max_speed + 1e-4);
        }
        assert!(agent.pos.distance(CENTER) <= 200.0);
        assert!(agent.pos.x > CENTER.x + 190.0);
        assert!(agent.speed() < 0.5, "speed {}", agent.speed());
    }

    proptest! {
        #[test]
        fn prop_step_keeps_speed_and_position_valid(
            start_angle in 0.0f32..std::f32::consts::TAU,
            start_frac in 0.0f32..0.95,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
            tx in -400.0f32..1200.0,
            ty in -400.0f32..1000.0,
            ticks in 1usize..60,
            threshold in -1.0f32..1.2,
        ) {
            let mut world = world(threshold);
            world.add_pile(CENTER + Vec2::new(60.0, 40.0), 12.0, 0.0, 1);
            world.add_pile(CENTER + Vec2::new(-80.0, -30.0), 20.0, 0.0, 1);

            let start = CENTER + crate::polar_to_cartesian(200.0 * start_frac, start_angle);
            let mut agent = hero(start);
            prop_assume!(agent.position_is_valid(&world));
            agent.vel = Vec2::new(vx, vy);

            for _ in 0..ticks {
                agent.step(Vec2::new(tx, ty), &world);
                prop_assert!(agent.speed() <= agent.max_speed + 1e-3);
                prop_assert!(world.is_traversable(agent.pos));
                prop_assert!(agent.position_is_valid(&world));
            }
        }
    }
}
