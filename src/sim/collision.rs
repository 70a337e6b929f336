//! Circle contact and bounce response
//!
//! The hero and rock piles are both disks. Overlap is resolved by pushing the
//! hero out along the line between centers and bouncing its velocity off that
//! normal.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at contact, pointing from the obstacle toward the mover
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a moving disk against a static disk obstacle
///
/// `fallback_normal` is used when the centers coincide and the contact
/// direction is undefined.
pub fn circle_circle_collision(
    pos: Vec2,
    radius: f32,
    obstacle_pos: Vec2,
    obstacle_radius: f32,
    fallback_normal: Vec2,
) -> CollisionResult {
    let offset = pos - obstacle_pos;
    let dist = offset.length();
    let reach = radius + obstacle_radius;

    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > f32::EPSILON {
        offset / dist
    } else {
        let n = fallback_normal.normalize_or_zero();
        if n == Vec2::ZERO { Vec2::X } else { n }
    };

    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Partially elastic bounce: only the reflected normal term is scaled
///
/// v' = v - 2(v·n)n·restitution
#[inline]
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    velocity + (reflect_velocity(velocity, normal) - velocity) * restitution
}
