//! Circle-based collision detection
//!
//! Every collidable entity is approximated by its bounding circle. Two
//! entities collide when the distance between their centers is strictly less
//! than the sum of their radii.

use glam::Vec2;

use super::entity::{Asteroid, Bullet, Ship};

/// Anything with a bounding circle
pub trait Collider {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

impl Collider for Ship {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Collider for Asteroid {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Collider for Bullet {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Strict circle overlap (touching circles do not collide)
#[inline]
pub fn circles_overlap(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    a_center.distance(b_center) < a_radius + b_radius
}

/// Check whether two colliders overlap. Symmetric in its arguments.
#[inline]
pub fn check_collision<A: Collider + ?Sized, B: Collider + ?Sized>(a: &A, b: &B) -> bool {
    circles_overlap(a.center(), a.radius(), b.center(), b.radius())
}
