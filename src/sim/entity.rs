//! Simulation entities
//!
//! Every entity owns its kinematic state and advances itself with
//! `update(delta_ms)`. Motion is scaled by the normalized delta while timers
//! (invulnerability, lifetimes) count down in raw milliseconds.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::consts::*;
use crate::{heading_vector, normalized_delta, wrap_coordinate, wrap_with_margin};

/// The player's ship
#[derive(Debug, Clone, Serialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians (unbounded, wraps through trig)
    pub angle: f32,
    pub radius: f32,
    /// Set by `thrust`, cleared once the render frame has been captured
    pub thrusting: bool,
    pub invulnerable: bool,
    /// Remaining invulnerability (ms)
    pub invulnerable_ms: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: SHIP_SPAWN_ANGLE,
            radius: SHIP_RADIUS,
            thrusting: false,
            invulnerable: false,
            invulnerable_ms: 0.0,
        }
    }

    pub fn update(&mut self, delta_ms: f32, extent: Vec2) {
        let step = normalized_delta(delta_ms);
        self.pos += self.vel * step;
        self.vel *= SHIP_DAMPING;

        self.pos.x = wrap_coordinate(self.pos.x, extent.x);
        self.pos.y = wrap_coordinate(self.pos.y, extent.y);

        if self.invulnerable {
            self.invulnerable_ms -= delta_ms;
            if self.invulnerable_ms <= 0.0 {
                self.invulnerable = false;
                self.invulnerable_ms = 0.0;
            }
        }
    }

    /// Apply one thrust impulse along the heading.
    ///
    /// Returns an exhaust particle roughly 70% of the time.
    pub fn thrust<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Particle> {
        let dir = heading_vector(self.angle);
        self.vel += dir * SHIP_THRUST;
        self.thrusting = true;

        if !rng.random_bool(THRUST_PARTICLE_CHANCE) {
            return None;
        }
        let jitter = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        Some(Particle::new(
            self.pos - dir * THRUST_PARTICLE_OFFSET,
            -self.vel * 0.5 + jitter,
            ParticleColor::Orange,
        ))
    }

    /// Turn by one step; `direction` is -1 (left) or +1 (right)
    pub fn rotate(&mut self, direction: i8) {
        self.angle += f32::from(direction) * SHIP_TURN_STEP;
    }

    pub fn shoot(&self) -> Bullet {
        Bullet::new(self.pos, self.angle)
    }

    /// Reset in place at the playfield center with a fresh invulnerability window
    pub fn respawn(&mut self, extent: Vec2) {
        self.pos = extent * 0.5;
        self.vel = Vec2::ZERO;
        self.angle = SHIP_SPAWN_ANGLE;
        self.thrusting = false;
        self.invulnerable = true;
        self.invulnerable_ms = INVULNERABILITY_MS;
    }
}

/// An asteroid with a fixed jagged outline
#[derive(Debug, Clone, Serialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Fragmentation level (1 = largest, 3 = cannot split)
    pub level: u8,
    /// Outline vertices relative to the center, before rotation
    pub outline: Vec<Vec2>,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Asteroid {
    pub fn new<R: Rng + ?Sized>(pos: Vec2, radius: f32, level: u8, rng: &mut R) -> Self {
        let level = level.clamp(1, ASTEROID_MAX_LEVEL);
        // Later generations move faster
        let max_speed = f32::from(4 - level);
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0 * max_speed,
            (rng.random::<f32>() - 0.5) * 2.0 * max_speed,
        );

        Self {
            pos,
            vel,
            radius,
            level,
            outline: generate_outline(radius, rng),
            rotation: 0.0,
            rotation_speed: rng.random_range(-ASTEROID_MAX_SPIN..ASTEROID_MAX_SPIN),
        }
    }

    pub fn update(&mut self, delta_ms: f32, extent: Vec2) {
        let step = normalized_delta(delta_ms);
        self.pos += self.vel * step;
        self.rotation += self.rotation_speed * step;

        self.pos.x = wrap_with_margin(self.pos.x, extent.x, self.radius);
        self.pos.y = wrap_with_margin(self.pos.y, extent.y, self.radius);
    }

    pub fn can_split(&self) -> bool {
        self.level < ASTEROID_MAX_LEVEL
    }

    /// Score awarded for destroying this asteroid
    pub fn points(&self) -> u64 {
        u64::from(self.level) * POINTS_PER_LEVEL
    }

    /// Fragments left behind when this asteroid is destroyed.
    ///
    /// Two smaller, faster children near the parent, or none at the last level.
    pub fn split<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Asteroid> {
        if !self.can_split() {
            return Vec::new();
        }
        (0..2)
            .map(|_| {
                let offset = Vec2::new(
                    rng.random_range(-ASTEROID_SPLIT_JITTER..ASTEROID_SPLIT_JITTER),
                    rng.random_range(-ASTEROID_SPLIT_JITTER..ASTEROID_SPLIT_JITTER),
                );
                Asteroid::new(
                    self.pos + offset,
                    self.radius / ASTEROID_SPLIT_FACTOR,
                    self.level + 1,
                    rng,
                )
            })
            .collect()
    }
}

fn generate_outline<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Vec<Vec2> {
    let count = rng.random_range(ASTEROID_MIN_VERTICES..=ASTEROID_MAX_VERTICES);
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            let variance = rng.random_range(0.8..=1.2);
            heading_vector(angle) * radius * variance
        })
        .collect()
}

/// A bullet fired by the ship
#[derive(Debug, Clone, Serialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Remaining lifetime (ms, real time)
    pub lifetime_ms: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            vel: heading_vector(angle) * BULLET_SPEED,
            radius: BULLET_RADIUS,
            lifetime_ms: BULLET_LIFETIME_MS,
        }
    }

    pub fn update(&mut self, delta_ms: f32, extent: Vec2) {
        self.pos += self.vel * normalized_delta(delta_ms);
        self.lifetime_ms -= delta_ms;

        self.pos.x = wrap_coordinate(self.pos.x, extent.x);
        self.pos.y = wrap_coordinate(self.pos.y, extent.y);
    }

    pub fn expired(&self) -> bool {
        self.lifetime_ms <= 0.0
    }
}

/// Particle tint, chosen by the effect that spawned it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ParticleColor {
    /// Asteroid debris
    #[default]
    Green,
    /// Ship destruction
    Red,
    /// Thrust exhaust
    Orange,
}

impl ParticleColor {
    pub fn as_css(&self) -> &'static str {
        match self {
            ParticleColor::Green => "#00ff00",
            ParticleColor::Red => "#ff0000",
            ParticleColor::Orange => "#ffa500",
        }
    }
}

/// Cosmetic particle; never collides and never wraps
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ParticleColor,
    pub lifetime_ms: f32,
    pub max_lifetime_ms: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: ParticleColor) -> Self {
        Self {
            pos,
            vel,
            color,
            lifetime_ms: PARTICLE_LIFETIME_MS,
            max_lifetime_ms: PARTICLE_LIFETIME_MS,
        }
    }

    pub fn update(&mut self, delta_ms: f32) {
        self.pos += self.vel * normalized_delta(delta_ms);
        self.lifetime_ms -= delta_ms;
    }

    pub fn expired(&self) -> bool {
        self.lifetime_ms <= 0.0
    }

    /// Linear fade from 1 (fresh) to 0 (expired)
    pub fn alpha(&self) -> f32 {
        if self.max_lifetime_ms <= 0.0 {
            return 0.0;
        }
        (self.lifetime_ms / self.max_lifetime_ms).clamp(0.0, 1.0)
    }
}
