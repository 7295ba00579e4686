//! Asteroid Belt - A screen-wrapping Asteroids arcade simulation
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, game state machine, frame clock)
//! - `session`: Host-owned orchestration of the simulation and its collaborators
//! - `platform`: Input mapping and display sink abstractions
//! - `persistence`: Key/value storage backends
//! - `highscores`: High score tracking
//! - `settings`: Player preferences and playfield configuration

pub mod autopilot;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference playfield extent
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Nominal frame length motion is normalized against (60 Hz)
    pub const NOMINAL_FRAME_MS: f32 = 16.67;
    /// Upper bound on the normalized delta (2 nominal frames)
    pub const MAX_NORMALIZED_DELTA: f32 = 2.0;
    /// Upper bound on real time fed into a single tick
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 10.0;
    pub const SHIP_THRUST: f32 = 0.5;
    pub const SHIP_TURN_STEP: f32 = 0.1;
    /// Per-tick velocity damping (not scaled by delta)
    pub const SHIP_DAMPING: f32 = 0.99;
    /// Heading on spawn/respawn (pointing up the screen)
    pub const SHIP_SPAWN_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;
    pub const INVULNERABILITY_MS: f32 = 3000.0;

    /// Thrust exhaust
    pub const THRUST_PARTICLE_CHANCE: f64 = 0.7;
    pub const THRUST_PARTICLE_OFFSET: f32 = 15.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_RADIUS: f32 = 2.0;
    pub const BULLET_LIFETIME_MS: f32 = 1000.0;

    /// Particle defaults
    pub const PARTICLE_LIFETIME_MS: f32 = 500.0;
    pub const EXPLOSION_PARTICLES: usize = 20;
    pub const EXPLOSION_MIN_SPEED: f32 = 2.0;
    pub const EXPLOSION_MAX_SPEED: f32 = 5.0;

    /// Asteroid defaults
    pub const ASTEROID_RADIUS: f32 = 40.0;
    pub const ASTEROID_MAX_LEVEL: u8 = 3;
    pub const ASTEROID_SPLIT_FACTOR: f32 = 1.5;
    pub const ASTEROID_SPLIT_JITTER: f32 = 10.0;
    pub const ASTEROID_MIN_VERTICES: usize = 8;
    pub const ASTEROID_MAX_VERTICES: usize = 12;
    pub const ASTEROID_MAX_SPIN: f32 = 0.025;

    /// Scoring
    pub const POINTS_PER_LEVEL: u64 = 100;
    pub const LEVEL_CLEAR_BONUS: u64 = 1000;

    /// Level setup
    pub const STARTING_LIVES: u32 = 3;
    pub const STARTING_LEVEL: u32 = 1;
    /// Extra asteroids on top of the level number
    pub const ASTEROIDS_PER_LEVEL_BASE: u32 = 3;
    /// Upper bound on a fresh field, reached only through debug-set levels
    pub const MAX_LEVEL_ASTEROIDS: u32 = 64;
    pub const SAFE_SPAWN_DISTANCE: f32 = 150.0;
    pub const MAX_SPAWN_ATTEMPTS: u32 = 1000;

    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 1024;
}

/// Scale factor applied to per-frame velocities for a raw delta in ms.
///
/// Capped at [`consts::MAX_NORMALIZED_DELTA`] so a stalled frame never moves
/// an entity more than two nominal frames worth.
#[inline]
pub fn normalized_delta(delta_ms: f32) -> f32 {
    (delta_ms / consts::NOMINAL_FRAME_MS).clamp(0.0, consts::MAX_NORMALIZED_DELTA)
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap a coordinate toroidally into `[0, extent)`
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round tiny negatives up to `extent`
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Wrap a coordinate once it is fully past an edge by `margin`.
///
/// Keeps the value inside `[-margin, extent + margin]`.
#[inline]
pub fn wrap_with_margin(value: f32, extent: f32, margin: f32) -> f32 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_delta_caps_at_two_frames() {
        assert!((normalized_delta(16.67) - 1.0).abs() < 1e-6);
        assert!((normalized_delta(33.34) - 2.0).abs() < 1e-6);
        assert_eq!(normalized_delta(10_000.0), 2.0);
        assert_eq!(normalized_delta(-5.0), 0.0);
    }

    #[test]
    fn test_wrap_coordinate() {
        assert_eq!(wrap_coordinate(-1.0, 800.0), 799.0);
        assert_eq!(wrap_coordinate(800.0, 800.0), 0.0);
        assert_eq!(wrap_coordinate(805.0, 800.0), 5.0);
        assert_eq!(wrap_coordinate(400.0, 800.0), 400.0);
        assert!(wrap_coordinate(-1e-9, 800.0) < 800.0);
    }

    #[test]
    fn test_wrap_with_margin() {
        assert_eq!(wrap_with_margin(-41.0, 800.0, 40.0), 840.0);
        assert_eq!(wrap_with_margin(841.0, 800.0, 40.0), -40.0);
        // Partially visible entities stay put
        assert_eq!(wrap_with_margin(-20.0, 800.0, 40.0), -20.0);
        assert_eq!(wrap_with_margin(830.0, 800.0, 40.0), 830.0);
    }

    #[test]
    fn test_heading_vector() {
        let up = heading_vector(consts::SHIP_SPAWN_ANGLE);
        assert!(up.x.abs() < 1e-6);
        assert!((up.y + 1.0).abs() < 1e-6);
    }
}
