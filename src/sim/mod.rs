//! Simulation module
//!
//! All gameplay logic lives here:
//! - Variable frame deltas, normalized per entity and clamped per frame
//! - RNG owned by the state, never global
//! - No rendering, storage or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::{Collider, check_collision, circles_overlap};
pub use entity::{Asteroid, Bullet, Particle, ParticleColor, Ship};
pub use snapshot::{AsteroidView, BulletView, ParticleView, RenderFrame, ShipView};
pub use state::{GameEvent, GamePhase, GameState, Hud};
pub use tick::{TickInput, tick};
