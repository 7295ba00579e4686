//! Render frame handed to the drawing collaborator
//!
//! A read-only view of everything visible this frame. The core never draws;
//! hosts turn this into canvas/GPU calls.

use glam::Vec2;
use serde::Serialize;

use super::state::{GamePhase, GameState};

/// Invulnerable ships blink on this period (ms)
pub const BLINK_PERIOD_MS: f64 = 100.0;

#[derive(Debug, Clone, Serialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub thrusting: bool,
    pub invulnerable: bool,
    /// False during the "off" half of the invulnerability blink
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AsteroidView {
    pub pos: Vec2,
    pub rotation: f32,
    pub radius: f32,
    pub outline: Vec<Vec2>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub color: &'static str,
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub ship: Option<ShipView>,
    pub asteroids: Vec<AsteroidView>,
    pub bullets: Vec<BulletView>,
    pub particles: Vec<ParticleView>,
}

impl RenderFrame {
    /// Capture the visible state at host time `time_ms`
    pub fn capture(state: &GameState, time_ms: f64) -> Self {
        let blink_on = (time_ms / BLINK_PERIOD_MS).floor().rem_euclid(2.0) >= 1.0;

        Self {
            width: state.extent.x,
            height: state.extent.y,
            phase: state.phase,
            ship: state.ship.as_ref().map(|ship| ShipView {
                pos: ship.pos,
                angle: ship.angle,
                radius: ship.radius,
                thrusting: ship.thrusting,
                invulnerable: ship.invulnerable,
                visible: !ship.invulnerable || blink_on,
            }),
            asteroids: state
                .asteroids
                .iter()
                .map(|a| AsteroidView {
                    pos: a.pos,
                    rotation: a.rotation,
                    radius: a.radius,
                    outline: a.outline.clone(),
                })
                .collect(),
            bullets: state
                .bullets
                .iter()
                .map(|b| BulletView {
                    pos: b.pos,
                    radius: b.radius,
                })
                .collect(),
            particles: state
                .particles
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    color: p.color.as_css(),
                    alpha: p.alpha(),
                })
                .collect(),
        }
    }
}
