//! Demo pilot
//!
//! Plays the game from the outside by producing the same `TickInput` a
//! keyboard would. Used by the headless runner and for attract mode.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::sim::{GamePhase, GameState, TickInput};

/// Heading error (radians) below which the pilot fires
const AIM_TOLERANCE: f32 = 0.15;
/// Ticks between shots while aligned
const FIRE_INTERVAL: u32 = 8;
/// Surface distance at which the pilot starts thrusting away
const DANGER_DISTANCE: f32 = 90.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    cooldown: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide this tick's controls
    pub fn steer(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        if state.phase != GamePhase::Running {
            return input;
        }
        let Some(ship) = state.ship.as_ref() else {
            return input;
        };

        self.cooldown = self.cooldown.saturating_sub(1);

        // Nearest asteroid by distance to its surface, seen across the wrap
        let nearest = state
            .asteroids
            .iter()
            .map(|a| {
                let offset = toroidal_offset(ship.pos, a.pos, state.extent);
                (offset, offset.length() - a.radius)
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let Some((offset, gap)) = nearest else {
            return input;
        };

        let error = angle_between(ship.angle, offset.y.atan2(offset.x));
        if gap < DANGER_DISTANCE {
            // Too close: turn tail and burn
            let away = angle_between(ship.angle, (-offset).y.atan2(-offset.x));
            input.rotate = turn_toward(away);
            input.thrust = away.abs() < PI / 2.0;
        } else {
            input.rotate = turn_toward(error);
        }

        if error.abs() < AIM_TOLERANCE && self.cooldown == 0 {
            input.fire = true;
            self.cooldown = FIRE_INTERVAL;
        }
        input
    }
}

/// Shortest vector from `from` to `to` on a wrapping playfield
fn toroidal_offset(from: Vec2, to: Vec2, extent: Vec2) -> Vec2 {
    let wrap = |d: f32, size: f32| {
        if d > size / 2.0 {
            d - size
        } else if d < -size / 2.0 {
            d + size
        } else {
            d
        }
    };
    let d = to - from;
    Vec2::new(wrap(d.x, extent.x), wrap(d.y, extent.y))
}

/// Signed difference `target - current`, normalized to `(-PI, PI]`
fn angle_between(current: f32, target: f32) -> f32 {
    let diff = (target - current).rem_euclid(TAU);
    if diff > PI { diff - TAU } else { diff }
}

fn turn_toward(error: f32) -> i8 {
    if error.abs() < AIM_TOLERANCE / 2.0 {
        0
    } else if error > 0.0 {
        1
    } else {
        -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{Asteroid, tick};

    const EXTENT: Vec2 = Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);

    fn running_with_target(target: Vec2) -> GameState {
        let mut state = GameState::with_seed(EXTENT, 11);
        state.start();
        state.asteroids.clear();
        let mut asteroid = Asteroid::new(target, 20.0, 3, state.rng());
        asteroid.vel = Vec2::ZERO;
        state.asteroids.push(asteroid);
        state
    }

    #[test]
    fn test_idle_when_not_running() {
        let state = GameState::with_seed(EXTENT, 1);
        assert_eq!(Autopilot::new().steer(&state), TickInput::default());
    }

    #[test]
    fn test_turns_toward_target() {
        // Ship faces up (-y); target to the right should turn clockwise (+1)
        let state = running_with_target(Vec2::new(700.0, 300.0));
        let input = Autopilot::new().steer(&state);
        assert_eq!(input.rotate, 1);
        assert!(!input.fire);
    }

    #[test]
    fn test_fires_on_cadence_when_aligned() {
        let state = running_with_target(Vec2::new(400.0, 50.0));
        let mut pilot = Autopilot::new();
        assert!(pilot.steer(&state).fire);
        for _ in 0..FIRE_INTERVAL - 1 {
            assert!(!pilot.steer(&state).fire);
        }
        assert!(pilot.steer(&state).fire);
    }

    #[test]
    fn test_flees_close_asteroid() {
        // Asteroid just behind the ship
        let state = running_with_target(Vec2::new(400.0, 360.0));
        let input = Autopilot::new().steer(&state);
        assert!(input.thrust);
    }

    #[test]
    fn test_offset_uses_wrap() {
        let offset = toroidal_offset(Vec2::new(790.0, 10.0), Vec2::new(10.0, 590.0), EXTENT);
        assert!((offset - Vec2::new(20.0, -20.0)).length() < 1e-4);
    }

    #[test]
    fn test_pilot_scores_over_time() {
        let mut state = GameState::with_seed(EXTENT, 99);
        state.start();
        let mut pilot = Autopilot::new();
        for _ in 0..3000 {
            if state.phase != GamePhase::Running {
                break;
            }
            let input = pilot.steer(&state);
            tick(&mut state, &input, 16.67);
            state.clear_transient_flags();
        }
        assert!(state.score > 0);
    }
}
