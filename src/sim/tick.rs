//! Per-tick simulation step
//!
//! Advances every live entity by one (already clamped) frame delta, resolves
//! ship/asteroid and bullet/asteroid collisions, expires bullets and
//! particles, and handles level completion.

use super::collision::check_collision;
use super::entity::ParticleColor;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Commands for a single tick, as delivered by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Thrust held this tick
    pub thrust: bool,
    /// -1 turn left, +1 turn right, 0 none
    pub rotate: i8,
    /// Fire one bullet (edge-triggered by the host)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame of `delta_ms` real milliseconds.
///
/// Does nothing unless the phase is `Running` (after applying a pause toggle).
/// Returns true if the world advanced.
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f32) -> bool {
    if input.pause {
        state.toggle_pause();
    }
    if state.phase != GamePhase::Running {
        return false;
    }

    if input.thrust {
        state.thrust();
    }
    if input.rotate != 0 {
        state.rotate(input.rotate.signum());
    }
    if input.fire {
        state.fire();
    }

    step_ship_and_asteroids(state, delta_ms);
    if state.phase != GamePhase::Running {
        // Last life lost: the rest of this tick is skipped
        return true;
    }
    step_bullets(state, delta_ms);
    step_particles(state, delta_ms);
    check_level_complete(state);
    check_high_score(state);
    true
}

/// Move ship and asteroids; at most one life is lost per tick
fn step_ship_and_asteroids(state: &mut GameState, delta_ms: f32) {
    let extent = state.extent;
    let mut hit_at = None;

    if let Some(ship) = state.ship.as_mut() {
        ship.update(delta_ms, extent);
    }

    for asteroid in state.asteroids.iter_mut().rev() {
        asteroid.update(delta_ms, extent);

        if hit_at.is_some() {
            continue;
        }
        if let Some(ship) = state.ship.as_ref() {
            if !ship.invulnerable && check_collision(ship, asteroid) {
                hit_at = Some(ship.pos);
            }
        }
    }

    let Some(position) = hit_at else {
        return;
    };

    state.create_explosion(position, ParticleColor::Red);
    state.lives = state.lives.saturating_sub(1);
    log::debug!("Ship destroyed at {:?}, {} lives left", position, state.lives);
    state.push_event(GameEvent::ShipDestroyed {
        position,
        lives_left: state.lives,
    });

    if state.lives == 0 {
        state.end_game();
    } else if let Some(ship) = state.ship.as_mut() {
        ship.respawn(extent);
    }
}

/// Move bullets, expire them, and let each destroy at most one asteroid
fn step_bullets(state: &mut GameState, delta_ms: f32) {
    let extent = state.extent;

    let mut i = state.bullets.len();
    while i > 0 {
        i -= 1;

        let bullet = &mut state.bullets[i];
        bullet.update(delta_ms, extent);
        if bullet.expired() {
            state.bullets.remove(i);
            continue;
        }

        let bullet = &state.bullets[i];
        let Some(target) = state
            .asteroids
            .iter()
            .rposition(|asteroid| check_collision(bullet, asteroid))
        else {
            continue;
        };

        let asteroid = state.asteroids.remove(target);
        state.bullets.remove(i);

        let points = asteroid.points();
        state.create_explosion(asteroid.pos, ParticleColor::Green);
        state.score = state.score.saturating_add(points);

        let fragments = asteroid.split(state.rng());
        log::debug!(
            "Asteroid level {} destroyed (+{}), {} fragments",
            asteroid.level,
            points,
            fragments.len()
        );
        state.asteroids.extend(fragments);
        state.push_event(GameEvent::AsteroidDestroyed {
            position: asteroid.pos,
            level: asteroid.level,
            points,
        });
    }
}

fn step_particles(state: &mut GameState, delta_ms: f32) {
    for particle in state.particles.iter_mut() {
        particle.update(delta_ms);
    }
    state.particles.retain(|p| !p.expired());
}

/// Start the next level once the field is clear
fn check_level_complete(state: &mut GameState) {
    if !state.asteroids.is_empty() {
        return;
    }

    state.level = state.level.saturating_add(1);
    state.score = state.score.saturating_add(LEVEL_CLEAR_BONUS);
    log::info!("Level cleared, advancing to level {}", state.level);
    state.push_event(GameEvent::LevelCleared {
        level: state.level,
        bonus: LEVEL_CLEAR_BONUS,
    });
    let count = state
        .level
        .saturating_add(ASTEROIDS_PER_LEVEL_BASE)
        .min(MAX_LEVEL_ASTEROIDS);
    state.spawn_asteroids(count);
}

fn check_high_score(state: &mut GameState) {
    if state.score > state.high_score {
        state.high_score = state.score;
        state.push_event(GameEvent::HighScore { score: state.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Asteroid, Bullet};
    use glam::Vec2;

    const EXTENT: Vec2 = Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    const FRAME: f32 = 16.67;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::with_seed(EXTENT, seed);
        state.start();
        state.drain_events();
        state
    }

    /// Stationary asteroid with a deterministic shape
    fn still_asteroid(state: &mut GameState, pos: Vec2, radius: f32, level: u8) -> Asteroid {
        let mut asteroid = Asteroid::new(pos, radius, level, state.rng());
        asteroid.vel = Vec2::ZERO;
        asteroid
    }

    #[test]
    fn test_tick_does_nothing_when_idle() {
        let mut state = GameState::with_seed(EXTENT, 1);
        let input = TickInput {
            fire: true,
            thrust: true,
            ..Default::default()
        };
        assert!(!tick(&mut state, &input, FRAME));
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.bullets.is_empty());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_tick_pause_freezes_entities() {
        let mut state = running(2);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::Paused);

        let before: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), FRAME);
        }
        let after: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        assert_eq!(before, after);

        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_input_applies_to_ship() {
        let mut state = running(3);
        state.asteroids.clear();
        let far = still_asteroid(&mut state, Vec2::new(50.0, 50.0), 10.0, 3);
        state.asteroids.push(far);

        let input = TickInput {
            thrust: true,
            rotate: 1,
            fire: true,
            pause: false,
        };
        tick(&mut state, &input, FRAME);

        let ship = state.ship.as_ref().expect("ship");
        assert!((ship.angle - (SHIP_SPAWN_ANGLE + SHIP_TURN_STEP)).abs() < 1e-6);
        assert!(ship.vel.length() > 0.0);
        assert!(ship.thrusting);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_bullet_kill_scores_by_level() {
        for level in 1..=3u8 {
            let mut state = running(4);
            state.asteroids.clear();
            // Keep a far asteroid so the level does not complete
            let anchor = still_asteroid(&mut state, Vec2::new(40.0, 40.0), 5.0, 3);
            let target = still_asteroid(&mut state, Vec2::new(400.0, 200.0), 20.0, level);
            state.asteroids.push(anchor);
            state.asteroids.push(target);

            let mut bullet = Bullet::new(Vec2::new(400.0, 215.0), SHIP_SPAWN_ANGLE);
            bullet.vel = Vec2::ZERO;
            state.bullets.push(bullet);

            tick(&mut state, &TickInput::default(), FRAME);
            assert_eq!(state.score, u64::from(level) * 100, "level {level}");
            assert!(state.bullets.is_empty());
            let expected = if level < 3 { 3 } else { 1 };
            assert_eq!(state.asteroids.len(), expected);
            assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        }
    }

    #[test]
    fn test_bullet_destroys_at_most_one_asteroid() {
        let mut state = running(5);
        state.asteroids.clear();
        let a = still_asteroid(&mut state, Vec2::new(400.0, 100.0), 30.0, 3);
        let b = still_asteroid(&mut state, Vec2::new(405.0, 100.0), 30.0, 3);
        state.asteroids.push(a);
        state.asteroids.push(b);

        let mut bullet = Bullet::new(Vec2::new(402.0, 100.0), 0.0);
        bullet.vel = Vec2::ZERO;
        state.bullets.push(bullet);

        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.score, 300);
    }

    #[test]
    fn test_expired_bullets_are_dropped() {
        let mut state = running(6);
        state.fire();
        assert_eq!(state.bullets.len(), 1);
        state.bullets[0].lifetime_ms = 10.0;
        // Point it away from everything
        state.bullets[0].vel = Vec2::ZERO;
        state.asteroids.retain(|a| a.pos.distance(Vec2::new(400.0, 300.0)) > 100.0);
        tick(&mut state, &TickInput::default(), FRAME);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_particles_expire() {
        let mut state = running(7);
        state.create_explosion(Vec2::new(10.0, 10.0), ParticleColor::Green);
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), 100.0);
        }
        assert!(state.particles.iter().all(|p| p.color != ParticleColor::Green));
    }

    #[test]
    fn test_ship_hit_respawns_with_invulnerability() {
        let mut state = running(8);
        state.asteroids.clear();
        let rock = still_asteroid(&mut state, Vec2::new(420.0, 300.0), 40.0, 1);
        state.asteroids.push(rock);

        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Running);
        let ship = state.ship.as_ref().expect("ship");
        assert!(ship.invulnerable);
        assert_eq!(ship.pos, Vec2::new(400.0, 300.0));
        assert!(state.particles.iter().any(|p| p.color == ParticleColor::Red));

        // Overlapping again while invulnerable costs nothing
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_one_life_per_tick_with_multiple_overlaps() {
        let mut state = running(9);
        state.asteroids.clear();
        for offset in [-15.0, 0.0, 15.0] {
            let rock = still_asteroid(&mut state, Vec2::new(400.0 + offset, 300.0), 40.0, 1);
            state.asteroids.push(rock);
        }
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.lives, 2);
        let destroyed = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ShipDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_bullet_scenario() {
        let mut state = running(10);
        state.asteroids.clear();
        let ship_pos = state.ship.as_ref().map(|s| s.pos).expect("ship");
        let target = still_asteroid(&mut state, ship_pos + Vec2::new(0.0, -200.0), 40.0, 1);
        state.asteroids.push(target);

        state.fire();
        let before = state.asteroids.len();
        // 200 units at 10 units per frame
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), FRAME);
        }

        assert_eq!(state.score, 100);
        assert_eq!(state.asteroids.len(), before + 1);
        assert!(state.asteroids.iter().all(|a| a.level == 2));
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_last_life_ends_game_and_freezes() {
        let mut state = running(11);
        state.set_lives(1);
        state.asteroids.clear();
        let rock = still_asteroid(&mut state, Vec2::new(400.0, 310.0), 40.0, 1);
        state.asteroids.push(rock);
        if let Some(ship) = state.ship.as_mut() {
            ship.invulnerable = false;
        }

        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        let ship_pos = state.ship.as_ref().map(|s| s.pos);
        let rocks: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        let particles = state.particles.len();
        let input = TickInput {
            thrust: true,
            fire: true,
            rotate: 1,
            pause: true,
        };
        for _ in 0..10 {
            assert!(!tick(&mut state, &input, FRAME));
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.ship.as_ref().map(|s| s.pos), ship_pos);
        assert_eq!(state.asteroids.iter().map(|a| a.pos).collect::<Vec<_>>(), rocks);
        assert_eq!(state.particles.len(), particles);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_level_clear_spawns_safe_field() {
        let mut state = running(12);
        state.set_score(250);
        if let Some(ship) = state.ship.as_mut() {
            ship.pos = Vec2::new(120.0, 90.0);
        }
        state.asteroids.clear();

        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 1250);
        assert_eq!(state.asteroids.len(), 5);

        let ship_pos = state.ship.as_ref().map(|s| s.pos).expect("ship");
        for asteroid in &state.asteroids {
            assert!(asteroid.pos.distance(ship_pos) >= SAFE_SPAWN_DISTANCE);
        }
        assert!(state.drain_events().contains(&GameEvent::LevelCleared {
            level: 2,
            bonus: LEVEL_CLEAR_BONUS
        }));
    }

    #[test]
    fn test_level_clear_at_max_level_saturates() {
        let mut state = running(16);
        state.set_level(u32::MAX);
        state.asteroids.clear();

        assert!(tick(&mut state, &TickInput::default(), FRAME));
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.level, u32::MAX);
        assert_eq!(state.score, LEVEL_CLEAR_BONUS);
        assert_eq!(state.asteroids.len(), MAX_LEVEL_ASTEROIDS as usize);
    }

    #[test]
    fn test_high_score_only_rises() {
        let mut state = running(13);
        state.high_score = 5000;
        state.set_score(100);
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.high_score, 5000);

        state.set_score(6000);
        tick(&mut state, &TickInput::default(), FRAME);
        assert!(state.high_score >= 6000);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::HighScore { .. })));
    }
}
