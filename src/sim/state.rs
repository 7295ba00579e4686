//! Game state and lifecycle transitions
//!
//! `GameState` owns every live entity plus the score/lives/level counters.
//! It is owned by the host (through `Session`) and passed by reference into
//! every simulation call; there are no globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Asteroid, Bullet, Particle, ParticleColor, Ship};
use crate::consts::*;
use crate::heading_vector;

/// Top-level lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start, or after reset
    #[default]
    Idle,
    /// Simulation advancing every tick
    Running,
    /// Round in progress but frozen
    Paused,
    /// Out of lives; entities frozen until play-again or reset
    GameOver,
}

/// Something that happened during a command or tick, for hosts to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    BulletFired,
    AsteroidDestroyed { position: Vec2, level: u8, points: u64 },
    ShipDestroyed { position: Vec2, lives_left: u32 },
    LevelCleared { level: u32, bonus: u64 },
    HighScore { score: u64 },
    GameOver { final_score: u64 },
    Reset,
}

/// Counters shown by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub high_score: u64,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Score (unsigned; no upper clamp)
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Best score seen; only ever raised
    pub high_score: u64,
    pub sound_enabled: bool,
    /// Playfield size; all wrapping is relative to this
    pub extent: Vec2,
    /// Live particle cap (cosmetic only)
    pub max_particles: usize,
    /// Present while a round exists (Running, Paused, GameOver)
    pub ship: Option<Ship>,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle state with an entropy-seeded RNG
    pub fn new(extent: Vec2) -> Self {
        Self::from_rng(extent, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Create an idle state with a fixed seed (tests, demos)
    pub fn with_seed(extent: Vec2, seed: u64) -> Self {
        Self::from_rng(extent, Pcg32::seed_from_u64(seed))
    }

    fn from_rng(extent: Vec2, rng: Pcg32) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            lives: STARTING_LIVES,
            level: STARTING_LEVEL,
            high_score: 0,
            sound_enabled: true,
            extent,
            max_particles: usize::MAX,
            ship: None,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            rng,
            events: Vec::new(),
        }
    }

    /// Running or Paused
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            level: self.level,
            high_score: self.high_score,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.extent * 0.5
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Record an event, dropping the oldest once `MAX_PENDING_EVENTS` are held
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Lifecycle -------------------------------------------------------

    /// Begin a new round. Ignored while a round is already in progress.
    pub fn start(&mut self) {
        if self.is_running() {
            log::debug!("Start ignored: round already in progress");
            return;
        }

        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level = STARTING_LEVEL;
        self.bullets.clear();
        self.particles.clear();
        self.asteroids.clear();
        self.ship = Some(Ship::new(self.center()));
        self.spawn_asteroids(self.level + ASTEROIDS_PER_LEVEL_BASE);
        self.phase = GamePhase::Running;

        log::info!("Game started with {} asteroids", self.asteroids.len());
        self.push_event(GameEvent::Started);
    }

    /// Flip between Running and Paused; no-op in any other phase
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                log::info!("Paused");
                self.push_event(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                log::info!("Resumed");
                self.push_event(GameEvent::Resumed);
            }
            GamePhase::Idle | GamePhase::GameOver => {}
        }
    }

    /// Freeze the round. Accepted from Running or Paused.
    pub fn end_game(&mut self) {
        if !self.is_running() {
            return;
        }
        self.phase = GamePhase::GameOver;
        log::info!("Game over: score {}, level {}", self.score, self.level);
        self.push_event(GameEvent::GameOver {
            final_score: self.score,
        });
    }

    /// Back to Idle from any phase, dropping every entity
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level = STARTING_LEVEL;
        self.ship = None;
        self.asteroids.clear();
        self.bullets.clear();
        self.particles.clear();

        log::info!("Reset");
        self.push_event(GameEvent::Reset);
    }

    /// Reset followed by start
    pub fn play_again(&mut self) {
        self.reset();
        self.start();
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    // --- Debug hooks (permissive, no validation) --------------------------

    pub fn set_score(&mut self, score: u64) {
        self.score = score;
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    // --- Ship commands (silent no-ops unless Running) ---------------------

    fn controllable_ship(&mut self) -> Option<&mut Ship> {
        if self.phase != GamePhase::Running {
            return None;
        }
        self.ship.as_mut()
    }

    pub fn thrust(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        let Some(ship) = self.ship.as_mut() else {
            return;
        };
        if let Some(particle) = ship.thrust(&mut self.rng) {
            self.add_particle(particle);
        }
    }

    pub fn rotate(&mut self, direction: i8) {
        if let Some(ship) = self.controllable_ship() {
            ship.rotate(direction);
        }
    }

    /// Fire one bullet. Callers deliver one call per key press.
    pub fn fire(&mut self) {
        let Some(bullet) = self.controllable_ship().map(|ship| ship.shoot()) else {
            return;
        };
        self.bullets.push(bullet);
        self.push_event(GameEvent::BulletFired);
    }

    // --- Spawning ---------------------------------------------------------

    /// Spawn `count` full-size asteroids away from the ship
    pub fn spawn_asteroids(&mut self, count: u32) {
        let ship_pos = self.ship.as_ref().map_or(self.center(), |ship| ship.pos);
        for _ in 0..count {
            let pos = self.safe_spawn_point(ship_pos);
            let asteroid = Asteroid::new(pos, ASTEROID_RADIUS, 1, &mut self.rng);
            self.asteroids.push(asteroid);
        }
        log::debug!("Spawned {} asteroids (level {})", count, self.level);
    }

    /// Uniform random point at least `SAFE_SPAWN_DISTANCE` from `avoid`
    fn safe_spawn_point(&mut self, avoid: Vec2) -> Vec2 {
        let mut best = Vec2::ZERO;
        let mut best_distance = f32::NEG_INFINITY;
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let candidate = Vec2::new(
                self.rng.random::<f32>() * self.extent.x,
                self.rng.random::<f32>() * self.extent.y,
            );
            let distance = candidate.distance(avoid);
            if distance >= SAFE_SPAWN_DISTANCE {
                return candidate;
            }
            if distance > best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        log::warn!(
            "No spawn point {} units from the ship after {} attempts; using {:?}",
            SAFE_SPAWN_DISTANCE,
            MAX_SPAWN_ATTEMPTS,
            best
        );
        best
    }

    pub(crate) fn add_particle(&mut self, particle: Particle) {
        if self.particles.len() < self.max_particles {
            self.particles.push(particle);
        }
    }

    /// Even radial burst of particles
    pub fn create_explosion(&mut self, pos: Vec2, color: ParticleColor) {
        for i in 0..EXPLOSION_PARTICLES {
            let angle = i as f32 / EXPLOSION_PARTICLES as f32 * std::f32::consts::TAU;
            let speed = self
                .rng
                .random_range(EXPLOSION_MIN_SPEED..EXPLOSION_MAX_SPEED);
            self.add_particle(Particle::new(pos, heading_vector(angle) * speed, color));
        }
    }

    /// Clear per-frame visual flags once the render frame has been captured
    pub fn clear_transient_flags(&mut self) {
        if let Some(ship) = self.ship.as_mut() {
            ship.thrusting = false;
        }
    }
}
