//! Game session
//!
//! Ties the simulation to its host: the frame clock, the persisted high score
//! and settings, and the display sink. Hosts drive it with two calls per
//! animation frame (`frame`, then draw the returned `RenderFrame`) plus the
//! occasional command from a button or key.

use glam::Vec2;

use crate::consts::MAX_PENDING_EVENTS;
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::platform::{DisplaySink, NullDisplay};
use crate::settings::{QualityPreset, Settings};
use crate::sim::{FrameClock, GameEvent, GamePhase, GameState, Hud, RenderFrame, TickInput, tick};

pub struct Session<S: KeyValueStore> {
    state: GameState,
    clock: FrameClock,
    high_score: HighScore,
    settings: Settings,
    store: S,
    display: Box<dyn DisplaySink>,
    events: Vec<GameEvent>,
    last_hud: Option<Hud>,
    last_phase: GamePhase,
    now_ms: f64,
}

impl<S: KeyValueStore> Session<S> {
    /// Load settings and high score from `store` and build an idle game
    pub fn new(store: S) -> Self {
        let settings = Settings::load(&store);
        let state = GameState::new(settings.extent());
        Self::assemble(store, settings, state)
    }

    /// Same as `new` but with a fixed RNG seed
    pub fn with_seed(store: S, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let state = GameState::with_seed(settings.extent(), seed);
        Self::assemble(store, settings, state)
    }

    fn assemble(store: S, settings: Settings, mut state: GameState) -> Self {
        let high_score = HighScore::load(&store);
        state.high_score = high_score.best();
        state.sound_enabled = settings.sound_enabled;
        state.max_particles = settings.max_particles();

        log::info!(
            "Session ready: {}x{} playfield, {} quality, high score {}",
            state.extent.x,
            state.extent.y,
            settings.quality.as_str(),
            high_score.best()
        );

        Self {
            last_phase: state.phase,
            state,
            clock: FrameClock::new(),
            high_score,
            settings,
            store,
            display: Box::new(NullDisplay),
            events: Vec::new(),
            last_hud: None,
            now_ms: 0.0,
        }
    }

    /// Attach a display; it immediately receives the current HUD
    pub fn set_display(&mut self, display: Box<dyn DisplaySink>) {
        self.display = display;
        self.last_hud = None;
        self.flush();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for debug hooks (`set_score` and friends).
    /// Changes reach the display on the next command or frame.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn hud(&self) -> Hud {
        self.state.hud()
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Change the playfield size. Returns false (and changes nothing) if
    /// either side is not a positive finite number.
    pub fn set_playfield(&mut self, extent: Vec2) -> bool {
        if !(extent.is_finite() && extent.x > 0.0 && extent.y > 0.0) {
            log::warn!("Ignoring invalid playfield {}x{}", extent.x, extent.y);
            return false;
        }
        self.settings.playfield_width = extent.x;
        self.settings.playfield_height = extent.y;
        self.state.extent = extent;
        log::info!("Playfield set to {}x{}", extent.x, extent.y);
        true
    }

    /// Switch quality preset (particle cap) and persist it
    pub fn set_quality(&mut self, quality: QualityPreset) {
        self.settings.quality = quality;
        self.state.max_particles = self.settings.max_particles();
        if let Err(error) = self.settings.save(&mut self.store) {
            log::warn!("Could not save settings: {}", error);
        }
        log::info!("Quality set to {}", quality.as_str());
    }

    // --- Lifecycle -------------------------------------------------------

    /// Start a round and prime the clock so the first frame measures from `timestamp`
    pub fn start(&mut self, timestamp: f64) {
        self.state.start();
        self.clock.start(timestamp);
        self.now_ms = timestamp;
        self.flush();
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
        self.flush();
    }

    pub fn end_game(&mut self) {
        self.state.end_game();
        self.flush();
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.flush();
    }

    pub fn play_again(&mut self, timestamp: f64) {
        self.state.reset();
        self.start(timestamp);
    }

    /// Flip the sound preference and persist it
    pub fn toggle_sound(&mut self) {
        self.state.toggle_sound();
        self.settings.sound_enabled = self.state.sound_enabled;
        if let Err(error) = self.settings.save(&mut self.store) {
            log::warn!("Could not save settings: {}", error);
        }
        self.flush();
    }

    // --- Ship commands ---------------------------------------------------

    pub fn thrust(&mut self) {
        self.state.thrust();
        self.flush();
    }

    pub fn rotate_left(&mut self) {
        self.state.rotate(-1);
        self.flush();
    }

    pub fn rotate_right(&mut self) {
        self.state.rotate(1);
        self.flush();
    }

    pub fn fire(&mut self) {
        self.state.fire();
        self.flush();
    }

    // --- Frame loop ------------------------------------------------------

    /// Advance one animation frame.
    ///
    /// Returns the frame to draw if the world advanced; `None` while idle,
    /// paused or over, in which case the host leaves its last picture up.
    pub fn frame(&mut self, timestamp: f64, input: &TickInput) -> Option<RenderFrame> {
        let delta_ms = self.clock.advance(timestamp);
        self.now_ms = timestamp;

        let advanced = tick(&mut self.state, input, delta_ms);
        let frame = advanced.then(|| RenderFrame::capture(&self.state, timestamp));
        if advanced {
            self.state.clear_transient_flags();
        }
        self.flush();
        frame
    }

    /// Snapshot of the current world, regardless of phase
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame::capture(&self.state, self.now_ms)
    }

    /// Persist records, collect events and notify the display of changes
    fn flush(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::HighScore { score } = event {
                if self.high_score.record(score) {
                    if let Err(error) = self.high_score.save(&mut self.store) {
                        log::warn!("Could not save high score: {}", error);
                    }
                }
            }
            self.events.push(event);
        }
        if self.events.len() > MAX_PENDING_EVENTS {
            let excess = self.events.len() - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
        }

        let hud = self.state.hud();
        if self.last_hud != Some(hud) {
            self.display.hud_changed(&hud);
            self.last_hud = Some(hud);
        }
        if self.state.phase != self.last_phase {
            self.display.phase_changed(self.state.phase, &hud);
            self.last_phase = self.state.phase;
        }
    }
}
