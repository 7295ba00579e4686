//! Browser host bindings
//!
//! `WebGame` is what the page script talks to: it forwards key events,
//! drives the frame loop from `requestAnimationFrame` timestamps, and hands
//! back render frames as JSON. High score and settings live in localStorage.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::autopilot::Autopilot;
use crate::persistence::LocalStore;
use crate::platform::{DisplaySink, InputState};
use crate::session::Session;
use crate::sim::{GamePhase, Hud};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    // Already-initialized is the only failure
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Asteroid Belt starting...");
}

/// Forwards HUD updates to a page callback as `(hudJson, phase)`
struct JsDisplay {
    callback: js_sys::Function,
    phase: GamePhase,
}

impl JsDisplay {
    fn notify(&self, hud: &Hud) {
        let json = match serde_json::to_string(hud) {
            Ok(json) => json,
            Err(error) => {
                log::warn!("Could not encode HUD: {}", error);
                return;
            }
        };
        let phase = format!("{:?}", self.phase);
        if let Err(error) = self.callback.call2(
            &JsValue::NULL,
            &JsValue::from_str(&json),
            &JsValue::from_str(&phase),
        ) {
            log::warn!("Display callback failed: {:?}", error);
        }
    }
}

impl DisplaySink for JsDisplay {
    fn hud_changed(&mut self, hud: &Hud) {
        self.notify(hud);
    }

    fn phase_changed(&mut self, phase: GamePhase, hud: &Hud) {
        self.phase = phase;
        self.notify(hud);
    }
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session<LocalStore>,
    input: InputState,
    autopilot: Option<Autopilot>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create an idle game on a `width` x `height` playfield
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let mut session = Session::new(LocalStore::new());
        session.set_playfield(Vec2::new(width, height));
        WebGame {
            session,
            input: InputState::new(),
            autopilot: None,
        }
    }

    /// Register `callback(hudJson, phase)`
    pub fn set_display(&mut self, callback: js_sys::Function) {
        let phase = self.session.state().phase;
        self.session.set_display(Box::new(JsDisplay { callback, phase }));
    }

    pub fn start(&mut self, timestamp: f64) {
        self.input.clear();
        self.session.start(timestamp);
    }

    /// Advance one animation frame. Returns the render frame as JSON, or an
    /// empty string if nothing moved.
    pub fn frame(&mut self, timestamp: f64) -> String {
        let mut input = self.input.take_tick_input();
        if let Some(pilot) = self.autopilot.as_mut() {
            let pause = input.pause;
            input = pilot.steer(self.session.state());
            input.pause = pause;
        }

        let Some(frame) = self.session.frame(timestamp, &input) else {
            return String::new();
        };
        serde_json::to_string(&frame).unwrap_or_else(|error| {
            log::warn!("Could not encode frame: {}", error);
            String::new()
        })
    }

    /// Current world as JSON, in any phase (for redraws after resize)
    pub fn render_frame(&self) -> String {
        serde_json::to_string(&self.session.render_frame()).unwrap_or_default()
    }

    /// Returns true if the key is bound (so the page can `preventDefault`)
    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    /// Window lost focus: release held keys and pause
    pub fn blur(&mut self) {
        self.input.clear();
        if self.session.state().phase == GamePhase::Running {
            self.session.toggle_pause();
            log::info!("Auto-paused (window blur)");
        }
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn end_game(&mut self) {
        self.session.end_game();
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.session.reset();
    }

    pub fn play_again(&mut self, timestamp: f64) {
        self.input.clear();
        self.session.play_again(timestamp);
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.session.toggle_sound();
        self.session.state().sound_enabled
    }

    /// Let the demo pilot fly (attract mode)
    pub fn set_demo(&mut self, enabled: bool) {
        self.autopilot = enabled.then(Autopilot::new);
        log::info!("Demo mode: {}", enabled);
    }

    pub fn hud(&self) -> String {
        serde_json::to_string(&self.session.hud()).unwrap_or_default()
    }

    /// Pending game events as a JSON array
    pub fn drain_events(&mut self) -> String {
        serde_json::to_string(&self.session.drain_events()).unwrap_or_default()
    }

    // Debug hooks

    pub fn set_score(&mut self, score: f64) {
        let score = if score.is_finite() && score > 0.0 {
            score as u64
        } else {
            0
        };
        self.session.state_mut().set_score(score);
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.session.state_mut().set_lives(lives);
    }

    pub fn set_level(&mut self, level: u32) {
        self.session.state_mut().set_level(level);
    }
}
