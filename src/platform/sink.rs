//! Display sink
//!
//! Receives HUD values and screen changes from the session. Fire-and-forget:
//! implementations never write back into simulation state.

use crate::sim::{GamePhase, Hud};

pub trait DisplaySink {
    /// Score, lives, level or high score changed
    fn hud_changed(&mut self, hud: &Hud);

    /// Phase changed (show/hide pause and game-over screens)
    fn phase_changed(&mut self, phase: GamePhase, hud: &Hud) {
        let _ = (phase, hud);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn hud_changed(&mut self, _hud: &Hud) {}
}
