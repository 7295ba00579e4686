//! Platform abstraction layer
//!
//! Host-side helpers that sit between a concrete UI toolkit and the core:
//! - Input: raw key events to edge-triggered tick commands
//! - Display: HUD and screen notifications pushed out of the core

pub mod input;
pub mod sink;

pub use input::InputState;
pub use sink::{DisplaySink, NullDisplay};
