//! High score tracking
//!
//! A single best score, persisted as a plain integer string under a fixed
//! key. Reads are tolerant: a missing, negative or non-numeric value is
//! treated as zero.

use crate::persistence::{KeyValueStore, StoreError};

/// Best score seen across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "highScore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Raise the best score if `score` beats it. Returns true if it did.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Parse a stored value, falling back to zero for anything unusable
    pub fn parse(raw: &str) -> u64 {
        let raw = raw.trim();
        if let Ok(value) = raw.parse::<u64>() {
            return value;
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value.floor() as u64,
            _ => 0,
        }
    }

    /// Load from storage; storage failures are logged and yield zero
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => {
                let best = Self::parse(&raw);
                log::info!("Loaded high score {}", best);
                Self::new(best)
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(error) => {
                log::warn!("Could not read high score: {}", error);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set(Self::STORAGE_KEY, &self.best.to_string())?;
        log::debug!("High score saved ({})", self.best);
        Ok(())
    }
}
