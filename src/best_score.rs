//! Single persisted best score per game
//!
//! Stored as a plain decimal integer. Unreadable, negative or non-numeric
//! values load as 0; storage failures are logged and otherwise ignored.

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreStore;

/// Best score for one game, bound to its storage key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    key: String,
    value: u32,
}

impl BestScore {
    pub fn new(key: impl Into<String>, value: u32) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Read the persisted value, falling back to 0
    pub fn load<S: ScoreStore + ?Sized>(store: &S, key: &str) -> Self {
        let value = match store.read(key) {
            Ok(raw) => parse_best(raw.as_deref()),
            Err(e) => {
                log::warn!("Failed to read best score ({key}): {e}");
                0
            }
        };
        log::info!("Best score for {key}: {value}");
        Self::new(key, value)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Whether `score` would replace the current best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.value
    }

    /// Record `score` if it beats the best, writing through to `store`.
    /// Returns true when the best changed (even if the write failed).
    pub fn submit<S: ScoreStore + ?Sized>(&mut self, score: u32, store: &mut S) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.value = score;
        self.save(store);
        true
    }

    /// Write the current value
    pub fn save<S: ScoreStore + ?Sized>(&self, store: &mut S) {
        match store.write(&self.key, &self.value.to_string()) {
            Ok(()) => log::info!("Best score saved ({} = {})", self.key, self.value),
            Err(e) => log::warn!("Failed to save best score ({}): {e}", self.key),
        }
    }
}

/// Parse a stored best: finite and positive numbers floor to an integer,
/// anything else is 0
pub fn parse_best(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.floor().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}
