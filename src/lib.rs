//! Blockstep - simulation core for single-screen browser arcade games
//!
//! Core modules:
//! - `sim`: Dash/checkpoint platform runner (body, world generator, checkpoint ledger, run state)
//! - `expedition`: Top-down stealth collector (sentries, shards, pulse, extraction)
//! - `platform`: Frame clock and input state fed by host events
//! - `persistence`: Best-score storage backends (memory, file, LocalStorage)
//! - `session`: Controller tying clock, input, simulation and storage together
//! - `config`: Data-driven tuning

pub mod best_score;
pub mod config;
pub mod error;
pub mod expedition;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;

pub use best_score::BestScore;
pub use config::{ExpeditionConfig, RunnerConfig, Span};
pub use error::{ConfigError, Error, Result, StorageError};
pub use session::{ExpeditionSession, Session};

/// Default tuning constants
pub mod consts {
    /// Upper bound on a single runner tick (seconds), ~30 Hz worst case
    pub const MAX_FRAME_DT: f32 = 0.033;
    /// Upper bound on a single expedition tick (seconds)
    pub const EXPEDITION_MAX_FRAME_DT: f32 = 0.04;

    /// Logical view size shared by both games
    pub const VIEW_WIDTH: f32 = 960.0;
    pub const VIEW_HEIGHT: f32 = 540.0;

    /// Runner player spawn x and body size
    pub const START_X: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 28.0;
    pub const PLAYER_HEIGHT: f32 = 36.0;

    /// Platform slab thickness (all platforms share it)
    pub const PLATFORM_HEIGHT: f32 = 24.0;

    /// World pixels per distance unit
    pub const DISTANCE_SCALE: f32 = 10.0;
    /// Distance units between banked checkpoints
    pub const CHECKPOINT_INTERVAL: u32 = 250;

    /// LocalStorage keys (one plain integer per game)
    pub const RUNNER_BEST_KEY: &str = "blockstepBest";
    pub const EXPEDITION_BEST_KEY: &str = "starwatchExpeditionBest";
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
