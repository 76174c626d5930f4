//! Deterministic runner simulation
//!
//! All gameplay logic for the dash/checkpoint runner lives here:
//! - Seeded RNG only; a run is reproducible from its seed
//! - Clamped per-frame dt, no accumulator
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod body;
pub mod checkpoint;
pub mod geom;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timer;
pub mod world;

pub use body::{Player, StepOutcome, find_landing};
pub use checkpoint::{Checkpoint, CheckpointLedger, PendingRespawn, RespawnAttempt};
pub use geom::{Rect, circle_rect_intersect, move_circle};
pub use snapshot::{PlatformView, PlayerView, Snapshot};
pub use state::{GameEvent, RESPAWN_FLASH, RunPhase, RunState};
pub use tick::{TickInput, tick};
pub use timer::Countdown;
pub use world::{Platform, World};
