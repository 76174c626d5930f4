//! Starwatch expedition: top-down stealth collector
//!
//! The scout sneaks through a fixed ruin field collecting skyshards while
//! sentries patrol. Collect every shard, then reach the extraction flare.
//! Shares geometry, timers and the frame/input layer with the runner.

pub mod layout;
pub mod sentry;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use layout::{RUINS, SENTRY_ROUTES, SentryRoute, play_bounds, spawn_point};
pub use sentry::{Sentry, SentryMode};
pub use snapshot::ExpeditionSnapshot;
pub use state::{
    Artifact, ExpeditionEvent, ExpeditionPhase, ExpeditionState, Pulse, Scout, ThreatLevel,
};
pub use tick::{ExpeditionInput, tick};
