//! Checkpoint ledger: banking on forward progress, LIFO respawn
//!
//! Each live checkpoint holds one reference on its platform so the world
//! generator keeps that platform alive until the checkpoint is consumed.

use serde::{Deserialize, Serialize};

use super::timer::Countdown;
use super::world::{Platform, World};

/// A banked respawn point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: u32,
    pub platform_id: u32,
    /// Platform centre
    pub x: f32,
    /// Platform top
    pub y: f32,
    /// Distance at which it was banked
    pub distance: u32,
}

/// In-flight delayed respawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingRespawn {
    pub target: Checkpoint,
    pub timer: Countdown,
}

/// Result of a fall-death respawn attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RespawnAttempt {
    /// A respawn is already counting down; nothing changed
    AlreadyPending,
    /// Checkpoint consumed, countdown started
    Armed(Checkpoint),
    /// Checkpoint consumed, caller should respawn now
    Immediate(Checkpoint),
    /// No checkpoint left; the run is over
    Exhausted,
}

impl RespawnAttempt {
    /// Whether the fall was absorbed by the ledger
    pub fn is_handled(&self) -> bool {
        !matches!(self, RespawnAttempt::Exhausted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointLedger {
    checkpoints: Vec<Checkpoint>,
    interval: u32,
    next_distance: u32,
    next_id: u32,
    pending: Option<PendingRespawn>,
    /// "Checkpoint banked" notification
    toast: Countdown,
}

impl CheckpointLedger {
    pub fn new(interval: u32) -> Self {
        Self {
            checkpoints: Vec::new(),
            interval,
            next_distance: interval,
            next_id: 1,
            pending: None,
            toast: Countdown::default(),
        }
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn next_distance(&self) -> u32 {
        self.next_distance
    }

    pub fn pending(&self) -> Option<&PendingRespawn> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn toast(&self) -> &Countdown {
        &self.toast
    }

    /// Bank a checkpoint on `ground` if `distance` reached the next threshold.
    /// At most one checkpoint per call.
    pub fn maybe_place(
        &mut self,
        distance: u32,
        ground: &mut Platform,
        toast_duration: f32,
    ) -> Option<Checkpoint> {
        if distance < self.next_distance {
            return None;
        }
        let checkpoint = Checkpoint {
            id: self.next_id,
            platform_id: ground.id,
            x: ground.center_x(),
            y: ground.top(),
            distance,
        };
        self.next_id += 1;
        ground.checkpoint_refs += 1;
        self.checkpoints.push(checkpoint);
        self.next_distance = self.next_distance.saturating_add(self.interval);
        self.toast.arm(toast_duration);
        log::debug!(
            "Checkpoint {} banked at distance {} on platform {}",
            checkpoint.id,
            distance,
            ground.id
        );
        Some(checkpoint)
    }

    /// Consume the most recent checkpoint after a fall.
    ///
    /// Idempotent while a respawn is pending. With `delay <= 0` the target
    /// is returned for immediate use instead of arming a countdown.
    pub fn try_respawn(&mut self, world: &mut World, delay: f32) -> RespawnAttempt {
        if self.pending.is_some() {
            return RespawnAttempt::AlreadyPending;
        }
        let Some(target) = self.checkpoints.pop() else {
            return RespawnAttempt::Exhausted;
        };
        match world.get_mut(target.platform_id) {
            Some(platform) => platform.checkpoint_refs = platform.checkpoint_refs.saturating_sub(1),
            None => log::warn!(
                "Checkpoint {} references missing platform {}",
                target.id,
                target.platform_id
            ),
        }

        if delay > 0.0 {
            self.pending = Some(PendingRespawn {
                target,
                timer: Countdown::new(delay),
            });
            RespawnAttempt::Armed(target)
        } else {
            RespawnAttempt::Immediate(target)
        }
    }

    /// Advance the pending countdown; yields the target once it expires
    pub fn tick_pending(&mut self, dt: f32) -> Option<Checkpoint> {
        let pending = self.pending.as_mut()?;
        if pending.timer.tick(dt) {
            let target = pending.target;
            self.pending = None;
            Some(target)
        } else {
            None
        }
    }

    /// Decay cosmetic timers (runs even while gameplay is frozen)
    pub fn tick_toast(&mut self, dt: f32) {
        self.toast.tick(dt);
    }
}
