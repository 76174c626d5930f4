//! Expedition run state: scout, shards, sentries, pulse, extraction
//!
//! Phases are `Idle -> Playing -> Won | Over`; a new run can start from any
//! phase and always rebuilds the world.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{RUINS, SENTRY_ROUTES, play_bounds, spawn_point};
use super::sentry::Sentry;
use crate::config::ExpeditionConfig;
use crate::sim::{Countdown, Rect, circle_rect_intersect};

/// Placement attempts before giving up on the remaining shards
pub const ARTIFACT_ATTEMPTS: u32 = 600;
/// Placement attempts for the extraction point before falling back to the centre
pub const EXTRACTION_ATTEMPTS: u32 = 400;
/// Clearance kept between a shard and any ruin
const ARTIFACT_CLEARANCE: f32 = 6.0;
/// Clearance kept between the extraction zone and any ruin
const EXTRACTION_CLEARANCE: f32 = 18.0;
/// Ring shown after a shard is picked up (cosmetic)
pub const COLLECT_FLASH: f32 = 0.4;
/// Shard bob speed (radians per second, cosmetic)
const WOBBLE_RATE: f32 = 2.4;
/// Sprinting needs more stamina than this
pub const SPRINT_THRESHOLD: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpeditionPhase {
    Idle,
    Playing,
    Won,
    Over,
}

/// Readout derived from how many sentries are chasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatLevel {
    Calm,
    Tracking,
    Hunted,
    Critical,
}

impl ThreatLevel {
    pub fn from_chasing(chasing: usize) -> Self {
        match chasing {
            0 => ThreatLevel::Calm,
            1 => ThreatLevel::Tracking,
            2 => ThreatLevel::Hunted,
            _ => ThreatLevel::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThreatLevel::Calm => "Calm",
            ThreatLevel::Tracking => "Tracking",
            ThreatLevel::Hunted => "Hunted",
            ThreatLevel::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExpeditionEvent {
    RunStarted,
    PulseFired,
    ArtifactCollected { index: usize },
    ExtractionOpened,
    PlayerHit { hearts_left: u8 },
    Won,
    Lost,
    NewBest(u32),
}

/// The player's scout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scout {
    pub pos: Vec2,
    pub radius: f32,
    /// Facing in radians, kept from the last movement
    pub heading: f32,
    /// 0..1
    pub stamina: f32,
    pub hearts: u8,
    pub invulnerable: Countdown,
}

impl Scout {
    fn new(config: &ExpeditionConfig) -> Self {
        Self {
            pos: spawn_point(config),
            radius: config.player_radius,
            heading: -FRAC_PI_2,
            stamina: 1.0,
            hearts: config.max_hearts,
            invulnerable: Countdown::default(),
        }
    }
}

/// A collectible skyshard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub pos: Vec2,
    pub radius: f32,
    pub wobble: f32,
    pub flash: Countdown,
    pub collected: bool,
}

/// Pulse ability timers
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pulse {
    pub cooldown: Countdown,
    /// Sentries are slowed while this runs
    pub remaining: Countdown,
    /// Expanding ring (cosmetic)
    pub wave: Countdown,
}

#[derive(Debug, Clone)]
pub struct ExpeditionState {
    pub config: ExpeditionConfig,
    rng: Pcg32,
    pub phase: ExpeditionPhase,
    pub paused: bool,
    /// Shards collected this run
    pub score: u32,
    pub best: u32,
    pub scout: Scout,
    pub sentries: Vec<Sentry>,
    pub artifacts: Vec<Artifact>,
    pub ruins: Vec<Rect>,
    pub pulse: Pulse,
    pub extraction_point: Vec2,
    pub extraction_active: bool,
    /// Sentries chasing after the latest tick
    pub chasing: usize,
    pub events: Vec<ExpeditionEvent>,
}

impl ExpeditionState {
    pub fn new(config: ExpeditionConfig, seed: u64, best: u32) -> Self {
        let mut state = Self {
            scout: Scout::new(&config),
            config,
            rng: Pcg32::seed_from_u64(seed),
            phase: ExpeditionPhase::Idle,
            paused: false,
            score: 0,
            best,
            sentries: Vec::new(),
            artifacts: Vec::new(),
            ruins: RUINS.to_vec(),
            pulse: Pulse::default(),
            extraction_point: Vec2::ZERO,
            extraction_active: false,
            chasing: 0,
            events: Vec::new(),
        };
        state.reset_world();
        state
    }

    /// Fresh scout, sentries, shards and extraction point
    pub fn reset_world(&mut self) {
        self.scout = Scout::new(&self.config);
        self.extraction_active = false;
        self.extraction_point = self.select_extraction_point();
        self.sentries = SENTRY_ROUTES
            .iter()
            .map(|route| Sentry::from_route(route, &self.config))
            .collect();
        self.artifacts.clear();
        self.spawn_artifacts(self.config.artifact_goal as usize);
        self.score = 0;
        self.chasing = 0;
        self.pulse = Pulse::default();
    }

    pub fn start_run(&mut self) {
        self.reset_world();
        self.phase = ExpeditionPhase::Playing;
        self.paused = false;
        self.events.push(ExpeditionEvent::RunStarted);
        log::info!(
            "Expedition started: {} shards placed, extraction at ({:.0}, {:.0})",
            self.artifacts.len(),
            self.extraction_point.x,
            self.extraction_point.y
        );
    }

    pub fn reset_to_idle(&mut self) {
        self.reset_world();
        self.phase = ExpeditionPhase::Idle;
        self.paused = false;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == ExpeditionPhase::Playing
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.is_playing() {
            self.paused = paused;
        }
    }

    pub fn toggle_pause(&mut self) {
        let paused = !self.paused;
        self.set_paused(paused);
    }

    /// Fire the pulse if it is ready. Returns true when it fired.
    pub fn trigger_pulse(&mut self) -> bool {
        if !self.is_playing() || self.paused || self.pulse.cooldown.is_active() {
            return false;
        }
        self.pulse.cooldown.arm(self.config.pulse_cooldown);
        self.pulse.remaining.arm(self.config.pulse_duration);
        self.pulse.wave.arm(self.config.pulse_duration);
        self.events.push(ExpeditionEvent::PulseFired);
        true
    }

    pub fn threat(&self) -> ThreatLevel {
        ThreatLevel::from_chasing(self.chasing)
    }

    pub fn remaining_artifacts(&self) -> u32 {
        self.config.artifact_goal.saturating_sub(self.score)
    }

    /// Pulse charge in 0..1, 1 meaning ready
    pub fn pulse_charge(&self) -> f32 {
        1.0 - self.pulse.cooldown.ratio(self.config.pulse_cooldown)
    }

    pub fn collect_artifact(&mut self, index: usize) {
        let Some(artifact) = self.artifacts.get_mut(index) else {
            return;
        };
        if artifact.collected {
            return;
        }
        artifact.collected = true;
        artifact.flash.arm(COLLECT_FLASH);
        self.score += 1;
        self.events.push(ExpeditionEvent::ArtifactCollected { index });
        if self.score > self.best {
            self.best = self.score;
            self.events.push(ExpeditionEvent::NewBest(self.best));
        }
    }

    /// Apply a sentry hit unless the scout is invulnerable
    pub fn hit_scout(&mut self) {
        if self.scout.invulnerable.is_active() {
            return;
        }
        self.scout.hearts = self.scout.hearts.saturating_sub(1);
        self.scout.invulnerable.arm(self.config.hit_invulnerability);
        self.scout.pos = spawn_point(&self.config);
        self.scout.stamina = 1.0;
        self.events.push(ExpeditionEvent::PlayerHit {
            hearts_left: self.scout.hearts,
        });
        if self.scout.hearts == 0 {
            self.end_run();
        }
    }

    pub fn win_run(&mut self) {
        self.phase = ExpeditionPhase::Won;
        self.paused = false;
        self.extraction_active = false;
        self.events.push(ExpeditionEvent::Won);
        log::info!("Extraction complete with {} shards", self.score);
    }

    pub fn end_run(&mut self) {
        self.phase = ExpeditionPhase::Over;
        self.paused = false;
        self.extraction_active = false;
        self.events.push(ExpeditionEvent::Lost);
        log::info!("Sentries overwhelmed the scout ({} shards)", self.score);
    }

    fn spawn_artifacts(&mut self, target: usize) {
        let bounds = play_bounds(&self.config);
        let mut attempts = 0;
        while self.artifacts.len() < target && attempts < ARTIFACT_ATTEMPTS {
            attempts += 1;
            let pos = Vec2::new(
                sample(&mut self.rng, bounds.x, bounds.right()),
                sample(&mut self.rng, bounds.y, bounds.bottom()),
            );
            let radius = sample(
                &mut self.rng,
                self.config.artifact_radius.min,
                self.config.artifact_radius.max,
            );
            let wobble = sample(&mut self.rng, 0.0, TAU);
            let blocked = self
                .ruins
                .iter()
                .any(|ruin| circle_rect_intersect(pos, radius + ARTIFACT_CLEARANCE, ruin));
            if !blocked {
                self.artifacts.push(Artifact {
                    pos,
                    radius,
                    wobble,
                    flash: Countdown::default(),
                    collected: false,
                });
            }
        }
        if self.artifacts.len() < target {
            log::warn!(
                "Placed only {} of {target} shards after {attempts} attempts",
                self.artifacts.len()
            );
        }
    }

    fn select_extraction_point(&mut self) -> Vec2 {
        let pad = self.config.world_padding + self.config.extraction_radius + 10.0;
        let clearance = self.config.extraction_radius + EXTRACTION_CLEARANCE;
        for _ in 0..EXTRACTION_ATTEMPTS {
            let candidate = Vec2::new(
                sample(&mut self.rng, pad, self.config.arena_width - pad),
                sample(&mut self.rng, pad, self.config.arena_height - pad),
            );
            let blocked = self
                .ruins
                .iter()
                .any(|ruin| circle_rect_intersect(candidate, clearance, ruin));
            if !blocked {
                return candidate;
            }
        }
        log::warn!("No clear extraction point found, using arena centre");
        Vec2::new(self.config.arena_width / 2.0, self.config.arena_height / 2.0)
    }

    /// Advance shard cosmetics
    pub(super) fn animate_artifacts(&mut self, dt: f32) {
        for artifact in &mut self.artifacts {
            artifact.wobble += dt * WOBBLE_RATE;
            artifact.flash.tick(dt);
        }
    }
}

fn sample(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
