//! Read-only view of an expedition frame

use glam::Vec2;
use serde::Serialize;

use super::sentry::SentryMode;
use super::state::{ExpeditionEvent, ExpeditionPhase, ExpeditionState, ThreatLevel};
use crate::sim::Rect;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutView {
    pub pos: Vec2,
    pub radius: f32,
    pub heading: f32,
    pub stamina: f32,
    pub hearts: u8,
    pub invulnerable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentryView {
    pub pos: Vec2,
    pub radius: f32,
    pub vision: f32,
    pub mode: SentryMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactView {
    pub pos: Vec2,
    pub radius: f32,
    pub wobble: f32,
    pub collected: bool,
    /// Pickup ring, 1 right after collection
    pub flash: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpeditionSnapshot {
    pub phase: ExpeditionPhase,
    pub paused: bool,
    pub score: u32,
    pub goal: u32,
    pub best: u32,
    pub max_hearts: u8,
    pub scout: ScoutView,
    pub sentries: Vec<SentryView>,
    pub artifacts: Vec<ArtifactView>,
    pub ruins: Vec<Rect>,
    pub extraction_point: Vec2,
    pub extraction_radius: f32,
    pub extraction_active: bool,
    /// 0..1, 1 when the pulse is ready
    pub pulse_charge: f32,
    /// Expanding ring, 1 right after firing
    pub pulse_wave: f32,
    pub threat: ThreatLevel,
    pub events: Vec<ExpeditionEvent>,
}

impl ExpeditionSnapshot {
    pub fn capture(state: &ExpeditionState) -> Self {
        let config = &state.config;
        Self {
            phase: state.phase,
            paused: state.paused,
            score: state.score,
            goal: config.artifact_goal,
            best: state.best,
            max_hearts: config.max_hearts,
            scout: ScoutView {
                pos: state.scout.pos,
                radius: state.scout.radius,
                heading: state.scout.heading,
                stamina: state.scout.stamina,
                hearts: state.scout.hearts,
                invulnerable: state.scout.invulnerable.is_active(),
            },
            sentries: state
                .sentries
                .iter()
                .map(|s| SentryView {
                    pos: s.pos,
                    radius: s.radius,
                    vision: s.vision,
                    mode: s.mode,
                })
                .collect(),
            artifacts: state
                .artifacts
                .iter()
                .map(|a| ArtifactView {
                    pos: a.pos,
                    radius: a.radius,
                    wobble: a.wobble,
                    collected: a.collected,
                    flash: a.flash.ratio(super::state::COLLECT_FLASH),
                })
                .collect(),
            ruins: state.ruins.clone(),
            extraction_point: state.extraction_point,
            extraction_radius: config.extraction_radius,
            extraction_active: state.extraction_active,
            pulse_charge: state.pulse_charge(),
            pulse_wave: state.pulse.wave.ratio(config.pulse_duration),
            threat: state.threat(),
            events: state.events.clone(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::warn!("Expedition snapshot serialisation failed: {e}");
            "{}".to_string()
        })
    }
}

impl ExpeditionState {
    pub fn snapshot(&self) -> ExpeditionSnapshot {
        ExpeditionSnapshot::capture(self)
    }
}
