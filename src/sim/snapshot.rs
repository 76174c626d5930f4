//! Read-only view of a run for renderers and HUDs

use serde::Serialize;

use super::checkpoint::Checkpoint;
use super::state::{GameEvent, RunPhase, RunState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub grounded: bool,
    pub dash_ready: bool,
    pub dashing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Holds at least one live checkpoint
    pub anchored: bool,
}

/// Everything a frame needs to draw; serialises to JSON for JS hosts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: RunPhase,
    pub paused: bool,
    pub player: PlayerView,
    pub platforms: Vec<PlatformView>,
    pub checkpoints: Vec<Checkpoint>,
    pub distance: u32,
    pub best: u32,
    pub speed: f32,
    pub camera_x: f32,
    pub next_checkpoint: u32,
    pub elapsed: f32,
    /// Remaining fraction of the "checkpoint banked" toast
    pub toast_ratio: f32,
    /// Remaining fraction of a pending respawn, 0 when none
    pub respawn_ratio: f32,
    pub flash_ratio: f32,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn capture(state: &RunState) -> Self {
        let player = &state.player;
        let config = &state.config;
        Self {
            phase: state.phase,
            paused: state.paused,
            player: PlayerView {
                x: player.pos.x,
                y: player.pos.y,
                width: player.width,
                height: player.height,
                vx: player.vx,
                vy: player.vy,
                grounded: player.grounded,
                dash_ready: player.dash_ready,
                dashing: player.is_dashing(),
            },
            platforms: state
                .world
                .platforms
                .iter()
                .map(|p| PlatformView {
                    id: p.id,
                    x: p.rect.x,
                    y: p.rect.y,
                    width: p.rect.width,
                    height: p.rect.height,
                    anchored: p.is_referenced(),
                })
                .collect(),
            checkpoints: state.ledger.checkpoints().to_vec(),
            distance: state.distance,
            best: state.best,
            speed: state.speed(),
            camera_x: state.camera_x,
            next_checkpoint: state.ledger.next_distance(),
            elapsed: state.elapsed,
            toast_ratio: state.ledger.toast().ratio(config.toast_duration),
            respawn_ratio: state
                .ledger
                .pending()
                .map_or(0.0, |p| p.timer.ratio(config.respawn_delay)),
            flash_ratio: state.respawn_flash.ratio(super::state::RESPAWN_FLASH),
            events: state.events.clone(),
        }
    }

    /// JSON for the host, `{}` if serialisation fails
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::warn!("Snapshot serialisation failed: {e}");
            "{}".to_string()
        })
    }
}

impl RunState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}
