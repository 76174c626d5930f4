//! Run state and lifecycle
//!
//! Everything a run needs lives in [`RunState`]; there is no global state.
//! The phase machine is `Idle -> Running -> Over`, and leaving `Over`
//! always goes through a full reset.

use serde::{Deserialize, Serialize};

use super::body::Player;
use super::checkpoint::{Checkpoint, CheckpointLedger, RespawnAttempt};
use super::timer::Countdown;
use super::world::World;
use crate::config::RunnerConfig;

/// Length of the post-respawn flash (cosmetic)
pub const RESPAWN_FLASH: f32 = 0.4;

/// Run lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for the first start
    Idle,
    /// Active gameplay (may be paused)
    Running,
    /// Run ended; a reset is required to play again
    Over,
}

/// Transient markers for the renderer and the session, cleared every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    Jumped,
    Dashed,
    Landed { platform: u32 },
    CheckpointBanked { id: u32, distance: u32 },
    RespawnArmed { checkpoint: u32 },
    Respawned { checkpoint: u32 },
    RunEnded { distance: u32 },
    NewBest(u32),
}

/// Complete state of one runner session
#[derive(Debug, Clone)]
pub struct RunState {
    pub config: RunnerConfig,
    /// Base seed; each run derives its own generator seed from it
    pub seed: u64,
    pub runs_started: u32,
    pub phase: RunPhase,
    pub paused: bool,
    pub player: Player,
    pub world: World,
    pub ledger: CheckpointLedger,
    pub camera_x: f32,
    pub distance: u32,
    /// Furthest distance reached this run, kept across respawns
    pub max_distance: u32,
    pub best: u32,
    /// Unpaused running time in seconds
    pub elapsed: f32,
    pub time_ticks: u64,
    /// Events emitted by the latest tick
    pub events: Vec<GameEvent>,
    pub respawn_flash: Countdown,
}

impl RunState {
    /// Idle state with the start slab laid out, ready to render
    pub fn new(config: RunnerConfig, seed: u64, best: u32) -> Self {
        let world = World::new(&config, seed);
        let player = spawn_on_start_slab(&config, &world);
        let ledger = CheckpointLedger::new(config.checkpoint_interval);
        let mut state = Self {
            config,
            seed,
            runs_started: 0,
            phase: RunPhase::Idle,
            paused: false,
            player,
            world,
            ledger,
            camera_x: 0.0,
            distance: 0,
            max_distance: 0,
            best,
            elapsed: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            respawn_flash: Countdown::default(),
        };
        state.recompute_progress();
        state.world.populate(&state.config, state.player.pos.x, 0);
        state
    }

    /// Reinitialise everything and enter `Running`
    pub fn start_run(&mut self) {
        self.runs_started += 1;
        let run_seed = self.seed.wrapping_add(u64::from(self.runs_started));
        self.world = World::new(&self.config, run_seed);
        self.player = spawn_on_start_slab(&self.config, &self.world);
        self.ledger = CheckpointLedger::new(self.config.checkpoint_interval);
        self.phase = RunPhase::Running;
        self.paused = false;
        self.distance = 0;
        self.max_distance = 0;
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.respawn_flash.clear();
        self.recompute_progress();
        self.world.populate(&self.config, self.player.pos.x, self.distance);
        self.events.push(GameEvent::RunStarted);
        log::info!("Run {} started (seed {run_seed})", self.runs_started);
    }

    /// Alias kept for hosts that expose a separate reset action
    pub fn reset(&mut self) {
        self.start_run();
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Flip the paused flag; ignored outside `Running`
    pub fn toggle_pause(&mut self) {
        let paused = !self.paused;
        self.set_paused(paused);
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.phase != RunPhase::Running || self.paused == paused {
            return;
        }
        self.paused = paused;
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
    }

    /// Finish the run. Returns true when the best distance improved.
    pub fn end_run(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        self.phase = RunPhase::Over;
        self.paused = false;
        self.distance = self.distance.max(self.max_distance);
        self.events.push(GameEvent::RunEnded {
            distance: self.distance,
        });
        log::info!("Run ended at distance {}", self.distance);

        if self.distance > self.best {
            self.best = self.distance;
            self.events.push(GameEvent::NewBest(self.best));
            log::info!("New best distance: {}", self.best);
            true
        } else {
            false
        }
    }

    /// Derive camera and distance from the player position
    pub fn recompute_progress(&mut self) {
        self.camera_x = (self.player.pos.x - self.config.camera_lead).max(0.0);
        let travelled = (self.player.pos.x - self.config.start_x) / self.config.distance_scale;
        self.distance = if travelled > 0.0 {
            travelled.floor() as u32
        } else {
            0
        };
        self.max_distance = self.max_distance.max(self.distance);
    }

    /// Current run speed in px/s
    pub fn speed(&self) -> f32 {
        self.config.speed_at(self.distance)
    }

    /// Put the player back on `checkpoint` and rebuild the platform window
    pub fn apply_respawn(&mut self, checkpoint: Checkpoint) {
        let ground = self
            .world
            .get(checkpoint.platform_id)
            .map(|platform| platform.id);
        let x = checkpoint.x - self.config.player_width / 2.0;
        self.player = Player::spawn(&self.config, x, checkpoint.y, ground);
        self.respawn_flash.arm(RESPAWN_FLASH);
        self.recompute_progress();
        self.world.populate(&self.config, self.player.pos.x, self.distance);
        self.world.cull(&self.config, self.camera_x);
        self.events.push(GameEvent::Respawned {
            checkpoint: checkpoint.id,
        });
        log::info!(
            "Respawned at checkpoint {} (distance {})",
            checkpoint.id,
            checkpoint.distance
        );
    }

    /// React to falling past the death line: respawn, arm a respawn, or end the run
    pub fn handle_fall(&mut self) -> RespawnAttempt {
        let attempt = self
            .ledger
            .try_respawn(&mut self.world, self.config.respawn_delay);
        match attempt {
            RespawnAttempt::AlreadyPending => {}
            RespawnAttempt::Armed(checkpoint) => {
                self.events.push(GameEvent::RespawnArmed {
                    checkpoint: checkpoint.id,
                });
            }
            RespawnAttempt::Immediate(checkpoint) => self.apply_respawn(checkpoint),
            RespawnAttempt::Exhausted => {
                self.end_run();
            }
        }
        attempt
    }

    pub fn has_fallen(&self) -> bool {
        self.player.pos.y > self.config.death_y()
    }
}

fn spawn_on_start_slab(config: &RunnerConfig, world: &World) -> Player {
    let slab = world.platforms.first();
    let top = slab.map_or(config.start_platform_y, |p| p.top());
    Player::spawn(config, config.start_x, top, slab.map(|p| p.id))
}
