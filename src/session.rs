//! Session controllers
//!
//! A session owns one game's state together with its frame clock, input
//! state and best-score storage. Hosts forward raw events and call `frame`
//! once per animation frame; the returned snapshot is all a renderer needs.

use crate::best_score::BestScore;
use crate::config::{ExpeditionConfig, RunnerConfig};
use crate::consts::{EXPEDITION_BEST_KEY, RUNNER_BEST_KEY};
use crate::expedition::{self, ExpeditionEvent, ExpeditionSnapshot, ExpeditionState};
use crate::persistence::ScoreStore;
use crate::platform::{FrameClock, InputState};
use crate::sim::{self, GameEvent, RunState, Snapshot};

/// Dash/checkpoint runner session
pub struct Session<S: ScoreStore> {
    state: RunState,
    input: InputState,
    clock: FrameClock,
    best: BestScore,
    store: S,
    autopilot: bool,
}

impl<S: ScoreStore> Session<S> {
    /// Load the persisted best from `store` and build an idle run
    pub fn new(config: RunnerConfig, seed: u64, store: S) -> Self {
        let best = BestScore::load(&store, RUNNER_BEST_KEY);
        let input = InputState::new(config.double_tap_window);
        let clock = FrameClock::new(config.max_frame_dt);
        Self {
            state: RunState::new(config, seed, best.value()),
            input,
            clock,
            best,
            store,
            autopilot: false,
        }
    }

    /// Let the simulation play itself
    pub fn with_autopilot(mut self, autopilot: bool) -> Self {
        self.autopilot = autopilot;
        self
    }

    /// Advance to host timestamp `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64) -> Snapshot {
        let dt = self.clock.advance(timestamp_ms);
        self.step(dt)
    }

    /// Advance by an explicit `dt` (seconds)
    pub fn step(&mut self, dt: f32) -> Snapshot {
        let input = self.input.take_runner(self.autopilot);
        sim::tick(&mut self.state, &input, dt);
        self.persist_best();
        self.state.snapshot()
    }

    fn persist_best(&mut self) {
        for event in &self.state.events {
            if let GameEvent::NewBest(distance) = *event {
                self.best.submit(distance, &mut self.store);
            }
        }
    }

    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        self.input.key_down(code, repeat)
    }

    pub fn key_up(&mut self, code: &str) {
        self.input.key_up(code);
    }

    pub fn pointer_down(&mut self, timestamp_ms: f64) {
        self.input.pointer_down(timestamp_ms);
    }

    /// Focus lost: force a pause and drop the stale timestamp
    pub fn blur(&mut self) {
        self.input.blur();
        self.clock.reset();
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }

    pub fn best(&self) -> u32 {
        self.best.value()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Stealth collector session
pub struct ExpeditionSession<S: ScoreStore> {
    state: ExpeditionState,
    input: InputState,
    clock: FrameClock,
    best: BestScore,
    store: S,
}

impl<S: ScoreStore> ExpeditionSession<S> {
    pub fn new(config: ExpeditionConfig, seed: u64, store: S) -> Self {
        let best = BestScore::load(&store, EXPEDITION_BEST_KEY);
        let clock = FrameClock::new(config.max_frame_dt);
        Self {
            state: ExpeditionState::new(config, seed, best.value()),
            input: InputState::default(),
            clock,
            best,
            store,
        }
    }

    pub fn frame(&mut self, timestamp_ms: f64) -> ExpeditionSnapshot {
        let dt = self.clock.advance(timestamp_ms);
        self.step(dt)
    }

    pub fn step(&mut self, dt: f32) -> ExpeditionSnapshot {
        let input = self.input.take_expedition();
        expedition::tick(&mut self.state, &input, dt);
        for event in &self.state.events {
            if let ExpeditionEvent::NewBest(score) = *event {
                self.best.submit(score, &mut self.store);
            }
        }
        self.state.snapshot()
    }

    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        self.input.key_down(code, repeat)
    }

    pub fn key_up(&mut self, code: &str) {
        self.input.key_up(code);
    }

    pub fn pointer_down(&mut self, timestamp_ms: f64) {
        self.input.pointer_down(timestamp_ms);
    }

    pub fn blur(&mut self) {
        self.input.blur();
        self.clock.reset();
    }

    pub fn state(&self) -> &ExpeditionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ExpeditionState {
        &mut self.state
    }

    pub fn best(&self) -> u32 {
        self.best.value()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
