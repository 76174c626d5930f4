//! Per-frame simulation step
//!
//! `tick` is the single entry point the host calls once per animation frame.
//! Lifecycle commands and cosmetic timers are handled with the raw frame dt;
//! gameplay only advances while running and unpaused, with dt clamped.

use super::autopilot;
use super::state::{GameEvent, RunPhase, RunState};

/// Commands for a single tick, edge-triggered
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump press (Space / ArrowUp / KeyW)
    pub jump: bool,
    /// Dash press (Shift / KeyK / pointer double-tap)
    pub dash: bool,
    /// Pointer down: starts a run when not running, otherwise jumps
    pub tap: bool,
    /// Pause toggle
    pub pause: bool,
    /// Window blur: pauses, never unpauses
    pub force_pause: bool,
    /// Start a run from idle or game over
    pub start: bool,
    /// Full reset straight into a new run
    pub reset: bool,
    /// Demo mode - the simulation picks jump/dash itself
    pub autopilot: bool,
}

/// Advance `state` by one frame of `frame_dt` seconds
pub fn tick(state: &mut RunState, input: &TickInput, frame_dt: f32) {
    state.events.clear();

    let mut started = false;
    if input.reset || ((input.start || input.tap) && state.phase != RunPhase::Running) {
        state.start_run();
        started = true;
    }

    if input.force_pause {
        state.set_paused(true);
    } else if input.pause {
        state.toggle_pause();
    }

    // Cosmetic timers keep decaying while paused or waiting on a respawn
    let cosmetic_dt = frame_dt.max(0.0);
    state.ledger.tick_toast(cosmetic_dt);
    state.respawn_flash.tick(cosmetic_dt);

    if state.phase != RunPhase::Running || state.paused {
        return;
    }
    let dt = frame_dt.clamp(0.0, state.config.max_frame_dt);
    if dt <= 0.0 {
        return;
    }
    state.elapsed += dt;
    state.time_ticks += 1;

    if state.ledger.is_pending() {
        if let Some(checkpoint) = state.ledger.tick_pending(dt) {
            state.apply_respawn(checkpoint);
        }
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot::drive(state, &mut input);
    }
    if input.jump || (input.tap && !started) {
        state.player.request_jump(&state.config);
    }
    if input.dash {
        state.player.request_dash(&state.config);
    }

    let speed = state.speed();
    let outcome = state
        .player
        .step(&state.config, speed, dt, &state.world.platforms);
    if outcome.jumped {
        state.events.push(GameEvent::Jumped);
    }
    if outcome.dashed {
        state.events.push(GameEvent::Dashed);
    }
    if let Some(platform) = outcome.landed_on {
        state.events.push(GameEvent::Landed { platform });
    }

    state.recompute_progress();

    if state.player.grounded {
        let ground = state.player.ground.and_then(|id| state.world.get_mut(id));
        if let Some(platform) = ground {
            if let Some(checkpoint) =
                state
                    .ledger
                    .maybe_place(state.distance, platform, state.config.toast_duration)
            {
                state.events.push(GameEvent::CheckpointBanked {
                    id: checkpoint.id,
                    distance: checkpoint.distance,
                });
            }
        }
    }

    state
        .world
        .populate(&state.config, state.player.pos.x, state.distance);
    state.world.cull(&state.config, state.camera_x);

    if state.has_fallen() {
        state.handle_fall();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use crate::sim::RespawnAttempt;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn running(config: RunnerConfig, best: u32) -> RunState {
        let mut state = RunState::new(config, 12345, best);
        state.start_run();
        state
    }

    /// Start slab long enough to cross the first checkpoint without jumping
    fn long_slab() -> RunnerConfig {
        RunnerConfig {
            start_platform_width: 5000.0,
            ..Default::default()
        }
    }

    fn jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    fn drop_below_death_line(state: &mut RunState) {
        state.player.pos.y = state.config.death_y() + 10.0;
        state.player.vy = 0.0;
        state.player.grounded = false;
        state.player.ground = None;
    }

    #[test]
    fn test_tick_idle_until_start() {
        let mut state = RunState::new(RunnerConfig::default(), 1, 0);
        let x = state.player.pos.x;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, RunPhase::Idle);
        assert_eq!(state.player.pos.x, x);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, DT);
        assert_eq!(state.phase, RunPhase::Running);
        assert!(state.events.contains(&GameEvent::RunStarted));
        assert!(state.player.pos.x > x);
    }

    #[test]
    fn test_tap_starts_then_jumps() {
        let mut state = RunState::new(RunnerConfig::default(), 1, 0);
        let tap = TickInput {
            tap: true,
            ..Default::default()
        };
        tick(&mut state, &tap, DT);
        assert_eq!(state.phase, RunPhase::Running);
        assert!(!state.events.contains(&GameEvent::Jumped));

        tick(&mut state, &tap, DT);
        assert!(state.events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_checkpoint_banked_at_interval() {
        let mut state = running(long_slab(), 0);
        let slab_id = state.world.platforms[0].id;

        for _ in 0..2000 {
            tick(&mut state, &TickInput::default(), DT);
            if !state.ledger.is_empty() {
                break;
            }
        }

        assert_eq!(state.ledger.len(), 1);
        let checkpoint = state.ledger.checkpoints()[0];
        assert_eq!(checkpoint.distance, 250);
        assert_eq!(checkpoint.platform_id, slab_id);
        assert_eq!(state.ledger.next_distance(), 500);
        assert_eq!(state.world.get(slab_id).map(|p| p.checkpoint_refs), Some(1));
        assert!(state.events.contains(&GameEvent::CheckpointBanked {
            id: checkpoint.id,
            distance: 250
        }));
        assert!(state.ledger.toast().is_active());
    }

    #[test]
    fn test_fall_without_checkpoint_ends_run() {
        let mut state = running(RunnerConfig::default(), 0);
        drop_below_death_line(&mut state);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, RunPhase::Over);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::RunEnded { .. }))
        );

        // Over is terminal until a reset
        let x = state.player.pos.x;
        tick(&mut state, &jump(), DT);
        assert_eq!(state.phase, RunPhase::Over);
        assert_eq!(state.player.pos.x, x);
    }

    #[test]
    fn test_best_kept_when_not_beaten() {
        let mut state = running(RunnerConfig::default(), 120);
        state.player.pos.x = 80.0 + 900.0;
        drop_below_death_line(&mut state);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, RunPhase::Over);
        assert_eq!(state.distance, 90);
        assert_eq!(state.best, 120);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::NewBest(_))));
    }

    #[test]
    fn test_best_raised_when_beaten() {
        let mut state = running(RunnerConfig::default(), 120);
        state.player.pos.x = 80.0 + 1500.0;
        drop_below_death_line(&mut state);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.distance, 150);
        assert_eq!(state.best, 150);
        assert!(state.events.contains(&GameEvent::NewBest(150)));
    }

    #[test]
    fn test_delayed_respawn_from_checkpoint() {
        let mut state = running(long_slab(), 0);
        while state.ledger.is_empty() {
            tick(&mut state, &TickInput::default(), DT);
        }
        let checkpoint = state.ledger.checkpoints()[0];

        drop_below_death_line(&mut state);
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.ledger.is_pending());
        assert!(state.events.contains(&GameEvent::RespawnArmed {
            checkpoint: checkpoint.id
        }));
        assert_eq!(state.phase, RunPhase::Running);

        // Gameplay is frozen while the respawn counts down
        let frozen = state.player.pos;
        let toast_before = state.ledger.toast().remaining();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.pos, frozen);
        assert!(state.ledger.toast().remaining() < toast_before);

        // Repeated falls while pending change nothing
        assert_eq!(state.handle_fall(), RespawnAttempt::AlreadyPending);

        let mut respawned = false;
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
            if state.events.contains(&GameEvent::Respawned {
                checkpoint: checkpoint.id,
            }) {
                respawned = true;
                break;
            }
            assert_eq!(state.player.pos, frozen);
        }
        assert!(respawned);
        assert!(!state.ledger.is_pending());
        assert!(state.ledger.is_empty());
        assert_eq!(
            state.player.pos.x + state.player.width / 2.0,
            checkpoint.x
        );
        assert_eq!(state.player.bottom(), checkpoint.y);
        assert!(state.player.grounded);
        assert_eq!(state.distance, 240);
        assert_eq!(
            state.world.get(checkpoint.platform_id).map(|p| p.checkpoint_refs),
            Some(0)
        );
    }

    #[test]
    fn test_immediate_respawn_with_zero_delay() {
        let config = RunnerConfig {
            respawn_delay: 0.0,
            ..long_slab()
        };
        let mut state = running(config, 0);
        while state.ledger.is_empty() {
            tick(&mut state, &TickInput::default(), DT);
        }
        drop_below_death_line(&mut state);
        tick(&mut state, &TickInput::default(), DT);
        assert!(!state.ledger.is_pending());
        assert!(state.player.grounded);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Respawned { .. }))
        );
    }

    #[test]
    fn test_world_ahead_of_respawn_is_intact() {
        let config = RunnerConfig {
            respawn_delay: 0.0,
            ..Default::default()
        };
        let mut state = running(config, 0);
        let interval = state.config.checkpoint_interval;
        let anchor_id = state.world.platforms[1].id;
        let anchor = state.world.get_mut(anchor_id).unwrap();
        assert!(state.ledger.maybe_place(interval, anchor, 1.0).is_some());

        // Carry the player far past the anchor the way ticks would
        for step in 1..=20 {
            state.player.pos.x = state.config.start_x + step as f32 * 400.0;
            state.recompute_progress();
            state
                .world
                .populate(&state.config, state.player.pos.x, state.distance);
            state.world.cull(&state.config, state.camera_x);
        }

        drop_below_death_line(&mut state);
        tick(&mut state, &TickInput::default(), DT);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Respawned { .. }))
        );
        assert_eq!(state.player.ground, Some(anchor_id));

        let from = state
            .world
            .platforms
            .iter()
            .position(|p| p.id == anchor_id)
            .unwrap();
        let strip = &state.world.platforms[from..];
        assert!(strip.len() > 1);
        for pair in strip.windows(2) {
            let gap = pair[1].rect.x - pair[0].right();
            assert!(gap <= state.config.gap_hard.max + 0.01, "gap {gap} after respawn");
        }
        assert!(state.world.spawn_x() >= state.player.pos.x + state.config.look_ahead);
    }

    #[test]
    fn test_landing_fires_once() {
        let mut state = running(RunnerConfig::default(), 0);
        tick(&mut state, &jump(), DT);
        assert!(state.events.contains(&GameEvent::Jumped));

        let mut landings = 0;
        for _ in 0..80 {
            tick(&mut state, &TickInput::default(), DT);
            landings += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::Landed { .. }))
                .count();
        }
        assert!(state.player.grounded);
        assert_eq!(landings, 1);
    }

    #[test]
    fn test_dash_charge_restored_on_landing() {
        let mut state = running(RunnerConfig::default(), 0);
        tick(&mut state, &jump(), DT);
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), DT);
        }

        let dash = TickInput {
            dash: true,
            ..Default::default()
        };
        tick(&mut state, &dash, DT);
        assert!(state.events.contains(&GameEvent::Dashed));
        assert!(!state.player.dash_ready);

        let mut landed = false;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), DT);
            let touched = state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Landed { .. }));
            if touched {
                assert!(state.player.dash_ready);
                landed = true;
                break;
            }
            assert!(!state.player.dash_ready);
        }
        assert!(landed);
    }

    #[test]
    fn test_pause_during_fall() {
        let mut state = running(RunnerConfig::default(), 0);
        tick(&mut state, &jump(), DT);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.player.grounded);
        let (y, vy, distance) = (state.player.pos.y, state.player.vy, state.distance);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert!(state.paused);
        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.player.pos.y, y);
        assert_eq!(state.player.vy, vy);
        assert_eq!(state.distance, distance);

        tick(&mut state, &pause, DT);
        assert!(!state.paused);
        assert_ne!(state.player.pos.y, y);
    }

    #[test]
    fn test_blur_never_unpauses() {
        let mut state = running(RunnerConfig::default(), 0);
        let blur = TickInput {
            force_pause: true,
            ..Default::default()
        };
        tick(&mut state, &blur, DT);
        assert!(state.paused);
        tick(&mut state, &blur, DT);
        assert!(state.paused);
    }

    #[test]
    fn test_determinism() {
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut a = running(RunnerConfig::default(), 0);
        let mut b = running(RunnerConfig::default(), 0);
        for _ in 0..600 {
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.distance, b.distance);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.world.platforms, b.world.platforms);
    }

    proptest! {
        #[test]
        fn prop_distance_monotonic(seed in any::<u64>(), frames in 1usize..900) {
            let mut state = RunState::new(RunnerConfig::default(), seed, 0);
            state.start_run();
            let input = TickInput { autopilot: true, ..Default::default() };
            let mut prev = state.distance;
            for _ in 0..frames {
                tick(&mut state, &input, DT);
                let respawned = state
                    .events
                    .iter()
                    .any(|e| matches!(e, GameEvent::Respawned { .. }));
                if !respawned {
                    prop_assert!(state.distance >= prev);
                }
                prev = state.distance;
            }
        }

        #[test]
        fn prop_pause_freezes_gameplay(
            warmup in 1usize..90,
            frames in 1usize..120,
            dt in 0.0f32..0.1,
        ) {
            let mut state = RunState::new(RunnerConfig::default(), 7, 0);
            state.start_run();
            let input = TickInput { autopilot: true, ..Default::default() };
            for _ in 0..warmup {
                tick(&mut state, &input, DT);
            }
            state.set_paused(true);
            let before = (state.player.pos, state.player.vy, state.distance, state.elapsed);
            for _ in 0..frames {
                tick(&mut state, &input, dt);
            }
            prop_assert_eq!(
                before,
                (state.player.pos, state.player.vy, state.distance, state.elapsed)
            );
        }
    }
}
