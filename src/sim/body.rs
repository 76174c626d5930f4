//! Runner kinematics: gravity, landing, jump and dash
//!
//! Collisions use vertical containment only: the body lands on a platform
//! when their horizontal spans overlap and the body's bottom edge crossed
//! the platform top during this tick. Sides and undersides never collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::timer::Countdown;
use super::world::Platform;
use crate::config::RunnerConfig;

/// Float slack when comparing a snapped bottom edge to a platform top
const LANDING_EPSILON: f32 = 0.01;

/// The runner's body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Vertical velocity, positive is down
    pub vy: f32,
    /// Horizontal speed applied last step (run speed plus dash bonus)
    pub vx: f32,
    pub width: f32,
    pub height: f32,
    pub grounded: bool,
    /// Platform the body is standing on
    pub ground: Option<u32>,
    /// One dash per airtime, restored on landing
    pub dash_ready: bool,
    pub dash: Countdown,
    pub coyote: Countdown,
    pub jump_buffer: Countdown,
    pub dash_buffer: Countdown,
}

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub jumped: bool,
    pub dashed: bool,
    /// Set only on the touchdown tick
    pub landed_on: Option<u32>,
}

impl Player {
    /// A body standing on a surface whose top is at `ground_top`
    pub fn spawn(config: &RunnerConfig, x: f32, ground_top: f32, ground: Option<u32>) -> Self {
        Self {
            pos: Vec2::new(x, ground_top - config.player_height),
            vy: 0.0,
            vx: 0.0,
            width: config.player_width,
            height: config.player_height,
            grounded: ground.is_some(),
            ground,
            dash_ready: true,
            dash: Countdown::default(),
            coyote: Countdown::default(),
            jump_buffer: Countdown::default(),
            dash_buffer: Countdown::default(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_active()
    }

    /// Remember a jump press for the buffer window
    pub fn request_jump(&mut self, config: &RunnerConfig) {
        self.jump_buffer.arm(config.jump_buffer);
    }

    /// Remember a dash press for the buffer window
    pub fn request_dash(&mut self, config: &RunnerConfig) {
        self.dash_buffer.arm(config.dash_buffer);
    }

    fn can_jump(&self) -> bool {
        self.grounded || self.coyote.is_active()
    }

    /// Advance one tick at `run_speed` against `platforms`
    pub fn step(
        &mut self,
        config: &RunnerConfig,
        run_speed: f32,
        dt: f32,
        platforms: &[Platform],
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        let was_grounded = self.grounded;

        if self.jump_buffer.is_active() && self.can_jump() {
            self.vy = -config.jump_velocity;
            self.grounded = false;
            self.ground = None;
            self.jump_buffer.clear();
            self.coyote.clear();
            outcome.jumped = true;
        }

        if self.dash_buffer.is_active() && !self.grounded && self.dash_ready {
            self.dash_ready = false;
            self.dash.arm(config.dash_duration);
            self.dash_buffer.clear();
            self.vy = self.vy.min(config.dash_fall_cap);
            outcome.dashed = true;
        }

        let dash_bonus = config.dash_speed_bonus * self.dash.ratio(config.dash_duration);
        self.vx = run_speed + dash_bonus;
        self.pos.x += self.vx * dt;

        self.vy += config.gravity * dt;
        if self.dash.is_active() {
            self.vy = self.vy.min(config.dash_fall_cap);
        }
        let prev_bottom = self.bottom();
        self.pos.y += self.vy * dt;

        self.grounded = false;
        self.ground = None;
        if self.vy >= 0.0 {
            if let Some(platform) = find_landing(&self.rect(), prev_bottom, platforms) {
                self.pos.y = platform.top() - self.height;
                self.vy = 0.0;
                self.grounded = true;
                self.ground = Some(platform.id);
                self.coyote.arm(config.coyote_time);
                if !was_grounded {
                    self.dash_ready = true;
                    outcome.landed_on = Some(platform.id);
                }
            }
        }

        self.jump_buffer.tick(dt);
        self.dash_buffer.tick(dt);
        self.dash.tick(dt);
        if !self.grounded {
            self.coyote.tick(dt);
        }

        outcome
    }
}

/// Pick the platform the body lands on this tick, if any.
///
/// Candidates overlap `body` horizontally and have their top between
/// `prev_bottom` and the body's new bottom. When several qualify, the one
/// whose top is closest to `prev_bottom` wins; exact ties go to list order.
pub fn find_landing<'a>(body: &Rect, prev_bottom: f32, platforms: &'a [Platform]) -> Option<&'a Platform> {
    let new_bottom = body.bottom();
    platforms
        .iter()
        .filter(|p| {
            body.overlaps_x(&p.rect)
                && prev_bottom <= p.top() + LANDING_EPSILON
                && p.top() <= new_bottom
        })
        .min_by(|a, b| {
            (a.top() - prev_bottom)
                .partial_cmp(&(b.top() - prev_bottom))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
