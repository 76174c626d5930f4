//! Patrolling sentries
//!
//! Each sentry walks a closed waypoint loop. Seeing the scout switches it to
//! chase; once the scout leaves its vision radius it keeps chasing for the
//! configured hold time, then resumes the loop where it left off.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::SentryRoute;
use crate::config::ExpeditionConfig;
use crate::sim::Countdown;

/// A waypoint counts as reached inside this radius
pub const WAYPOINT_RADIUS: f32 = 6.0;
/// Contact distance is shortened by this much so grazes do not count
pub const CONTACT_SLACK: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentryMode {
    Patrol,
    Chase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentry {
    pub pos: Vec2,
    pub radius: f32,
    pub vision: f32,
    pub path: Vec<Vec2>,
    pub path_index: usize,
    pub mode: SentryMode,
    /// Time left before an out-of-sight chase is dropped
    pub alert: Countdown,
}

impl Sentry {
    /// Place a sentry on the first waypoint, heading for the second
    pub fn from_route(route: &SentryRoute, config: &ExpeditionConfig) -> Self {
        let start = route.path.first().copied().unwrap_or(Vec2::ZERO);
        Self {
            pos: start,
            radius: config.sentinel_radius,
            vision: route.vision.unwrap_or(config.sentinel_vision),
            path: route.path.to_vec(),
            path_index: if route.path.is_empty() {
                0
            } else {
                1 % route.path.len()
            },
            mode: SentryMode::Patrol,
            alert: Countdown::default(),
        }
    }

    pub fn is_chasing(&self) -> bool {
        self.mode == SentryMode::Chase
    }

    fn waypoint(&self) -> Vec2 {
        self.path.get(self.path_index).copied().unwrap_or(self.pos)
    }

    /// Advance one tick. `slow` scales movement speed (pulse effect).
    /// Returns true when the sentry is touching the scout.
    pub fn update(
        &mut self,
        scout: Vec2,
        scout_radius: f32,
        slow: f32,
        config: &ExpeditionConfig,
        dt: f32,
    ) -> bool {
        let (target, base_speed) = match self.mode {
            SentryMode::Chase => (scout, config.sentinel_chase_speed),
            SentryMode::Patrol => (self.waypoint(), config.sentinel_speed),
        };
        let heading = (target - self.pos).normalize_or_zero();
        self.pos += heading * base_speed * slow * dt;

        let to_scout = self.pos.distance(scout);
        if to_scout <= self.vision {
            if self.mode == SentryMode::Patrol {
                log::debug!("Sentry spotted the scout at {to_scout:.0}");
            }
            self.mode = SentryMode::Chase;
            self.alert.arm(config.sentinel_hold_time);
        } else if self.mode == SentryMode::Chase && self.alert.tick(dt) {
            self.mode = SentryMode::Patrol;
        }

        if self.mode == SentryMode::Patrol
            && !self.path.is_empty()
            && self.pos.distance(self.waypoint()) < WAYPOINT_RADIUS
        {
            self.path_index = (self.path_index + 1) % self.path.len();
        }

        to_scout < self.radius + scout_radius - CONTACT_SLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expedition::layout::SENTRY_ROUTES;

    const DT: f32 = 1.0 / 60.0;
    const FAR: Vec2 = Vec2::new(5000.0, 5000.0);

    fn first_sentry() -> (ExpeditionConfig, Sentry) {
        let config = ExpeditionConfig::default();
        let sentry = Sentry::from_route(&SENTRY_ROUTES[0], &config);
        (config, sentry)
    }

    #[test]
    fn test_starts_on_first_waypoint() {
        let (_, sentry) = first_sentry();
        assert_eq!(sentry.pos, Vec2::new(180.0, 150.0));
        assert_eq!(sentry.path_index, 1);
        assert_eq!(sentry.vision, 160.0);
        assert_eq!(sentry.mode, SentryMode::Patrol);
    }

    #[test]
    fn test_patrol_walks_the_loop() {
        let (config, mut sentry) = first_sentry();
        // 240 px at 60 px/s
        for _ in 0..240 {
            sentry.update(FAR, 20.0, 1.0, &config, DT);
        }
        assert_eq!(sentry.path_index, 2);
        assert!(sentry.pos.distance(Vec2::new(420.0, 150.0)) < 12.0);
    }

    #[test]
    fn test_spots_and_chases() {
        let (config, mut sentry) = first_sentry();
        let scout = Vec2::new(180.0, 300.0);
        sentry.update(scout, 20.0, 1.0, &config, DT);
        assert!(sentry.is_chasing());

        let before = sentry.pos.distance(scout);
        sentry.update(scout, 20.0, 1.0, &config, DT);
        assert!(sentry.pos.distance(scout) < before);
    }

    #[test]
    fn test_hold_then_patrol() {
        let (config, mut sentry) = first_sentry();
        sentry.update(Vec2::new(180.0, 300.0), 20.0, 1.0, &config, DT);
        assert!(sentry.is_chasing());

        // Out of sight: keep chasing for the hold time
        let mut ticks = 0;
        while sentry.is_chasing() {
            sentry.update(FAR, 20.0, 1.0, &config, 0.25);
            ticks += 1;
            assert!(ticks <= 10);
        }
        assert_eq!(ticks, 6);
        assert_eq!(sentry.mode, SentryMode::Patrol);
    }

    #[test]
    fn test_pulse_slows_movement() {
        let (config, mut normal) = first_sentry();
        let mut slowed = normal.clone();
        let start = normal.pos;
        normal.update(FAR, 20.0, 1.0, &config, DT);
        slowed.update(FAR, 20.0, config.pulse_slow_multiplier, &config, DT);
        let full = normal.pos.distance(start);
        let slow = slowed.pos.distance(start);
        assert!((slow - full * 0.35).abs() < 1e-3);
    }

    #[test]
    fn test_contact() {
        let (config, mut sentry) = first_sentry();
        let scout = sentry.pos + Vec2::new(30.0, 0.0);
        assert!(sentry.update(scout, 20.0, 1.0, &config, DT));

        let (config, mut sentry) = first_sentry();
        let scout = sentry.pos + Vec2::new(0.0, 45.0);
        assert!(!sentry.update(scout, 20.0, 1.0, &config, DT));
    }
}
