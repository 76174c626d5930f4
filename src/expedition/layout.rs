//! Fixed arena layout: ruins and sentry patrol routes

use glam::Vec2;

use crate::config::ExpeditionConfig;
use crate::sim::Rect;

/// Impassable ruin blocks
pub const RUINS: [Rect; 8] = [
    Rect::new(80.0, 60.0, 260.0, 80.0),
    Rect::new(110.0, 210.0, 180.0, 90.0),
    Rect::new(360.0, 70.0, 160.0, 120.0),
    Rect::new(530.0, 180.0, 320.0, 80.0),
    Rect::new(620.0, 300.0, 240.0, 70.0),
    Rect::new(120.0, 360.0, 260.0, 120.0),
    Rect::new(440.0, 410.0, 180.0, 90.0),
    Rect::new(720.0, 420.0, 140.0, 80.0),
];

/// A closed waypoint loop and the vision radius of the sentry walking it
#[derive(Debug, Clone, Copy)]
pub struct SentryRoute {
    pub path: &'static [Vec2],
    /// `None` uses the configured default
    pub vision: Option<f32>,
}

pub const SENTRY_ROUTES: [SentryRoute; 3] = [
    SentryRoute {
        path: &[
            Vec2::new(180.0, 150.0),
            Vec2::new(420.0, 150.0),
            Vec2::new(420.0, 260.0),
            Vec2::new(180.0, 260.0),
        ],
        vision: Some(160.0),
    },
    SentryRoute {
        path: &[
            Vec2::new(640.0, 120.0),
            Vec2::new(860.0, 120.0),
            Vec2::new(860.0, 220.0),
            Vec2::new(640.0, 220.0),
        ],
        vision: Some(150.0),
    },
    SentryRoute {
        path: &[
            Vec2::new(520.0, 330.0),
            Vec2::new(780.0, 330.0),
            Vec2::new(780.0, 480.0),
            Vec2::new(520.0, 480.0),
        ],
        vision: Some(175.0),
    },
];

/// Distance of the scout spawn point above the arena's bottom edge
pub const SPAWN_INSET: f32 = 110.0;

pub fn spawn_point(config: &ExpeditionConfig) -> Vec2 {
    Vec2::new(config.arena_width / 2.0, config.arena_height - SPAWN_INSET)
}

/// Area entities are clamped to
pub fn play_bounds(config: &ExpeditionConfig) -> Rect {
    let pad = config.world_padding;
    Rect::new(
        pad,
        pad,
        config.arena_width - pad * 2.0,
        config.arena_height - pad * 2.0,
    )
}
