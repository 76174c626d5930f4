//! Procedural platform strip
//!
//! Platforms are appended ahead of the player in increasing x order and
//! culled once they are behind the camera. Culling stops at the oldest
//! platform a checkpoint references, so the strip from there on stays
//! intact for respawns.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::config::RunnerConfig;

/// A static platform slab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub rect: Rect,
    /// Live checkpoints anchored here; vetoes culling while > 0
    pub checkpoint_refs: u32,
}

impl Platform {
    #[inline]
    pub fn top(&self) -> f32 {
        self.rect.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.rect.right()
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.rect.x + self.rect.width / 2.0
    }

    pub fn is_referenced(&self) -> bool {
        self.checkpoint_refs > 0
    }
}

/// Platform set plus the generator cursor
#[derive(Debug, Clone)]
pub struct World {
    /// Live platforms, sorted by x
    pub platforms: Vec<Platform>,
    /// Right edge of the last generated platform
    spawn_x: f32,
    /// Top of the last generated platform
    last_y: f32,
    next_id: u32,
    rng: Pcg32,
}

impl World {
    /// Seed the starting slab under the spawn point
    pub fn new(config: &RunnerConfig, seed: u64) -> Self {
        let mut world = Self {
            platforms: Vec::new(),
            spawn_x: 0.0,
            last_y: config.start_platform_y,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        };
        world.push(Rect::new(
            0.0,
            config.start_platform_y,
            config.start_platform_width,
            config.platform_height,
        ));
        world
    }

    pub fn spawn_x(&self) -> f32 {
        self.spawn_x
    }

    pub fn get(&self, id: u32) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.id == id)
    }

    /// Append a platform and move the cursor to its right edge
    pub fn push(&mut self, rect: Rect) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.spawn_x = self.spawn_x.max(rect.right());
        self.last_y = rect.y;
        self.platforms.push(Platform {
            id,
            rect,
            checkpoint_refs: 0,
        });
        id
    }

    /// Generate until the cursor is `look_ahead` past `player_x`.
    /// Returns the number of platforms added.
    pub fn populate(&mut self, config: &RunnerConfig, player_x: f32, distance: u32) -> usize {
        let target = player_x + config.look_ahead;
        let mut added = 0;
        while self.spawn_x < target {
            let rect = self.next_rect(config, distance);
            self.push(rect);
            added += 1;
        }
        added
    }

    /// Draw the next platform from the difficulty-adjusted ranges
    fn next_rect(&mut self, config: &RunnerConfig, distance: u32) -> Rect {
        let t = config.progress_at(distance);
        let gap = config.gap_easy.lerp(&config.gap_hard, t);
        let width = config.width_easy.lerp(&config.width_hard, t);

        let gap = sample(&mut self.rng, gap.min, gap.max);
        let width = sample(&mut self.rng, width.min, width.max).max(1.0);
        let step = sample(&mut self.rng, -config.vertical_step, config.vertical_step);
        let y = (self.last_y + step).clamp(config.platform_y.min, config.platform_y.max);

        Rect::new(self.spawn_x + gap, y, width, config.platform_height)
    }

    /// Drop the platforms behind `camera_x - cull_margin`, stopping at the
    /// first one a checkpoint references. Everything from the oldest anchor
    /// onward survives. Returns the number removed.
    pub fn cull(&mut self, config: &RunnerConfig, camera_x: f32) -> usize {
        let cutoff = camera_x - config.cull_margin;
        // Platforms are sorted by x, so the culled ones form a prefix
        let keep_from = self
            .platforms
            .iter()
            .position(|p| p.right() >= cutoff || p.is_referenced())
            .unwrap_or(self.platforms.len());
        self.platforms.drain(..keep_from);
        if keep_from > 0 {
            log::debug!("Culled {keep_from} platforms behind x={cutoff:.0}");
        }
        keep_from
    }
}

fn sample(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}
