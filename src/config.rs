//! Tuning data for both games
//!
//! Every field has a default so partial JSON files are accepted.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::lerp;

/// Closed numeric range `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Interpolate both ends toward `other`
    pub fn lerp(&self, other: &Span, t: f32) -> Span {
        Span {
            min: lerp(self.min, other.min, t),
            max: lerp(self.max, other.max, t),
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Platform runner tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    // === View ===
    pub view_width: f32,
    pub view_height: f32,
    /// Player sits this far right of the camera's left edge
    pub camera_lead: f32,

    // === Body ===
    pub start_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Upward launch speed of a jump (px/s)
    pub jump_velocity: f32,
    /// Run speed at distance 0 (px/s)
    pub base_speed: f32,
    /// Extra px/s per distance unit
    pub speed_ramp: f32,
    pub max_speed: f32,
    /// Grace window after leaving the ground (s)
    pub coyote_time: f32,
    /// How long an early jump press is remembered (s)
    pub jump_buffer: f32,

    // === Dash ===
    pub dash_duration: f32,
    /// Forward bonus at the start of a dash, decays to zero (px/s)
    pub dash_speed_bonus: f32,
    /// Max downward speed while dashing (px/s)
    pub dash_fall_cap: f32,
    pub dash_buffer: f32,
    /// Two pointer taps closer than this request a dash (s)
    pub double_tap_window: f32,

    // === World generator ===
    pub platform_height: f32,
    pub start_platform_width: f32,
    pub start_platform_y: f32,
    pub look_ahead: f32,
    pub cull_margin: f32,
    pub gap_easy: Span,
    pub gap_hard: Span,
    pub width_easy: Span,
    pub width_hard: Span,
    /// Max vertical change between consecutive platforms
    pub vertical_step: f32,
    /// Height band for platform tops
    pub platform_y: Span,
    /// Distance at which generator ranges reach their hard bounds
    pub difficulty_distance: f32,

    // === Run ===
    pub distance_scale: f32,
    pub checkpoint_interval: u32,
    /// 0 respawns immediately
    pub respawn_delay: f32,
    pub toast_duration: f32,
    /// Player dies once its top is this far below the view
    pub fall_margin: f32,
    pub max_frame_dt: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            view_width: VIEW_WIDTH,
            view_height: VIEW_HEIGHT,
            camera_lead: 200.0,

            start_x: START_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            gravity: 2200.0,
            jump_velocity: 780.0,
            base_speed: 260.0,
            speed_ramp: 0.12,
            max_speed: 520.0,
            coyote_time: 0.1,
            jump_buffer: 0.12,

            dash_duration: 0.2,
            dash_speed_bonus: 420.0,
            dash_fall_cap: 40.0,
            dash_buffer: 0.12,
            double_tap_window: 0.28,

            platform_height: PLATFORM_HEIGHT,
            start_platform_width: 640.0,
            start_platform_y: 400.0,
            look_ahead: 1400.0,
            cull_margin: 240.0,
            gap_easy: Span::new(80.0, 150.0),
            gap_hard: Span::new(150.0, 240.0),
            width_easy: Span::new(240.0, 380.0),
            width_hard: Span::new(130.0, 230.0),
            vertical_step: 70.0,
            platform_y: Span::new(240.0, 460.0),
            difficulty_distance: 3000.0,

            distance_scale: DISTANCE_SCALE,
            checkpoint_interval: CHECKPOINT_INTERVAL,
            respawn_delay: 0.6,
            toast_duration: 1.6,
            fall_margin: 200.0,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl RunnerConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file on disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded runner config from {}", path.display());
        Ok(config)
    }

    /// Run speed for the given distance, before any dash bonus
    pub fn speed_at(&self, distance: u32) -> f32 {
        (self.base_speed + distance as f32 * self.speed_ramp).min(self.max_speed)
    }

    /// Generator difficulty in `[0, 1]`
    pub fn progress_at(&self, distance: u32) -> f32 {
        (distance as f32 / self.difficulty_distance).clamp(0.0, 1.0)
    }

    /// Player y beyond which a fall counts as death
    pub fn death_y(&self) -> f32 {
        self.view_height + self.fall_margin
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("view_width", self.view_width),
            ("view_height", self.view_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("dash_duration", self.dash_duration),
            ("platform_height", self.platform_height),
            ("start_platform_width", self.start_platform_width),
            ("look_ahead", self.look_ahead),
            ("difficulty_distance", self.difficulty_distance),
            ("distance_scale", self.distance_scale),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("camera_lead", self.camera_lead),
            ("speed_ramp", self.speed_ramp),
            ("coyote_time", self.coyote_time),
            ("jump_buffer", self.jump_buffer),
            ("dash_speed_bonus", self.dash_speed_bonus),
            ("dash_fall_cap", self.dash_fall_cap),
            ("dash_buffer", self.dash_buffer),
            ("double_tap_window", self.double_tap_window),
            ("cull_margin", self.cull_margin),
            ("vertical_step", self.vertical_step),
            ("respawn_delay", self.respawn_delay),
            ("toast_duration", self.toast_duration),
            ("fall_margin", self.fall_margin),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")));
            }
        }

        if self.checkpoint_interval == 0 {
            return Err(ConfigError::invalid("checkpoint_interval", "must be > 0"));
        }
        if self.base_speed > self.max_speed {
            return Err(ConfigError::invalid("base_speed", "exceeds max_speed"));
        }

        let spans = [
            ("gap_easy", self.gap_easy),
            ("gap_hard", self.gap_hard),
            ("width_easy", self.width_easy),
            ("width_hard", self.width_hard),
            ("platform_y", self.platform_y),
        ];
        for (field, span) in spans {
            if !span.is_ordered() {
                return Err(ConfigError::invalid(
                    field,
                    format!("min {} > max {}", span.min, span.max),
                ));
            }
        }
        if self.width_easy.min <= 0.0 || self.width_hard.min <= 0.0 {
            return Err(ConfigError::invalid("width_easy", "platform widths must be > 0"));
        }
        if self.gap_easy.min < 0.0 || self.gap_hard.min < 0.0 {
            return Err(ConfigError::invalid("gap_easy", "gaps must be >= 0"));
        }

        Ok(())
    }
}

/// Stealth collector tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpeditionConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Entities are kept this far from the arena edge
    pub world_padding: f32,

    // === Scout ===
    pub player_speed: f32,
    pub player_radius: f32,
    pub sprint_multiplier: f32,
    /// Stamina drained per second of sprinting (stamina is 0..1)
    pub stamina_drain_rate: f32,
    pub stamina_regen_rate: f32,
    pub max_hearts: u8,
    /// Invulnerability after taking a hit (s)
    pub hit_invulnerability: f32,

    // === Objective ===
    pub artifact_goal: u32,
    pub artifact_radius: Span,
    pub extraction_radius: f32,

    // === Pulse ===
    pub pulse_cooldown: f32,
    pub pulse_duration: f32,
    pub pulse_slow_multiplier: f32,

    // === Sentries ===
    pub sentinel_speed: f32,
    pub sentinel_chase_speed: f32,
    pub sentinel_vision: f32,
    /// Chase persists this long after losing sight (s)
    pub sentinel_hold_time: f32,
    pub sentinel_radius: f32,

    pub max_frame_dt: f32,
}

impl Default for ExpeditionConfig {
    fn default() -> Self {
        Self {
            arena_width: VIEW_WIDTH,
            arena_height: VIEW_HEIGHT,
            world_padding: 36.0,

            player_speed: 230.0,
            player_radius: 20.0,
            sprint_multiplier: 1.55,
            stamina_drain_rate: 1.35,
            stamina_regen_rate: 0.65,
            max_hearts: 3,
            hit_invulnerability: 1.2,

            artifact_goal: 9,
            artifact_radius: Span::new(14.0, 20.0),
            extraction_radius: 60.0,

            pulse_cooldown: 6.0,
            pulse_duration: 1.4,
            pulse_slow_multiplier: 0.35,

            sentinel_speed: 60.0,
            sentinel_chase_speed: 120.0,
            sentinel_vision: 150.0,
            sentinel_hold_time: 1.5,
            sentinel_radius: 22.0,

            max_frame_dt: EXPEDITION_MAX_FRAME_DT,
        }
    }
}

impl ExpeditionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("player_speed", self.player_speed),
            ("player_radius", self.player_radius),
            ("extraction_radius", self.extraction_radius),
            ("pulse_duration", self.pulse_duration),
            ("sentinel_radius", self.sentinel_radius),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be > 0, got {value}")));
            }
        }
        if self.max_hearts == 0 {
            return Err(ConfigError::invalid("max_hearts", "must be > 0"));
        }
        if !self.artifact_radius.is_ordered() || self.artifact_radius.min <= 0.0 {
            return Err(ConfigError::invalid("artifact_radius", "must be an ordered positive range"));
        }
        if self.world_padding * 2.0 >= self.arena_width.min(self.arena_height) {
            return Err(ConfigError::invalid("world_padding", "leaves no playable area"));
        }
        Ok(())
    }
}
