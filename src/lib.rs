//! Pinball Sim - A deterministic 2D pinball table core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, body state machines, game session)
//! - `table`: Data-driven table layout and tuning
//! - `error`: Table construction errors
//!
//! Rendering, input devices, audio and high score persistence live outside
//! this crate. Hosts read a [`sim::Snapshot`] once per frame and feed
//! [`sim::ControlEvent`]s back in.

pub mod error;
pub mod sim;
pub mod table;

pub use error::TableError;
pub use table::TableConfig;

use glam::Vec2;

/// Table configuration defaults
pub mod consts {
    /// Nominal simulation timestep in milliseconds (60 Hz)
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Nominal simulation timestep in seconds
    pub const SIM_DT: f32 = TICK_MS / 1000.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (pixels, y grows downward)
    pub const FIELD_WIDTH: f32 = 500.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Gravity (pixels/s²). 0.5 px/tick² at 60 Hz.
    pub const GRAVITY: f32 = 1800.0;
    /// Energy retained when bouncing off the canvas walls
    pub const WALL_ELASTICITY: f32 = 0.9;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALLS_PER_GAME: u32 = 3;

    /// Body defaults
    pub const BUMPER_ELASTICITY: f32 = -0.8;
    pub const DEFAULT_COOLDOWN_MS: f32 = 100.0;
    pub const DEFAULT_CAPTURE_DELAY_MS: f32 = 500.0;
    pub const DEFAULT_BANK_RESET_MS: f32 = 1000.0;
    /// Largest speed gain a body may impart on bounce
    pub const MAX_RESTITUTION: f32 = 1.2;

    /// Flipper defaults (radians, radians/s)
    pub const FLIPPER_LENGTH: f32 = 70.0;
    pub const FLIPPER_THICKNESS: f32 = 12.0;
    pub const FLIPPER_RATE: f32 = 20.0;

    /// Tilt threshold (warnings before the table goes dead)
    pub const MAX_TILT_WARNINGS: u32 = 3;
    /// Velocity added to every ball on a nudge (pixels/s)
    pub const NUDGE_IMPULSE: f32 = 120.0;

    /// Plunger launch speed range (pixels/s)
    pub const PLUNGER_MIN_SPEED: f32 = 600.0;
    pub const PLUNGER_MAX_SPEED: f32 = 1500.0;
}

/// Perpendicular of a vector (rotated +90° in screen space)
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Unit vector for an angle (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Convert a duration in milliseconds to whole ticks at the given tick length
#[inline]
pub fn millis_to_ticks(ms: f32, tick_ms: f32) -> u32 {
    if ms <= 0.0 || tick_ms <= 0.0 {
        return 0;
    }
    (ms / tick_ms).round() as u32
}
