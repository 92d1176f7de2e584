//! Table construction errors
//!
//! A table that fails validation never reaches the simulation; runtime
//! control input is never an error.

/// Errors raised while building a table or starting a game
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Playfield must have positive size, got {width}x{height}")]
    InvalidField { width: f32, height: f32 },

    #[error("Nominal tick length must be positive, got {0} ms")]
    InvalidTick(f32),

    #[error("Wall elasticity must be in (0, 1], got {0}")]
    InvalidWallElasticity(f32),

    #[error("Gravity must be finite and non-negative, got {0}")]
    InvalidGravity(f32),

    #[error("Ball radius must be positive, got {0}")]
    InvalidBallRadius(f32),

    #[error("Body {body}: circle radius must be positive, got {radius}")]
    InvalidRadius { body: u32, radius: f32 },

    #[error("Body {body}: rect must have positive width and height, got {width}x{height}")]
    InvalidRect { body: u32, width: f32, height: f32 },

    #[error("Body {body}: segment has zero length")]
    DegenerateSegment { body: u32 },

    #[error("Body {body}: restitution magnitude must be in (0, 1.2], got {restitution}")]
    InvalidRestitution { body: u32, restitution: f32 },

    #[error("Body {body}: rollover lane needs at least one point, got {points}")]
    InvalidLanePoints { body: u32, points: i32 },

    #[error("Body {body}: rollover lane must use a rect shape")]
    LaneShape { body: u32 },

    #[error("Body {body}: flipper must use a segment shape with a positive swing rate")]
    InvalidFlipper { body: u32 },

    #[error("Bank {bank}: unknown target body {target}")]
    UnknownBankTarget { bank: u32, target: u32 },

    #[error("Bank {bank}: body {target} is not a drop target")]
    NotADropTarget { bank: u32, target: u32 },

    #[error("Bank {bank}: drop target {target} already belongs to another bank")]
    SharedDropTarget { bank: u32, target: u32 },

    #[error("Bank {bank}: needs at least one target")]
    EmptyBank { bank: u32 },

    #[error("Invalid table JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
