//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (bodies by registration, balls by ID)
//! - Timers are tick counts, never wall-clock callbacks
//! - No rendering or platform dependencies

pub mod ball;
pub mod body;
pub mod collision;
pub mod flipper;
pub mod playfield;
pub mod shape;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallState};
pub use body::{
    BallEffect, Body, BodyId, BodyKind, CollisionOutcome, Gate, Hold, RolloverLane, Scoop,
};
pub use collision::{
    CollisionResult, ball_shape_collision, circle_circle_overlap, circle_rect_overlap,
    circle_segment_overlap, distance, reflect_velocity, swept_segment_contact,
};
pub use flipper::{Actuator, Flipper, FlipperSide};
pub use playfield::{DropTargetBank, Playfield, Resolution};
pub use shape::Shape;
pub use snapshot::{BallView, BodyView, Snapshot};
pub use state::{ControlEvent, GameEvent, GamePhase, GameSession, NudgeDirection, SessionRules};
pub use tick::{FixedTimestep, tick};
