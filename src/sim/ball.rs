//! Ball kinematics and lifecycle

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::reflect_velocity;
use super::body::BodyId;

/// Ball lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Free-moving under gravity
    InPlay,
    /// Held by a body until the given tick
    Captured { body_id: BodyId, release_at_tick: u64 },
    /// Left the table through the bottom boundary
    Drained,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "ball radius must be positive");
        Self {
            id,
            pos,
            vel,
            radius,
            state: BallState::InPlay,
        }
    }

    #[inline]
    pub fn is_in_play(&self) -> bool {
        self.state == BallState::InPlay
    }

    #[inline]
    pub fn is_drained(&self) -> bool {
        self.state == BallState::Drained
    }

    /// Advance one step: move with the current velocity, then apply gravity.
    /// No-op unless the ball is in play.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        if !self.is_in_play() {
            return;
        }
        self.pos += self.vel * dt;
        self.vel.y += gravity * dt;
    }

    /// Bounce off a surface. Restitution is applied by magnitude; the sign
    /// flip comes from the reflection itself.
    pub fn reflect_off(&mut self, normal: Vec2, restitution: f32) {
        self.vel = reflect_velocity(self.vel, normal) * restitution.abs();
    }

    /// Pin the ball to a body anchor until `release_at_tick`
    pub fn capture(&mut self, body_id: BodyId, anchor: Vec2, release_at_tick: u64) {
        debug_assert!(self.is_in_play(), "only a free ball can be captured");
        self.pos = anchor;
        self.vel = Vec2::ZERO;
        self.state = BallState::Captured {
            body_id,
            release_at_tick,
        };
    }

    /// Return a captured ball to free play
    pub fn release(&mut self, pos: Vec2, vel: Vec2) {
        debug_assert!(
            matches!(self.state, BallState::Captured { .. }),
            "only a captured ball can be released"
        );
        self.pos = pos;
        self.vel = vel;
        self.state = BallState::InPlay;
    }

    pub fn drain(&mut self) {
        self.vel = Vec2::ZERO;
        self.state = BallState::Drained;
    }
}
