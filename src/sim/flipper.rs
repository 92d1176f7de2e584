//! Flipper actuator
//!
//! A flipper is a segment rotating about its pivot. The actuator is
//! edge-triggered: a press sets `Activated`, a release sets `Rest`, and the
//! state persists across ticks. Each tick the angle moves toward the target
//! at a bounded rate, and the angular velocity of that move is what a ball
//! picks up on contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::perp;

/// Which flip button drives a flipper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipperSide {
    Left,
    Right,
}

/// Two-state flipper actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Actuator {
    #[default]
    Rest,
    Activated,
}

/// Rotating flipper state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flipper {
    pub side: FlipperSide,
    pub actuator: Actuator,
    /// Current angle (radians)
    pub angle: f32,
    /// Angle before the last step
    pub prev_angle: f32,
    pub rest_angle: f32,
    pub activated_angle: f32,
    /// Maximum angular speed (radians/s)
    pub max_rate: f32,
    /// Angular velocity of the last step (radians/s)
    pub angular_vel: f32,
}

impl Flipper {
    pub fn new(side: FlipperSide, rest_angle: f32, activated_angle: f32, max_rate: f32) -> Self {
        Self {
            side,
            actuator: Actuator::Rest,
            angle: rest_angle,
            prev_angle: rest_angle,
            rest_angle,
            activated_angle,
            max_rate,
            angular_vel: 0.0,
        }
    }

    pub fn set_actuator(&mut self, actuator: Actuator) {
        self.actuator = actuator;
    }

    /// Angle implied by the actuator state
    pub fn target_angle(&self) -> f32 {
        match self.actuator {
            Actuator::Rest => self.rest_angle,
            Actuator::Activated => self.activated_angle,
        }
    }

    /// Rotate toward the target angle at no more than `max_rate`
    pub fn step(&mut self, dt: f32) {
        self.prev_angle = self.angle;
        if dt <= 0.0 {
            self.angular_vel = 0.0;
            return;
        }
        let delta = self.target_angle() - self.angle;
        let max_delta = self.max_rate * dt;
        let clamped_delta = delta.clamp(-max_delta, max_delta);

        self.angular_vel = clamped_delta / dt;
        self.angle += clamped_delta;
    }

    /// Whether the flipper is still swinging
    pub fn is_moving(&self) -> bool {
        self.angular_vel != 0.0
    }

    /// Linear velocity of the flipper surface at `point` (ω × r)
    pub fn surface_velocity(&self, pivot: Vec2, point: Vec2) -> Vec2 {
        perp(point - pivot) * self.angular_vel
    }

    /// Reset to the resting pose (new game, tilt)
    pub fn reset(&mut self) {
        self.actuator = Actuator::Rest;
        self.angle = self.rest_angle;
        self.prev_angle = self.rest_angle;
        self.angular_vel = 0.0;
    }
}
