//! Data-driven table layout and tuning
//!
//! A table is a flat list of body descriptors plus drop target banks and a
//! handful of global constants. Durations are given in milliseconds and
//! converted to ticks once, at build time, using the table's nominal tick
//! length. Every field has a default, so a JSON table only needs to list
//! what it changes.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TableError;
use crate::millis_to_ticks;
use crate::sim::{Body, BodyKind, DropTargetBank, Flipper, FlipperSide, Gate, RolloverLane, Scoop, Shape};

/// Complete description of a table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Playfield width (pixels)
    pub width: f32,
    /// Playfield height (pixels); a ball below this has drained
    pub height: f32,
    /// Gravity (pixels/s², +y is down the table)
    pub gravity: f32,
    /// Energy kept by the perpendicular velocity on a wall bounce
    pub wall_elasticity: f32,
    pub ball_radius: f32,
    pub balls_per_game: u32,
    /// Nudges allowed before the table tilts
    pub max_tilt_warnings: u32,
    /// Velocity added to every ball per nudge (pixels/s)
    pub nudge_impulse: f32,
    /// Nominal tick length used to convert millisecond timers
    pub tick_ms: f32,
    /// Seed for eject jitter
    pub seed: u64,
    pub plunger: PlungerConfig,
    /// Bodies in registration order; a body's id is its index
    pub bodies: Vec<BodyDescriptor>,
    /// Drop target banks; a bank's id is its index
    pub banks: Vec<BankDescriptor>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            gravity: GRAVITY,
            wall_elasticity: WALL_ELASTICITY,
            ball_radius: BALL_RADIUS,
            balls_per_game: BALLS_PER_GAME,
            max_tilt_warnings: MAX_TILT_WARNINGS,
            nudge_impulse: NUDGE_IMPULSE,
            tick_ms: TICK_MS,
            seed: 0,
            plunger: PlungerConfig::default(),
            bodies: Vec::new(),
            banks: Vec::new(),
        }
    }
}

/// Where new balls enter and how hard the plunger can send them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlungerConfig {
    pub position: Vec2,
    /// Launch speed at zero pull (pixels/s)
    pub min_speed: f32,
    /// Launch speed at full pull (pixels/s)
    pub max_speed: f32,
}

impl Default for PlungerConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(FIELD_WIDTH - 15.0, 560.0),
            min_speed: PLUNGER_MIN_SPEED,
            max_speed: PLUNGER_MAX_SPEED,
        }
    }
}

/// One body on the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDescriptor {
    pub shape: Shape,
    #[serde(flatten)]
    pub kind: KindDescriptor,
    /// Bounce coefficient; the kind's default when absent
    #[serde(default)]
    pub restitution: Option<f32>,
    #[serde(default)]
    pub score: u64,
    /// Scoring cooldown; the kind's default when absent
    #[serde(default)]
    pub cooldown_ms: Option<f32>,
}

/// Body behavior and its tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KindDescriptor {
    Wall,
    Bumper,
    StandupTarget,
    DropTarget,
    Kicker {
        impulse: Vec2,
    },
    Scoop {
        #[serde(default = "default_capture_delay_ms")]
        capture_delay_ms: f32,
        eject_velocity: Vec2,
        #[serde(default)]
        jitter: f32,
        #[serde(default)]
        lock_capacity: Option<u32>,
        #[serde(default)]
        extra_balls: u32,
    },
    RolloverLane {
        points: i32,
        #[serde(default)]
        clear_bonus: u64,
    },
    Gate {
        closed_angle: f32,
        open_angle: f32,
        #[serde(default)]
        toggle_on_hit: bool,
        #[serde(default)]
        kick: Option<Vec2>,
    },
    Flipper {
        side: FlipperSide,
        rest_angle: f32,
        activated_angle: f32,
        #[serde(default = "default_flipper_rate")]
        max_rate: f32,
    },
}

fn default_capture_delay_ms() -> f32 {
    DEFAULT_CAPTURE_DELAY_MS
}

fn default_flipper_rate() -> f32 {
    FLIPPER_RATE
}

impl KindDescriptor {
    fn default_restitution(&self) -> f32 {
        match self {
            KindDescriptor::Wall => 0.6,
            KindDescriptor::Bumper => BUMPER_ELASTICITY,
            KindDescriptor::StandupTarget | KindDescriptor::DropTarget => 0.6,
            KindDescriptor::Kicker { .. } => 0.7,
            KindDescriptor::Gate { .. } => 0.5,
            KindDescriptor::Flipper { .. } => 0.6,
            // Sensors never bounce the ball
            KindDescriptor::Scoop { .. } | KindDescriptor::RolloverLane { .. } => 1.0,
        }
    }

    fn default_cooldown_ms(&self) -> f32 {
        match self {
            KindDescriptor::Wall | KindDescriptor::Flipper { .. } => 0.0,
            _ => DEFAULT_COOLDOWN_MS,
        }
    }
}

/// A group of drop targets, listed by body index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDescriptor {
    pub targets: Vec<u32>,
    #[serde(default)]
    pub bonus: u64,
    /// Delay before the targets pop back up
    #[serde(default)]
    pub reset_delay_ms: Option<f32>,
}

impl TableConfig {
    /// Parse a table from JSON text
    pub fn from_json(text: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check the global constants that do not belong to any body
    pub fn validate_rules(&self) -> Result<(), TableError> {
        if !(self.tick_ms > 0.0) {
            return Err(TableError::InvalidTick(self.tick_ms));
        }
        if !(self.ball_radius > 0.0) {
            return Err(TableError::InvalidBallRadius(self.ball_radius));
        }
        if !(self.wall_elasticity > 0.0 && self.wall_elasticity <= 1.0) {
            return Err(TableError::InvalidWallElasticity(self.wall_elasticity));
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(TableError::InvalidGravity(self.gravity));
        }
        Ok(())
    }

    /// Build every body in registration order
    pub fn build_bodies(&self) -> Result<Vec<Body>, TableError> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(idx, desc)| self.build_body(idx as u32, desc))
            .collect()
    }

    fn build_body(&self, id: u32, desc: &BodyDescriptor) -> Result<Body, TableError> {
        let ticks = |ms: f32| millis_to_ticks(ms, self.tick_ms);

        let kind = match &desc.kind {
            KindDescriptor::Wall => BodyKind::Wall,
            KindDescriptor::Bumper => BodyKind::Bumper,
            KindDescriptor::StandupTarget => BodyKind::StandupTarget,
            KindDescriptor::DropTarget => BodyKind::DropTarget { down: false },
            KindDescriptor::Kicker { impulse } => BodyKind::Kicker { impulse: *impulse },
            KindDescriptor::Scoop {
                capture_delay_ms,
                eject_velocity,
                jitter,
                lock_capacity,
                extra_balls,
            } => BodyKind::Scoop(Scoop {
                capture_delay_ticks: ticks(*capture_delay_ms),
                eject_velocity: *eject_velocity,
                jitter: jitter.max(0.0),
                lock_capacity: *lock_capacity,
                extra_balls: *extra_balls,
                locked: 0,
                holding: None,
            }),
            KindDescriptor::RolloverLane {
                points,
                clear_bonus,
            } => {
                if *points <= 0 {
                    return Err(TableError::InvalidLanePoints {
                        body: id,
                        points: *points,
                    });
                }
                BodyKind::RolloverLane(RolloverLane {
                    lit: vec![false; *points as usize],
                    clear_bonus: *clear_bonus,
                })
            }
            KindDescriptor::Gate {
                closed_angle,
                open_angle,
                toggle_on_hit,
                kick,
            } => BodyKind::Gate(Gate {
                open: false,
                closed_angle: *closed_angle,
                open_angle: *open_angle,
                toggle_on_hit: *toggle_on_hit,
                kick: *kick,
            }),
            KindDescriptor::Flipper {
                side,
                rest_angle,
                activated_angle,
                max_rate,
            } => BodyKind::Flipper(Flipper::new(*side, *rest_angle, *activated_angle, *max_rate)),
        };

        let restitution = desc
            .restitution
            .unwrap_or_else(|| desc.kind.default_restitution());
        let cooldown_ms = desc
            .cooldown_ms
            .unwrap_or_else(|| desc.kind.default_cooldown_ms());

        Body::new(id, desc.shape, kind, restitution, desc.score, ticks(cooldown_ms))
    }

    /// Build the drop target banks; target membership is checked by the playfield
    pub fn build_banks(&self) -> Vec<DropTargetBank> {
        self.banks
            .iter()
            .enumerate()
            .map(|(idx, desc)| DropTargetBank {
                id: idx as u32,
                targets: desc.targets.clone(),
                bonus: desc.bonus,
                reset_delay_ticks: millis_to_ticks(
                    desc.reset_delay_ms.unwrap_or(DEFAULT_BANK_RESET_MS),
                    self.tick_ms,
                ),
                reset_at_tick: None,
            })
            .collect()
    }

    /// The built-in demo table
    ///
    /// Three pop bumpers under a three-lane rollover, a drop target bank on
    /// the left, a standup on the right, slingshots, a VUK, a two-ball lock
    /// and a diverter gate above a pair of flippers. The shooter lane runs
    /// up the right edge.
    pub fn classic() -> Self {
        let body = |shape: Shape, kind: KindDescriptor, score: u64| BodyDescriptor {
            shape,
            kind,
            restitution: None,
            score,
            cooldown_ms: None,
        };
        let wall = |pivot: Vec2, length: f32, angle: f32| {
            body(Shape::segment(pivot, length, angle, 4.0), KindDescriptor::Wall, 0)
        };
        let inlane_angle = (80.0f32).atan2(120.0);
        let inlane_length = Vec2::new(120.0, 80.0).length();

        let bodies = vec![
            // 0..=2: pop bumpers
            body(Shape::circle(Vec2::new(250.0, 200.0), 30.0), KindDescriptor::Bumper, 100),
            body(Shape::circle(Vec2::new(180.0, 270.0), 25.0), KindDescriptor::Bumper, 100),
            body(Shape::circle(Vec2::new(320.0, 270.0), 25.0), KindDescriptor::Bumper, 100),
            // 3: top rollover lanes
            body(
                Shape::rect(175.0, 40.0, 150.0, 20.0),
                KindDescriptor::RolloverLane {
                    points: 3,
                    clear_bonus: 3000,
                },
                50,
            ),
            // 4..=6: left drop target bank
            body(Shape::rect(40.0, 300.0, 10.0, 24.0), KindDescriptor::DropTarget, 250),
            body(Shape::rect(40.0, 330.0, 10.0, 24.0), KindDescriptor::DropTarget, 250),
            body(Shape::rect(40.0, 360.0, 10.0, 24.0), KindDescriptor::DropTarget, 250),
            // 7: right standup
            body(Shape::rect(440.0, 330.0, 10.0, 30.0), KindDescriptor::StandupTarget, 500),
            // 8..=9: slingshots
            body(
                Shape::segment(Vec2::new(100.0, 560.0), 50.0, 1.0, 6.0),
                KindDescriptor::Kicker {
                    impulse: Vec2::new(300.0, -300.0),
                },
                10,
            ),
            body(
                Shape::segment(Vec2::new(400.0, 560.0), 50.0, PI - 1.0, 6.0),
                KindDescriptor::Kicker {
                    impulse: Vec2::new(-300.0, -300.0),
                },
                10,
            ),
            // 10: VUK
            body(
                Shape::circle(Vec2::new(420.0, 150.0), 15.0),
                KindDescriptor::Scoop {
                    capture_delay_ms: DEFAULT_CAPTURE_DELAY_MS,
                    eject_velocity: Vec2::new(-250.0, 150.0),
                    jitter: 20.0,
                    lock_capacity: None,
                    extra_balls: 0,
                },
                1000,
            ),
            // 11: two-ball lock
            body(
                Shape::circle(Vec2::new(60.0, 150.0), 15.0),
                KindDescriptor::Scoop {
                    capture_delay_ms: 800.0,
                    eject_velocity: Vec2::new(250.0, 150.0),
                    jitter: 20.0,
                    lock_capacity: Some(2),
                    extra_balls: 2,
                },
                2000,
            ),
            // 12: diverter gate under the drop targets
            body(
                Shape::segment(Vec2::new(20.0, 440.0), 40.0, 0.0, 4.0),
                KindDescriptor::Gate {
                    closed_angle: 0.0,
                    open_angle: PI / 2.0,
                    toggle_on_hit: true,
                    kick: None,
                },
                25,
            ),
            // 13: shooter lane wall
            wall(Vec2::new(465.0, FIELD_HEIGHT), 600.0, -PI / 2.0),
            // 14..=15: inlane guides down to the flipper pivots
            wall(Vec2::new(40.0, 620.0), inlane_length, inlane_angle),
            wall(Vec2::new(460.0, 620.0), inlane_length, PI - inlane_angle),
            // 16..=17: flippers
            body(
                Shape::segment(Vec2::new(160.0, 700.0), FLIPPER_LENGTH, 0.5, FLIPPER_THICKNESS),
                KindDescriptor::Flipper {
                    side: FlipperSide::Left,
                    rest_angle: 0.5,
                    activated_angle: -0.5,
                    max_rate: FLIPPER_RATE,
                },
                0,
            ),
            body(
                Shape::segment(Vec2::new(340.0, 700.0), FLIPPER_LENGTH, PI - 0.5, FLIPPER_THICKNESS),
                KindDescriptor::Flipper {
                    side: FlipperSide::Right,
                    rest_angle: PI - 0.5,
                    activated_angle: PI + 0.5,
                    max_rate: FLIPPER_RATE,
                },
                0,
            ),
        ];

        Self {
            seed: 0x5eed,
            bodies,
            banks: vec![BankDescriptor {
                targets: vec![4, 5, 6],
                bonus: 5000,
                reset_delay_ms: Some(DEFAULT_BANK_RESET_MS),
            }],
            ..Self::default()
        }
    }
}
