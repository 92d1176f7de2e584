//! Game session state and control input
//!
//! The session owns every ball, the playfield and the score. Hosts queue
//! control events at any time; they are applied atomically at the start of
//! the next tick.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::body::BodyId;
use super::flipper::{Actuator, FlipperSide};
use super::playfield::Playfield;
use crate::error::TableError;
use crate::perp;
use crate::table::{PlungerConfig, TableConfig};

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the plunger
    AwaitingLaunch,
    /// At least one ball is on the table
    InPlay,
    /// Out of balls
    GameOver,
}

/// Direction of a table nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
}

impl NudgeDirection {
    pub fn vector(self) -> Vec2 {
        match self {
            NudgeDirection::Left => Vec2::NEG_X,
            NudgeDirection::Right => Vec2::X,
            NudgeDirection::Up => Vec2::NEG_Y,
        }
    }
}

/// Discrete control input from the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlEvent {
    /// Left flip button pressed (true) or released (false)
    FlipLeft(bool),
    FlipRight(bool),
    /// Plunger released with a pull strength in [0, 1]
    Plunge(f32),
    Nudge(NudgeDirection),
}

/// Everything observable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallLaunched { ball_id: u32 },
    BodyHit { body_id: BodyId, score: u64 },
    DropTargetDown { body_id: BodyId },
    BankCleared { bank_id: u32, bonus: u64 },
    BankReset { bank_id: u32 },
    LanePointLit { body_id: BodyId, index: usize },
    LaneCleared { body_id: BodyId, bonus: u64 },
    BallCaptured { ball_id: u32, body_id: BodyId },
    BallEjected { ball_id: u32, body_id: BodyId },
    MultiballRequested { body_id: BodyId, extra_balls: u32 },
    MultiballStarted { balls: u32 },
    GateToggled { body_id: BodyId, open: bool },
    TiltWarning { warnings: u32 },
    Tilt,
    BallDrained { ball_id: u32 },
    BallLost { balls_remaining: u32 },
    GameOver { score: u64 },
}

/// Per-game rules copied out of the table
#[derive(Debug, Clone)]
pub struct SessionRules {
    pub gravity: f32,
    pub ball_radius: f32,
    pub balls_per_game: u32,
    pub max_tilt_warnings: u32,
    pub nudge_impulse: f32,
    pub plunger: PlungerConfig,
}

impl From<&TableConfig> for SessionRules {
    fn from(table: &TableConfig) -> Self {
        Self {
            gravity: table.gravity,
            ball_radius: table.ball_radius,
            balls_per_game: table.balls_per_game,
            max_tilt_warnings: table.max_tilt_warnings,
            nudge_impulse: table.nudge_impulse,
            plunger: table.plunger.clone(),
        }
    }
}

/// One simulated pinball game
#[derive(Debug)]
pub struct GameSession {
    pub score: u64,
    /// Balls left including the one in play
    pub balls_remaining: u32,
    /// Balls on the table (sorted by id for determinism)
    pub active_balls: Vec<Ball>,
    pub tilt_warnings: u32,
    pub is_tilted: bool,
    /// Balls on the table right now (1 outside multiball)
    pub multiball_count: u32,
    /// Best final score seen by this session; hosts persist it
    pub high_score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub playfield: Playfield,
    pub rules: SessionRules,
    pending: VecDeque<ControlEvent>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameSession {
    /// Build the table and start a fresh game
    pub fn new(table: &TableConfig) -> Result<Self, TableError> {
        table.validate_rules()?;
        let playfield = Playfield::from_table(table)?;

        log::info!(
            "New game: {} bodies, {} banks, {} balls",
            playfield.bodies().len(),
            playfield.banks().len(),
            table.balls_per_game
        );

        Ok(Self {
            score: 0,
            balls_remaining: table.balls_per_game,
            active_balls: Vec::new(),
            tilt_warnings: 0,
            is_tilted: false,
            multiball_count: 0,
            high_score: 0,
            phase: GamePhase::AwaitingLaunch,
            time_ticks: 0,
            playfield,
            rules: SessionRules::from(table),
            pending: VecDeque::new(),
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Restart on the same table, keeping the high score
    pub fn new_game(&mut self) {
        self.score = 0;
        self.balls_remaining = self.rules.balls_per_game;
        self.active_balls.clear();
        self.tilt_warnings = 0;
        self.is_tilted = false;
        self.multiball_count = 0;
        self.phase = GamePhase::AwaitingLaunch;
        self.time_ticks = 0;
        self.playfield.reset();
        self.pending.clear();
        self.events.clear();
        self.next_id = 1;
        log::info!("New game (high score {})", self.high_score);
    }

    /// Seed the high score from external storage
    pub fn set_high_score(&mut self, high_score: u64) {
        self.high_score = self.high_score.max(high_score);
    }

    /// Queue a control event for the next tick
    pub fn apply_control(&mut self, event: ControlEvent) {
        self.pending.push_back(event);
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Allocate a new ball ID
    pub fn next_ball_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Apply every queued control event in arrival order
    pub(crate) fn apply_pending_controls(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.apply_control_now(event);
        }
    }

    fn apply_control_now(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::FlipLeft(pressed) => self.flip(FlipperSide::Left, pressed),
            ControlEvent::FlipRight(pressed) => self.flip(FlipperSide::Right, pressed),
            ControlEvent::Plunge(pull) => self.plunge(pull),
            ControlEvent::Nudge(direction) => self.nudge(direction),
        }
    }

    fn flip(&mut self, side: FlipperSide, pressed: bool) {
        if self.is_tilted || self.phase == GamePhase::GameOver {
            return;
        }
        let actuator = if pressed {
            Actuator::Activated
        } else {
            Actuator::Rest
        };
        self.playfield.set_flippers(side, actuator);
    }

    fn plunge(&mut self, pull: f32) {
        if self.phase != GamePhase::AwaitingLaunch {
            return;
        }
        let plunger = &self.rules.plunger;
        let pull = if pull.is_finite() { pull.clamp(0.0, 1.0) } else { 0.0 };
        let speed = plunger.min_speed + pull * (plunger.max_speed - plunger.min_speed);
        let pos = plunger.position;

        let id = self.next_ball_id();
        self.active_balls
            .push(Ball::new(id, pos, Vec2::new(0.0, -speed), self.rules.ball_radius));
        self.multiball_count = self.active_balls.len() as u32;
        self.phase = GamePhase::InPlay;

        log::info!("Ball {} launched at {:.0} px/s", id, speed);
        self.emit(GameEvent::BallLaunched { ball_id: id });
    }

    fn nudge(&mut self, direction: NudgeDirection) {
        if self.phase != GamePhase::InPlay || self.is_tilted {
            return;
        }
        let impulse = direction.vector() * self.rules.nudge_impulse;
        for ball in self.active_balls.iter_mut().filter(|b| b.is_in_play()) {
            ball.vel += impulse;
        }

        self.tilt_warnings += 1;
        self.emit(GameEvent::TiltWarning {
            warnings: self.tilt_warnings,
        });

        if self.tilt_warnings >= self.rules.max_tilt_warnings {
            self.is_tilted = true;
            self.playfield.rest_all_flippers();
            log::warn!("TILT after {} warnings", self.tilt_warnings);
            self.emit(GameEvent::Tilt);
        }
    }

    /// Open or close a gate from table logic (mode lights, ball locks)
    pub fn set_gate(&mut self, body_id: BodyId, open: bool) {
        if let Some(event) = self.playfield.set_gate(body_id, open) {
            self.emit(event);
        }
    }

    /// Spawn extra balls out of a lock body, side by side across the eject
    /// direction so they never overlap
    pub(crate) fn start_multiball(&mut self, body_id: BodyId, extra_balls: u32) {
        let radius = self.rules.ball_radius;
        let mut spawned = 0;
        for i in 0..extra_balls {
            let Some((pos, vel)) = self.playfield.launch_from(body_id, radius) else {
                break;
            };
            let across = perp(vel.try_normalize().unwrap_or(Vec2::NEG_Y));
            let pos = pos + across * (2.0 * radius * i as f32);
            let id = self.next_ball_id();
            self.active_balls.push(Ball::new(id, pos, vel, radius));
            spawned += 1;
        }
        if spawned > 0 {
            self.multiball_count = self.active_balls.len() as u32;
            log::info!("Multiball! {} balls on the table", self.multiball_count);
            self.emit(GameEvent::MultiballStarted {
                balls: self.multiball_count,
            });
        }
    }

    /// Last ball left the table: next ball or game over
    pub(crate) fn ball_lost(&mut self) {
        self.balls_remaining = self.balls_remaining.saturating_sub(1);
        self.tilt_warnings = 0;
        self.is_tilted = false;
        self.multiball_count = 0;

        if self.balls_remaining > 0 {
            self.phase = GamePhase::AwaitingLaunch;
            log::info!("Ball lost, {} remaining", self.balls_remaining);
            self.emit(GameEvent::BallLost {
                balls_remaining: self.balls_remaining,
            });
        } else {
            self.phase = GamePhase::GameOver;
            self.high_score = self.high_score.max(self.score);
            log::info!("Game over: {} (high {})", self.score, self.high_score);
            self.emit(GameEvent::BallLost { balls_remaining: 0 });
            self.emit(GameEvent::GameOver { score: self.score });
        }
    }

    /// Ensure balls are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.active_balls.sort_by_key(|b| b.id);
    }
}
