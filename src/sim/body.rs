//! Playfield bodies and their per-kind state machines
//!
//! Every body shares one contract: the playfield bounces the ball off the
//! body's shape, then calls [`Body::handle_collision`], which returns the
//! score awarded, the events raised and an optional effect on the ball
//! (a kick or a capture). A body under cooldown still bounces the ball but
//! awards nothing and does not advance its state machine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{CollisionResult, ball_shape_collision, swept_segment_contact};
use super::flipper::{Actuator, Flipper};
use super::shape::Shape;
use super::state::GameEvent;
use crate::consts::MAX_RESTITUTION;
use crate::error::TableError;

/// Stable body identifier (registration order)
pub type BodyId = u32;

/// Capture-and-eject hole (scoop, VUK, subway entrance, multiball lock)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoop {
    pub capture_delay_ticks: u32,
    pub eject_velocity: Vec2,
    /// Uniform jitter (pixels/s) added to each eject velocity component
    pub jitter: f32,
    /// Captures needed to start multiball (None = plain scoop)
    pub lock_capacity: Option<u32>,
    pub extra_balls: u32,
    pub locked: u32,
    pub holding: Option<Hold>,
}

/// A ball held by a scoop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hold {
    pub ball_id: u32,
    pub release_at_tick: u64,
}

/// Rollover lane with N switches laid out left to right
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverLane {
    pub lit: Vec<bool>,
    pub clear_bonus: u64,
}

impl RolloverLane {
    pub fn all_lit(&self) -> bool {
        self.lit.iter().all(|&l| l)
    }
}

/// Gate, diverter or spinner: a segment with two angles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub open: bool,
    pub closed_angle: f32,
    pub open_angle: f32,
    pub toggle_on_hit: bool,
    pub kick: Option<Vec2>,
}

/// Behavior variant of a body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BodyKind {
    /// Solid, scoreless guide
    Wall,
    Bumper,
    StandupTarget,
    DropTarget { down: bool },
    /// Kicker or slingshot: adds a directional impulse on hit
    Kicker { impulse: Vec2 },
    Scoop(Scoop),
    RolloverLane(RolloverLane),
    Gate(Gate),
    Flipper(Flipper),
}

impl BodyKind {
    pub fn name(&self) -> &'static str {
        match self {
            BodyKind::Wall => "wall",
            BodyKind::Bumper => "bumper",
            BodyKind::StandupTarget => "standup_target",
            BodyKind::DropTarget { .. } => "drop_target",
            BodyKind::Kicker { .. } => "kicker",
            BodyKind::Scoop(_) => "scoop",
            BodyKind::RolloverLane(_) => "rollover_lane",
            BodyKind::Gate(_) => "gate",
            BodyKind::Flipper(_) => "flipper",
        }
    }
}

/// Extra effect a collision has on the ball beyond the bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallEffect {
    /// Added to the ball velocity
    Impulse(Vec2),
    /// Pin the ball at `anchor` until `release_at_tick`
    Capture { anchor: Vec2, release_at_tick: u64 },
}

/// What a single body collision produced
#[derive(Debug, Clone, Default)]
pub struct CollisionOutcome {
    pub score: u64,
    pub events: Vec<GameEvent>,
    pub effect: Option<BallEffect>,
}

impl CollisionOutcome {
    pub fn none() -> Self {
        Self::default()
    }

    fn scored(body_id: BodyId, score: u64) -> Self {
        Self {
            score,
            events: vec![GameEvent::BodyHit { body_id, score }],
            effect: None,
        }
    }
}

/// An interactive playfield object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub shape: Shape,
    pub kind: BodyKind,
    /// Bounce coefficient (magnitude used; source tables write it negative)
    pub restitution: f32,
    pub score_value: u64,
    pub cooldown_ticks: u32,
    pub cooldown_remaining: u32,
}

impl Body {
    pub fn new(
        id: BodyId,
        shape: Shape,
        kind: BodyKind,
        restitution: f32,
        score_value: u64,
        cooldown_ticks: u32,
    ) -> Result<Self, TableError> {
        shape.validate(id)?;

        let magnitude = restitution.abs();
        if !(magnitude > 0.0 && magnitude <= MAX_RESTITUTION) {
            return Err(TableError::InvalidRestitution {
                body: id,
                restitution,
            });
        }

        match &kind {
            BodyKind::RolloverLane(lane) => {
                if lane.lit.is_empty() {
                    return Err(TableError::InvalidLanePoints { body: id, points: 0 });
                }
                if !matches!(shape, Shape::Rect { .. }) {
                    return Err(TableError::LaneShape { body: id });
                }
            }
            BodyKind::Flipper(flipper) => {
                if !matches!(shape, Shape::Segment { .. }) || !(flipper.max_rate > 0.0) {
                    return Err(TableError::InvalidFlipper { body: id });
                }
            }
            _ => {}
        }

        let mut body = Self {
            id,
            shape,
            kind,
            restitution,
            score_value,
            cooldown_ticks,
            cooldown_remaining: 0,
        };
        body.sync_shape();
        Ok(body)
    }

    /// Sensors detect the ball without bouncing it
    pub fn is_solid(&self) -> bool {
        !matches!(self.kind, BodyKind::RolloverLane(_) | BodyKind::Scoop(_))
    }

    /// Whether the body takes part in collision tests at all
    pub fn is_collidable(&self) -> bool {
        match &self.kind {
            BodyKind::DropTarget { down } => !down,
            BodyKind::Scoop(scoop) => scoop.holding.is_none(),
            _ => true,
        }
    }

    pub fn is_cooling(&self) -> bool {
        self.cooldown_remaining > 0
    }

    /// Lit flag for rendering
    pub fn is_lit(&self) -> bool {
        match &self.kind {
            BodyKind::Wall => false,
            BodyKind::DropTarget { down } => *down,
            BodyKind::Scoop(scoop) => scoop.holding.is_some(),
            BodyKind::RolloverLane(lane) => lane.lit.iter().any(|&l| l),
            BodyKind::Gate(gate) => gate.open,
            BodyKind::Flipper(flipper) => flipper.actuator == Actuator::Activated,
            BodyKind::Bumper | BodyKind::StandupTarget | BodyKind::Kicker { .. } => {
                self.is_cooling()
            }
        }
    }

    /// Per-point lit flags (rollover lanes only)
    pub fn lit_points(&self) -> Vec<bool> {
        match &self.kind {
            BodyKind::RolloverLane(lane) => lane.lit.clone(),
            _ => Vec::new(),
        }
    }

    fn start_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_ticks;
    }

    /// Run the body's state machine for a ball contact
    pub fn handle_collision(
        &mut self,
        ball: &Ball,
        contact: &CollisionResult,
        now: u64,
    ) -> CollisionOutcome {
        if self.is_cooling() || !self.is_collidable() {
            return CollisionOutcome::none();
        }

        let id = self.id;
        let score = self.score_value;

        let outcome = match &mut self.kind {
            BodyKind::Wall | BodyKind::Flipper(_) => CollisionOutcome::none(),

            BodyKind::Bumper | BodyKind::StandupTarget => {
                self.start_cooldown();
                CollisionOutcome::scored(id, score)
            }

            BodyKind::DropTarget { down } => {
                *down = true;
                self.start_cooldown();
                let mut outcome = CollisionOutcome::scored(id, score);
                outcome.events.push(GameEvent::DropTargetDown { body_id: id });
                outcome
            }

            BodyKind::Kicker { impulse } => {
                let impulse = *impulse;
                self.start_cooldown();
                let mut outcome = CollisionOutcome::scored(id, score);
                outcome.effect = Some(BallEffect::Impulse(impulse));
                outcome
            }

            BodyKind::Scoop(scoop) => {
                let release_at_tick = now + scoop.capture_delay_ticks as u64;
                scoop.holding = Some(Hold {
                    ball_id: ball.id,
                    release_at_tick,
                });

                let mut outcome = CollisionOutcome::scored(id, score);
                outcome.events.push(GameEvent::BallCaptured {
                    ball_id: ball.id,
                    body_id: id,
                });

                if let Some(capacity) = scoop.lock_capacity {
                    scoop.locked += 1;
                    if scoop.locked >= capacity {
                        scoop.locked = 0;
                        outcome.events.push(GameEvent::MultiballRequested {
                            body_id: id,
                            extra_balls: scoop.extra_balls,
                        });
                    }
                }

                outcome.effect = Some(BallEffect::Capture {
                    anchor: self.shape.anchor(),
                    release_at_tick,
                });
                outcome
            }

            BodyKind::RolloverLane(lane) => {
                let index = self.shape.subdivide_x(ball.pos, lane.lit.len());
                if lane.lit[index] {
                    return CollisionOutcome::none();
                }
                lane.lit[index] = true;

                let mut outcome = CollisionOutcome::scored(id, score);
                outcome.events.push(GameEvent::LanePointLit { body_id: id, index });

                if lane.all_lit() {
                    let bonus = lane.clear_bonus;
                    lane.lit.iter_mut().for_each(|l| *l = false);
                    outcome.score += bonus;
                    outcome.events.push(GameEvent::LaneCleared { body_id: id, bonus });
                    // Keep the ball from relighting the last point on its way out
                    self.start_cooldown();
                }
                outcome
            }

            BodyKind::Gate(gate) => {
                let kick = gate.kick;
                let toggled = if gate.toggle_on_hit {
                    gate.open = !gate.open;
                    Some(gate.open)
                } else {
                    None
                };
                self.start_cooldown();
                self.sync_shape();

                let mut outcome = CollisionOutcome::scored(id, score);
                if let Some(open) = toggled {
                    outcome.events.push(GameEvent::GateToggled { body_id: id, open });
                }
                outcome.effect = kick.map(BallEffect::Impulse);
                outcome
            }
        };

        if outcome.score > 0 {
            log::debug!(
                "{} {} hit at ({:.1}, {:.1}) for {}",
                self.kind.name(),
                id,
                contact.point.x,
                contact.point.y,
                outcome.score
            );
        }
        outcome
    }

    /// Decrement the cooldown and release a held ball once its tick arrives.
    /// Returns the id of a ball that must be ejected.
    ///
    /// An ejection starts the cooldown before this tick's decrement, the same
    /// as a hit does, so both suppress the same number of following ticks.
    pub fn advance_timers(&mut self, now: u64) -> Option<u32> {
        let mut released = None;
        if let BodyKind::Scoop(scoop) = &mut self.kind
            && let Some(hold) = scoop.holding
            && now >= hold.release_at_tick
        {
            scoop.holding = None;
            self.cooldown_remaining = self.cooldown_ticks;
            released = Some(hold.ball_id);
        }

        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
        released
    }

    /// Exit point and base velocity of a scoop ejection
    pub fn eject_path(&self, ball_radius: f32) -> Option<(Vec2, Vec2)> {
        let BodyKind::Scoop(scoop) = &self.kind else {
            return None;
        };
        let dir = scoop.eject_velocity.try_normalize().unwrap_or(Vec2::NEG_Y);
        let exit = self.shape.anchor() + dir * (self.shape.extent() + ball_radius + 1.0);
        Some((exit, scoop.eject_velocity))
    }

    /// Open or close a gate; returns true if the state changed
    pub fn set_gate(&mut self, open: bool) -> bool {
        let BodyKind::Gate(gate) = &mut self.kind else {
            return false;
        };
        if gate.open == open {
            return false;
        }
        gate.open = open;
        self.sync_shape();
        true
    }

    /// Raise a lowered drop target
    pub fn raise(&mut self) {
        if let BodyKind::DropTarget { down } = &mut self.kind {
            *down = false;
        }
    }

    pub fn flipper(&self) -> Option<&Flipper> {
        match &self.kind {
            BodyKind::Flipper(flipper) => Some(flipper),
            _ => None,
        }
    }

    pub fn flipper_mut(&mut self) -> Option<&mut Flipper> {
        match &mut self.kind {
            BodyKind::Flipper(flipper) => Some(flipper),
            _ => None,
        }
    }

    /// Advance a flipper's swing and rotate its segment to match
    pub fn step_flipper(&mut self, dt: f32) {
        if let BodyKind::Flipper(flipper) = &mut self.kind {
            flipper.step(dt);
            self.sync_shape();
        }
    }

    /// Velocity of the body surface at `point` (non-zero only for a swinging flipper)
    pub fn surface_velocity(&self, point: Vec2) -> Vec2 {
        match (&self.kind, self.shape) {
            (BodyKind::Flipper(flipper), Shape::Segment { pivot, .. }) => {
                flipper.surface_velocity(pivot, point)
            }
            _ => Vec2::ZERO,
        }
    }

    /// Contact test for a ball against this body. A flipper that swept past
    /// the ball center this tick reports the contact on the side the ball
    /// came from.
    pub fn contact(&self, ball_pos: Vec2, ball_radius: f32) -> CollisionResult {
        if let (
            BodyKind::Flipper(flipper),
            Shape::Segment {
                pivot,
                length,
                thickness,
                ..
            },
        ) = (&self.kind, self.shape)
        {
            if let Some(swept) = swept_segment_contact(
                ball_pos,
                ball_radius,
                pivot,
                length,
                thickness,
                flipper.prev_angle,
                flipper.angle,
            ) {
                return swept;
            }
        }
        ball_shape_collision(ball_pos, ball_radius, &self.shape)
    }

    /// Keep segment geometry in step with flipper/gate state
    fn sync_shape(&mut self) {
        let angle = match &self.kind {
            BodyKind::Flipper(flipper) => flipper.angle,
            BodyKind::Gate(gate) => {
                if gate.open {
                    gate.open_angle
                } else {
                    gate.closed_angle
                }
            }
            _ => return,
        };
        self.shape.set_angle(angle);
    }

    /// Clear all timers and return to the initial state (new game)
    pub fn reset(&mut self) {
        self.cooldown_remaining = 0;
        match &mut self.kind {
            BodyKind::DropTarget { down } => *down = false,
            BodyKind::Scoop(scoop) => {
                scoop.holding = None;
                scoop.locked = 0;
            }
            BodyKind::RolloverLane(lane) => lane.lit.iter_mut().for_each(|l| *l = false),
            BodyKind::Gate(gate) => gate.open = false,
            BodyKind::Flipper(flipper) => flipper.reset(),
            _ => {}
        }
        self.sync_shape();
    }

    /// Tip of the body's segment, if it has one
    pub fn tip(&self) -> Option<Vec2> {
        self.shape.endpoints().map(|(_, tip)| tip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::flipper::FlipperSide;

    fn contact() -> CollisionResult {
        CollisionResult {
            hit: true,
            point: Vec2::ZERO,
            normal: Vec2::NEG_Y,
            penetration: 1.0,
        }
    }

    fn ball_at(pos: Vec2) -> Ball {
        Ball::new(1, pos, Vec2::ZERO, 10.0)
    }

    fn bumper(cooldown: u32) -> Body {
        Body::new(
            0,
            Shape::circle(Vec2::new(250.0, 200.0), 30.0),
            BodyKind::Bumper,
            -0.8,
            100,
            cooldown,
        )
        .unwrap()
    }

    fn scoop(delay: u32, lock_capacity: Option<u32>) -> Body {
        Body::new(
            3,
            Shape::circle(Vec2::new(100.0, 100.0), 15.0),
            BodyKind::Scoop(Scoop {
                capture_delay_ticks: delay,
                eject_velocity: Vec2::new(0.0, -400.0),
                jitter: 0.0,
                lock_capacity,
                extra_balls: 2,
                locked: 0,
                holding: None,
            }),
            0.5,
            750,
            5,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_restitution() {
        let err = Body::new(0, Shape::circle(Vec2::ZERO, 5.0), BodyKind::Bumper, 0.0, 10, 0);
        assert!(matches!(err, Err(TableError::InvalidRestitution { .. })));
        let err = Body::new(0, Shape::circle(Vec2::ZERO, 5.0), BodyKind::Bumper, 1.5, 10, 0);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_empty_lane() {
        let lane = BodyKind::RolloverLane(RolloverLane {
            lit: Vec::new(),
            clear_bonus: 0,
        });
        let err = Body::new(0, Shape::rect(0.0, 0.0, 30.0, 10.0), lane, 1.0, 10, 0);
        assert!(matches!(err, Err(TableError::InvalidLanePoints { .. })));
    }

    #[test]
    fn test_cooldown_gates_scoring() {
        let mut body = bumper(3);
        let ball = ball_at(Vec2::new(250.0, 235.0));

        assert_eq!(body.handle_collision(&ball, &contact(), 0).score, 100);
        assert_eq!(body.cooldown_remaining, 3);

        // Re-hits inside the window award nothing
        for tick in 0..2 {
            body.advance_timers(tick);
            assert!(body.is_cooling());
            assert_eq!(body.handle_collision(&ball, &contact(), tick).score, 0);
        }

        // Scoring resumes exactly when the countdown reaches zero
        body.advance_timers(2);
        assert_eq!(body.cooldown_remaining, 0);
        assert_eq!(body.handle_collision(&ball, &contact(), 3).score, 100);
    }

    #[test]
    fn test_drop_target_goes_down_once() {
        let mut body = Body::new(
            1,
            Shape::rect(0.0, 0.0, 20.0, 6.0),
            BodyKind::DropTarget { down: false },
            0.6,
            500,
            0,
        )
        .unwrap();
        let ball = ball_at(Vec2::new(10.0, -5.0));

        let outcome = body.handle_collision(&ball, &contact(), 0);
        assert_eq!(outcome.score, 500);
        assert!(outcome
            .events
            .contains(&GameEvent::DropTargetDown { body_id: 1 }));
        assert!(!body.is_collidable());

        let outcome = body.handle_collision(&ball, &contact(), 1);
        assert_eq!(outcome.score, 0);

        body.raise();
        assert!(body.is_collidable());
    }

    #[test]
    fn test_kicker_applies_impulse() {
        let mut body = Body::new(
            2,
            Shape::segment(Vec2::new(80.0, 600.0), 60.0, 1.0, 4.0),
            BodyKind::Kicker {
                impulse: Vec2::new(300.0, -200.0),
            },
            0.9,
            10,
            6,
        )
        .unwrap();
        let outcome = body.handle_collision(&ball_at(Vec2::ZERO), &contact(), 0);
        assert_eq!(outcome.score, 10);
        assert_eq!(outcome.effect, Some(BallEffect::Impulse(Vec2::new(300.0, -200.0))));

        // Under cooldown the kicker does not fire again
        let outcome = body.handle_collision(&ball_at(Vec2::ZERO), &contact(), 1);
        assert!(outcome.effect.is_none());
    }

    #[test]
    fn test_scoop_capture_and_release() {
        let mut body = scoop(31, None);
        let outcome = body.handle_collision(&ball_at(Vec2::new(100.0, 100.0)), &contact(), 10);
        assert_eq!(
            outcome.effect,
            Some(BallEffect::Capture {
                anchor: Vec2::new(100.0, 100.0),
                release_at_tick: 41
            })
        );
        assert!(!body.is_collidable());
        assert!(body.is_lit());

        for tick in 10..41 {
            assert_eq!(body.advance_timers(tick), None);
        }
        assert_eq!(body.advance_timers(41), Some(1));
        assert!(body.is_collidable());
        assert!(body.is_cooling());
    }

    #[test]
    fn test_eject_and_hit_cooldowns_match() {
        // Ejection at the end of tick 41
        let mut ejected = scoop(31, None);
        ejected.handle_collision(&ball_at(Vec2::new(100.0, 100.0)), &contact(), 10);
        for tick in 10..=41 {
            ejected.advance_timers(tick);
        }

        // Hit during tick 41
        let mut hit = bumper(5);
        hit.handle_collision(&ball_at(Vec2::new(250.0, 235.0)), &contact(), 41);
        hit.advance_timers(41);

        assert_eq!(ejected.cooldown_remaining, 4);
        assert_eq!(ejected.cooldown_remaining, hit.cooldown_remaining);

        let mut suppressed = 0;
        for tick in 42..60 {
            if ejected.is_cooling() {
                suppressed += 1;
            }
            ejected.advance_timers(tick);
        }
        assert_eq!(suppressed, 4);
    }

    #[test]
    fn test_scoop_lock_requests_multiball() {
        let mut body = scoop(1, Some(2));
        let first = body.handle_collision(&ball_at(Vec2::ZERO), &contact(), 0);
        assert!(!first
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::MultiballRequested { .. })));

        body.advance_timers(1);
        body.cooldown_remaining = 0;

        let second = body.handle_collision(&ball_at(Vec2::ZERO), &contact(), 2);
        assert!(second.events.contains(&GameEvent::MultiballRequested {
            body_id: 3,
            extra_balls: 2
        }));
    }

    #[test]
    fn test_eject_path_clears_scoop() {
        let body = scoop(1, None);
        let (exit, vel) = body.eject_path(10.0).unwrap();
        assert_eq!(vel, Vec2::new(0.0, -400.0));
        // 15 (scoop) + 10 (ball) + 1 above the anchor
        assert!((exit - Vec2::new(100.0, 74.0)).length() < 1e-4);
    }

    #[test]
    fn test_rollover_lane_lights_points_and_clears() {
        let mut body = Body::new(
            4,
            Shape::rect(100.0, 50.0, 90.0, 10.0),
            BodyKind::RolloverLane(RolloverLane {
                lit: vec![false; 3],
                clear_bonus: 5000,
            }),
            1.0,
            100,
            4,
        )
        .unwrap();
        assert!(!body.is_solid());

        let left = ball_at(Vec2::new(110.0, 55.0));
        let middle = ball_at(Vec2::new(145.0, 55.0));
        let right = ball_at(Vec2::new(180.0, 55.0));

        assert_eq!(body.handle_collision(&left, &contact(), 0).score, 100);
        // Already lit: nothing
        assert_eq!(body.handle_collision(&left, &contact(), 1).score, 0);
        assert_eq!(body.handle_collision(&middle, &contact(), 2).score, 100);
        assert_eq!(body.lit_points(), vec![true, true, false]);

        let outcome = body.handle_collision(&right, &contact(), 3);
        assert_eq!(outcome.score, 100 + 5000);
        assert!(outcome
            .events
            .contains(&GameEvent::LaneCleared { body_id: 4, bonus: 5000 }));
        assert_eq!(body.lit_points(), vec![false; 3]);
        assert!(body.is_cooling());
    }

    #[test]
    fn test_gate_toggle_changes_shape() {
        let mut body = Body::new(
            5,
            Shape::segment(Vec2::new(400.0, 150.0), 40.0, 0.0, 4.0),
            BodyKind::Gate(Gate {
                open: false,
                closed_angle: 1.5,
                open_angle: 0.3,
                toggle_on_hit: true,
                kick: None,
            }),
            0.7,
            25,
            0,
        )
        .unwrap();
        assert!(matches!(body.shape, Shape::Segment { angle, .. } if angle == 1.5));

        let outcome = body.handle_collision(&ball_at(Vec2::ZERO), &contact(), 0);
        assert!(outcome
            .events
            .contains(&GameEvent::GateToggled { body_id: 5, open: true }));
        assert!(matches!(body.shape, Shape::Segment { angle, .. } if angle == 0.3));

        assert!(body.set_gate(false));
        assert!(!body.set_gate(false));
        assert!(matches!(body.shape, Shape::Segment { angle, .. } if angle == 1.5));
    }

    #[test]
    fn test_flipper_syncs_segment_angle() {
        let mut body = Body::new(
            6,
            Shape::segment(Vec2::new(160.0, 700.0), 70.0, 0.0, 12.0),
            BodyKind::Flipper(Flipper::new(FlipperSide::Left, 0.5, -0.5, 10.0)),
            0.5,
            0,
            0,
        )
        .unwrap();
        assert!(matches!(body.shape, Shape::Segment { angle, .. } if angle == 0.5));

        body.flipper_mut().unwrap().set_actuator(Actuator::Activated);
        body.step_flipper(0.05);
        assert!(matches!(body.shape, Shape::Segment { angle, .. } if angle.abs() < 1e-5));
        assert!(body.surface_velocity(body.tip().unwrap()).length() > 0.0);

        body.reset();
        assert!(matches!(body.shape, Shape::Segment { angle, .. } if angle == 0.5));
    }
}
