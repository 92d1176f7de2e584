//! Playfield: canvas bounds, registered bodies and collision resolution
//!
//! The playfield is the only owner of bodies. Cross-body effects such as a
//! drop target bank noticing that all of its targets are down go through
//! the playfield by body id; bodies never reference each other.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallState};
use super::body::{BallEffect, Body, BodyId, BodyKind};
use super::flipper::{Actuator, FlipperSide};
use super::state::GameEvent;
use crate::error::TableError;
use crate::table::TableConfig;

/// A group of drop targets that pays a bonus when all are down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropTargetBank {
    pub id: u32,
    pub targets: Vec<BodyId>,
    pub bonus: u64,
    pub reset_delay_ticks: u32,
    /// Tick at which the targets pop back up (set once cleared)
    pub reset_at_tick: Option<u64>,
}

/// Score and events produced while resolving one ball for one tick
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub score: u64,
    pub events: Vec<GameEvent>,
}

/// The table surface
#[derive(Debug)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    pub wall_elasticity: f32,
    bodies: Vec<Body>,
    banks: Vec<DropTargetBank>,
    seed: u64,
    rng: Pcg32,
}

impl Playfield {
    pub fn new(
        width: f32,
        height: f32,
        wall_elasticity: f32,
        bodies: Vec<Body>,
        banks: Vec<DropTargetBank>,
        seed: u64,
    ) -> Result<Self, TableError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(TableError::InvalidField { width, height });
        }

        // Every bank target must be a drop target owned by exactly one bank
        let mut owned: Vec<BodyId> = Vec::new();
        for bank in &banks {
            if bank.targets.is_empty() {
                return Err(TableError::EmptyBank { bank: bank.id });
            }
            for &target in &bank.targets {
                let body = bodies
                    .iter()
                    .find(|b| b.id == target)
                    .ok_or(TableError::UnknownBankTarget {
                        bank: bank.id,
                        target,
                    })?;
                if !matches!(body.kind, BodyKind::DropTarget { .. }) {
                    return Err(TableError::NotADropTarget {
                        bank: bank.id,
                        target,
                    });
                }
                if owned.contains(&target) {
                    return Err(TableError::SharedDropTarget {
                        bank: bank.id,
                        target,
                    });
                }
                owned.push(target);
            }
        }

        Ok(Self {
            width,
            height,
            wall_elasticity,
            bodies,
            banks,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Build and validate the playfield a table describes
    pub fn from_table(table: &TableConfig) -> Result<Self, TableError> {
        let bodies = table.build_bodies()?;
        let banks = table.build_banks();
        Self::new(
            table.width,
            table.height,
            table.wall_elasticity,
            bodies,
            banks,
            table.seed,
        )
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn banks(&self) -> &[DropTargetBank] {
        &self.banks
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// Clamp the ball inside the left/right/top walls, bouncing the
    /// perpendicular velocity component. Returns true if the ball drained
    /// through the bottom.
    pub fn resolve_bounds(&self, ball: &mut Ball) -> bool {
        let r = ball.radius;
        let e = self.wall_elasticity;

        if ball.pos.x - r < 0.0 {
            ball.pos.x = r;
            if ball.vel.x < 0.0 {
                ball.vel.x = -ball.vel.x * e;
            }
        } else if ball.pos.x + r > self.width {
            ball.pos.x = self.width - r;
            if ball.vel.x > 0.0 {
                ball.vel.x = -ball.vel.x * e;
            }
        }

        if ball.pos.y - r < 0.0 {
            ball.pos.y = r;
            if ball.vel.y < 0.0 {
                ball.vel.y = -ball.vel.y * e;
            }
        }

        self.is_below_bottom(ball)
    }

    #[inline]
    pub fn is_below_bottom(&self, ball: &Ball) -> bool {
        ball.pos.y > self.height
    }

    /// Resolve one ball against every body in registration order.
    ///
    /// Overlaps are handled one after another, each against the position
    /// left by the previous push-out. When `live` is false (tilt) bodies
    /// still bounce the ball but score nothing and keep their state.
    pub fn resolve_bodies(&mut self, ball: &mut Ball, now: u64, live: bool) -> Resolution {
        let mut resolution = Resolution::default();
        let mut downed: Vec<BodyId> = Vec::new();

        for body in self.bodies.iter_mut() {
            if !ball.is_in_play() {
                break;
            }
            if !body.is_collidable() {
                continue;
            }

            let contact = body.contact(ball.pos, ball.radius);
            if !contact.hit {
                continue;
            }

            if body.is_solid() {
                // Push out along the normal, then bounce in the surface's
                // frame if the ball is closing on it. A swinging flipper only
                // makes up the shortfall, so a ball already leaving faster
                // than the surface keeps its speed.
                ball.pos += contact.normal * contact.penetration;
                let surface = body.surface_velocity(contact.point);
                if (ball.vel - surface).dot(contact.normal) < 0.0 {
                    ball.vel -= surface;
                    ball.reflect_off(contact.normal, body.restitution);
                    ball.vel += surface;
                }
            }

            if !live {
                continue;
            }

            let outcome = body.handle_collision(ball, &contact, now);
            match outcome.effect {
                Some(BallEffect::Impulse(impulse)) => ball.vel += impulse,
                Some(BallEffect::Capture {
                    anchor,
                    release_at_tick,
                }) => {
                    log::debug!("Ball {} captured by body {}", ball.id, body.id);
                    ball.capture(body.id, anchor, release_at_tick);
                }
                None => {}
            }

            resolution.score += outcome.score;
            for event in outcome.events {
                if let GameEvent::DropTargetDown { body_id } = event {
                    downed.push(body_id);
                }
                resolution.events.push(event);
            }
        }

        for body_id in downed {
            self.check_bank(body_id, now, &mut resolution);
        }
        resolution
    }

    /// Pay the bank bonus once every target in the bank is down
    fn check_bank(&mut self, body_id: BodyId, now: u64, resolution: &mut Resolution) {
        let Some(bank) = self.banks.iter_mut().find(|b| b.targets.contains(&body_id)) else {
            return;
        };
        if bank.reset_at_tick.is_some() {
            return;
        }
        let all_down = bank.targets.iter().all(|&target| {
            self.bodies
                .iter()
                .any(|b| b.id == target && matches!(b.kind, BodyKind::DropTarget { down: true }))
        });
        if !all_down {
            return;
        }

        bank.reset_at_tick = Some(now + bank.reset_delay_ticks as u64);
        resolution.score += bank.bonus;
        log::debug!("Bank {} cleared for {}", bank.id, bank.bonus);
        resolution.events.push(GameEvent::BankCleared {
            bank_id: bank.id,
            bonus: bank.bonus,
        });
    }

    /// Advance cooldowns, eject captured balls whose time has come and
    /// raise cleared banks.
    pub fn advance_timers(&mut self, now: u64, balls: &mut [Ball]) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for idx in 0..self.bodies.len() {
            let Some(ball_id) = self.bodies[idx].advance_timers(now) else {
                continue;
            };
            let body_id = self.bodies[idx].id;
            let Some(ball) = balls.iter_mut().find(|b| b.id == ball_id) else {
                continue;
            };
            if !matches!(ball.state, BallState::Captured { body_id: held_by, .. } if held_by == body_id) {
                continue;
            }
            if let Some((pos, vel)) = self.launch_from(body_id, ball.radius) {
                ball.release(pos, vel);
                log::debug!("Ball {} ejected from body {}", ball_id, body_id);
                events.push(GameEvent::BallEjected { ball_id, body_id });
            }
        }

        for bank in self.banks.iter_mut() {
            let Some(reset_at) = bank.reset_at_tick else {
                continue;
            };
            if now < reset_at {
                continue;
            }
            bank.reset_at_tick = None;
            for body in self.bodies.iter_mut().filter(|b| bank.targets.contains(&b.id)) {
                body.raise();
            }
            events.push(GameEvent::BankReset { bank_id: bank.id });
        }

        events
    }

    /// Exit point and velocity for a ball leaving a scoop, with the scoop's
    /// configured jitter drawn from the seeded RNG
    pub fn launch_from(&mut self, body_id: BodyId, ball_radius: f32) -> Option<(Vec2, Vec2)> {
        let body = self.bodies.iter().find(|b| b.id == body_id)?;
        let (pos, vel) = body.eject_path(ball_radius)?;
        let jitter = match &body.kind {
            BodyKind::Scoop(scoop) => scoop.jitter,
            _ => 0.0,
        };
        if jitter > 0.0 {
            let offset = Vec2::new(
                self.rng.random_range(-jitter..=jitter),
                self.rng.random_range(-jitter..=jitter),
            );
            return Some((pos, vel + offset));
        }
        Some((pos, vel))
    }

    /// Press or release every flipper on one side
    pub fn set_flippers(&mut self, side: FlipperSide, actuator: Actuator) {
        for flipper in self.bodies.iter_mut().filter_map(|b| b.flipper_mut()) {
            if flipper.side == side {
                flipper.set_actuator(actuator);
            }
        }
    }

    /// Drop every flipper back to rest (tilt)
    pub fn rest_all_flippers(&mut self) {
        for flipper in self.bodies.iter_mut().filter_map(|b| b.flipper_mut()) {
            flipper.set_actuator(Actuator::Rest);
        }
    }

    pub fn step_flippers(&mut self, dt: f32) {
        for body in self.bodies.iter_mut() {
            body.step_flipper(dt);
        }
    }

    /// Open or close a gate from table logic
    pub fn set_gate(&mut self, body_id: BodyId, open: bool) -> Option<GameEvent> {
        let body = self.body_mut(body_id)?;
        body.set_gate(open)
            .then_some(GameEvent::GateToggled { body_id, open })
    }

    /// Clear every timer and return all bodies to their initial state
    pub fn reset(&mut self) {
        for body in self.bodies.iter_mut() {
            body.reset();
        }
        for bank in self.banks.iter_mut() {
            bank.reset_at_tick = None;
        }
        self.rng = Pcg32::seed_from_u64(self.seed);
    }
}
