//! Read-only view of a session for renderers and hosts
//!
//! A snapshot is taken between ticks, so it never shows a partially advanced
//! table. It owns its data and serializes to JSON as-is.

use glam::Vec2;
use serde::Serialize;

use super::ball::BallState;
use super::body::BodyId;
use super::shape::Shape;
use super::state::{GamePhase, GameSession};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub balls_remaining: u32,
    pub is_tilted: bool,
    pub tilt_warnings: u32,
    pub multiball_count: u32,
    pub bodies: Vec<BodyView>,
    pub balls: Vec<BallView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodyView {
    pub id: BodyId,
    pub kind: &'static str,
    /// Current geometry (flipper and gate segments at their live angle)
    pub shape: Shape,
    pub lit: bool,
    /// Per-point flags for rollover lanes, empty otherwise
    pub lit_points: Vec<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub captured: bool,
}

impl GameSession {
    pub fn snapshot(&self) -> Snapshot {
        let bodies = self
            .playfield
            .bodies()
            .iter()
            .map(|body| BodyView {
                id: body.id,
                kind: body.kind.name(),
                shape: body.shape,
                lit: body.is_lit(),
                lit_points: body.lit_points(),
            })
            .collect();

        let balls = self
            .active_balls
            .iter()
            .filter(|ball| !ball.is_drained())
            .map(|ball| BallView {
                id: ball.id,
                pos: ball.pos,
                radius: ball.radius,
                captured: matches!(ball.state, BallState::Captured { .. }),
            })
            .collect();

        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            balls_remaining: self.balls_remaining,
            is_tilted: self.is_tilted,
            tilt_warnings: self.tilt_warnings,
            multiball_count: self.multiball_count,
            bodies,
            balls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{ControlEvent, tick};
    use crate::table::TableConfig;

    #[test]
    fn test_snapshot_mirrors_session() {
        let table = TableConfig::classic();
        let mut session = GameSession::new(&table).unwrap();
        session.apply_control(ControlEvent::Plunge(0.5));
        tick(&mut session, SIM_DT);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.phase, GamePhase::InPlay);
        assert_eq!(snapshot.bodies.len(), table.bodies.len());
        assert_eq!(snapshot.balls.len(), 1);
        assert!(!snapshot.balls[0].captured);

        let lane = snapshot
            .bodies
            .iter()
            .find(|b| b.kind == "rollover_lane")
            .unwrap();
        assert_eq!(lane.lit_points.len(), 3);
        assert!(!lane.lit);
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = GameSession::new(&TableConfig::classic()).unwrap();
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["phase"], "AwaitingLaunch");
        assert_eq!(json["bodies"][0]["kind"], "bumper");
        assert_eq!(json["bodies"][0]["shape"]["type"], "circle");
    }
}
