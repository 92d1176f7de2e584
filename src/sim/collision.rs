//! Collision detection and response for the ball against body shapes
//!
//! Every test treats the ball as a circle and returns the contact normal
//! pointing from the surface toward the ball center, plus the penetration
//! depth used to push the ball back out.

use glam::Vec2;

use super::shape::Shape;
use crate::{direction, perp};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the surface (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Ball against a circle (bumpers, scoops)
pub fn circle_circle_overlap(
    ball_pos: Vec2,
    ball_radius: f32,
    center: Vec2,
    radius: f32,
) -> CollisionResult {
    let offset = ball_pos - center;
    let dist = offset.length();
    let radii = ball_radius + radius;

    if dist >= radii {
        return CollisionResult::miss();
    }

    // Concentric: push straight up the table
    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        Vec2::NEG_Y
    };

    CollisionResult {
        hit: true,
        point: center + normal * radius,
        normal,
        penetration: radii - dist,
    }
}

/// Ball against an axis-aligned rectangle (clamp-to-box + distance test)
pub fn circle_rect_overlap(ball_pos: Vec2, ball_radius: f32, min: Vec2, max: Vec2) -> CollisionResult {
    let closest = ball_pos.clamp(min, max);
    let offset = ball_pos - closest;
    let dist = offset.length();

    if dist > 1e-6 {
        if dist >= ball_radius {
            return CollisionResult::miss();
        }
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: ball_radius - dist,
        };
    }

    // Center is inside the box: leave through the nearest face
    let faces = [
        (ball_pos.x - min.x, Vec2::NEG_X, Vec2::new(min.x, ball_pos.y)),
        (max.x - ball_pos.x, Vec2::X, Vec2::new(max.x, ball_pos.y)),
        (ball_pos.y - min.y, Vec2::NEG_Y, Vec2::new(ball_pos.x, min.y)),
        (max.y - ball_pos.y, Vec2::Y, Vec2::new(ball_pos.x, max.y)),
    ];
    let (depth, normal, point) = faces
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .unwrap_or((0.0, Vec2::NEG_Y, ball_pos));

    CollisionResult {
        hit: true,
        point,
        normal,
        penetration: depth + ball_radius,
    }
}

/// Closest point to `p` on the finite segment a-b
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let line = b - a;
    let len_sq = line.length_squared();
    if len_sq < 1e-8 {
        return a;
    }
    let t = ((p - a).dot(line) / len_sq).clamp(0.0, 1.0);
    a + line * t
}

/// Ball against a finite segment with optional thickness (capsule)
pub fn circle_segment_overlap(
    ball_pos: Vec2,
    ball_radius: f32,
    a: Vec2,
    b: Vec2,
    thickness: f32,
) -> CollisionResult {
    let closest = closest_point_on_segment(ball_pos, a, b);
    let offset = ball_pos - closest;
    let dist = offset.length();
    let half = thickness / 2.0;
    let reach = ball_radius + half;

    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        // Ball center is on the line: pick the side facing up the table
        let side = perp(b - a).normalize_or_zero();
        if side.y > 0.0 { -side } else { side }
    };

    CollisionResult {
        hit: true,
        point: closest + normal * half,
        normal,
        penetration: reach - dist,
    }
}

/// Ball against a segment that rotated about its pivot from `prev_angle` to
/// `angle` this step. If the sweep carried the segment past the ball center,
/// the contact is reported on the side the ball started on, so a fast
/// flipper bats the ball instead of tunneling under it.
pub fn swept_segment_contact(
    ball_pos: Vec2,
    ball_radius: f32,
    pivot: Vec2,
    length: f32,
    thickness: f32,
    prev_angle: f32,
    angle: f32,
) -> Option<CollisionResult> {
    let rel = ball_pos - pivot;
    let before = direction(prev_angle);
    let after = direction(angle);

    let side_before = before.perp_dot(rel);
    let side_after = after.perp_dot(rel);
    if side_before == 0.0 || side_before.signum() == side_after.signum() {
        return None;
    }

    let along = after.dot(rel);
    if !(0.0..=length).contains(&along) {
        return None;
    }

    let half = thickness / 2.0;
    let normal = perp(after) * side_before.signum();
    let on_line = pivot + after * along;

    Some(CollisionResult {
        hit: true,
        point: on_line + normal * half,
        normal,
        penetration: ball_radius + half + side_after.abs(),
    })
}

/// Dispatch to the shape-appropriate overlap test
pub fn ball_shape_collision(ball_pos: Vec2, ball_radius: f32, shape: &Shape) -> CollisionResult {
    match *shape {
        Shape::Circle { center, radius } => {
            circle_circle_overlap(ball_pos, ball_radius, center, radius)
        }
        Shape::Rect { .. } => {
            let (min, max) = shape.bounds();
            circle_rect_overlap(ball_pos, ball_radius, min, max)
        }
        Shape::Segment { thickness, .. } => match shape.endpoints() {
            Some((a, b)) => circle_segment_overlap(ball_pos, ball_radius, a, b, thickness),
            None => CollisionResult::miss(),
        },
    }
}
