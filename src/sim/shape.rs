//! Body geometry for collision tests
//!
//! Three primitive shapes cover every playfield body:
//! - Circle: bumpers, scoops, round targets
//! - Rect: axis-aligned targets, lanes, walls (top/left corner plus size)
//! - Segment: flippers, gates, diverters and guide rails (a pivot, a length
//!   and an angle; `thickness` turns the line into a capsule)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::direction;
use crate::error::TableError;

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Circle {
        center: Vec2,
        radius: f32,
    },
    Rect {
        top: f32,
        left: f32,
        width: f32,
        height: f32,
    },
    Segment {
        pivot: Vec2,
        length: f32,
        /// Radians, measured from +x toward +y (clockwise on screen)
        angle: f32,
        #[serde(default)]
        thickness: f32,
    },
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Shape::Circle { center, radius }
    }

    pub fn rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        Shape::Rect {
            top,
            left,
            width,
            height,
        }
    }

    pub fn segment(pivot: Vec2, length: f32, angle: f32, thickness: f32) -> Self {
        Shape::Segment {
            pivot,
            length,
            angle,
            thickness,
        }
    }

    /// Reject degenerate geometry
    pub fn validate(&self, body: u32) -> Result<(), TableError> {
        match *self {
            Shape::Circle { radius, .. } => {
                if !(radius > 0.0) || !radius.is_finite() {
                    return Err(TableError::InvalidRadius { body, radius });
                }
            }
            Shape::Rect { width, height, .. } => {
                if !(width > 0.0 && height > 0.0) {
                    return Err(TableError::InvalidRect {
                        body,
                        width,
                        height,
                    });
                }
            }
            Shape::Segment {
                length, thickness, ..
            } => {
                if !(length > 0.0) || thickness < 0.0 {
                    return Err(TableError::DegenerateSegment { body });
                }
            }
        }
        Ok(())
    }

    /// Point a captured ball is pinned to (circle/rect center, segment midpoint)
    pub fn anchor(&self) -> Vec2 {
        match *self {
            Shape::Circle { center, .. } => center,
            Shape::Rect {
                top,
                left,
                width,
                height,
            } => Vec2::new(left + width / 2.0, top + height / 2.0),
            Shape::Segment {
                pivot,
                length,
                angle,
                ..
            } => pivot + direction(angle) * (length / 2.0),
        }
    }

    /// Distance from the anchor to the farthest edge along any axis
    pub fn extent(&self) -> f32 {
        match *self {
            Shape::Circle { radius, .. } => radius,
            Shape::Rect { width, height, .. } => width.max(height) / 2.0,
            Shape::Segment {
                length, thickness, ..
            } => length / 2.0 + thickness / 2.0,
        }
    }

    /// Endpoints of a segment (pivot, tip)
    pub fn endpoints(&self) -> Option<(Vec2, Vec2)> {
        match *self {
            Shape::Segment {
                pivot,
                length,
                angle,
                ..
            } => Some((pivot, pivot + direction(angle) * length)),
            _ => None,
        }
    }

    /// Rotate a segment to a new angle; other shapes are unchanged
    pub fn set_angle(&mut self, new_angle: f32) {
        if let Shape::Segment { angle, .. } = self {
            *angle = new_angle;
        }
    }

    /// Axis-aligned bounds (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match *self {
            Shape::Circle { center, radius } => {
                (center - Vec2::splat(radius), center + Vec2::splat(radius))
            }
            Shape::Rect {
                top,
                left,
                width,
                height,
            } => (Vec2::new(left, top), Vec2::new(left + width, top + height)),
            Shape::Segment { thickness, .. } => {
                let (a, b) = self.endpoints().unwrap_or_default();
                let half = Vec2::splat(thickness / 2.0);
                (a.min(b) - half, a.max(b) + half)
            }
        }
    }

    /// Map a point to one of `count` equal slices of the bounding box along x
    pub fn subdivide_x(&self, point: Vec2, count: usize) -> usize {
        let (min, max) = self.bounds();
        let width = max.x - min.x;
        if count == 0 || width <= 0.0 {
            return 0;
        }
        let t = ((point.x - min.x) / width).clamp(0.0, 1.0);
        ((t * count as f32) as usize).min(count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_validate_rejects_degenerate() {
        assert!(Shape::circle(Vec2::ZERO, -1.0).validate(0).is_err());
        assert!(Shape::circle(Vec2::ZERO, 0.0).validate(0).is_err());
        assert!(Shape::rect(0.0, 0.0, 10.0, 0.0).validate(0).is_err());
        assert!(Shape::segment(Vec2::ZERO, 0.0, 0.0, 4.0).validate(0).is_err());
        assert!(Shape::circle(Vec2::ZERO, 5.0).validate(0).is_ok());
    }

    #[test]
    fn test_segment_endpoints() {
        let seg = Shape::segment(Vec2::new(10.0, 10.0), 20.0, FRAC_PI_2, 0.0);
        let (a, b) = seg.endpoints().unwrap();
        assert_eq!(a, Vec2::new(10.0, 10.0));
        assert!((b - Vec2::new(10.0, 30.0)).length() < 1e-4);
        assert!((seg.anchor() - Vec2::new(10.0, 20.0)).length() < 1e-4);
    }

    #[test]
    fn test_rect_anchor_and_bounds() {
        let rect = Shape::rect(100.0, 50.0, 40.0, 20.0);
        assert_eq!(rect.anchor(), Vec2::new(120.0, 60.0));
        assert_eq!(rect.bounds(), (Vec2::new(100.0, 50.0), Vec2::new(140.0, 70.0)));
    }

    #[test]
    fn test_subdivide_x() {
        let lane = Shape::rect(0.0, 0.0, 90.0, 10.0);
        assert_eq!(lane.subdivide_x(Vec2::new(5.0, 5.0), 3), 0);
        assert_eq!(lane.subdivide_x(Vec2::new(45.0, 5.0), 3), 1);
        assert_eq!(lane.subdivide_x(Vec2::new(89.0, 5.0), 3), 2);
        // Clamped at the edges
        assert_eq!(lane.subdivide_x(Vec2::new(200.0, 5.0), 3), 2);
        assert_eq!(lane.subdivide_x(Vec2::new(-20.0, 5.0), 3), 0);
    }

    #[test]
    fn test_set_angle_only_rotates_segments() {
        let mut seg = Shape::segment(Vec2::ZERO, 10.0, 0.0, 0.0);
        seg.set_angle(1.0);
        assert!(matches!(seg, Shape::Segment { angle, .. } if angle == 1.0));

        let mut circle = Shape::circle(Vec2::ZERO, 3.0);
        circle.set_angle(1.0);
        assert_eq!(circle, Shape::circle(Vec2::ZERO, 3.0));
    }
}
