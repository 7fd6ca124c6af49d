// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric primitives and 2D affine transforms.
//!
//! Coordinates are in "scene" space: image pixels placed by the session's
//! accumulated transform, with the y axis pointing down.

use std::ops::Mul;

/// A 2D point in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }.normalized()
    }

    /// Rectangle spanned by two opposite corners, in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self { x, y, width, height }
    }

    /// A rectangle without area, as produced by a click rather than a drag.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// A 2D affine transform.
///
/// Maps `(x, y)` to `(m11 * x + m21 * y + dx, m12 * x + m22 * y + dy)`.
/// Composition with `*` reads left to right: `a * b` applies `a` first,
/// then `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m11: f64,
    m12: f64,
    m21: f64,
    m22: f64,
    dx: f64,
    dy: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self {
            m11: 1.0,
            m12: 0.0,
            m21: 0.0,
            m22: 1.0,
            dx: 0.0,
            dy: 0.0,
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Self::identity()
        }
    }

    /// Clockwise rotation (on screen) about the origin.
    pub fn rotation(degrees: f64) -> Self {
        // Quarter turns are exact so that 90 degree steps stay pixel aligned.
        let quarter = degrees / 90.0;
        let (sin, cos) = if quarter.fract() == 0.0 {
            match (quarter as i64).rem_euclid(4) {
                0 => (0.0, 1.0),
                1 => (1.0, 0.0),
                2 => (0.0, -1.0),
                _ => (-1.0, 0.0),
            }
        } else {
            degrees.to_radians().sin_cos()
        };
        Self {
            m11: cos,
            m12: sin,
            m21: -sin,
            m22: cos,
            dx: 0.0,
            dy: 0.0,
        }
    }

    /// Rotation about an arbitrary pivot point.
    pub fn rotation_about(center: Point, degrees: f64) -> Self {
        Self::translation(-center.x, -center.y)
            * Self::rotation(degrees)
            * Self::translation(center.x, center.y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.m11 * p.x + self.m21 * p.y + self.dx,
            self.m12 * p.x + self.m22 * p.y + self.dy,
        )
    }

    /// Maps the corners of `rect`, preserving their order.
    pub fn map_corners(&self, rect: &Rect) -> [Point; 4] {
        rect.corners().map(|p| self.map_point(p))
    }

    /// Axis-aligned bounds of `rect` after transformation.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let corners = self.map_corners(rect);
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in corners {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// The inverse transform, if this one is not degenerate.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            m11: self.m22 / det,
            m12: -self.m12 / det,
            m21: -self.m21 / det,
            m22: self.m11 / det,
            dx: (self.m21 * self.dy - self.m22 * self.dx) / det,
            dy: (self.m12 * self.dx - self.m11 * self.dy) / det,
        })
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, then: Transform) -> Transform {
        Transform {
            m11: self.m11 * then.m11 + self.m12 * then.m21,
            m12: self.m11 * then.m12 + self.m12 * then.m22,
            m21: self.m21 * then.m11 + self.m22 * then.m21,
            m22: self.m21 * then.m12 + self.m22 * then.m22,
            dx: self.dx * then.m11 + self.dy * then.m21 + then.dx,
            dy: self.dx * then.m12 + self.dy * then.m22 + then.dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{:?} != {:?}", a, b);
        assert!((a.y - b.y).abs() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_rect_from_points_normalizes() {
        let rect = Rect::from_points(Point::new(30.0, 40.0), Point::new(10.0, 5.0));
        assert_eq!(rect, Rect::new(10.0, 5.0, 20.0, 35.0));
        assert!(!rect.is_empty());

        let line = Rect::from_points(Point::new(3.0, 3.0), Point::new(9.0, 3.0));
        assert!(line.is_empty());
    }

    #[test]
    fn test_composition_applies_left_first() {
        let t = Transform::translation(10.0, 0.0) * Transform::rotation(90.0);
        // (0,0) -> (10,0) -> rotated clockwise -> (0,10)
        assert_close(t.map_point(Point::new(0.0, 0.0)), Point::new(0.0, 10.0));
    }

    #[test]
    fn test_rotation_about_center_keeps_center() {
        let center = Point::new(50.0, 25.0);
        let t = Transform::rotation_about(center, 37.0);
        assert_close(t.map_point(center), center);
    }

    #[test]
    fn test_quarter_turn_bounds_are_exact() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let t = Transform::rotation_about(rect.center(), 90.0);
        let bounds = t.map_rect(&rect);
        assert_eq!(bounds, Rect::new(25.0, -25.0, 50.0, 100.0));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = Transform::rotation_about(Point::new(3.0, 4.0), 12.5)
            * Transform::translation(-7.0, 2.0);
        let inv = t.inverse().unwrap();
        let p = Point::new(17.0, -3.5);
        assert_close(inv.map_point(t.map_point(p)), p);
        assert_close((t * inv).map_point(p), p);
    }

    #[test]
    fn test_identity_detection() {
        assert!(Transform::default().is_identity());
        assert!(Transform::rotation(360.0).is_identity());
        assert!(!Transform::rotation(2.0).is_identity());
    }
}
