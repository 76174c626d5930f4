//! Axis-aligned rectangles and circles

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `y` grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Open-interval overlap of the horizontal spans
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }

    /// Closest point inside the rectangle to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }
}

/// Strict circle/rectangle overlap (touching does not count)
pub fn circle_rect_intersect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.clamp_point(center);
    center.distance_squared(closest) < radius * radius
}

/// Move a circle by `delta`, one axis at a time, pushing it out of any
/// obstacle it ends up overlapping and keeping it inside `bounds`
pub fn move_circle(pos: &mut Vec2, radius: f32, delta: Vec2, obstacles: &[Rect], bounds: &Rect) {
    pos.x += delta.x;
    *pos = bounds.clamp_point(*pos);
    for rect in obstacles {
        if circle_rect_intersect(*pos, radius, rect) {
            if delta.x > 0.0 {
                pos.x = rect.x - radius;
            } else if delta.x < 0.0 {
                pos.x = rect.right() + radius;
            }
        }
    }

    pos.y += delta.y;
    *pos = bounds.clamp_point(*pos);
    for rect in obstacles {
        if circle_rect_intersect(*pos, radius, rect) {
            if delta.y > 0.0 {
                pos.y = rect.y - radius;
            } else if delta.y < 0.0 {
                pos.y = rect.bottom() + radius;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_rect_intersect() {
        let rect = Rect::new(100.0, 100.0, 50.0, 50.0);
        assert!(circle_rect_intersect(Vec2::new(125.0, 125.0), 5.0, &rect));
        assert!(circle_rect_intersect(Vec2::new(95.0, 125.0), 10.0, &rect));
        assert!(!circle_rect_intersect(Vec2::new(90.0, 125.0), 10.0, &rect));
        // Corner distance is sqrt(50) > 7
        assert!(!circle_rect_intersect(Vec2::new(95.0, 95.0), 7.0, &rect));
    }

    #[test]
    fn test_overlaps_x_is_open() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps_x(&Rect::new(9.0, 50.0, 10.0, 1.0)));
        assert!(!a.overlaps_x(&Rect::new(10.0, 50.0, 10.0, 1.0)));
    }

    #[test]
    fn test_move_circle_blocked_on_x() {
        let wall = Rect::new(100.0, 0.0, 20.0, 200.0);
        let bounds = Rect::new(0.0, 0.0, 500.0, 500.0);
        let mut pos = Vec2::new(80.0, 100.0);
        move_circle(&mut pos, 10.0, Vec2::new(15.0, 0.0), &[wall], &bounds);
        assert_eq!(pos.x, 90.0);
        assert_eq!(pos.y, 100.0);
    }

    #[test]
    fn test_move_circle_slides_along_wall() {
        let wall = Rect::new(100.0, 0.0, 20.0, 200.0);
        let bounds = Rect::new(0.0, 0.0, 500.0, 500.0);
        let mut pos = Vec2::new(85.0, 100.0);
        move_circle(&mut pos, 10.0, Vec2::new(10.0, 10.0), &[wall], &bounds);
        assert_eq!(pos.x, 90.0);
        assert_eq!(pos.y, 110.0);
    }

    #[test]
    fn test_move_circle_clamped_to_bounds() {
        let bounds = Rect::new(36.0, 36.0, 888.0, 468.0);
        let mut pos = Vec2::new(40.0, 40.0);
        move_circle(&mut pos, 10.0, Vec2::new(-50.0, -50.0), &[], &bounds);
        assert_eq!(pos, Vec2::new(36.0, 36.0));
    }
}
