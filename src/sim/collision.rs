//! Collision tests
//!
//! Bricks use a cheap box test against the square enclosing the ball rather
//! than an exact circle/rectangle test. Power-ups are exact circle/circle.

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Screen edge touched by the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

/// Strict overlap between an axis-aligned rectangle (bottom-left `rect_pos`)
/// and the square enclosing a circle
pub fn rect_overlaps_square(rect_pos: Vec2, rect_size: Vec2, center: Vec2, radius: f32) -> bool {
    rect_pos.x < center.x + radius
        && rect_pos.x + rect_size.x > center.x - radius
        && rect_pos.y < center.y + radius
        && rect_pos.y + rect_size.y > center.y - radius
}

/// Strict overlap between two circles
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// First screen edge the ball touches, if any.
///
/// Side and bottom contacts are inclusive, so a ball resting against a side
/// wall counts. The top test is strict and cannot trigger once the ball has
/// been clamped below the top edge.
pub fn boundary_contact(center: Vec2, radius: f32) -> Option<Edge> {
    if center.x - radius <= 0.0 {
        Some(Edge::Left)
    } else if center.x + radius >= SCREEN_WIDTH {
        Some(Edge::Right)
    } else if center.y - radius <= 0.0 {
        Some(Edge::Bottom)
    } else if center.y + radius > SCREEN_HEIGHT {
        Some(Edge::Top)
    } else {
        None
    }
}
