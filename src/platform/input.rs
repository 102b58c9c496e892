//! Touch-zone decoding
//!
//! Any touch jumps. On top of that, the left strip moves left, the right strip
//! moves right, and otherwise the bottom band moves down.

use glam::Vec2;

use crate::sim::TickInput;

/// Screen regions that map touches to movement (screen space, y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchZones {
    /// Touches with x below this move left
    pub left_max_x: f32,
    /// Touches with x above this move right
    pub right_min_x: f32,
    /// Touches with y below this move down
    pub bottom_max_y: f32,
}

impl Default for TouchZones {
    fn default() -> Self {
        Self {
            left_max_x: 100.0,
            right_min_x: 300.0,
            bottom_max_y: 150.0,
        }
    }
}

/// Decode one touch into the actions it triggers
pub fn touch_to_input(touch: Vec2, zones: &TouchZones) -> TickInput {
    let mut input = TickInput {
        jump: true,
        ..Default::default()
    };

    if touch.x < zones.left_max_x {
        input.move_left = true;
    } else if touch.x > zones.right_min_x {
        input.move_right = true;
    } else if touch.y < zones.bottom_max_y {
        input.move_down = true;
    }

    input
}
