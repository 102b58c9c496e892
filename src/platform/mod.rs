//! Platform abstraction layer
//!
//! Translates raw pointer/touch events into simulation input.

pub mod input;

pub use input::{TouchZones, touch_to_input};
