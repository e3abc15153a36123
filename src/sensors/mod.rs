//! Light sensors and the line follower built on top of them.
//!
//! Each [`light::Sensor`] classifies its raw reading into a three-way zone.
//! The [`line_follower::LineFollower`] combines up to three zones into a
//! base-3 index and looks up a steering action.

pub mod light;
pub mod line_follower;
