//! Hotshot robot control core.
//!
//! Pure-logic control for a two-wheel competition robot: a PID drive
//! train, a ramped ball shooter with pickup, hysteretic light sensors
//! with a line follower, and an event-driven sequencer that plays
//! autonomous routines.  All hardware access goes through the port
//! traits in [`app::ports`]; the `drivers` and `adapters` modules
//! provide the embedded-hal and host implementations.
//!
//! ```text
//!   commands ──▶ Robot ──▶ Drive / Shooter ──▶ MotorPort
//!                  ▲           │ completion
//!                  │           ▼
//!             StateMachine ◀── Relay ──▶ EventSink
//!                  ▲
//!   AnalogPort ──▶ LineFollower ──▶ Sensor zones
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod auton;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod sensors;

pub use app::service::Robot;
pub use error::{Error, Result};
