//! Closed-loop actuation: PID drive train and ramped shooter.

pub mod drive;
pub mod pid;
pub mod shooter;
