//! PID terms for encoder-driven wheel control.
//!
//! Errors are measured in whole encoder clicks, so the running state is
//! integral: the accumulated error and the previous error.  Gains stay
//! floating point and the output is truncated back to a motor power.

use serde::{Deserialize, Serialize};

/// PID gains shared by both wheels of the drive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl PidGains {
    pub const fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }
}

/// Per-wheel PID error state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WheelPid {
    integral: i32,
    prev_error: i32,
}

impl WheelPid {
    /// Re-arm for a new set point.
    ///
    /// `initial_error` is the full click delta of the move, so the first
    /// `compute` sees no derivative kick.
    pub fn arm(&mut self, initial_error: i32) {
        self.integral = 0;
        self.prev_error = initial_error;
    }

    /// Compute the PID output for `error`, clamped to `±limit`.
    pub fn compute(&mut self, gains: &PidGains, error: i32, limit: i32) -> i32 {
        self.integral = self.integral.saturating_add(error);
        let derivative = error.saturating_sub(self.prev_error);
        self.prev_error = error;

        let output = gains.kp * error as f32
            + gains.ki * self.integral as f32
            + gains.kd * derivative as f32;

        let limit = limit.abs() as f32;
        output.clamp(-limit, limit) as i32
    }

    /// Zero all error state.
    pub fn reset(&mut self) {
        self.integral = 0;
        self.prev_error = 0;
    }

    pub fn integral(&self) -> i32 {
        self.integral
    }

    pub fn prev_error(&self) -> i32 {
        self.prev_error
    }
}
