//! Two-motor differential drive with encoder-based PID moves.
//!
//! The drive is a pure state holder between ticks: setters record the
//! command, [`Drive::tick`] turns it into motor power.  PID moves are
//! relative to the encoder readings at the time the set point is issued.
//!
//! ## Straight-line correction
//!
//! In distance mode both wheels chase the same target.  Half the
//! difference between the two wheel errors (bounded to ±10) is added to
//! the left output and subtracted from the right.  If that pushes a side
//! past its power bound, the overflow is moved onto the other side so the
//! left/right difference is kept.  The overflow is measured on the shifted
//! outputs, so the spread stays exactly `2 × diff` up to the final clamp.
//!
//! ## Completion
//!
//! A PID move finishes when either wheel's output falls to ±1 or less.
//! The motors are stopped, the completion notification is emitted, and
//! only then does the mode return to `Stopped`: a handler reading
//! [`Drive::mode`] inside the callback sees the move that just finished.

use log::{debug, info, trace};

use crate::app::ports::{EncoderPort, EventSink, MotorId, MotorPort};
use crate::config::DriveConfig;
use crate::control::pid::{PidGains, WheelPid};

/// Maximum motor power magnitude.
pub const MAX_POWER: i32 = 100;
/// Bound on the straight-line differential correction.
pub const MAX_DIFFERENTIAL: i32 = 10;
/// Outputs at or below this magnitude mean the move is done.
pub const DONE_POWER: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DriveMode {
    Stopped = 0,
    /// Open-loop power from `set_tank` / `set_arcade`.
    Direct = 1,
    PidDistance = 2,
    PidAngle = 3,
}

impl DriveMode {
    /// Event id used when relaying a completion into the sequencer.
    pub const fn event_id(self) -> i32 {
        self as i32
    }
}

pub struct Drive {
    motor_left: MotorId,
    motor_right: MotorId,
    clicks_per_distance: f32,
    clicks_per_degree: f32,
    gains: PidGains,
    events_enabled: bool,

    mode: DriveMode,
    /// Direct power, or the power bound of a PID move.
    power_left: i32,
    power_right: i32,
    target_left: i32,
    target_right: i32,
    pid_left: WheelPid,
    pid_right: WheelPid,
}

impl Drive {
    /// Build a stopped drive from configuration.  Touches no hardware;
    /// call [`reset`](Self::reset) (or use [`init`](Self::init)) before
    /// the first move so the encoder reference is zero.
    pub fn new(config: &DriveConfig) -> Self {
        Self {
            motor_left: config.motor_left,
            motor_right: config.motor_right,
            clicks_per_distance: config.clicks_per_distance,
            clicks_per_degree: config.clicks_per_degree,
            gains: config.gains,
            events_enabled: config.events_enabled,
            mode: DriveMode::Stopped,
            power_left: 0,
            power_right: 0,
            target_left: 0,
            target_right: 0,
            pid_left: WheelPid::default(),
            pid_right: WheelPid::default(),
        }
    }

    /// Build and reset in one step.
    pub fn init<H: MotorPort + EncoderPort>(config: &DriveConfig, hw: &mut H) -> Self {
        let mut drive = Self::new(config);
        drive.reset(hw);
        info!(
            "Drive init: motors=({:?},{:?}) clicks/dist={:.3} clicks/deg={:.3}",
            drive.motor_left, drive.motor_right, drive.clicks_per_distance, drive.clicks_per_degree
        );
        drive
    }

    // ── Commands ──────────────────────────────────────────────

    /// Zero power and halt both motors.
    pub fn stop(&mut self, hw: &mut impl MotorPort) {
        self.mode = DriveMode::Stopped;
        self.power_left = 0;
        self.power_right = 0;
        hw.set_power(self.motor_left, 0);
        hw.set_power(self.motor_right, 0);
    }

    /// Stop, zero the encoders and clear all PID state.
    pub fn reset<H: MotorPort + EncoderPort>(&mut self, hw: &mut H) {
        self.stop(hw);
        hw.reset_encoder(self.motor_left);
        hw.reset_encoder(self.motor_right);
        self.target_left = 0;
        self.target_right = 0;
        self.pid_left.reset();
        self.pid_right.reset();
    }

    /// Open-loop power per side.
    pub fn set_tank(&mut self, power_left: i32, power_right: i32) {
        self.power_left = power_left.clamp(-MAX_POWER, MAX_POWER);
        self.power_right = power_right.clamp(-MAX_POWER, MAX_POWER);
        self.mode = DriveMode::Direct;
        trace!("Drive tank: L={} R={}", self.power_left, self.power_right);
    }

    /// Open-loop drive/turn mix.  A positive turn steers right.
    ///
    /// When a side would saturate, it is pinned at ±100 and the other side
    /// absorbs the same offset, keeping the turn rate.
    pub fn set_arcade(&mut self, drive: i32, turn: i32) {
        let drive = drive.clamp(-MAX_POWER, MAX_POWER);
        let turn = turn.clamp(-MAX_POWER, MAX_POWER);

        let (left, right) = if drive + turn > MAX_POWER {
            (MAX_POWER, MAX_POWER - 2 * turn)
        } else if drive - turn > MAX_POWER {
            (MAX_POWER + 2 * turn, MAX_POWER)
        } else if drive + turn < -MAX_POWER {
            (-MAX_POWER, -MAX_POWER - 2 * turn)
        } else if drive - turn < -MAX_POWER {
            (2 * turn - MAX_POWER, -MAX_POWER)
        } else {
            (drive + turn, drive - turn)
        };

        self.set_tank(left, right);
    }

    /// Drive straight for `distance` (in the units of `clicks_per_distance`).
    /// The sign of `distance` picks the direction; `power` is a magnitude.
    pub fn set_pid_distance(&mut self, distance: f32, power: i32, hw: &impl EncoderPort) {
        let clicks = (distance * self.clicks_per_distance) as i32;
        self.arm_pid(DriveMode::PidDistance, clicks, clicks, power, hw);
        debug!("Drive PID distance: d={:.1} clicks={} power={}", distance, clicks, self.power_left);
    }

    /// Turn in place by `angle` degrees (positive is clockwise).
    pub fn set_pid_angle(&mut self, angle: f32, power: i32, hw: &impl EncoderPort) {
        let clicks = (angle * self.clicks_per_degree) as i32;
        self.arm_pid(DriveMode::PidAngle, clicks, -clicks, power, hw);
        debug!("Drive PID angle: a={:.1} clicks={} power={}", angle, clicks, self.power_left);
    }

    fn arm_pid(
        &mut self,
        mode: DriveMode,
        clicks_left: i32,
        clicks_right: i32,
        power: i32,
        hw: &impl EncoderPort,
    ) {
        let power = power.saturating_abs().clamp(0, MAX_POWER);
        self.power_left = power;
        self.power_right = power;
        self.target_left = hw.encoder(self.motor_left).saturating_add(clicks_left);
        self.target_right = hw.encoder(self.motor_right).saturating_add(clicks_right);
        self.pid_left.arm(clicks_left);
        self.pid_right.arm(clicks_right);
        self.mode = mode;
    }

    // ── Control step ──────────────────────────────────────────

    /// Run one control step for the current mode.
    pub fn tick<H, S>(&mut self, hw: &mut H, sink: &mut S)
    where
        H: MotorPort + EncoderPort,
        S: EventSink,
    {
        match self.mode {
            DriveMode::Stopped => {}
            DriveMode::Direct => {
                hw.set_power(self.motor_left, self.power_left);
                hw.set_power(self.motor_right, self.power_right);
            }
            DriveMode::PidDistance | DriveMode::PidAngle => self.pid_step(hw, sink),
        }
    }

    fn pid_step<H, S>(&mut self, hw: &mut H, sink: &mut S)
    where
        H: MotorPort + EncoderPort,
        S: EventSink,
    {
        let err_left = self.target_left.saturating_sub(hw.encoder(self.motor_left));
        let err_right = self.target_right.saturating_sub(hw.encoder(self.motor_right));

        let err_diff = if self.mode == DriveMode::PidDistance {
            (err_left.saturating_sub(err_right) / 2).clamp(-MAX_DIFFERENTIAL, MAX_DIFFERENTIAL)
        } else {
            0
        };

        let out_left = self.pid_left.compute(&self.gains, err_left, self.power_left);
        let out_right = self.pid_right.compute(&self.gains, err_right, self.power_right);
        let (out_left, out_right) =
            apply_differential(out_left, out_right, err_diff, self.power_left, self.power_right);

        trace!(
            "Drive PID: err=({},{}) diff={} out=({},{})",
            err_left, err_right, err_diff, out_left, out_right
        );

        if out_left.abs() > DONE_POWER && out_right.abs() > DONE_POWER {
            hw.set_power(self.motor_left, out_left);
            hw.set_power(self.motor_right, out_right);
        } else {
            hw.set_power(self.motor_left, 0);
            hw.set_power(self.motor_right, 0);
            info!("Drive {:?} complete: err=({},{})", self.mode, err_left, err_right);
            if self.events_enabled {
                sink.on_drive_event(self);
            }
            // Only after the handler has seen the finished mode.
            self.mode = DriveMode::Stopped;
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// True while a PID move is in progress.
    pub fn is_busy(&self) -> bool {
        matches!(self.mode, DriveMode::PidDistance | DriveMode::PidAngle)
    }

    /// Commanded (direct) power, or the power bound of a PID move.
    pub fn commanded_power(&self) -> (i32, i32) {
        (self.power_left, self.power_right)
    }

    /// Absolute encoder targets of the current PID move.
    pub fn targets(&self) -> (i32, i32) {
        (self.target_left, self.target_right)
    }

    pub fn motors(&self) -> (MotorId, MotorId) {
        (self.motor_left, self.motor_right)
    }

    pub fn pid_state(&self) -> (WheelPid, WheelPid) {
        (self.pid_left, self.pid_right)
    }
}

/// Add `diff` to the left output and subtract it from the right, keeping
/// each side within its bound.  Overflow on one side is taken off the
/// other side instead of being dropped.
fn apply_differential(left: i32, right: i32, diff: i32, bound_left: i32, bound_right: i32) -> (i32, i32) {
    if diff == 0 {
        return (left, right);
    }

    let mut left = left + diff;
    let mut right = right - diff;

    if left > bound_left {
        right -= left - bound_left;
        left = bound_left;
    } else if left < -bound_left {
        right -= left + bound_left;
        left = -bound_left;
    } else if right > bound_right {
        left -= right - bound_right;
        right = bound_right;
    } else if right < -bound_right {
        left -= right + bound_right;
        right = -bound_right;
    }

    (
        left.clamp(-bound_left, bound_left),
        right.clamp(-bound_right, bound_right),
    )
}
