//! Dual-motor shooter with a rate-limited power ramp, plus the directly
//! driven feeder, roller and elevator motors.
//!
//! ```text
//!   set_shoot_power ──▶ goal ──(±power_step every time_step_ms)──▶ current ──▶ upper/lower
//!                       feeder ───────────────────────────────────────────────▶ feeder
//!   set_pickup_power ─▶ roller / elevator ────────────────────────────────────▶ roller/elevator
//! ```
//!
//! Shoot and pickup each carry an optional auto-stop deadline.  A deadline
//! fires once, on the first rate-limited step at or after it, zeroes its
//! motors and emits a [`ShooterEvent`].
//!
//! Time is a caller-supplied `u32` millisecond counter.  Wraparound of that
//! counter is not handled: deadlines and the step limiter saturate at
//! `u32::MAX` instead of wrapping.

use log::{debug, info, trace};

use crate::app::ports::{EventSink, MotorId, MotorPort};
use crate::config::ShooterConfig;

pub const MAX_POWER: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampMode {
    Idle,
    RampUp,
    RampDown,
}

/// Which auto-stop deadline fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ShooterEvent {
    ShootStopped = 0,
    PickupStopped = 1,
}

impl ShooterEvent {
    /// Event id used when relaying into the sequencer.
    pub const fn event_id(self) -> i32 {
        self as i32
    }
}

pub struct Shooter {
    motor_upper: MotorId,
    motor_lower: MotorId,
    motor_feeder: MotorId,
    motor_roller: MotorId,
    motor_elevator: MotorId,
    power_step: i32,
    time_step_ms: u32,

    mode: RampMode,
    goal_power: i32,
    current_power: i32,
    feeder_power: i32,
    roller_power: i32,
    elevator_power: i32,
    shoot_deadline: Option<u32>,
    pickup_deadline: Option<u32>,
    last_step_ms: u32,
    last_event: Option<ShooterEvent>,
}

impl Shooter {
    pub fn new(config: &ShooterConfig) -> Self {
        Self {
            motor_upper: config.motor_upper,
            motor_lower: config.motor_lower,
            motor_feeder: config.motor_feeder,
            motor_roller: config.motor_roller,
            motor_elevator: config.motor_elevator,
            power_step: config.power_step.max(1),
            time_step_ms: config.time_step_ms,
            mode: RampMode::Idle,
            goal_power: 0,
            current_power: 0,
            feeder_power: 0,
            roller_power: 0,
            elevator_power: 0,
            shoot_deadline: None,
            pickup_deadline: None,
            last_step_ms: 0,
            last_event: None,
        }
    }

    /// Build and reset in one step.
    pub fn init(config: &ShooterConfig, now_ms: u32, hw: &mut impl MotorPort) -> Self {
        let mut shooter = Self::new(config);
        shooter.reset(now_ms, hw);
        info!(
            "Shooter init: step={} every {}ms",
            shooter.power_step, shooter.time_step_ms
        );
        shooter
    }

    /// Zero every goal, cancel both deadlines and stop all five motors.
    pub fn reset(&mut self, now_ms: u32, hw: &mut impl MotorPort) {
        self.mode = RampMode::Idle;
        self.goal_power = 0;
        self.current_power = 0;
        self.feeder_power = 0;
        self.roller_power = 0;
        self.elevator_power = 0;
        self.shoot_deadline = None;
        self.pickup_deadline = None;
        self.last_step_ms = now_ms;
        self.last_event = None;
        for motor in self.motors() {
            hw.set_power(motor, 0);
        }
    }

    /// Set the shooter goal (0…100) and feeder power (0…100).
    ///
    /// A non-zero `duration_ms` schedules an automatic stop; zero cancels
    /// any pending one.
    pub fn set_shoot_power(&mut self, shooter_power: i32, feeder_power: i32, duration_ms: u32, now_ms: u32) {
        self.goal_power = shooter_power.clamp(0, MAX_POWER);
        self.feeder_power = feeder_power.clamp(0, MAX_POWER);
        self.mode = if self.goal_power > self.current_power {
            RampMode::RampUp
        } else {
            RampMode::RampDown
        };
        self.shoot_deadline = deadline(now_ms, duration_ms);
        debug!(
            "Shooter goal={} feeder={} mode={:?} stop={:?}",
            self.goal_power, self.feeder_power, self.mode, self.shoot_deadline
        );
    }

    /// Set roller and elevator power (−100…100), with an optional auto-stop.
    pub fn set_pickup_power(&mut self, roller_power: i32, elevator_power: i32, duration_ms: u32, now_ms: u32) {
        self.roller_power = roller_power.clamp(-MAX_POWER, MAX_POWER);
        self.elevator_power = elevator_power.clamp(-MAX_POWER, MAX_POWER);
        self.pickup_deadline = deadline(now_ms, duration_ms);
        debug!(
            "Pickup roller={} elevator={} stop={:?}",
            self.roller_power, self.elevator_power, self.pickup_deadline
        );
    }

    /// Run one ramp step if at least `time_step_ms` has elapsed since the
    /// previous one; otherwise do nothing.
    pub fn tick(&mut self, now_ms: u32, hw: &mut impl MotorPort, sink: &mut impl EventSink) {
        if now_ms < self.last_step_ms.saturating_add(self.time_step_ms) {
            return;
        }

        if self.shoot_deadline.is_some_and(|t| now_ms >= t) {
            self.goal_power = 0;
            self.feeder_power = 0;
            self.mode = RampMode::RampDown;
            self.shoot_deadline = None;
            self.emit(ShooterEvent::ShootStopped, sink);
        }

        if self.pickup_deadline.is_some_and(|t| now_ms >= t) {
            self.roller_power = 0;
            self.elevator_power = 0;
            self.pickup_deadline = None;
            self.emit(ShooterEvent::PickupStopped, sink);
        }

        match self.mode {
            RampMode::RampUp => {
                self.current_power = (self.current_power + self.power_step).min(self.goal_power);
            }
            RampMode::RampDown => {
                self.current_power = (self.current_power - self.power_step).max(self.goal_power);
            }
            RampMode::Idle => {}
        }
        if self.mode != RampMode::Idle && self.current_power == self.goal_power {
            self.mode = RampMode::Idle;
        }

        let power = self.current_power.clamp(0, MAX_POWER);
        hw.set_power(self.motor_upper, power);
        hw.set_power(self.motor_lower, power);
        hw.set_power(self.motor_feeder, self.feeder_power);
        hw.set_power(self.motor_roller, self.roller_power);
        hw.set_power(self.motor_elevator, self.elevator_power);
        trace!("Shooter step @{}ms: power={} goal={}", now_ms, power, self.goal_power);

        self.last_step_ms = now_ms;
    }

    fn emit(&mut self, event: ShooterEvent, sink: &mut impl EventSink) {
        info!("Shooter {:?}", event);
        self.last_event = Some(event);
        sink.on_shooter_event(self);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> RampMode {
        self.mode
    }

    /// True until the shooter power reaches its goal.
    pub fn is_ramping(&self) -> bool {
        self.mode != RampMode::Idle
    }

    pub fn goal_power(&self) -> i32 {
        self.goal_power
    }

    /// Ramped shooter power currently applied.
    pub fn current_power(&self) -> i32 {
        self.current_power
    }

    pub fn feeder_power(&self) -> i32 {
        self.feeder_power
    }

    /// (roller, elevator)
    pub fn pickup_power(&self) -> (i32, i32) {
        (self.roller_power, self.elevator_power)
    }

    /// Pending (shoot, pickup) auto-stop deadlines.
    pub fn deadlines(&self) -> (Option<u32>, Option<u32>) {
        (self.shoot_deadline, self.pickup_deadline)
    }

    /// The most recent auto-stop, as seen by an event handler.
    pub fn last_event(&self) -> Option<ShooterEvent> {
        self.last_event
    }

    /// True while the pickup motors are running.
    pub fn is_pickup_on(&self) -> bool {
        self.roller_power != 0 || self.elevator_power != 0
    }

    fn motors(&self) -> [MotorId; 5] {
        [
            self.motor_upper,
            self.motor_lower,
            self.motor_feeder,
            self.motor_roller,
            self.motor_elevator,
        ]
    }
}

fn deadline(now_ms: u32, duration_ms: u32) -> Option<u32> {
    (duration_ms > 0).then(|| now_ms.saturating_add(duration_ms))
}
