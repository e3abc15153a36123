//! Robot orchestrator: the hexagonal core.
//!
//! [`Robot`] owns every control component and runs them in a fixed order
//! each tick.  Hardware is injected per call through the port traits, so
//! the same orchestrator drives the simulator, a mock, or real motors.
//!
//! ```text
//!  AnalogPort ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!                 │            Robot              │
//!  EncoderPort ─▶ │ LineFollower · Drive · Shooter│
//!  MotorPort  ◀── │   └─ relay ─▶ StateMachine    │
//!                 └───────────────────────────────┘
//! ```
//!
//! Per tick:
//!
//! 1. line follower samples its sensors (and steers, when following)
//! 2. if a routine is running and the sequencer is ready, the next step
//!    is issued and its completion armed
//! 3. drive control step
//! 4. shooter ramp step
//!
//! Drive and shooter completions reach the sequencer synchronously from
//! inside steps 3 and 4, so the state a step advances to is visible on
//! the following tick.

use log::{info, warn};

use crate::auton::{Action, Routine, Step};
use crate::config::{RobotConfig, ShooterConfig};
use crate::control::drive::{Drive, DriveMode};
use crate::control::shooter::Shooter;
use crate::error::Result;
use crate::fsm::{StateMachine, WaitFlags};
use crate::sensors::light::Sensor;
use crate::sensors::line_follower::{LineFollower, default_actions};

use super::commands::{RobotCommand, ShotPreset};
use super::events::EventSource;
use super::ports::{AnalogPort, EncoderPort, EventSink, MotorPort};

/// Distance-calibration move (inches).
pub const CAL_DISTANCE_IN: f32 = -96.0;
/// Angle-calibration move (degrees).
pub const CAL_ANGLE_DEG: f32 = 360.0;
/// Power used for calibration moves.
pub const CAL_POWER: i32 = 50;

// ───────────────────────────────────────────────────────────────
// Robot
// ───────────────────────────────────────────────────────────────

pub struct Robot {
    drive: Drive,
    shooter: Shooter,
    line: LineFollower,
    sm: StateMachine,
    presets: ShooterConfig,

    routine: Option<&'static Routine>,
    /// A calibration move owns the drive.
    cal_drive: bool,
    follow_line: bool,
    tick_count: u64,
}

impl Robot {
    /// Build every component from a validated configuration.
    ///
    /// Touches no hardware; call [`reset`](Self::reset) before the first
    /// tick.
    pub fn new(config: &RobotConfig) -> Result<Self> {
        config.validate()?;
        let line = LineFollower::new(&config.light_sensors, &default_actions())?;

        Ok(Self {
            drive: Drive::new(&config.drive),
            shooter: Shooter::new(&config.shooter),
            line,
            sm: StateMachine::new(),
            presets: config.shooter,
            routine: None,
            cal_drive: false,
            follow_line: false,
            tick_count: 0,
        })
    }

    /// Stop every motor, zero the encoders and disable the sequencer.
    pub fn reset<H: MotorPort + EncoderPort>(&mut self, now_ms: u32, hw: &mut H) {
        self.drive.reset(hw);
        self.shooter.reset(now_ms, hw);
        self.sm.init();
        self.routine = None;
        self.cal_drive = false;
        self.follow_line = false;
        info!("Robot reset");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one scheduler pass.
    pub fn tick<H, S>(&mut self, now_ms: u32, hw: &mut H, sink: &mut S)
    where
        H: MotorPort + EncoderPort + AnalogPort,
        S: EventSink,
    {
        self.tick_count += 1;

        // 1. Sensors, then the fused decision.
        self.line.tick(hw, &mut *sink);
        if self.follow_line && self.is_teleop() {
            let (drive, turn) = self.line.commanded();
            self.drive.set_arcade(drive, turn);
        }

        // 2. Next autonomous step.
        if self.sm.is_enabled() && self.sm.is_ready() {
            self.run_step(now_ms, hw);
        }

        // 3-4. Control steps; completions relay into the sequencer.
        let mut relay = Relay {
            sm: &mut self.sm,
            cal_drive: &mut self.cal_drive,
            sink,
        };
        self.drive.tick(hw, &mut relay);
        self.shooter.tick(now_ms, hw, &mut relay);
    }

    fn run_step<H: MotorPort + EncoderPort>(&mut self, now_ms: u32, hw: &mut H) {
        let state = self.sm.current_state();
        let step = self.routine.and_then(|r| r.step(state)).copied();

        let Some(Step { action, until }) = step else {
            if let Some(routine) = self.routine.take() {
                info!("Autonomous {} finished", routine.name);
            }
            self.sm.stop();
            return;
        };

        info!("Autonomous state {}: {:?}", state, action);
        match action {
            Action::Drive { distance, power } => self.drive.set_pid_distance(distance, power, hw),
            Action::Turn { angle, power } => self.drive.set_pid_angle(angle, power, hw),
            Action::Shoot {
                power,
                feeder,
                duration_ms,
            } => self.shooter.set_shoot_power(power, feeder, duration_ms, now_ms),
            Action::Pickup {
                roller,
                elevator,
                duration_ms,
            } => self.shooter.set_pickup_power(roller, elevator, duration_ms, now_ms),
        }

        let (kind, id) = until.key();
        if let Err(e) = self.sm.add_wait_event(kind, Some(id), None) {
            warn!("Autonomous state {}: {}; aborting routine", state, e);
            self.abort(hw);
            return;
        }
        self.sm.arm_wait(state.saturating_add(1), WaitFlags::ANY_CLEAR);
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an operator or host command.
    pub fn handle_command<H: MotorPort + EncoderPort>(
        &mut self,
        cmd: RobotCommand,
        now_ms: u32,
        hw: &mut H,
    ) {
        if self.is_autonomous() {
            match cmd {
                RobotCommand::StopAutonomous => self.abort(hw),
                other => warn!("Ignoring {:?} during autonomous", other),
            }
            return;
        }

        match cmd {
            RobotCommand::Tank { left, right } => {
                if !self.cal_drive {
                    self.follow_line = false;
                    self.drive.set_tank(left, right);
                }
            }
            RobotCommand::Arcade { drive, turn } => {
                if !self.cal_drive {
                    self.follow_line = false;
                    self.drive.set_arcade(drive, turn);
                }
            }
            RobotCommand::StopDrive => {
                self.follow_line = false;
                self.cal_drive = false;
                self.drive.stop(hw);
            }
            RobotCommand::StartAutonomous(routine) => {
                info!("Autonomous {} starting ({} steps)", routine.name, routine.len());
                self.follow_line = false;
                self.cal_drive = false;
                self.routine = Some(routine);
                self.sm.start();
            }
            RobotCommand::StopAutonomous => {}
            RobotCommand::ToggleLightCalibration => {
                let start = !self.line.is_calibrating();
                info!("Light calibration {}", if start { "started" } else { "stopped" });
                self.line.set_calibration(start);
            }
            RobotCommand::CalibrateDistance => {
                self.toggle_cal_drive(hw, |d, hw| d.set_pid_distance(CAL_DISTANCE_IN, CAL_POWER, hw));
            }
            RobotCommand::CalibrateAngle => {
                self.toggle_cal_drive(hw, |d, hw| d.set_pid_angle(CAL_ANGLE_DEG, CAL_POWER, hw));
            }
            RobotCommand::Shoot(preset) => {
                let (power, feeder) = match preset {
                    ShotPreset::High => (self.presets.high_power, self.presets.feeder_power),
                    ShotPreset::Low => (self.presets.low_power, self.presets.feeder_power),
                    ShotPreset::Off => (0, 0),
                };
                self.shooter.set_shoot_power(power, feeder, 0, now_ms);
            }
            RobotCommand::TogglePickup { reverse } => {
                if self.shooter.is_pickup_on() {
                    self.shooter.set_pickup_power(0, 0, 0, now_ms);
                } else {
                    let dir = if reverse { -1 } else { 1 };
                    self.shooter.set_pickup_power(
                        dir * self.presets.roller_power,
                        dir * self.presets.elevator_power,
                        0,
                        now_ms,
                    );
                }
            }
            RobotCommand::FollowLine(on) => {
                self.follow_line = on && !self.cal_drive;
                if !on {
                    self.drive.stop(hw);
                }
            }
        }
    }

    fn toggle_cal_drive<H: MotorPort + EncoderPort>(
        &mut self,
        hw: &mut H,
        start: impl FnOnce(&mut Drive, &H),
    ) {
        if self.cal_drive {
            self.cal_drive = false;
            self.drive.stop(hw);
            info!("Calibration move cancelled");
        } else {
            self.follow_line = false;
            start(&mut self.drive, &*hw);
            self.cal_drive = true;
        }
    }

    fn abort(&mut self, hw: &mut impl MotorPort) {
        if let Some(routine) = self.routine.take() {
            warn!("Autonomous {} aborted in state {}", routine.name, self.sm.current_state());
        }
        self.sm.stop();
        self.drive.stop(hw);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_autonomous(&self) -> bool {
        self.sm.is_enabled()
    }

    /// Operator power is accepted: no routine and no calibration move.
    pub fn is_teleop(&self) -> bool {
        !self.is_autonomous() && !self.cal_drive
    }

    pub fn is_cal_drive(&self) -> bool {
        self.cal_drive
    }

    pub fn is_following_line(&self) -> bool {
        self.follow_line
    }

    pub fn routine(&self) -> Option<&'static Routine> {
        self.routine
    }

    pub fn drive(&self) -> &Drive {
        &self.drive
    }

    pub fn shooter(&self) -> &Shooter {
        &self.shooter
    }

    pub fn line_follower(&self) -> &LineFollower {
        &self.line
    }

    pub fn sequencer(&self) -> &StateMachine {
        &self.sm
    }

    /// Ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

// ───────────────────────────────────────────────────────────────
// Relay
// ───────────────────────────────────────────────────────────────

/// Forwards drive and shooter completions into the sequencer, then on to
/// the outer sink.
struct Relay<'a, S> {
    sm: &'a mut StateMachine,
    cal_drive: &'a mut bool,
    sink: &'a mut S,
}

impl<S: EventSink> EventSink for Relay<'_, S> {
    fn on_drive_event(&mut self, drive: &Drive) {
        if self.sm.is_enabled() {
            self.sm
                .dispatch_event(EventSource::Drive.tag(), drive.mode().event_id(), 0, 0, 0);
        } else if *self.cal_drive
            && matches!(drive.mode(), DriveMode::PidDistance | DriveMode::PidAngle)
        {
            *self.cal_drive = false;
            info!("Calibration move complete");
        }
        self.sink.on_drive_event(drive);
    }

    fn on_shooter_event(&mut self, shooter: &Shooter) {
        if self.sm.is_enabled() {
            if let Some(event) = shooter.last_event() {
                self.sm
                    .dispatch_event(EventSource::Shooter.tag(), event.event_id(), 0, 0, 0);
            }
        }
        self.sink.on_shooter_event(shooter);
    }

    fn on_sensor_event(&mut self, sensor: &Sensor) {
        self.sink.on_sensor_event(sensor);
    }
}
