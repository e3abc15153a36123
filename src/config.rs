//! Robot configuration parameters
//!
//! All construction-time constants for the control core: motor handles,
//! encoder calibration, PID gains, shooter ramp timing and light-sensor
//! thresholds.  Defaults are the competition robot's measured values.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::app::ports::{MotorId, SensorId};
use crate::control::pid::PidGains;
use crate::error::{Error, Result};
use crate::sensors::line_follower::MAX_LIGHT_SENSORS;

// --- Drive geometry ---
/// Wheel to motor gear ratio (16:24).
pub const GEAR_RATIO: f32 = 16.0 / 24.0;
/// Wheel circumference in inches.
pub const WHEEL_CIRCUMFERENCE_IN: f32 = 12.450;
/// Encoder clicks per motor revolution.
pub const CLICKS_PER_REVOLUTION: f32 = 1440.0;
/// Distance between the wheel contact patches in inches.
pub const WHEELBASE_IN: f32 = 27.08;

/// Encoder clicks per inch travelled.
pub const CLICKS_PER_INCH: f32 = CLICKS_PER_REVOLUTION * GEAR_RATIO / WHEEL_CIRCUMFERENCE_IN;
/// Encoder clicks per degree of in-place turn.
pub const CLICKS_PER_DEGREE: f32 = CLICKS_PER_INCH * core::f32::consts::PI * WHEELBASE_IN / 360.0;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    pub drive: DriveConfig,
    pub shooter: ShooterConfig,
    /// Line-follower light sensors, most significant (left) first.
    pub light_sensors: Vec<LightSensorConfig, MAX_LIGHT_SENSORS>,
    /// Scheduler period used by the simulator (milliseconds).
    pub tick_period_ms: u32,
}

/// Drive subsystem configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveConfig {
    pub motor_left: MotorId,
    pub motor_right: MotorId,
    /// Encoder clicks per unit of distance.
    pub clicks_per_distance: f32,
    /// Encoder clicks per degree of turn.
    pub clicks_per_degree: f32,
    pub gains: PidGains,
    /// Emit a notification when a PID move completes.
    pub events_enabled: bool,
}

/// Shooter and pickup configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShooterConfig {
    pub motor_upper: MotorId,
    pub motor_lower: MotorId,
    pub motor_feeder: MotorId,
    pub motor_roller: MotorId,
    pub motor_elevator: MotorId,
    /// Largest change in shooter power per ramp step.
    pub power_step: i32,
    /// Minimum time between ramp steps (milliseconds).
    pub time_step_ms: u32,

    // --- Presets ---
    pub high_power: i32,
    pub low_power: i32,
    pub feeder_power: i32,
    pub roller_power: i32,
    pub elevator_power: i32,
}

/// One light sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSensorConfig {
    pub id: SensorId,
    pub threshold_lo: u16,
    pub threshold_hi: u16,
    /// Swap the Lo and Hi zones (dark reads high).
    pub inverse: bool,
    /// Emit a notification on every zone change.
    pub events_enabled: bool,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            motor_left: MotorId(6),
            motor_right: MotorId(5),
            clicks_per_distance: CLICKS_PER_INCH,
            clicks_per_degree: CLICKS_PER_DEGREE,
            gains: PidGains::new(0.3, 0.0, 0.0),
            events_enabled: true,
        }
    }
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            motor_upper: MotorId(4),
            motor_lower: MotorId(3),
            motor_feeder: MotorId(2),
            motor_roller: MotorId(0),
            motor_elevator: MotorId(1),
            power_step: 10,
            time_step_ms: 10,

            high_power: 100,
            low_power: 20,
            feeder_power: 100,
            roller_power: 100,
            elevator_power: 100,
        }
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        let mut light_sensors = Vec::new();
        for (id, lo, hi) in [(0, 475, 565), (1, 400, 493), (2, 478, 592)] {
            // Capacity equals the literal's length.
            let _ = light_sensors.push(LightSensorConfig {
                id: SensorId(id),
                threshold_lo: lo,
                threshold_hi: hi,
                inverse: true,
                events_enabled: false,
            });
        }

        Self {
            drive: DriveConfig::default(),
            shooter: ShooterConfig::default(),
            light_sensors,
            tick_period_ms: 10,
        }
    }
}

impl RobotConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<()> {
        let d = &self.drive;
        if d.motor_left == d.motor_right {
            return Err(Error::Config("drive motors must be distinct"));
        }
        let positive = |x: f32| x.is_finite() && x > 0.0;
        if !positive(d.clicks_per_distance) || !positive(d.clicks_per_degree) {
            return Err(Error::Config("drive click constants must be finite and positive"));
        }
        // Autonomous steps only advance on drive completion events.
        if !d.events_enabled {
            return Err(Error::Config("drive events must be enabled for autonomous"));
        }

        let s = &self.shooter;
        if s.power_step <= 0 {
            return Err(Error::Config("shooter power_step must be positive"));
        }
        if s.time_step_ms == 0 {
            return Err(Error::Config("shooter time_step_ms must be positive"));
        }

        // The built-in action table is indexed by three zone digits.
        if self.light_sensors.len() != MAX_LIGHT_SENSORS {
            return Err(Error::Config("exactly 3 light sensors required"));
        }
        if self
            .light_sensors
            .iter()
            .any(|l| l.threshold_lo >= l.threshold_hi)
        {
            return Err(Error::Config("light sensor threshold_lo must be below threshold_hi"));
        }

        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be positive"));
        }
        Ok(())
    }
}
