//! Mock hardware and event sink for integration tests.
//!
//! Records every motor write so tests can assert on the command history.
//! Encoders and light sensors only change when a test sets them.

use hotshot::app::ports::{AnalogPort, EncoderPort, EventSink, MotorId, MotorPort, SensorId};
use hotshot::control::drive::{Drive, DriveMode};
use hotshot::control::shooter::{Shooter, ShooterEvent};
use hotshot::sensors::light::{Sensor, Zone};

// ── Motor call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorCall {
    pub motor: MotorId,
    pub power: i32,
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<MotorCall>,
    pub encoders: [i32; 8],
    pub raw: [u16; 4],
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent power written to `motor`, or 0 if never written.
    pub fn power(&self, motor: MotorId) -> i32 {
        self.calls
            .iter()
            .rev()
            .find(|c| c.motor == motor)
            .map_or(0, |c| c.power)
    }

    pub fn set_encoder(&mut self, motor: MotorId, clicks: i32) {
        self.encoders[usize::from(motor.0)] = clicks;
    }
}

impl MotorPort for MockHardware {
    fn set_power(&mut self, motor: MotorId, power: i32) {
        self.calls.push(MotorCall { motor, power });
    }
}

impl EncoderPort for MockHardware {
    fn encoder(&self, motor: MotorId) -> i32 {
        self.encoders[usize::from(motor.0)]
    }

    fn reset_encoder(&mut self, motor: MotorId) {
        self.encoders[usize::from(motor.0)] = 0;
    }
}

impl AnalogPort for MockHardware {
    fn read_raw(&mut self, sensor: SensorId) -> u16 {
        self.raw[usize::from(sensor.0)]
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Drive(DriveMode),
    Shooter(ShooterEvent),
    Sensor(SensorId, Zone),
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<Recorded>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drive_events(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Recorded::Drive(_)))
            .count()
    }

    pub fn shooter_events(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Recorded::Shooter(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn on_drive_event(&mut self, drive: &Drive) {
        self.events.push(Recorded::Drive(drive.mode()));
    }

    fn on_shooter_event(&mut self, shooter: &Shooter) {
        if let Some(event) = shooter.last_event() {
            self.events.push(Recorded::Shooter(event));
        }
    }

    fn on_sensor_event(&mut self, sensor: &Sensor) {
        self.events.push(Recorded::Sensor(sensor.id(), sensor.zone()));
    }
}
