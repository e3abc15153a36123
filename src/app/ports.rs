//! Port traits: the boundary between the control core and the robot's
//! actuation and sensing layer.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Drive / Shooter / Sensor (domain)
//! ```
//!
//! Driven adapters (motor controllers, encoders, analog inputs,
//! notification handlers) implement these traits.  The components take
//! them as generic parameters on the calls that need hardware, so the
//! control algorithms never touch registers directly and run unchanged
//! against the simulator or a mock.

use serde::{Deserialize, Serialize};

use crate::control::drive::Drive;
use crate::control::shooter::Shooter;
use crate::sensors::light::Sensor;

// ───────────────────────────────────────────────────────────────
// Opaque handles
// ───────────────────────────────────────────────────────────────

/// Opaque handle to one motor output on the actuation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MotorId(pub u8);

/// Opaque handle to one analog input on the sensing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId(pub u8);

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command motors.
pub trait MotorPort {
    /// Drive `motor` at `power` (−100 … 100, sign is direction).
    fn set_power(&mut self, motor: MotorId, power: i32);
}

// ───────────────────────────────────────────────────────────────
// Sensor ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Wheel encoder access.
pub trait EncoderPort {
    /// Accumulated encoder clicks for the encoder attached to `motor`.
    fn encoder(&self, motor: MotorId) -> i32;

    /// Zero the encoder attached to `motor`.
    fn reset_encoder(&mut self, motor: MotorId);
}

/// Analog input access (light sensors and the like).
pub trait AnalogPort {
    /// Raw 10-bit reading (0 … [`RAW_MAX`](crate::sensors::light::RAW_MAX)).
    fn read_raw(&mut self, sensor: SensorId) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Notification port (domain → orchestrator)
// ───────────────────────────────────────────────────────────────

/// Completion and change notifications emitted by the components.
///
/// Each callback receives the emitting component itself, so a handler
/// sees its full state at the moment of the event (for the drive this
/// includes the mode that just finished).  Callbacks run synchronously
/// inside the producing `tick()`.  All methods default to no-ops.
pub trait EventSink {
    /// A PID drive move finished.
    fn on_drive_event(&mut self, _drive: &Drive) {}

    /// A shoot or pickup auto-stop deadline fired.
    fn on_shooter_event(&mut self, _shooter: &Shooter) {}

    /// A sensor crossed into a different zone.
    fn on_sensor_event(&mut self, _sensor: &Sensor) {}
}

/// Sink that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_drive_event(&mut self, drive: &Drive) {
        (**self).on_drive_event(drive);
    }

    fn on_shooter_event(&mut self, shooter: &Shooter) {
        (**self).on_shooter_event(shooter);
    }

    fn on_sensor_event(&mut self, sensor: &Sensor) {
        (**self).on_sensor_event(sensor);
    }
}
