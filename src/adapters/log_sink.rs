//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one structured line per component
//! notification through the `log` facade.  Counts what it has seen so a
//! host tool can print a summary.

use log::info;

use crate::app::ports::EventSink;
use crate::control::drive::Drive;
use crate::control::shooter::Shooter;
use crate::sensors::light::Sensor;

/// Adapter that logs every notification.
#[derive(Debug, Default)]
pub struct LogEventSink {
    drive_events: u32,
    shooter_events: u32,
    sensor_events: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// (drive, shooter, sensor) notifications seen.
    pub fn counts(&self) -> (u32, u32, u32) {
        (self.drive_events, self.shooter_events, self.sensor_events)
    }
}

impl EventSink for LogEventSink {
    fn on_drive_event(&mut self, drive: &Drive) {
        self.drive_events += 1;
        let (tl, tr) = drive.targets();
        info!("DRIVE | {:?} done | target=({}, {})", drive.mode(), tl, tr);
    }

    fn on_shooter_event(&mut self, shooter: &Shooter) {
        self.shooter_events += 1;
        info!(
            "SHOOT | {:?} | power={} goal={}",
            shooter.last_event(),
            shooter.current_power(),
            shooter.goal_power()
        );
    }

    fn on_sensor_event(&mut self, sensor: &Sensor) {
        self.sensor_events += 1;
        info!(
            "SENSE | {:?} {:?} -> {:?} | raw={}",
            sensor.id(),
            sensor.prev_zone(),
            sensor.zone(),
            sensor.raw()
        );
    }
}
