//! Three-zone light sensor classifier.
//!
//! ```text
//!   raw:  0 ────────── lo ─────────── hi ────────── 1023
//!   zone:      Lo       │     Mid      │     Hi
//! ```
//!
//! A reading at or below `threshold_lo` is `Lo`, at or below
//! `threshold_hi` is `Mid`, anything above is `Hi`.  With `inverse` set the
//! outer zones swap (`Mid` is unaffected).  A change of zone is reported
//! once, on the tick where it happens.
//!
//! While calibrating, the sensor only tracks the raw extremes.  Ending the
//! session trisects the observed range into new thresholds.

use log::{debug, info, warn};

use crate::app::ports::{AnalogPort, EventSink, SensorId};
use crate::config::LightSensorConfig;

/// Largest raw reading the analog layer reports (10-bit).
pub const RAW_MAX: u16 = 1023;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Zone {
    Lo = 0,
    Mid = 1,
    Hi = 2,
}

impl Zone {
    /// Base-3 digit used by the line follower.
    pub const fn digit(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone)]
pub struct Sensor {
    id: SensorId,
    threshold_lo: u16,
    threshold_hi: u16,
    inverse: bool,
    events_enabled: bool,

    raw: u16,
    zone: Zone,
    prev_zone: Zone,
    calibrating: bool,
    raw_min: u16,
    raw_max: u16,
}

impl Sensor {
    /// Create a sensor in zone `Lo` with the configured thresholds.
    pub fn new(config: &LightSensorConfig) -> Self {
        Self {
            id: config.id,
            threshold_lo: config.threshold_lo,
            threshold_hi: config.threshold_hi,
            inverse: config.inverse,
            events_enabled: config.events_enabled,
            raw: 0,
            zone: Zone::Lo,
            prev_zone: Zone::Lo,
            calibrating: false,
            raw_min: RAW_MAX,
            raw_max: 0,
        }
    }

    /// Begin tracking raw extremes.  Zone classification pauses.
    pub fn start_calibration(&mut self) {
        self.calibrating = true;
        self.raw_min = RAW_MAX;
        self.raw_max = 0;
        debug!("Sensor {:?} calibration started", self.id);
    }

    /// End calibration and recompute the thresholds from the observed range.
    ///
    /// If no sample was taken the old thresholds are kept.
    pub fn stop_calibration(&mut self) {
        if !self.calibrating {
            return;
        }
        self.calibrating = false;

        if self.raw_min > self.raw_max {
            warn!("Sensor {:?} calibration ended without samples; thresholds kept", self.id);
            return;
        }

        let zone_range = (self.raw_max - self.raw_min) / 3;
        self.threshold_lo = self.raw_min + zone_range;
        self.threshold_hi = self.raw_max - zone_range;
        info!(
            "Sensor {:?} calibrated: range=[{}, {}] thresholds=({}, {})",
            self.id, self.raw_min, self.raw_max, self.threshold_lo, self.threshold_hi
        );
    }

    /// Sample the input and update min/max or the zone.
    pub fn tick(&mut self, hw: &mut impl AnalogPort, sink: &mut impl EventSink) {
        self.raw = hw.read_raw(self.id).min(RAW_MAX);

        if self.calibrating {
            self.raw_min = self.raw_min.min(self.raw);
            self.raw_max = self.raw_max.max(self.raw);
            return;
        }

        let zone = self.classify(self.raw);
        if zone != self.zone {
            self.prev_zone = self.zone;
            self.zone = zone;
            debug!("Sensor {:?}: {:?} -> {:?} (raw={})", self.id, self.prev_zone, zone, self.raw);
            if self.events_enabled {
                sink.on_sensor_event(self);
            }
        }
    }

    fn classify(&self, raw: u16) -> Zone {
        let (lo, hi) = if self.inverse {
            (Zone::Hi, Zone::Lo)
        } else {
            (Zone::Lo, Zone::Hi)
        };

        if raw <= self.threshold_lo {
            lo
        } else if raw <= self.threshold_hi {
            Zone::Mid
        } else {
            hi
        }
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Zone before the most recent change.
    pub fn prev_zone(&self) -> Zone {
        self.prev_zone
    }

    pub fn raw(&self) -> u16 {
        self.raw
    }

    pub fn thresholds(&self) -> (u16, u16) {
        (self.threshold_lo, self.threshold_hi)
    }

    /// Observed (min, max) of the current or last calibration session.
    pub fn raw_range(&self) -> (u16, u16) {
        (self.raw_min, self.raw_max)
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibrating
    }
}
