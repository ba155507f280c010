//! Device orientation tracking

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One orientation reading from the platform sensor stream
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationSample {
    /// Compass bearing the device is facing, degrees in [0, 360)
    pub heading: f64,
    /// Device tilt in degrees (90 = held upright)
    pub pitch: f64,
    pub roll: f64,
}

impl OrientationSample {
    /// The resting value exposed when no sensor is available
    pub const ZERO: Self = Self {
        heading: 0.0,
        pitch: 0.0,
        roll: 0.0,
    };

    pub fn new(heading: f64, pitch: f64, roll: f64) -> Self {
        Self {
            heading,
            pitch,
            roll,
        }
    }
}

/// Something that turns the orientation event stream into a current sample.
///
/// Implemented by the raw [`OrientationTracker`] and by the smoothing
/// decorator, so consumers do not care which one they hold.
pub trait OrientationSource: Send {
    /// Feed a new sensor reading
    fn on_sample(&mut self, sample: OrientationSample);

    /// Latest sample, or [`OrientationSample::ZERO`] before any reading
    fn current(&self) -> OrientationSample;

    /// True once a real reading has arrived.
    ///
    /// A zero sample from an unsupported platform means "unknown", not
    /// "facing north".
    fn is_known(&self) -> bool;

    /// Mark the sensor as unavailable on this platform
    fn set_supported(&mut self, supported: bool);

    fn is_supported(&self) -> bool;
}

/// Last-write-wins orientation tracker.
///
/// No filtering happens here; wrap it in
/// [`SmoothedTracker`](super::SmoothedTracker) to damp jitter.
#[derive(Debug, Clone)]
pub struct OrientationTracker {
    current: OrientationSample,
    supported: bool,
    received: bool,
    updates: u64,
}

impl Default for OrientationTracker {
    fn default() -> Self {
        Self {
            current: OrientationSample::ZERO,
            supported: true,
            received: false,
            updates: 0,
        }
    }
}

impl OrientationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker for a platform without orientation sensing
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::default()
        }
    }

    /// Number of samples received so far
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl OrientationSource for OrientationTracker {
    fn on_sample(&mut self, sample: OrientationSample) {
        self.current = OrientationSample {
            heading: crate::geo::normalize_degrees(sample.heading),
            ..sample
        };
        self.received = true;
        self.updates += 1;
    }

    fn current(&self) -> OrientationSample {
        self.current
    }

    fn is_known(&self) -> bool {
        self.supported && self.received
    }

    fn set_supported(&mut self, supported: bool) {
        self.supported = supported;
        if !supported {
            self.current = OrientationSample::ZERO;
            self.received = false;
        }
    }

    fn is_supported(&self) -> bool {
        self.supported
    }
}

/// Latest known observer state, read by the render loop once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObserverState {
    pub location: Option<GeoPoint>,
    pub orientation: OrientationSample,
    /// False while the orientation is the zero placeholder
    pub orientation_known: bool,
}
