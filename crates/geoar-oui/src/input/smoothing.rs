//! Optional orientation smoothing
//!
//! Sits between the tracker and the projector. The projector only ever sees an
//! [`OrientationSource`], so turning smoothing on or off does not change its
//! contract.

use geoar_config::SmoothingConfig;

use super::{OrientationSample, OrientationSource, OrientationTracker};

/// Smoothing strategy
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Smoothing {
    /// Pass samples through unchanged
    #[default]
    None,
    /// Exponential moving average; heading is averaged on the circle
    Ema { alpha: f64 },
    /// Per-axis dead band: changes smaller than `degrees` are ignored
    DeadBand { degrees: f64 },
}

impl From<SmoothingConfig> for Smoothing {
    fn from(config: SmoothingConfig) -> Self {
        match config {
            SmoothingConfig::None => Smoothing::None,
            SmoothingConfig::Ema { alpha } => Smoothing::Ema { alpha },
            SmoothingConfig::DeadBand { degrees } => Smoothing::DeadBand { degrees },
        }
    }
}

/// Signed shortest angular difference `to - from`, in (-180, 180]
fn angle_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Orientation source decorator that filters samples before exposing them
#[derive(Debug, Clone)]
pub struct SmoothedTracker<T = OrientationTracker> {
    inner: T,
    smoothing: Smoothing,
    filtered: Option<OrientationSample>,
}

impl<T: OrientationSource> SmoothedTracker<T> {
    pub fn new(inner: T, smoothing: Smoothing) -> Self {
        Self {
            inner,
            smoothing,
            filtered: None,
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn filter(&self, previous: OrientationSample, raw: OrientationSample) -> OrientationSample {
        match self.smoothing {
            Smoothing::None => raw,
            Smoothing::Ema { alpha } => OrientationSample {
                heading: crate::geo::normalize_degrees(
                    previous.heading + alpha * angle_delta(previous.heading, raw.heading),
                ),
                pitch: previous.pitch + alpha * (raw.pitch - previous.pitch),
                roll: previous.roll + alpha * (raw.roll - previous.roll),
            },
            Smoothing::DeadBand { degrees } => {
                let heading = if angle_delta(previous.heading, raw.heading).abs() < degrees {
                    previous.heading
                } else {
                    raw.heading
                };
                let pitch = if (raw.pitch - previous.pitch).abs() < degrees {
                    previous.pitch
                } else {
                    raw.pitch
                };
                let roll = if (raw.roll - previous.roll).abs() < degrees {
                    previous.roll
                } else {
                    raw.roll
                };
                OrientationSample {
                    heading,
                    pitch,
                    roll,
                }
            }
        }
    }
}

impl<T: OrientationSource> OrientationSource for SmoothedTracker<T> {
    fn on_sample(&mut self, sample: OrientationSample) {
        self.inner.on_sample(sample);
        if !self.inner.is_known() {
            return;
        }

        let raw = self.inner.current();
        self.filtered = Some(match self.filtered {
            // First real sample seeds the filter
            None => raw,
            Some(previous) => self.filter(previous, raw),
        });
    }

    fn current(&self) -> OrientationSample {
        self.filtered.unwrap_or_else(|| self.inner.current())
    }

    fn is_known(&self) -> bool {
        self.inner.is_known()
    }

    fn set_supported(&mut self, supported: bool) {
        self.inner.set_supported(supported);
        if !supported {
            self.filtered = None;
        }
    }

    fn is_supported(&self) -> bool {
        self.inner.is_supported()
    }
}
