//! Simulation clock: maps real frame time to a variably-scaled simulated epoch.
//!
//! Real time arrives either as per-frame deltas pushed by the host (Bevy's
//! `Time`) or through an injected [`WallClock`] the clock reads itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bevy::log::{debug, info, warn};

use crate::types::{SECONDS_PER_DAY, unix_ms_to_julian_date};

/// Default rate: one simulated day per real second.
pub const DEFAULT_RATE_SCALE: f64 = SECONDS_PER_DAY;

/// Rates offered by the number-key shortcuts (simulated seconds per real second).
pub const RATE_PRESETS: [f64; 4] = [
    3600.0,                  // 1 hour/s
    SECONDS_PER_DAY,         // 1 day/s
    7.0 * SECONDS_PER_DAY,   // 1 week/s
    30.0 * SECONDS_PER_DAY,  // ~1 month/s
];

/// Source of real (wall) time in seconds. Only differences are meaningful.
pub trait WallClock: Send + Sync {
    fn now(&self) -> f64;
}

/// Hand-driven wall clock. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    seconds_bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_seconds: f64) -> Self {
        Self {
            seconds_bits: Arc::new(AtomicU64::new(start_seconds.to_bits())),
        }
    }

    /// Move the reading forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }

    pub fn set(&self, seconds: f64) {
        self.seconds_bits.store(seconds.to_bits(), Ordering::Relaxed);
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.seconds_bits.load(Ordering::Relaxed))
    }
}

/// Visibility of the hosting surface, forwarded by the host environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostVisibility {
    Visible,
    Hidden,
}

/// Simulated epoch driven by real frame time, rate scale and pause state.
pub struct SimulationClock {
    /// Simulated time as Unix milliseconds
    simulated_epoch_ms: f64,
    /// Simulated seconds advanced per real second
    rate_scale: f64,
    paused: bool,
    /// Pause was requested by the host, not the user
    host_suspended: bool,
    /// Absent when the host pushes deltas through [`Self::advance`]
    wall: Option<Box<dyn WallClock>>,
    /// Wall reading at the last `tick` (or resume)
    last_frame: f64,
}

impl SimulationClock {
    /// Create a clock at `start_epoch_ms` reading real time from `wall`.
    pub fn new(start_epoch_ms: f64, wall: impl WallClock + 'static) -> Self {
        let last_frame = wall.now();
        Self {
            last_frame,
            wall: Some(Box::new(wall)),
            ..Self::host_driven(start_epoch_ms)
        }
    }

    /// Create a clock at `start_epoch_ms` that only moves through [`Self::advance`].
    pub fn host_driven(start_epoch_ms: f64) -> Self {
        Self {
            simulated_epoch_ms: start_epoch_ms,
            rate_scale: DEFAULT_RATE_SCALE,
            paused: false,
            host_suspended: false,
            wall: None,
            last_frame: 0.0,
        }
    }

    /// Simulated epoch as Unix milliseconds.
    pub fn simulated_epoch_ms(&self) -> f64 {
        self.simulated_epoch_ms
    }

    /// Simulated epoch as a Julian Date.
    pub fn epoch_jd(&self) -> f64 {
        unix_ms_to_julian_date(self.simulated_epoch_ms)
    }

    pub fn rate_scale(&self) -> f64 {
        self.rate_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Measure real time since the last frame and advance by it.
    ///
    /// Returns the real delta in seconds; always 0 for a host-driven clock.
    pub fn tick(&mut self) -> f64 {
        let Some(wall) = &self.wall else {
            return 0.0;
        };
        let now = wall.now();
        let real_delta = now - self.last_frame;
        self.last_frame = now;
        self.advance(real_delta);
        real_delta
    }

    /// Advance simulated time by a real-time delta, unless paused.
    pub fn advance(&mut self, real_delta_seconds: f64) {
        if self.paused || !real_delta_seconds.is_finite() || real_delta_seconds <= 0.0 {
            return;
        }
        self.simulated_epoch_ms += real_delta_seconds * 1000.0 * self.rate_scale;
    }

    /// Set simulated seconds per real second.
    ///
    /// 0 stops simulated time and negative values run it backwards; callers
    /// wanting a "stopped" state should prefer [`Self::set_paused`].
    pub fn set_rate_scale(&mut self, rate_scale: f64) {
        if !rate_scale.is_finite() {
            warn!("Ignoring non-finite rate scale {}", rate_scale);
            return;
        }
        self.rate_scale = rate_scale;
        info!("Rate scale: {} sim-s per real-s", rate_scale);
    }

    /// Pause or resume simulated time.
    ///
    /// Resuming restarts frame timing from the resume instant, so the paused
    /// interval is never simulated.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused
            && !paused
            && let Some(wall) = &self.wall
        {
            self.last_frame = wall.now();
        }
        if self.paused != paused {
            info!("Simulation {}", if paused { "paused" } else { "running" });
        }
        self.paused = paused;
        self.host_suspended = false;
    }

    /// Forward a host visibility transition.
    ///
    /// Hiding pauses the clock; showing resumes it only if the host caused the
    /// pause, so an explicit user pause survives focus changes.
    pub fn on_host_visibility(&mut self, visibility: HostVisibility) {
        match visibility {
            HostVisibility::Hidden => {
                if !self.paused {
                    debug!("Host hidden, suspending simulated time");
                    self.set_paused(true);
                    self.host_suspended = true;
                }
            }
            HostVisibility::Visible => {
                if self.host_suspended {
                    debug!("Host visible, resuming simulated time");
                    self.set_paused(false);
                }
            }
        }
    }
}
