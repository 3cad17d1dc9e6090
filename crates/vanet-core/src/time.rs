//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter; `SimClock` maps it to
//! simulated milliseconds:
//!
//!   sim_time_ms = tick * tick_ms
//!
//! Using an integer tick as the canonical time unit keeps message-interval
//! arithmetic exact (no floating-point drift).  The default tick duration is
//! 100 ms, matching the radio-layer update rate the rest of the workspace is
//! calibrated against.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated milliseconds.
///
/// Cheap to copy; holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated milliseconds one tick represents.  Default: 100.
    pub tick_ms: u64,
    /// The current tick — advanced by `SimClock::advance()` each step.
    pub current_tick: Tick,
}

impl SimClock {
    /// Default simulation step: 100 ms.
    pub const DEFAULT_TICK_MS: u64 = 100;

    pub fn new(tick_ms: u64) -> Self {
        Self {
            tick_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated milliseconds elapsed since tick 0.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.current_tick.0 * self.tick_ms
    }

    /// Duration of one tick in seconds.
    #[inline]
    pub fn tick_secs(&self) -> f64 {
        self.tick_ms as f64 / 1_000.0
    }

    /// Convert a tick span to simulated milliseconds.
    #[inline]
    pub fn span_ms(&self, from: Tick, to: Tick) -> u64 {
        to.since(from) * self.tick_ms
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ms)", self.current_tick, self.now_ms())
    }
}
