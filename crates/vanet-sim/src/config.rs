//! Top-level simulation configuration.

use vanet_core::{RoutingMode, SimClock};

/// Everything a [`Simulation`][crate::Simulation] needs besides the scenario
/// itself (nodes, roads, zones, obstacles — those are added through the
/// setup mutators).
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Simulation area width in metres.  Vehicles wrap at the boundary.
    pub width: f64,

    /// Simulation area height in metres.
    pub height: f64,

    /// Default transmission range for vehicles, in metres.
    pub transmission_range: f64,

    /// Simulated milliseconds per tick.  Default: 100.
    pub tick_ms: u64,

    /// Which weighting family drives link quality and routing.
    pub mode: RoutingMode,

    /// SGD learning rate for the link-quality estimator.
    pub learning_rate: f64,

    /// Retrain the estimator every this many ticks (learned mode only).
    /// Default: 10 ticks = once per simulated second.
    pub train_interval_ticks: u64,

    /// Master RNG seed.  The same seed and scenario always produce
    /// identical results.
    pub seed: u64,
}

impl SimConfig {
    /// A configuration with the standard 1 km² area and 300 m radio range.
    pub fn new(mode: RoutingMode, seed: u64) -> Self {
        Self {
            width: 1_000.0,
            height: 1_000.0,
            transmission_range: 300.0,
            tick_ms: SimClock::DEFAULT_TICK_MS,
            mode,
            learning_rate: 0.1,
            train_interval_ticks: 10,
            seed,
        }
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_ms)
    }
}
