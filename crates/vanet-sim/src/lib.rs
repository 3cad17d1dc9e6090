//! `vanet-sim` — the tick orchestrator.
//!
//! # Per-tick phase order
//!
//! ```text
//! for each tick:
//!   ① Move      — align vehicles to roads, integrate positions, wrap at
//!                 the boundary.
//!   ② Generate  — applications whose interval elapsed enqueue messages.
//!   ③ Topology  — rebuild the whole link graph from current geometry.
//!   ④ Deliver   — drain the queue in priority order: broadcast, relay, or
//!                 route + unicast; re-enqueue only broken-path messages.
//!   ⑤ Train     — every N ticks (learned mode), fit the estimator to the
//!                 links observed this tick and smooth qualities toward its
//!                 predictions.
//! ```
//!
//! Single-threaded and deterministic given a seed: one tick runs to
//! completion before the next, and all randomness flows through the one
//! `SimRng` owned by the [`Simulation`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use vanet_core::{Point2, RoutingMode};
//! use vanet_sim::{NoopMetrics, SimConfig, Simulation};
//!
//! let mut sim = Simulation::new(SimConfig::new(RoutingMode::Learned, 42));
//! sim.add_infrastructure("RSU1", Point2::new(250.0, 250.0), 300.0);
//! sim.add_vehicle("V0", Point2::new(100.0, 250.0), 0.0, 12.0);
//! sim.run_ticks(3_000, &mut NoopMetrics);
//! println!("{:?}", sim.network_stats());
//! ```

pub mod config;
pub mod delivery;
pub mod sim;
pub mod sink;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use delivery::Delivery;
pub use sim::{NetworkStats, Simulation};
pub use sink::{MetricsSink, NoopMetrics};
