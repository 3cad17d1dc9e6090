//! `vanet-channel` — the stochastic radio channel model.
//!
//! Turns geometry plus environment into a per-link signal strength,
//! reliability, and expected duration.  The pipeline for one directed link:
//!
//! ```text
//! path loss      = max(0, 1 − distance/range)
//! shadowing      = diminishing-returns sum over crossed obstacles
//! fading         = sqrt(Gamma(m, Ω/m)) / sqrt(m)       (Nakagami-m)
//! signal         = clamp01(path_loss · (1 − shadowing) · fading)
//! reliability    = signal, cut when line-of-sight is obstructed and
//!                  scaled down by the local congestion factor
//! duration       = (range − distance) / relative_speed
//! ```
//!
//! All loss multipliers in this crate are calibrated severity knobs, not
//! protocol invariants.

pub mod environment;
pub mod model;
pub mod sampler;
pub mod zones;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use environment::Environment;
pub use model::{ChannelModel, LinkEstimate};
pub use sampler::{sample_gamma, sample_nakagami};
pub use zones::{
    congestion_factor, obstacle_attenuation, CongestionZone, Obstacle, DENSITY_RADIUS_M,
};
