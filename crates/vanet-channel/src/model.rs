//! The radio channel model.
//!
//! Stateless apart from the Nakagami spread constant; every estimate draws
//! its fading sample from the caller's `SimRng`, so two directions of the
//! same node pair get independent fades.

use vanet_core::SimRng;

use crate::sampler::sample_nakagami;

/// Attenuation at or above which line of sight counts as obstructed.
const OBSTRUCTION_THRESHOLD: f64 = 0.8;

/// Reliability multiplier applied to obstructed vehicle-to-vehicle links.
const OBSTRUCTED_RELIABILITY: f64 = 0.6;

/// Baseline reliability multiplier for roadside-unit links.
const V2I_RELIABILITY: f64 = 0.9;

/// Roadside units shrug off congestion at half the vehicle rate.
const V2I_CONGESTION_SCALE: f64 = 0.5;

/// Duration reported for pairs with near-zero relative speed, in seconds.
const STABLE_LINK_SECS: f64 = 300.0;

/// Relative speeds below this are treated as "not moving apart".
const MIN_RELATIVE_SPEED: f64 = 0.1;

// ── LinkEstimate ──────────────────────────────────────────────────────────────

/// One directed link estimate: everything the topology layer needs to build
/// a `Link` except the policy-dependent quality score.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkEstimate {
    /// Faded signal strength in [0, 1].
    pub signal: f64,
    /// Expected per-hop delivery probability in [0, 1].
    pub reliability: f64,
    /// Seconds until the link is expected to break; infinite for
    /// roadside-unit links.
    pub duration_secs: f64,
}

// ── ChannelModel ──────────────────────────────────────────────────────────────

/// Distance attenuation + obstacle shadowing + Nakagami-m fading +
/// congestion-dependent reliability.
#[derive(Clone, Debug)]
pub struct ChannelModel {
    /// Nakagami spread Ω.  1.0 = normalised received power.
    spread: f64,
}

impl ChannelModel {
    pub fn new() -> Self {
        Self { spread: 1.0 }
    }

    /// Faded signal strength in [0, 1] for a link of length `distance`.
    ///
    /// `shape` is the Nakagami `m` for the link class and environment;
    /// `attenuation` the accumulated obstacle shadowing in [0, 1].
    pub fn signal_strength(
        &self,
        rng: &mut SimRng,
        distance: f64,
        range: f64,
        shape: f64,
        attenuation: f64,
    ) -> f64 {
        let path_loss = (1.0 - distance / range).max(0.0) * (1.0 - attenuation);
        let fading = sample_nakagami(rng, shape, self.spread) / shape.sqrt();
        (path_loss * fading).clamp(0.0, 1.0)
    }

    /// Estimate one direction of a vehicle-to-vehicle link.
    ///
    /// `congestion` is the factor at the sending vehicle's position.
    pub fn v2v_estimate(
        &self,
        rng: &mut SimRng,
        distance: f64,
        range: f64,
        shape: f64,
        attenuation: f64,
        congestion: f64,
        relative_speed: f64,
    ) -> LinkEstimate {
        let signal = self.signal_strength(rng, distance, range, shape, attenuation);
        let line_of_sight = attenuation < OBSTRUCTION_THRESHOLD;
        let mut reliability = if line_of_sight {
            signal
        } else {
            signal * OBSTRUCTED_RELIABILITY
        };
        reliability *= 1.0 - congestion;
        LinkEstimate {
            signal,
            reliability,
            duration_secs: Self::link_duration(distance, relative_speed, range),
        }
    }

    /// Estimate one direction of a vehicle-to-infrastructure link.
    ///
    /// `congestion` is the factor at the roadside unit's position.  The
    /// fixed-position endpoint makes the duration effectively unbounded.
    pub fn v2i_estimate(
        &self,
        rng: &mut SimRng,
        distance: f64,
        range: f64,
        shape: f64,
        attenuation: f64,
        congestion: f64,
    ) -> LinkEstimate {
        let signal = self.signal_strength(rng, distance, range, shape, attenuation);
        let reliability = V2I_RELIABILITY * signal * (1.0 - congestion * V2I_CONGESTION_SCALE);
        LinkEstimate {
            signal,
            reliability,
            duration_secs: f64::INFINITY,
        }
    }

    /// Seconds until two nodes currently `distance` apart drift out of
    /// `range`, at the given closing/opening speed.
    pub fn link_duration(distance: f64, relative_speed: f64, range: f64) -> f64 {
        if relative_speed < MIN_RELATIVE_SPEED {
            return STABLE_LINK_SECS;
        }
        (range - distance) / relative_speed
    }
}

impl Default for ChannelModel {
    fn default() -> Self {
        Self::new()
    }
}
