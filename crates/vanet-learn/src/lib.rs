//! `vanet-learn` — a small feed-forward network that scores link
//! desirability, trained online from the links the simulation actually
//! observes.
//!
//! Architecture: 4 inputs → 16 sigmoid → 8 sigmoid → 1 sigmoid output, plain
//! per-sample SGD.  The weights are owned by whoever owns the estimator —
//! the simulation context — never process globals, so two contexts can train
//! independently.

pub mod error;
pub mod estimator;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::EstimatorError;
pub use estimator::{LinkQualityEstimator, TrainingSample, FEATURE_COUNT};
