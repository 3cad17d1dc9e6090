//! Error type for vanet-learn.

use thiserror::Error;

/// A malformed input is a caller bug, so it fails fast rather than being
/// absorbed into a default prediction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimatorError {
    #[error("feature vector has {got} elements, expected {expected}")]
    FeatureLen { expected: usize, got: usize },
}
