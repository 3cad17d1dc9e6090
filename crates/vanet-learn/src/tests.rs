//! Unit tests for vanet-learn.

use vanet_core::SimRng;

use crate::{EstimatorError, LinkQualityEstimator, TrainingSample};

fn estimator(lr: f64) -> LinkQualityEstimator {
    LinkQualityEstimator::new(lr, &mut SimRng::new(42))
}

fn sample(features: [f64; 4], reward: f64) -> TrainingSample {
    TrainingSample { features, reward }
}

/// A small synthetic batch: reward roughly tracks the first feature
/// (reliability), the way real link samples do.
fn batch() -> Vec<TrainingSample> {
    vec![
        sample([0.9, 0.8, 0.1, 0.2], 0.85),
        sample([0.8, 0.9, 0.2, 0.3], 0.80),
        sample([0.2, 0.3, 0.8, 0.9], 0.25),
        sample([0.1, 0.2, 0.9, 0.8], 0.15),
        sample([0.5, 0.5, 0.5, 0.5], 0.50),
        sample([0.7, 0.4, 0.3, 0.4], 0.65),
        sample([0.3, 0.6, 0.7, 0.6], 0.35),
        sample([0.6, 0.7, 0.4, 0.5], 0.60),
        sample([0.95, 1.0, 0.05, 0.1], 0.90),
        sample([0.05, 0.1, 1.0, 1.0], 0.10),
    ]
}

#[test]
fn predict_rejects_wrong_arity() {
    let est = estimator(0.1);
    assert_eq!(
        est.predict(&[0.5, 0.5]),
        Err(EstimatorError::FeatureLen { expected: 4, got: 2 })
    );
    assert_eq!(
        est.predict(&[0.5; 5]),
        Err(EstimatorError::FeatureLen { expected: 4, got: 5 })
    );
    assert!(est.predict(&[0.5; 4]).is_ok());
}

#[test]
fn predict_is_deterministic_for_fixed_weights() {
    let est = estimator(0.1);
    let features = [0.7, 0.5, 0.3, 0.4];
    let first = est.predict4(features);
    for _ in 0..10 {
        assert_eq!(est.predict4(features), first);
    }
}

#[test]
fn identical_seeds_build_identical_networks() {
    let a = estimator(0.1);
    let b = estimator(0.1);
    let features = [0.2, 0.9, 0.4, 0.6];
    assert_eq!(a.predict4(features), b.predict4(features));
}

#[test]
fn output_stays_in_the_open_unit_interval() {
    let est = estimator(0.1);
    for features in [[0.0; 4], [1.0; 4], [0.5, 0.0, 1.0, 0.25], [10.0, -10.0, 3.0, -3.0]] {
        let y = est.predict4(features);
        assert!(y > 0.0 && y < 1.0, "prediction {y} for {features:?}");
    }
}

#[test]
fn training_strictly_reduces_batch_error() {
    // Correct backprop sign: repeated passes over the same batch must drive
    // the squared error down monotonically at this learning rate.
    let mut est = estimator(0.1);
    let batch = batch();

    let mut last = est.mean_squared_error(&batch);
    for round in 0..20 {
        est.train_on_batch(&batch);
        let mse = est.mean_squared_error(&batch);
        assert!(mse < last, "round {round}: MSE rose from {last} to {mse}");
        last = mse;
    }
}

#[test]
fn training_moves_prediction_toward_target() {
    let mut est = estimator(0.5);
    let s = sample([0.9, 0.9, 0.1, 0.1], 1.0);
    let before = est.predict4(s.features);
    for _ in 0..200 {
        est.train_on_batch(&[s]);
    }
    let after = est.predict4(s.features);
    assert!(after > before);
    assert!((1.0 - after) < (1.0 - before) / 2.0, "before {before}, after {after}");
}

#[test]
fn empty_batch_is_a_no_op() {
    let mut est = estimator(0.1);
    let features = [0.4, 0.6, 0.2, 0.8];
    let before = est.predict4(features);
    est.train_on_batch(&[]);
    assert_eq!(est.predict4(features), before);
    assert_eq!(est.mean_squared_error(&[]), 0.0);
}
