//! The feed-forward link-quality estimator.

use vanet_core::SimRng;

use crate::EstimatorError;

/// Input feature count: reliability, normalised duration, normalised
/// relative speed, normalised own speed.
pub const FEATURE_COUNT: usize = 4;

const HIDDEN1: usize = 16;
const HIDDEN2: usize = 8;

/// Initial weights and biases are drawn uniformly from ±`INIT_SPREAD`.
const INIT_SPREAD: f64 = 0.1;

// ── TrainingSample ────────────────────────────────────────────────────────────

/// One observation: a link's feature vector and the quality it exhibited.
///
/// Ephemeral — produced and consumed within a single training cycle.
#[derive(Copy, Clone, Debug)]
pub struct TrainingSample {
    pub features: [f64; FEATURE_COUNT],
    pub reward: f64,
}

// ── LinkQualityEstimator ──────────────────────────────────────────────────────

/// 4 → 16 → 8 → 1 sigmoid network used as a desirability predictor.
pub struct LinkQualityEstimator {
    learning_rate: f64,
    w1: [[f64; HIDDEN1]; FEATURE_COUNT],
    b1: [f64; HIDDEN1],
    w2: [[f64; HIDDEN2]; HIDDEN1],
    b2: [f64; HIDDEN2],
    w3: [f64; HIDDEN2],
    b3: f64,
}

/// Activations kept from a forward pass for backpropagation.
struct Activations {
    hidden1: [f64; HIDDEN1],
    hidden2: [f64; HIDDEN2],
    output: f64,
}

impl LinkQualityEstimator {
    /// Fresh network with weights drawn from `rng`.
    pub fn new(learning_rate: f64, rng: &mut SimRng) -> Self {
        let mut init = || rng.gen_range(-INIT_SPREAD..INIT_SPREAD);

        let mut w1 = [[0.0; HIDDEN1]; FEATURE_COUNT];
        for row in &mut w1 {
            for w in row.iter_mut() {
                *w = init();
            }
        }
        let mut b1 = [0.0; HIDDEN1];
        for b in &mut b1 {
            *b = init();
        }
        let mut w2 = [[0.0; HIDDEN2]; HIDDEN1];
        for row in &mut w2 {
            for w in row.iter_mut() {
                *w = init();
            }
        }
        let mut b2 = [0.0; HIDDEN2];
        for b in &mut b2 {
            *b = init();
        }
        let mut w3 = [0.0; HIDDEN2];
        for w in &mut w3 {
            *w = init();
        }
        let b3 = init();

        Self { learning_rate, w1, b1, w2, b2, w3, b3 }
    }

    // ── Prediction ────────────────────────────────────────────────────────

    /// Predict desirability in (0, 1) from a raw feature slice.
    ///
    /// Fails fast on any length other than [`FEATURE_COUNT`] — a wrong-sized
    /// vector is a caller bug, not a runtime condition.
    pub fn predict(&self, features: &[f64]) -> Result<f64, EstimatorError> {
        let features: &[f64; FEATURE_COUNT] =
            features.try_into().map_err(|_| EstimatorError::FeatureLen {
                expected: FEATURE_COUNT,
                got: features.len(),
            })?;
        Ok(self.predict4(*features))
    }

    /// Predict from a fixed-size feature array (infallible form, used on the
    /// hot path where the compiler already guarantees the arity).
    #[inline]
    pub fn predict4(&self, features: [f64; FEATURE_COUNT]) -> f64 {
        self.forward(&features).output
    }

    fn forward(&self, features: &[f64; FEATURE_COUNT]) -> Activations {
        let mut hidden1 = [0.0; HIDDEN1];
        for i in 0..HIDDEN1 {
            let mut sum = self.b1[i];
            for j in 0..FEATURE_COUNT {
                sum += features[j] * self.w1[j][i];
            }
            hidden1[i] = sigmoid(sum);
        }

        let mut hidden2 = [0.0; HIDDEN2];
        for i in 0..HIDDEN2 {
            let mut sum = self.b2[i];
            for j in 0..HIDDEN1 {
                sum += hidden1[j] * self.w2[j][i];
            }
            hidden2[i] = sigmoid(sum);
        }

        let mut sum = self.b3;
        for i in 0..HIDDEN2 {
            sum += hidden2[i] * self.w3[i];
        }

        Activations { hidden1, hidden2, output: sigmoid(sum) }
    }

    // ── Training ──────────────────────────────────────────────────────────

    /// One SGD pass over `samples`, applied sample-by-sample in the order
    /// given.  Squared-error loss; deltas are computed against the
    /// pre-update weights of each sample's own pass.
    pub fn train_on_batch(&mut self, samples: &[TrainingSample]) {
        for sample in samples {
            self.train_one(sample);
        }
    }

    fn train_one(&mut self, sample: &TrainingSample) {
        let features = &sample.features;
        let acts = self.forward(features);
        let error = sample.reward - acts.output;

        // Output layer delta (σ' = y(1−y)).
        let delta_out = error * acts.output * (1.0 - acts.output);

        // Hidden deltas against the current (pre-update) weights.
        let mut delta_h2 = [0.0; HIDDEN2];
        for i in 0..HIDDEN2 {
            delta_h2[i] = delta_out * self.w3[i] * acts.hidden2[i] * (1.0 - acts.hidden2[i]);
        }
        let mut delta_h1 = [0.0; HIDDEN1];
        for i in 0..HIDDEN1 {
            let mut back = 0.0;
            for j in 0..HIDDEN2 {
                back += delta_h2[j] * self.w2[i][j];
            }
            delta_h1[i] = back * acts.hidden1[i] * (1.0 - acts.hidden1[i]);
        }

        // Apply updates.
        let lr = self.learning_rate;
        self.b3 += lr * delta_out;
        for i in 0..HIDDEN2 {
            self.w3[i] += lr * delta_out * acts.hidden2[i];
        }
        for i in 0..HIDDEN2 {
            self.b2[i] += lr * delta_h2[i];
            for j in 0..HIDDEN1 {
                self.w2[j][i] += lr * delta_h2[i] * acts.hidden1[j];
            }
        }
        for i in 0..HIDDEN1 {
            self.b1[i] += lr * delta_h1[i];
            for j in 0..FEATURE_COUNT {
                self.w1[j][i] += lr * delta_h1[i] * features[j];
            }
        }
    }

    /// Mean squared error of the current weights over `samples`.
    pub fn mean_squared_error(&self, samples: &[TrainingSample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples
            .iter()
            .map(|s| (s.reward - self.predict4(s.features)).powi(2))
            .sum::<f64>()
            / samples.len() as f64
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
