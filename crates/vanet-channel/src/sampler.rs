//! Gamma and Nakagami-m sampling.
//!
//! A Nakagami-m variate is the square root of a Gamma(m, Ω/m) variate, so
//! the only real work is the Gamma sampler.  Two methods cover the shape
//! range:
//!
//! - shape ≥ 1: Marsaglia–Tsang squeeze method (one Gaussian + one uniform
//!   per attempt, acceptance rate > 95 %).
//! - shape < 1: Ahrens–Dieter rejection, retried iteratively until accepted.
//!
//! Both draw exclusively from the caller's `SimRng` so sampling stays on the
//! simulation's single deterministic stream.

use rand::Rng;
use rand_distr::StandardNormal;

use vanet_core::SimRng;

/// Sample Gamma(shape, scale).  Never returns a negative value.
///
/// # Panics
/// Debug-asserts that `shape` and `scale` are positive; production callers
/// pass fixed environment constants.
pub fn sample_gamma(rng: &mut SimRng, shape: f64, scale: f64) -> f64 {
    debug_assert!(shape > 0.0 && scale > 0.0);
    if shape >= 1.0 {
        marsaglia_tsang(rng, shape, scale)
    } else {
        ahrens_dieter(rng, shape, scale)
    }
}

/// Sample a Nakagami-m variate with shape `m` and spread `omega`.
#[inline]
pub fn sample_nakagami(rng: &mut SimRng, m: f64, omega: f64) -> f64 {
    sample_gamma(rng, m, omega / m).sqrt()
}

/// Marsaglia–Tsang method for shape ≥ 1.
fn marsaglia_tsang(rng: &mut SimRng, shape: f64, scale: f64) -> f64 {
    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        // Squeeze a Gaussian into v = (1 + c·x)³ > 0.
        let (x, v) = loop {
            let x: f64 = rng.inner().sample(StandardNormal);
            let v = 1.0 + c * x;
            if v > 0.0 {
                break (x, v * v * v);
            }
        };
        let u: f64 = rng.random();
        if u < 1.0 - 0.0331 * x.powi(4) || u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
            return scale * d * v;
        }
    }
}

/// Ahrens–Dieter method for shape < 1, with iterative rejection retry.
fn ahrens_dieter(rng: &mut SimRng, shape: f64, scale: f64) -> f64 {
    let b = (std::f64::consts::E + shape) / std::f64::consts::E;
    loop {
        let p = b * rng.random::<f64>();
        if p <= 1.0 {
            let x = p.powf(1.0 / shape);
            if rng.random::<f64>() <= (-x).exp() {
                return scale * x;
            }
        } else {
            let x = -((b - p) / shape).ln();
            if rng.random::<f64>() <= x.powf(shape - 1.0) {
                return scale * x;
            }
        }
    }
}
