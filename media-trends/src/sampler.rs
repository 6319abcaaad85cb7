//! Seeded random distribution sampling.
//!
//! A [`Sampler`] owns the single pseudo-random stream of a run. Every
//! column of every generated table is drawn through the same handle, in
//! program order, so a fixed seed reproduces the exact sequence of values.
//! The handle is passed by `&mut` rather than stored globally; there is no
//! re-seeding between calls.
//!
//! # Example
//!
//! ```rust
//! use media_trends::sampler::Sampler;
//!
//! let mut sampler = Sampler::seeded(42);
//! let tiers = sampler
//!     .sample_categorical(&["Free", "Basic", "Premium"], Some(&[0.15, 0.45, 0.40]), 10)
//!     .unwrap();
//! assert_eq!(tiers.len(), 10);
//! ```

use rand::distr::weighted::WeightedIndex;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Exp, Poisson};
use tracing::trace;

use crate::error::{Result, TrendsError};

/// Absolute tolerance when checking that categorical weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-8;

/// Single-owner handle to the run's reproducible random stream.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
    seed: u64,
    draws: u64,
}

impl Sampler {
    /// Creates a sampler whose stream is fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            draws: 0,
        }
    }

    /// Returns the seed this sampler was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of values produced so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Draws `count` labels from `vocabulary`.
    ///
    /// Without weights every label is equally likely. With weights, the
    /// sequence must match the vocabulary in length, hold finite non-negative
    /// probabilities and sum to one within [`WEIGHT_SUM_TOLERANCE`].
    pub fn sample_categorical<'v>(
        &mut self,
        vocabulary: &[&'v str],
        weights: Option<&[f64]>,
        count: usize,
    ) -> Result<Vec<&'v str>> {
        if vocabulary.is_empty() {
            return Err(TrendsError::invalid_parameter(
                "vocabulary",
                "vocabulary must contain at least one label",
            ));
        }

        let values = match weights {
            None => {
                let len = vocabulary.len();
                (0..count)
                    .map(|_| vocabulary[self.rng.random_range(0..len)])
                    .collect()
            }
            Some(weights) => {
                validate_weights(vocabulary, weights)?;
                let index = WeightedIndex::new(weights)
                    .map_err(|e| TrendsError::invalid_parameter("weights", e.to_string()))?;
                (0..count)
                    .map(|_| vocabulary[index.sample(&mut self.rng)])
                    .collect()
            }
        };

        self.record(count, "categorical");
        Ok(values)
    }

    /// Draws `count` values from an exponential distribution with the given
    /// scale (mean), each shifted by `shift`.
    pub fn sample_exponential(&mut self, scale: f64, shift: f64, count: usize) -> Result<Vec<f64>> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TrendsError::invalid_parameter(
                "scale",
                format!("exponential scale must be finite and positive, got {scale}"),
            ));
        }
        if !shift.is_finite() {
            return Err(TrendsError::invalid_parameter(
                "shift",
                format!("shift must be finite, got {shift}"),
            ));
        }

        let dist = Exp::new(1.0 / scale)
            .map_err(|e| TrendsError::invalid_parameter("scale", e.to_string()))?;
        let values = (0..count)
            .map(|_| dist.sample(&mut self.rng) + shift)
            .collect();

        self.record(count, "exponential");
        Ok(values)
    }

    /// Draws `count` values uniformly from the closed interval `[low, high]`.
    pub fn sample_uniform(&mut self, low: f64, high: f64, count: usize) -> Result<Vec<f64>> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(TrendsError::invalid_parameter(
                "bounds",
                format!("uniform bounds must be finite with low <= high, got [{low}, {high}]"),
            ));
        }

        let dist = Uniform::new_inclusive(low, high)
            .map_err(|e| TrendsError::invalid_parameter("bounds", e.to_string()))?;
        let values = (0..count).map(|_| dist.sample(&mut self.rng)).collect();

        self.record(count, "uniform");
        Ok(values)
    }

    /// Draws `count` values from `Beta(alpha, beta)`, each multiplied by `scale`.
    pub fn sample_beta_scaled(
        &mut self,
        alpha: f64,
        beta: f64,
        scale: f64,
        count: usize,
    ) -> Result<Vec<f64>> {
        for (name, value) in [("alpha", alpha), ("beta", beta)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrendsError::invalid_parameter(
                    name,
                    format!("beta shape parameters must be finite and positive, got {value}"),
                ));
            }
        }
        if !scale.is_finite() || scale < 0.0 {
            return Err(TrendsError::invalid_parameter(
                "scale",
                format!("scale factor must be finite and non-negative, got {scale}"),
            ));
        }

        let dist = Beta::new(alpha, beta)
            .map_err(|e| TrendsError::invalid_parameter("alpha/beta", e.to_string()))?;
        let values = (0..count)
            .map(|_| dist.sample(&mut self.rng) * scale)
            .collect();

        self.record(count, "beta");
        Ok(values)
    }

    /// Draws `count` non-negative integers from a Poisson distribution.
    ///
    /// A mean of zero yields zeros without consuming the stream.
    pub fn sample_poisson(&mut self, mean: f64, count: usize) -> Result<Vec<u64>> {
        if !mean.is_finite() || mean < 0.0 {
            return Err(TrendsError::invalid_parameter(
                "mean",
                format!("poisson mean must be finite and non-negative, got {mean}"),
            ));
        }

        let values = if mean == 0.0 {
            vec![0; count]
        } else {
            let dist = Poisson::new(mean)
                .map_err(|e| TrendsError::invalid_parameter("mean", e.to_string()))?;
            (0..count)
                .map(|_| {
                    let draw: f64 = dist.sample(&mut self.rng);
                    draw as u64
                })
                .collect()
        };

        self.record(count, "poisson");
        Ok(values)
    }

    fn record(&mut self, count: usize, distribution: &'static str) {
        self.draws += count as u64;
        trace!(distribution, count, total_draws = self.draws, "sampled values");
    }
}

fn validate_weights(vocabulary: &[&str], weights: &[f64]) -> Result<()> {
    if weights.len() != vocabulary.len() {
        return Err(TrendsError::invalid_parameter(
            "weights",
            format!(
                "expected {} weights to match the vocabulary, got {}",
                vocabulary.len(),
                weights.len()
            ),
        ));
    }

    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(TrendsError::invalid_parameter(
            "weights",
            format!("weights must be finite and non-negative, got {bad}"),
        ));
    }

    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(TrendsError::invalid_parameter(
            "weights",
            format!("weights must sum to 1, got {sum}"),
        ));
    }

    Ok(())
}

/// Rounds `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
