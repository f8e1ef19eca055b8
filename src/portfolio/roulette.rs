//! Fitness-proportionate strategy selection.

use super::config::DegeneratePolicy;
use crate::error::{HyperheurError, Result};
use rand::Rng;

/// A half-open probability interval `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    #[inline]
    pub fn contains(&self, u: f64) -> bool {
        self.low <= u && u < self.high
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Roulette-wheel selector over non-negative weights.
///
/// Weights are normalized into consecutive intervals tiling `[0, 1)`.
/// A zero weight yields an empty interval that can never be drawn.
/// Negative or non-finite weights count as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouletteSelector {
    policy: DegeneratePolicy,
}

impl RouletteSelector {
    pub fn new(policy: DegeneratePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DegeneratePolicy {
        self.policy
    }

    /// Normalizes `weights` into consecutive probability intervals.
    ///
    /// # Errors
    ///
    /// [`HyperheurError::EmptyPanel`] for an empty slice and
    /// [`HyperheurError::DegenerateWeights`] when the weights sum to
    /// zero or less.
    pub fn intervals(weights: &[f64]) -> Result<Vec<Interval>> {
        if weights.is_empty() {
            return Err(HyperheurError::EmptyPanel);
        }
        let total: f64 = weights.iter().map(|&w| effective(w)).sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(HyperheurError::DegenerateWeights { total });
        }

        let mut low = 0.0;
        Ok(weights
            .iter()
            .map(|&w| {
                let high = low + effective(w) / total;
                let interval = Interval { low, high };
                low = high;
                interval
            })
            .collect())
    }

    /// Returns the index of the interval containing `u`.
    ///
    /// Rounding can leave the last upper bound just below 1.0; a `u` in
    /// that gap maps to the last interval with positive width, never to
    /// a zero-weight entry.
    pub fn pick(intervals: &[Interval], u: f64) -> usize {
        intervals
            .iter()
            .position(|iv| iv.contains(u))
            .or_else(|| intervals.iter().rposition(|iv| iv.width() > 0.0))
            .unwrap_or(0)
    }

    /// Draws an index with probability proportional to its weight.
    pub fn select<R: Rng + ?Sized>(&self, weights: &[f64], rng: &mut R) -> Result<usize> {
        match Self::intervals(weights) {
            Ok(intervals) => Ok(Self::pick(&intervals, rng.random::<f64>())),
            Err(HyperheurError::DegenerateWeights { total })
                if self.policy == DegeneratePolicy::Uniform =>
            {
                tracing::warn!(total, "degenerate weights, drawing uniformly");
                Ok(rng.random_range(0..weights.len()))
            }
            Err(e) => Err(e),
        }
    }
}

#[inline]
fn effective(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}
