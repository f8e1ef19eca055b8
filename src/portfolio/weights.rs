//! Reward/decay weight adaptation.

use super::config::PortfolioConfig;
use super::types::StrategyEntry;
use crate::error::{HyperheurError, Result};
use crate::problem::{Candidate, Sense};

/// Updates the active entry's weight after each iteration.
///
/// On improvement the weight becomes `w * (1 - decay) + reward`,
/// otherwise `w * (1 - decay)`, floored at `min_weight`. A strategy that
/// keeps improving converges to `reward / decay`; one that never
/// improves decays towards `min_weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightUpdateEngine {
    reward: f64,
    decay: f64,
    min_weight: f64,
    trace_budget: usize,
}

impl WeightUpdateEngine {
    pub fn new(reward: f64, decay: f64) -> Self {
        Self {
            reward,
            decay,
            min_weight: 0.0,
            trace_budget: usize::MAX,
        }
    }

    pub fn from_config(config: &PortfolioConfig) -> Self {
        Self {
            reward: config.reward,
            decay: config.decay,
            min_weight: config.min_weight,
            trace_budget: config.max_iterations,
        }
    }

    pub fn with_min_weight(mut self, w: f64) -> Self {
        self.min_weight = w;
        self
    }

    /// Caps every trace at `budget` recorded iterations.
    pub fn with_trace_budget(mut self, budget: usize) -> Self {
        self.trace_budget = budget;
        self
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// The weight a strategy converges to under uninterrupted success.
    pub fn fixed_point(&self) -> f64 {
        self.reward / self.decay
    }

    /// The weight following `w` after one iteration.
    #[inline]
    pub fn next_weight(&self, w: f64, improved: bool) -> f64 {
        let bonus = if improved { self.reward } else { 0.0 };
        (w * (1.0 - self.decay) + bonus).max(self.min_weight)
    }

    /// Returns `true` if `candidate` strictly improves `incumbent` on the
    /// primary objective. With no incumbent yet every candidate improves.
    pub fn improves<C>(
        candidate: &Candidate<C>,
        incumbent: Option<&Candidate<C>>,
        sense: Sense,
    ) -> Result<bool> {
        let value = primary(candidate)?;
        match incumbent {
            None => Ok(true),
            Some(inc) => Ok(sense.improves(value, primary(inc)?)),
        }
    }

    /// Applies the outcome of an iteration to `entry` and returns its new
    /// weight.
    pub fn update<C>(&self, entry: &mut StrategyEntry<C>, improved: bool) -> f64 {
        entry.weight = self.next_weight(entry.weight, improved);
        if improved {
            entry.record_improvement();
        }
        entry.weight
    }

    /// Compares `candidate` against `incumbent` and updates `entry`.
    pub fn update_weight<C>(
        &self,
        entry: &mut StrategyEntry<C>,
        candidate: &Candidate<C>,
        incumbent: Option<&Candidate<C>>,
        sense: Sense,
    ) -> Result<f64> {
        let improved = Self::improves(candidate, incumbent, sense)?;
        Ok(self.update(entry, improved))
    }

    /// Appends the current weight of every entry to its trace.
    pub fn record_trace<C>(&self, entries: &mut [StrategyEntry<C>], iteration: usize) {
        for entry in entries {
            entry.record_trace(iteration, self.trace_budget);
        }
    }
}

impl Default for WeightUpdateEngine {
    fn default() -> Self {
        Self::from_config(&PortfolioConfig::default())
    }
}

fn primary<C>(candidate: &Candidate<C>) -> Result<f64> {
    match candidate.primary() {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(HyperheurError::MalformedObjectives {
            reason: format!("primary objective is {v}"),
        }),
        None => Err(HyperheurError::MalformedObjectives {
            reason: "candidate has not been evaluated".into(),
        }),
    }
}
