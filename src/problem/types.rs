//! Candidate solutions, optimization sense, and the problem contract.

use crate::error::{HyperheurError, Result};
use rand::RngCore;
use std::fmt;

/// Direction of optimization, supplied by the problem context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    /// Higher objective values are better.
    Maximize,
    /// Lower objective values are better.
    #[default]
    Minimize,
}

impl Sense {
    /// Returns `true` if `a` is strictly better than `b`.
    #[inline]
    pub fn improves(self, a: f64, b: f64) -> bool {
        match self {
            Sense::Maximize => a > b,
            Sense::Minimize => a < b,
        }
    }

    /// Returns `true` if `a` is at least as good as `b`.
    #[inline]
    pub fn at_least(self, a: f64, b: f64) -> bool {
        match self {
            Sense::Maximize => a >= b,
            Sense::Minimize => a <= b,
        }
    }

    /// The worst representable value under this sense.
    pub fn worst(self) -> f64 {
        match self {
            Sense::Maximize => f64::NEG_INFINITY,
            Sense::Minimize => f64::INFINITY,
        }
    }
}

/// A candidate solution: an opaque code plus its objective vector.
///
/// Single-objective strategies produce one value, multi-objective
/// strategies produce `k` values. An empty objective vector means the
/// candidate has not been evaluated yet.
///
/// Candidates are cloned whenever they cross a long-lived boundary
/// (front membership, a strategy's reference slot, tournament
/// propagation), so no two owners ever alias the same solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate<C> {
    /// Problem-specific solution representation.
    pub code: C,
    /// Objective values, one per objective function.
    pub objectives: Vec<f64>,
}

impl<C> Candidate<C> {
    /// Creates an unevaluated candidate.
    pub fn new(code: C) -> Self {
        Self {
            code,
            objectives: Vec::new(),
        }
    }

    /// Creates a candidate with known objective values.
    pub fn evaluated(code: C, objectives: Vec<f64>) -> Self {
        Self { code, objectives }
    }

    pub fn with_objectives(mut self, objectives: Vec<f64>) -> Self {
        self.objectives = objectives;
        self
    }

    pub fn set_objectives(&mut self, objectives: Vec<f64>) {
        self.objectives = objectives;
    }

    pub fn is_evaluated(&self) -> bool {
        !self.objectives.is_empty()
    }

    /// The first objective, used for single-objective comparisons.
    pub fn primary(&self) -> Option<f64> {
        self.objectives.first().copied()
    }

    /// Number of objective values.
    pub fn arity(&self) -> usize {
        self.objectives.len()
    }

    /// Rejects candidates that cannot be ranked: missing, NaN, or
    /// infinite objective values.
    pub fn check(&self) -> Result<()> {
        if self.objectives.is_empty() {
            return Err(HyperheurError::MalformedObjectives {
                reason: "candidate has not been evaluated".into(),
            });
        }
        if let Some((i, v)) = self
            .objectives
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(HyperheurError::MalformedObjectives {
                reason: format!("objective {i} is {v}"),
            });
        }
        Ok(())
    }
}

/// The problem context consumed by the portfolio driver and the bundled
/// strategies.
///
/// The core components (roulette, weight engine, controller, Pareto
/// front) only ever need [`sense`](Problem::sense); the operator hooks
/// (`random_code`, `neighbors`, `distance`) are for strategies that move
/// through the search space.
///
/// # Examples
///
/// ```ignore
/// struct OneMax { n: usize }
///
/// impl Problem for OneMax {
///     type Code = Vec<bool>;
///
///     fn sense(&self) -> Sense { Sense::Maximize }
///
///     fn evaluate(&self, code: &Vec<bool>) -> Vec<f64> {
///         vec![code.iter().filter(|&&b| b).count() as f64]
///     }
///
///     fn random_code(&self, rng: &mut dyn RngCore) -> Vec<bool> {
///         (0..self.n).map(|_| rng.random_bool(0.5)).collect()
///     }
///
///     fn neighbors(
///         &self,
///         code: &Vec<bool>,
///         count: usize,
///         rng: &mut dyn RngCore,
///     ) -> Vec<Vec<bool>> {
///         (0..count)
///             .map(|_| {
///                 let mut next = code.clone();
///                 let i = rng.random_range(0..self.n);
///                 next[i] = !next[i];
///                 next
///             })
///             .collect()
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// The solution representation.
    type Code: Clone + PartialEq + Send + Sync + fmt::Debug;

    /// Direction used for every comparison.
    fn sense(&self) -> Sense;

    /// Computes the objective vector of a code.
    fn evaluate(&self, code: &Self::Code) -> Vec<f64>;

    /// Creates a random code.
    fn random_code(&self, rng: &mut dyn RngCore) -> Self::Code;

    /// Generates up to `count` neighbors of `code`.
    fn neighbors(&self, code: &Self::Code, count: usize, rng: &mut dyn RngCore)
        -> Vec<Self::Code>;

    /// Distance between two codes, used for front diversity bookkeeping.
    ///
    /// The default is the discrete metric (0 for equal codes, 1 otherwise).
    fn distance(&self, a: &Self::Code, b: &Self::Code) -> f64 {
        if a == b {
            0.0
        } else {
            1.0
        }
    }

    /// Builds an evaluated candidate from a code.
    fn candidate(&self, code: Self::Code) -> Candidate<Self::Code> {
        let objectives = self.evaluate(&code);
        Candidate::evaluated(code, objectives)
    }
}
