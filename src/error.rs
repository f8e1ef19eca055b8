//! Error type shared by the portfolio controller and the Pareto front.
//!
//! Every variant is recoverable at iteration granularity: the controller
//! reports it and leaves the decision to stop or continue to the driver.

use crate::portfolio::StrategyKind;

/// Errors raised by the hyper-heuristic core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HyperheurError {
    /// Every panel member and every fallback failed to produce a candidate.
    ///
    /// The search is stalled; the driver should skip the iteration,
    /// reinitialize the portfolio, or terminate the run.
    #[error("every strategy in the panel and every fallback failed to produce a candidate")]
    ExhaustedPanel,

    /// All weights are zero, negative, or non-finite, so the roulette
    /// normalization is undefined.
    #[error("strategy weights are degenerate (total = {total})")]
    DegenerateWeights {
        /// Sum of the panel weights at the time of the draw.
        total: f64,
    },

    /// A candidate carries a missing, NaN, or infinite objective value.
    #[error("malformed objective vector: {reason}")]
    MalformedObjectives {
        /// What was wrong with the vector.
        reason: String,
    },

    /// A candidate's objective count differs from the front's.
    #[error("objective vector has {found} values, expected {expected}")]
    ObjectiveArity {
        /// Objective count of the existing members.
        expected: usize,
        /// Objective count of the rejected candidate.
        found: usize,
    },

    /// The portfolio was built without any strategy.
    #[error("portfolio panel is empty")]
    EmptyPanel,

    /// `update_reference` was called without a preceding `generate`.
    #[error("no active strategy; call generate() before update_reference()")]
    NoActiveStrategy,

    /// The registry has no factory for the requested strategy variant.
    #[error("no factory registered for strategy {0:?}")]
    UnknownStrategy(StrategyKind),

    /// A configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HyperheurError>;
