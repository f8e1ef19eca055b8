//! Domain-agnostic portfolio hyper-heuristic.
//!
//! A panel of low-level search strategies is driven by an adaptive
//! controller that learns online which strategy is currently paying off:
//!
//! - **Portfolio**: roulette-wheel strategy selection over adaptive
//!   weights, reward/decay weight updates with per-iteration traces,
//!   fallback generation, and tournament propagation of every candidate
//!   to the whole panel.
//! - **Pareto front**: sense-aware dominance, insert-with-pruning front
//!   maintenance with optional diversity bookkeeping, not-dominated
//!   acceptance rules, and front quality metrics.
//! - **Strategies**: hill climbing, random search, simulated annealing,
//!   tabu search, and multi-objective hill climbing, built on a small
//!   [`problem::Problem`] contract.
//!
//! # Architecture
//!
//! The core ([`portfolio`], [`pareto`]) never encodes problem-specific
//! state or operators. Problems supply the optimization sense, objective
//! evaluation, and neighborhood moves; strategies own their search state;
//! the portfolio owns weights, traces, and usage statistics.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use u_hyperheur::portfolio::{PortfolioConfig, PortfolioRunner, StrategyKind};
//! use u_hyperheur::strategies::standard_registry;
//!
//! let problem = Arc::new(MyProblem::new());
//! let panel = standard_registry(problem.clone()).build(&[
//!     StrategyKind::HillClimbing,
//!     StrategyKind::SimulatedAnnealing,
//!     StrategyKind::TabuSearch,
//! ])?;
//! let config = PortfolioConfig::default().with_max_iterations(5000).with_seed(42);
//! let result = PortfolioRunner::run(problem.as_ref(), panel, &config)?;
//! println!("best = {}", result.best_value());
//! ```

pub mod error;
pub mod pareto;
pub mod portfolio;
pub mod problem;
pub mod strategies;

pub use error::{HyperheurError, Result};
