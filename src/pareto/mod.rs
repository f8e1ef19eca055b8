//! Pareto-dominance front maintenance.
//!
//! Shared by the multi-objective acceptance rules and by the portfolio
//! controller when it composes multi-objective strategies.
//!
//! - [`dominates`] / [`dominance`]: sense-aware dominance test
//! - [`ParetoFront`]: insert-with-pruning over an antichain, with optional
//!   cumulative-distance diversity bookkeeping
//! - [`accept_not_dominated`], [`accept_not_dominated_tabu`]: acceptance
//!   rules built on the front
//! - [`metrics`]: error rate, generational distance, spacing

mod dominance;
mod front;
pub mod metrics;

pub use dominance::{dominance, dominates, Dominance};
pub use front::{accept_not_dominated, accept_not_dominated_tabu, DuplicatePolicy, ParetoFront};
