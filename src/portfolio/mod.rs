//! Adaptive strategy portfolio.
//!
//! A panel of low-level [`SearchStrategy`] implementations is managed by a
//! [`PortfolioController`]. Each iteration one strategy is chosen by
//! roulette over adaptive weights; a strategy whose candidate improves the
//! incumbent is rewarded, every other outcome decays the active weight.
//! Every candidate is shared with the whole panel (tournament
//! propagation) so strategies keep searching from the best known region.
//!
//! # Algorithm
//!
//! 1. Roulette-select a strategy (`p_i = w_i / sum w`)
//! 2. Generate a candidate, falling back through the panel if needed
//! 3. Evaluate the candidate (driver)
//! 4. `w_i = w_i * (1 - decay) + reward * [improved]`
//! 5. Record all weights, propagate the candidate to every strategy
//!
//! # References
//!
//! - Burke et al. (2013), "Hyper-heuristics: a survey of the state of the art"
//! - Ropke & Pisinger (2006), "An Adaptive Large Neighborhood Search
//!   Heuristic for the Pickup and Delivery Problem with Time Windows"

mod config;
mod controller;
mod registry;
mod roulette;
mod runner;
mod types;
mod weights;

pub use config::{DegeneratePolicy, PortfolioConfig};
pub use controller::PortfolioController;
pub use registry::StrategyRegistry;
pub use roulette::{Interval, RouletteSelector};
pub use runner::{PortfolioResult, PortfolioRunner, StrategyReport};
pub use types::{EntryConfig, SearchStrategy, StrategyEntry, StrategyKind};
pub use weights::WeightUpdateEngine;
