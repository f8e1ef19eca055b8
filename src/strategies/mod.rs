//! Bundled low-level search strategies.
//!
//! Every strategy holds an `Arc` of the problem and implements
//! [`SearchStrategy`] over the problem's code type:
//!
//! - [`HillClimbing`]: best of a sampled neighborhood, accept if not worse
//! - [`RandomSearch`]: fresh random solutions, never stalls
//! - [`SimulatedAnnealing`]: random neighbor, Metropolis acceptance
//! - [`TabuSearch`]: best non-tabu neighbor, always moves
//! - [`MultiobjectiveHillClimbing`]: Pareto acceptance over a local front
//!
//! [`standard_registry`] registers all five with default configurations.

mod acceptance;
mod hill_climbing;
mod multiobjective;
mod random_search;
mod simulated_annealing;
mod tabu;

pub use acceptance::Acceptance;
pub use hill_climbing::{HillClimbing, HillClimbingConfig};
pub use multiobjective::{MoHillClimbingConfig, MultiobjectiveHillClimbing};
pub use random_search::RandomSearch;
pub use simulated_annealing::{CoolingSchedule, SaConfig, SimulatedAnnealing};
pub use tabu::{TabuConfig, TabuSearch};

use crate::portfolio::{SearchStrategy, StrategyKind, StrategyRegistry};
use crate::problem::{Candidate, Problem, Sense};
use std::sync::Arc;

/// A registry with every bundled strategy under its default
/// configuration.
///
/// # Examples
///
/// ```ignore
/// let problem = Arc::new(MyProblem::new());
/// let registry = standard_registry(problem.clone());
/// let panel = registry.build(&[
///     StrategyKind::HillClimbing,
///     StrategyKind::SimulatedAnnealing,
///     StrategyKind::TabuSearch,
/// ])?;
/// let result = PortfolioRunner::run(problem.as_ref(), panel, &PortfolioConfig::default())?;
/// ```
pub fn standard_registry<P: Problem + 'static>(problem: Arc<P>) -> StrategyRegistry<P::Code> {
    let mut registry = StrategyRegistry::new();

    let p = Arc::clone(&problem);
    registry.register(StrategyKind::HillClimbing, move || {
        Box::new(HillClimbing::new(Arc::clone(&p), HillClimbingConfig::default()))
            as Box<dyn SearchStrategy<P::Code>>
    });
    let p = Arc::clone(&problem);
    registry.register(StrategyKind::RandomSearch, move || {
        Box::new(RandomSearch::new(Arc::clone(&p))) as Box<dyn SearchStrategy<P::Code>>
    });
    let p = Arc::clone(&problem);
    registry.register(StrategyKind::SimulatedAnnealing, move || {
        Box::new(SimulatedAnnealing::new(Arc::clone(&p), SaConfig::default()))
            as Box<dyn SearchStrategy<P::Code>>
    });
    let p = Arc::clone(&problem);
    registry.register(StrategyKind::TabuSearch, move || {
        Box::new(TabuSearch::new(Arc::clone(&p), TabuConfig::default()))
            as Box<dyn SearchStrategy<P::Code>>
    });
    let p = problem;
    registry.register(StrategyKind::MultiobjectiveHillClimbing, move || {
        Box::new(MultiobjectiveHillClimbing::new(
            Arc::clone(&p),
            MoHillClimbingConfig::default(),
        )) as Box<dyn SearchStrategy<P::Code>>
    });

    registry
}

/// Best well-formed candidate on the primary objective; first wins ties.
pub(crate) fn best_of<C>(
    candidates: impl IntoIterator<Item = Candidate<C>>,
    sense: Sense,
) -> Option<Candidate<C>> {
    let value = |c: &Candidate<C>| c.primary().unwrap_or(sense.worst());
    candidates
        .into_iter()
        .filter(|c| c.check().is_ok())
        .fold(None, |best, c| match best {
            Some(b) if !sense.improves(value(&c), value(&b)) => Some(b),
            _ => Some(c),
        })
}
