//! Pareto-based hill climbing for multi-objective problems.

use crate::pareto::{accept_not_dominated, dominates, ParetoFront};
use crate::portfolio::{SearchStrategy, StrategyKind};
use crate::problem::{Candidate, Problem};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Configuration for [`MultiobjectiveHillClimbing`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoHillClimbingConfig {
    /// Neighbors sampled per move.
    pub neighborhood_size: usize,
}

impl Default for MoHillClimbingConfig {
    fn default() -> Self {
        Self {
            neighborhood_size: 10,
        }
    }
}

impl MoHillClimbingConfig {
    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }
}

/// Hill climbing under Pareto dominance.
///
/// Keeps a local front (with diversity scores from the problem's
/// distance) of everything it absorbs. A candidate is adopted when the
/// reference does not dominate it and the front admits it. On rejection
/// the search restarts from the most isolated front member it has not
/// restarted from yet, which spreads the search along the front.
pub struct MultiobjectiveHillClimbing<P: Problem> {
    problem: Arc<P>,
    config: MoHillClimbingConfig,
    reference: Option<Candidate<P::Code>>,
    front: ParetoFront<P::Code>,
    visited: Vec<P::Code>,
}

impl<P: Problem + 'static> MultiobjectiveHillClimbing<P> {
    pub fn new(problem: Arc<P>, config: MoHillClimbingConfig) -> Self {
        let metric = Arc::clone(&problem);
        let front = ParetoFront::with_distance(problem.sense(), move |a, b| metric.distance(a, b));
        Self {
            problem,
            config,
            reference: None,
            front,
            visited: Vec::new(),
        }
    }
}

impl<P: Problem> MultiobjectiveHillClimbing<P> {
    /// The local non-dominated set.
    pub fn front(&self) -> &ParetoFront<P::Code> {
        &self.front
    }

    fn restart(&mut self) {
        let next = self
            .front
            .members()
            .iter()
            .zip(self.front.scores())
            .filter(|(m, _)| !self.visited.contains(&m.code))
            .fold(None::<(&Candidate<P::Code>, f64)>, |best, (m, &s)| match best {
                Some((_, bs)) if bs >= s => best,
                _ => Some((m, s)),
            })
            .map(|(m, _)| m.clone());

        if let Some(member) = next {
            tracing::trace!(front = self.front.len(), "restarting from isolated member");
            self.visited.push(member.code.clone());
            self.reference = Some(member);
        }
    }
}

impl<P: Problem> SearchStrategy<P::Code> for MultiobjectiveHillClimbing<P> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MultiobjectiveHillClimbing
    }

    /// Proposes the first sampled neighbor the reference does not
    /// dominate, or a random one if all are dominated.
    fn generate(&mut self, rng: &mut dyn RngCore) -> Option<Candidate<P::Code>> {
        let reference = self.reference.as_ref()?;
        let sense = self.problem.sense();
        let mut neighbors: Vec<_> = self
            .problem
            .neighbors(&reference.code, self.config.neighborhood_size, rng)
            .into_iter()
            .map(|code| self.problem.candidate(code))
            .filter(|c| c.check().is_ok())
            .collect();
        if neighbors.is_empty() {
            return None;
        }
        let pick = neighbors
            .iter()
            .position(|c| !dominates(&reference.objectives, &c.objectives, sense))
            .unwrap_or_else(|| rng.random_range(0..neighbors.len()));
        Some(neighbors.swap_remove(pick))
    }

    fn update_reference(
        &mut self,
        candidate: Candidate<P::Code>,
        _iteration: usize,
        _rng: &mut dyn RngCore,
    ) {
        let Some(current) = self.reference.clone() else {
            self.reference = Some(candidate);
            return;
        };
        match accept_not_dominated(&mut self.front, &current, &candidate) {
            Ok(true) => {
                self.visited.clear();
                self.reference = Some(candidate);
            }
            Ok(false) => self.restart(),
            Err(e) => tracing::trace!(error = %e, "candidate ignored"),
        }
    }

    fn reference(&self) -> Option<&Candidate<P::Code>> {
        self.reference.as_ref()
    }

    fn set_initial_reference(&mut self, reference: Candidate<P::Code>) {
        self.front.clear();
        self.visited.clear();
        self.reference = Some(reference);
    }
}
