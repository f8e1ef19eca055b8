//! Sampled steepest-ascent hill climbing.

use super::acceptance::Acceptance;
use super::best_of;
use crate::portfolio::{SearchStrategy, StrategyKind};
use crate::problem::{Candidate, Problem};
use rand::RngCore;
use std::sync::Arc;

/// Configuration for [`HillClimbing`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HillClimbingConfig {
    /// Neighbors sampled per move; the best one is proposed.
    pub neighborhood_size: usize,
    /// Rule applied to incoming candidates.
    pub acceptance: Acceptance,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            neighborhood_size: 10,
            acceptance: Acceptance::Best,
        }
    }
}

impl HillClimbingConfig {
    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }
}

/// Proposes the best of a sampled neighborhood of its reference.
pub struct HillClimbing<P: Problem> {
    problem: Arc<P>,
    config: HillClimbingConfig,
    reference: Option<Candidate<P::Code>>,
}

impl<P: Problem> HillClimbing<P> {
    pub fn new(problem: Arc<P>, config: HillClimbingConfig) -> Self {
        Self {
            problem,
            config,
            reference: None,
        }
    }
}

impl<P: Problem> SearchStrategy<P::Code> for HillClimbing<P> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::HillClimbing
    }

    fn generate(&mut self, rng: &mut dyn RngCore) -> Option<Candidate<P::Code>> {
        let reference = self.reference.as_ref()?;
        let neighbors = self
            .problem
            .neighbors(&reference.code, self.config.neighborhood_size, rng);
        best_of(
            neighbors.into_iter().map(|code| self.problem.candidate(code)),
            self.problem.sense(),
        )
    }

    fn update_reference(
        &mut self,
        candidate: Candidate<P::Code>,
        _iteration: usize,
        rng: &mut dyn RngCore,
    ) {
        if self
            .config
            .acceptance
            .accepts(self.reference.as_ref(), &candidate, self.problem.sense(), 0.0, rng)
        {
            self.reference = Some(candidate);
        }
    }

    fn reference(&self) -> Option<&Candidate<P::Code>> {
        self.reference.as_ref()
    }

    fn set_initial_reference(&mut self, reference: Candidate<P::Code>) {
        self.reference = Some(reference);
    }
}
