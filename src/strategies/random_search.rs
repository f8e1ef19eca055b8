//! Uniform random sampling.

use super::acceptance::Acceptance;
use super::best_of;
use crate::portfolio::{SearchStrategy, StrategyKind};
use crate::problem::{Candidate, Problem};
use rand::RngCore;
use std::sync::Arc;

/// Proposes a fresh random solution every time.
///
/// Never stalls, which makes it a useful diversification member of any
/// panel. Its reference is the best candidate it has absorbed.
pub struct RandomSearch<P: Problem> {
    problem: Arc<P>,
    reference: Option<Candidate<P::Code>>,
}

impl<P: Problem> RandomSearch<P> {
    pub fn new(problem: Arc<P>) -> Self {
        Self {
            problem,
            reference: None,
        }
    }
}

impl<P: Problem> SearchStrategy<P::Code> for RandomSearch<P> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RandomSearch
    }

    fn generate(&mut self, rng: &mut dyn RngCore) -> Option<Candidate<P::Code>> {
        let code = self.problem.random_code(rng);
        Some(self.problem.candidate(code))
    }

    fn update_reference(
        &mut self,
        candidate: Candidate<P::Code>,
        _iteration: usize,
        rng: &mut dyn RngCore,
    ) {
        let sense = self.problem.sense();
        if Acceptance::Best.accepts(self.reference.as_ref(), &candidate, sense, 0.0, rng) {
            self.reference = Some(candidate);
        }
    }

    fn reference(&self) -> Option<&Candidate<P::Code>> {
        self.reference.as_ref()
    }

    fn set_initial_reference(&mut self, reference: Candidate<P::Code>) {
        self.reference = Some(reference);
    }

    /// Adopts the best seed if it beats the current reference.
    fn seed_population(&mut self, population: Vec<Candidate<P::Code>>) {
        let sense = self.problem.sense();
        let Some(best) = best_of(population, sense) else {
            return;
        };
        let better = match self.reference.as_ref().and_then(Candidate::primary) {
            Some(current) => best.primary().is_some_and(|v| sense.improves(v, current)),
            None => true,
        };
        if better {
            self.reference = Some(best);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::fixtures::OneMax;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_always_generates() {
        let mut rs = RandomSearch::new(Arc::new(OneMax { n: 16 }));
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..10 {
            let c = rs.generate(&mut rng).unwrap();
            assert_eq!(c.code.len(), 16);
            assert!(c.is_evaluated());
        }
    }

    #[test]
    fn test_seed_population_keeps_best() {
        let problem = Arc::new(OneMax { n: 4 });
        let mut rs = RandomSearch::new(problem.clone());
        rs.set_initial_reference(problem.candidate(vec![true, false, false, false]));
        rs.seed_population(vec![
            problem.candidate(vec![false; 4]),
            problem.candidate(vec![true, true, true, false]),
            problem.candidate(vec![true, true, false, false]),
        ]);
        assert_eq!(rs.reference().and_then(Candidate::primary), Some(3.0));

        rs.seed_population(vec![problem.candidate(vec![false; 4])]);
        assert_eq!(rs.reference().and_then(Candidate::primary), Some(3.0));
    }
}
