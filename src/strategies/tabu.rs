//! Tabu search as a portfolio member.
//!
//! # References
//!
//! Glover (1986), "Future Paths for Integer Programming and Links to
//! Artificial Intelligence"

use super::best_of;
use crate::portfolio::{SearchStrategy, StrategyKind};
use crate::problem::{Candidate, Problem};
use rand::RngCore;
use std::collections::VecDeque;
use std::sync::Arc;

/// Configuration for [`TabuSearch`].
///
/// # Examples
///
/// ```
/// use u_hyperheur::strategies::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_tabu_tenure(7)
///     .with_neighborhood_size(20)
///     .with_aspiration(true);
/// assert_eq!(config.tabu_tenure, 7);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuConfig {
    /// How many recently visited solutions stay forbidden.
    pub tabu_tenure: usize,
    /// Neighbors sampled per move.
    pub neighborhood_size: usize,
    /// Whether a tabu neighbor that beats the best seen is admissible.
    pub aspiration: bool,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            tabu_tenure: 7,
            neighborhood_size: 10,
            aspiration: true,
        }
    }
}

impl TabuConfig {
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }
}

/// Moves to the best non-tabu neighbor, even when it is worse.
///
/// The tabu list is a FIFO of recently adopted solutions bounded by the
/// tenure. When every sampled neighbor is tabu the strategy declines to
/// move and the portfolio falls back to another member.
pub struct TabuSearch<P: Problem> {
    problem: Arc<P>,
    config: TabuConfig,
    reference: Option<Candidate<P::Code>>,
    best: Option<f64>,
    tabu: VecDeque<P::Code>,
}

impl<P: Problem> TabuSearch<P> {
    pub fn new(problem: Arc<P>, config: TabuConfig) -> Self {
        Self {
            problem,
            config,
            reference: None,
            best: None,
            tabu: VecDeque::new(),
        }
    }

    /// Recently adopted codes, oldest first.
    pub fn tabu_list(&self) -> &VecDeque<P::Code> {
        &self.tabu
    }

    fn is_tabu(&self, code: &P::Code) -> bool {
        self.tabu.contains(code)
    }

    fn remember(&mut self, code: P::Code) {
        if self.config.tabu_tenure == 0 || self.is_tabu(&code) {
            return;
        }
        self.tabu.push_back(code);
        while self.tabu.len() > self.config.tabu_tenure {
            self.tabu.pop_front();
        }
    }

    fn aspires(&self, candidate: &Candidate<P::Code>) -> bool {
        match (self.best, candidate.primary()) {
            (Some(best), Some(v)) => self.problem.sense().improves(v, best),
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

impl<P: Problem> SearchStrategy<P::Code> for TabuSearch<P> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TabuSearch
    }

    fn generate(&mut self, rng: &mut dyn RngCore) -> Option<Candidate<P::Code>> {
        let reference = self.reference.as_ref()?;
        let neighbors = self
            .problem
            .neighbors(&reference.code, self.config.neighborhood_size, rng);
        let admissible: Vec<_> = neighbors
            .into_iter()
            .map(|code| self.problem.candidate(code))
            .filter(|c| !self.is_tabu(&c.code) || (self.config.aspiration && self.aspires(c)))
            .collect();
        best_of(admissible, self.problem.sense())
    }

    fn update_reference(
        &mut self,
        candidate: Candidate<P::Code>,
        _iteration: usize,
        _rng: &mut dyn RngCore,
    ) {
        if candidate.check().is_err() {
            return;
        }
        if self.aspires(&candidate) {
            self.best = candidate.primary();
        }
        self.remember(candidate.code.clone());
        self.reference = Some(candidate);
    }

    fn reference(&self) -> Option<&Candidate<P::Code>> {
        self.reference.as_ref()
    }

    fn set_initial_reference(&mut self, reference: Candidate<P::Code>) {
        self.tabu.clear();
        self.best = reference.primary();
        self.remember(reference.code.clone());
        self.reference = Some(reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::fixtures::OneMax;
    use crate::problem::Sense;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Two-point space: the only neighbor of `a` is `b` and vice versa.
    struct Toggle;

    impl Problem for Toggle {
        type Code = bool;
        fn sense(&self) -> Sense {
            Sense::Minimize
        }
        fn evaluate(&self, code: &bool) -> Vec<f64> {
            vec![if *code { 1.0 } else { 2.0 }]
        }
        fn random_code(&self, _rng: &mut dyn RngCore) -> bool {
            false
        }
        fn neighbors(&self, code: &bool, count: usize, _rng: &mut dyn RngCore) -> Vec<bool> {
            vec![!*code; count]
        }
    }

    #[test]
    fn test_tenure_bounds_list() {
        let problem = Arc::new(OneMax { n: 12 });
        let mut ts = TabuSearch::new(problem.clone(), TabuConfig::default().with_tabu_tenure(3));
        let mut rng = StdRng::seed_from_u64(0);
        ts.set_initial_reference(problem.candidate(vec![false; 12]));
        for it in 0..10 {
            let c = ts.generate(&mut rng).unwrap();
            ts.update_reference(c, it, &mut rng);
            assert!(ts.tabu_list().len() <= 3);
        }
    }

    #[test]
    fn test_all_tabu_declines_to_move() {
        let problem = Arc::new(Toggle);
        let mut ts = TabuSearch::new(problem.clone(), TabuConfig::default().with_aspiration(false));
        let mut rng = StdRng::seed_from_u64(0);
        ts.set_initial_reference(problem.candidate(false));

        // Move to `true`; both points are now tabu
        let c = ts.generate(&mut rng).unwrap();
        assert!(c.code);
        ts.update_reference(c, 0, &mut rng);
        assert!(ts.generate(&mut rng).is_none());
    }

    #[test]
    fn test_aspiration_overrides_tabu() {
        let problem = Arc::new(Toggle);
        let mut ts = TabuSearch::new(problem.clone(), TabuConfig::default());
        let mut rng = StdRng::seed_from_u64(0);

        // Start at the worse point, but with `true` already tabu
        ts.set_initial_reference(problem.candidate(true));
        ts.best = Some(2.0);
        ts.update_reference(problem.candidate(false), 0, &mut rng);

        // `true` is tabu but beats the recorded best
        ts.best = Some(2.0);
        let c = ts.generate(&mut rng).unwrap();
        assert!(c.code);
    }

    #[test]
    fn test_accepts_worse_moves() {
        let problem = Arc::new(OneMax { n: 4 });
        let mut ts = TabuSearch::new(problem.clone(), TabuConfig::default());
        let mut rng = StdRng::seed_from_u64(0);
        ts.set_initial_reference(problem.candidate(vec![true; 4]));
        ts.update_reference(problem.candidate(vec![false; 4]), 0, &mut rng);
        assert_eq!(ts.reference().and_then(Candidate::primary), Some(0.0));
    }
}
