//! Portfolio execution loop.

use super::config::PortfolioConfig;
use super::controller::PortfolioController;
use super::types::{SearchStrategy, StrategyKind};
use crate::error::{HyperheurError, Result};
use crate::problem::{Candidate, Problem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-strategy statistics at the end of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StrategyReport {
    pub kind: StrategyKind,

    /// Final weight.
    pub weight: f64,

    /// Weight at every recorded iteration.
    pub trace: Vec<f64>,

    /// Times the roulette selected the strategy.
    pub usage: usize,

    /// Times the strategy improved the incumbent.
    pub improvements: usize,

    /// Selections per reporting period.
    pub period_usage: Vec<usize>,

    /// Improvements per reporting period.
    pub period_improvements: Vec<usize>,
}

/// Result of a portfolio run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortfolioResult<C> {
    /// The best candidate found on the primary objective.
    pub best: Candidate<C>,

    /// Iterations completed (candidates fed back, skipped ones included).
    pub iterations: usize,

    /// Candidates discarded for malformed or mismatched objectives.
    pub skipped: usize,

    /// Whether the panel stopped producing candidates.
    pub stalled: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best primary objective sampled once per reporting period.
    pub best_history: Vec<f64>,

    /// Mean best-so-far value per change segment.
    ///
    /// One entry per segment between change points; a single entry when
    /// change points are disabled.
    pub offline_performance: Vec<f64>,

    /// One report per panel entry, in panel order.
    pub strategies: Vec<StrategyReport>,

    /// Final Pareto front, empty unless front tracking was enabled.
    pub front: Vec<Candidate<C>>,
}

impl<C> PortfolioResult<C> {
    /// Primary objective of the best candidate.
    pub fn best_value(&self) -> f64 {
        self.best.primary().unwrap_or(f64::NAN)
    }
}

/// Drives a [`PortfolioController`] against a [`Problem`].
pub struct PortfolioRunner;

impl PortfolioRunner {
    /// Runs the portfolio for `config.max_iterations` iterations.
    pub fn run<P: Problem>(
        problem: &P,
        strategies: Vec<Box<dyn SearchStrategy<P::Code>>>,
        config: &PortfolioConfig,
    ) -> Result<PortfolioResult<P::Code>> {
        Self::run_with_cancel(problem, strategies, config, None)
    }

    /// Runs the portfolio with an optional cancellation token.
    ///
    /// Per-iteration errors never abort the run: malformed candidates are
    /// skipped, and an exhausted panel (or degenerate weights under the
    /// reject policy) ends the run early with `stalled` set.
    ///
    /// # Errors
    ///
    /// Invalid configuration, an empty panel, or a malformed initial
    /// solution.
    #[tracing::instrument(
        level = "debug",
        name = "portfolio",
        skip_all,
        fields(strategies = strategies.len(), max_iterations = config.max_iterations)
    )]
    pub fn run_with_cancel<P: Problem>(
        problem: &P,
        strategies: Vec<Box<dyn SearchStrategy<P::Code>>>,
        config: &PortfolioConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PortfolioResult<P::Code>> {
        config.validate().map_err(HyperheurError::InvalidConfig)?;

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let controller_config = config.clone().with_seed(rng.random());
        let mut controller =
            PortfolioController::new(strategies, problem.sense(), &controller_config)?;

        // Initialize
        let initial = problem.candidate(problem.random_code(&mut rng));
        let population_size = controller
            .entries()
            .iter()
            .map(|e| e.config().reference_count)
            .max()
            .unwrap_or(0);
        let population: Vec<_> = (0..population_size)
            .map(|_| problem.candidate(problem.random_code(&mut rng)))
            .filter(|c| c.check().is_ok())
            .collect();
        controller.seed(initial.clone(), population)?;
        tracing::info!(kinds = ?controller.kinds(), seed = ?config.seed, "portfolio started");

        let mut best_value = initial.primary().unwrap_or(f64::NAN);
        let mut best_history = vec![best_value];
        let mut offline_performance = Vec::new();
        let mut segment_sum = 0.0;
        let mut segment_len = 0usize;

        let mut iterations = 0usize;
        let mut skipped = 0usize;
        let mut stalled = false;
        let mut cancelled = false;

        for iteration in 0..config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            if config.change_period > 0
                && iteration > 0
                && iteration.is_multiple_of(config.change_period)
            {
                offline_performance.push(segment_sum / segment_len.max(1) as f64);
                segment_sum = 0.0;
                segment_len = 0;
                controller.reset_weights();
                tracing::debug!(iteration, "change point");
            }

            if iteration > 0
                && config.period_index(iteration) != config.period_index(iteration - 1)
            {
                controller.close_period(config.period_index(iteration - 1));
                best_history.push(best_value);
            }

            let mut candidate = match controller.generate() {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(iteration, error = %e, "search stalled");
                    stalled = true;
                    break;
                }
            };

            if !candidate.is_evaluated() {
                candidate.set_objectives(problem.evaluate(&candidate.code));
            }

            match controller.update_reference(candidate, iteration) {
                Ok(_) => {}
                Err(
                    e @ (HyperheurError::MalformedObjectives { .. }
                    | HyperheurError::ObjectiveArity { .. }),
                ) => {
                    tracing::warn!(iteration, error = %e, "candidate skipped");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }

            if let Some(v) = controller.incumbent().and_then(Candidate::primary) {
                best_value = v;
            }
            segment_sum += best_value;
            segment_len += 1;
            iterations += 1;
        }

        if iterations > 0 {
            controller.close_period(config.period_index(iterations - 1));
        }
        if segment_len > 0 {
            offline_performance.push(segment_sum / segment_len as f64);
        }
        if best_history.last().is_none_or(|&last| last != best_value) {
            best_history.push(best_value);
        }

        let best = controller.incumbent().cloned().unwrap_or(initial);
        let front = controller
            .front()
            .map(|f| f.members().to_vec())
            .unwrap_or_default();
        let strategies = controller
            .entries()
            .iter()
            .map(|e| StrategyReport {
                kind: e.kind(),
                weight: e.weight(),
                trace: e.trace().to_vec(),
                usage: e.usage(),
                improvements: e.improvements(),
                period_usage: e.period_usage().to_vec(),
                period_improvements: e.period_improvements().to_vec(),
            })
            .collect();

        tracing::info!(iterations, skipped, stalled, best = best_value, "portfolio finished");

        Ok(PortfolioResult {
            best,
            iterations,
            skipped,
            stalled,
            cancelled,
            best_history,
            offline_performance,
            strategies,
            front,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::DegeneratePolicy;
    use crate::problem::fixtures::OneMax;
    use crate::problem::Sense;
    use crate::strategies::RandomSearch;
    use rand::RngCore;
    use std::sync::atomic::AtomicUsize;

    /// Random bit strings; never improves deliberately.
    struct Shuffler {
        n: usize,
        reference: Option<Candidate<Vec<bool>>>,
    }

    /// Sets the first unset bit of its reference.
    struct Filler {
        reference: Option<Candidate<Vec<bool>>>,
    }

    impl SearchStrategy<Vec<bool>> for Shuffler {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Custom("shuffler")
        }
        fn generate(&mut self, rng: &mut dyn RngCore) -> Option<Candidate<Vec<bool>>> {
            let code: Vec<bool> = (0..self.n).map(|_| rng.random_bool(0.5)).collect();
            Some(Candidate::new(code))
        }
        fn update_reference(
            &mut self,
            c: Candidate<Vec<bool>>,
            _it: usize,
            _rng: &mut dyn RngCore,
        ) {
            self.reference = Some(c);
        }
        fn reference(&self) -> Option<&Candidate<Vec<bool>>> {
            self.reference.as_ref()
        }
        fn set_initial_reference(&mut self, r: Candidate<Vec<bool>>) {
            self.reference = Some(r);
        }
    }

    impl SearchStrategy<Vec<bool>> for Filler {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Custom("filler")
        }
        fn generate(&mut self, _rng: &mut dyn RngCore) -> Option<Candidate<Vec<bool>>> {
            let mut code = self.reference.as_ref()?.code.clone();
            let i = code.iter().position(|&b| !b)?;
            code[i] = true;
            Some(Candidate::new(code))
        }
        fn update_reference(
            &mut self,
            c: Candidate<Vec<bool>>,
            _it: usize,
            _rng: &mut dyn RngCore,
        ) {
            let better = match &self.reference {
                Some(r) => c.objectives[0] >= r.objectives[0],
                None => true,
            };
            if better {
                self.reference = Some(c);
            }
        }
        fn reference(&self) -> Option<&Candidate<Vec<bool>>> {
            self.reference.as_ref()
        }
        fn set_initial_reference(&mut self, r: Candidate<Vec<bool>>) {
            self.reference = Some(r);
        }
    }

    fn panel(n: usize) -> Vec<Box<dyn SearchStrategy<Vec<bool>>>> {
        vec![
            Box::new(Shuffler { n, reference: None }),
            Box::new(Filler { reference: None }),
        ]
    }

    /// A problem whose evaluation breaks for codes starting with `true`.
    struct Flaky {
        inner: OneMax,
    }

    impl Problem for Flaky {
        type Code = Vec<bool>;
        fn sense(&self) -> Sense {
            Sense::Maximize
        }
        fn evaluate(&self, code: &Vec<bool>) -> Vec<f64> {
            if code[0] {
                vec![f64::NAN]
            } else {
                self.inner.evaluate(code)
            }
        }
        fn random_code(&self, _rng: &mut dyn RngCore) -> Vec<bool> {
            vec![false; self.inner.n]
        }
        fn neighbors(
            &self,
            code: &Vec<bool>,
            count: usize,
            rng: &mut dyn RngCore,
        ) -> Vec<Vec<bool>> {
            self.inner.neighbors(code, count, rng)
        }
    }

    /// Never moves and keeps no reference.
    struct Mute;

    impl SearchStrategy<Vec<bool>> for Mute {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Custom("mute")
        }
        fn generate(&mut self, _rng: &mut dyn RngCore) -> Option<Candidate<Vec<bool>>> {
            None
        }
        fn update_reference(
            &mut self,
            _c: Candidate<Vec<bool>>,
            _it: usize,
            _rng: &mut dyn RngCore,
        ) {
        }
        fn reference(&self) -> Option<&Candidate<Vec<bool>>> {
            None
        }
        fn set_initial_reference(&mut self, _r: Candidate<Vec<bool>>) {}
    }

    /// Always proposes the all-false string, which never beats the incumbent.
    struct Zeros {
        n: usize,
    }

    impl SearchStrategy<Vec<bool>> for Zeros {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Custom("zeros")
        }
        fn generate(&mut self, _rng: &mut dyn RngCore) -> Option<Candidate<Vec<bool>>> {
            Some(Candidate::new(vec![false; self.n]))
        }
        fn update_reference(
            &mut self,
            _c: Candidate<Vec<bool>>,
            _it: usize,
            _rng: &mut dyn RngCore,
        ) {
        }
        fn reference(&self) -> Option<&Candidate<Vec<bool>>> {
            None
        }
        fn set_initial_reference(&mut self, _r: Candidate<Vec<bool>>) {}
    }

    /// Only the first random code evaluates cleanly.
    struct FirstOnly {
        inner: OneMax,
        calls: AtomicUsize,
    }

    impl Problem for FirstOnly {
        type Code = Vec<bool>;
        fn sense(&self) -> Sense {
            Sense::Maximize
        }
        fn evaluate(&self, code: &Vec<bool>) -> Vec<f64> {
            if code[0] {
                vec![f64::NAN]
            } else {
                self.inner.evaluate(code)
            }
        }
        fn random_code(&self, _rng: &mut dyn RngCore) -> Vec<bool> {
            let first = self.calls.fetch_add(1, Ordering::Relaxed) == 0;
            vec![!first; self.inner.n]
        }
        fn neighbors(
            &self,
            code: &Vec<bool>,
            count: usize,
            rng: &mut dyn RngCore,
        ) -> Vec<Vec<bool>> {
            self.inner.neighbors(code, count, rng)
        }
    }

    /// Counts objective evaluations.
    struct Counted {
        inner: OneMax,
        evaluations: AtomicUsize,
    }

    impl Problem for Counted {
        type Code = Vec<bool>;
        fn sense(&self) -> Sense {
            Sense::Maximize
        }
        fn evaluate(&self, code: &Vec<bool>) -> Vec<f64> {
            self.evaluations.fetch_add(1, Ordering::Relaxed);
            self.inner.evaluate(code)
        }
        fn random_code(&self, rng: &mut dyn RngCore) -> Vec<bool> {
            self.inner.random_code(rng)
        }
        fn neighbors(
            &self,
            code: &Vec<bool>,
            count: usize,
            rng: &mut dyn RngCore,
        ) -> Vec<Vec<bool>> {
            self.inner.neighbors(code, count, rng)
        }
    }

    #[test]
    fn test_runner_solves_onemax() {
        let problem = OneMax { n: 30 };
        let config = PortfolioConfig::default().with_max_iterations(300).with_seed(42);
        let result = PortfolioRunner::run(&problem, panel(30), &config).unwrap();

        assert_eq!(result.best_value(), 30.0, "filler should set every bit");
        assert_eq!(result.iterations, 300);
        assert!(!result.stalled);
        assert!(!result.cancelled);
        assert_eq!(result.strategies.len(), 2);
        assert!(
            result.strategies[1].weight > result.strategies[0].weight,
            "the improving strategy should end heavier"
        );
        for s in &result.strategies {
            assert_eq!(s.trace.len(), 300);
            assert_eq!(s.period_usage.len(), config.periods);
            assert_eq!(s.period_usage.iter().sum::<usize>(), s.usage);
        }
        let total_usage: usize = result.strategies.iter().map(|s| s.usage).sum();
        assert_eq!(total_usage, 300);
    }

    #[test]
    fn test_runner_uneven_periods_fold_into_last() {
        let problem = OneMax { n: 10 };
        let config = PortfolioConfig::default()
            .with_max_iterations(105)
            .with_periods(10)
            .with_seed(11);
        let result = PortfolioRunner::run(&problem, panel(10), &config).unwrap();

        assert_eq!(result.iterations, 105);
        for s in &result.strategies {
            assert_eq!(s.period_usage.len(), 10);
            assert_eq!(s.period_improvements.len(), 10);
            assert_eq!(s.period_usage.iter().sum::<usize>(), s.usage);
            assert_eq!(s.period_improvements.iter().sum::<usize>(), s.improvements);
        }
        let last_period: usize = result.strategies.iter().map(|s| s.period_usage[9]).sum();
        assert_eq!(last_period, 15);
        assert!(result.best_history.len() <= config.periods + 1);
    }

    #[test]
    fn test_runner_stalls_on_exhausted_panel() {
        let problem = FirstOnly {
            inner: OneMax { n: 8 },
            calls: AtomicUsize::new(0),
        };
        let config = PortfolioConfig::default().with_max_iterations(50).with_seed(2);
        let panel: Vec<Box<dyn SearchStrategy<Vec<bool>>>> = vec![Box::new(Mute), Box::new(Mute)];
        let result = PortfolioRunner::run(&problem, panel, &config).unwrap();

        assert!(result.stalled);
        assert!(!result.cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.iterations < config.max_iterations);
        assert_eq!(result.best.code, vec![false; 8]);
    }

    #[test]
    fn test_runner_stalls_on_degenerate_weights_under_reject() {
        let problem = OneMax { n: 10 };
        let config = PortfolioConfig::default()
            .with_max_iterations(50)
            .with_reward(10.0, 1.0)
            .with_degenerate(DegeneratePolicy::Reject)
            .with_seed(4);
        let panel: Vec<Box<dyn SearchStrategy<Vec<bool>>>> = vec![Box::new(Zeros { n: 10 })];
        let result = PortfolioRunner::run(&problem, panel, &config).unwrap();

        assert!(result.stalled);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.strategies[0].weight, 0.0);
        assert_eq!(result.strategies[0].usage, 1);
        assert_eq!(result.strategies[0].improvements, 0);
    }

    #[test]
    fn test_runner_keeps_uniform_draw_when_weights_vanish() {
        let problem = OneMax { n: 10 };
        let config = PortfolioConfig::default()
            .with_max_iterations(50)
            .with_reward(10.0, 1.0)
            .with_seed(4);
        let panel: Vec<Box<dyn SearchStrategy<Vec<bool>>>> = vec![Box::new(Zeros { n: 10 })];
        let result = PortfolioRunner::run(&problem, panel, &config).unwrap();

        assert!(!result.stalled);
        assert_eq!(result.iterations, 50);
    }

    #[test]
    fn test_runner_evaluates_each_candidate_once() {
        let problem = Arc::new(Counted {
            inner: OneMax { n: 12 },
            evaluations: AtomicUsize::new(0),
        });
        let config = PortfolioConfig::default().with_max_iterations(100).with_seed(6);
        let panel: Vec<Box<dyn SearchStrategy<Vec<bool>>>> =
            vec![Box::new(RandomSearch::new(problem.clone()))];
        let result = PortfolioRunner::run(problem.as_ref(), panel, &config).unwrap();

        assert_eq!(result.iterations, 100);
        // initial solution, one seed-population member, then one per iteration
        assert_eq!(problem.evaluations.load(Ordering::Relaxed), 102);
    }

    #[test]
    fn test_runner_history_is_monotone() {
        let problem = OneMax { n: 20 };
        let config = PortfolioConfig::default().with_max_iterations(200).with_seed(3);
        let result = PortfolioRunner::run(&problem, panel(20), &config).unwrap();
        for pair in result.best_history.windows(2) {
            assert!(pair[1] >= pair[0], "best history must never get worse");
        }
        assert_eq!(result.offline_performance.len(), 1);
    }

    #[test]
    fn test_runner_deterministic_with_seed() {
        let problem = OneMax { n: 25 };
        let config = PortfolioConfig::default().with_max_iterations(100).with_seed(99);
        let a = PortfolioRunner::run(&problem, panel(25), &config).unwrap();
        let b = PortfolioRunner::run(&problem, panel(25), &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.strategies, b.strategies);
    }

    #[test]
    fn test_runner_change_points() {
        let problem = OneMax { n: 20 };
        let config = PortfolioConfig::default()
            .with_max_iterations(100)
            .with_change_period(25)
            .with_seed(8);
        let result = PortfolioRunner::run(&problem, panel(20), &config).unwrap();
        assert_eq!(result.offline_performance.len(), 4);
        for pair in result.offline_performance.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_runner_skips_malformed_candidates() {
        let problem = Flaky {
            inner: OneMax { n: 10 },
        };
        let config = PortfolioConfig::default().with_max_iterations(100).with_seed(5);
        let result = PortfolioRunner::run(&problem, panel(10), &config).unwrap();

        assert_eq!(result.iterations, 100);
        assert!(result.skipped > 0, "NaN evaluations must be skipped");
        assert!(result.best.check().is_ok());
        assert!(!result.best.code[0]);
    }

    #[test]
    fn test_runner_cancellation() {
        let problem = OneMax { n: 10 };
        let config = PortfolioConfig::default().with_max_iterations(1_000_000).with_seed(1);
        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            PortfolioRunner::run_with_cancel(&problem, panel(10), &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best_history.len(), 1);
    }

    #[test]
    fn test_runner_rejects_bad_config() {
        let problem = OneMax { n: 10 };
        let config = PortfolioConfig::default().with_max_iterations(0);
        assert!(matches!(
            PortfolioRunner::run(&problem, panel(10), &config),
            Err(HyperheurError::InvalidConfig(_))
        ));
        assert!(matches!(
            PortfolioRunner::run(&problem, vec![], &PortfolioConfig::default()),
            Err(HyperheurError::EmptyPanel)
        ));
    }
}
