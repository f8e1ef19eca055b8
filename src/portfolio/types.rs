//! Strategy contract and per-entry portfolio state.

use crate::problem::Candidate;
use rand::RngCore;

/// Identifies a strategy variant in the registry and in run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StrategyKind {
    HillClimbing,
    RandomSearch,
    SimulatedAnnealing,
    TabuSearch,
    MultiobjectiveHillClimbing,
    /// A user-supplied strategy.
    Custom(&'static str),
}

/// A low-level search strategy managed by the portfolio.
///
/// Strategies own their search state (reference solution, tabu list,
/// temperature, local front). Portfolio bookkeeping (weight, trace,
/// usage counters) lives on [`StrategyEntry`] instead, so implementors
/// never see it.
///
/// Randomness is always borrowed from the controller, which keeps a run
/// reproducible from a single seed.
pub trait SearchStrategy<C>: Send {
    /// The variant this strategy reports as.
    fn kind(&self) -> StrategyKind;

    /// Proposes a new candidate, or `None` if the strategy cannot move
    /// (no reference yet, empty neighborhood, everything tabu).
    fn generate(&mut self, rng: &mut dyn RngCore) -> Option<Candidate<C>>;

    /// Absorbs a candidate produced by any member of the panel.
    ///
    /// Called once per iteration on every strategy with its own copy of
    /// the candidate; the strategy's acceptance rule decides whether its
    /// reference moves.
    fn update_reference(
        &mut self,
        candidate: Candidate<C>,
        iteration: usize,
        rng: &mut dyn RngCore,
    );

    /// The current reference solution, if any.
    fn reference(&self) -> Option<&Candidate<C>>;

    /// Installs the reference the search starts from.
    fn set_initial_reference(&mut self, reference: Candidate<C>);

    /// Receives the initial reference population.
    ///
    /// Only called for entries configured with a positive
    /// [`EntryConfig::reference_count`].
    fn seed_population(&mut self, _population: Vec<Candidate<C>>) {}
}

/// Portfolio-side configuration for one panel entry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryConfig {
    /// Starting weight of the entry.
    pub initial_weight: f64,
    /// How many members of the seed population the strategy receives.
    pub reference_count: usize,
}

impl EntryConfig {
    pub fn new(initial_weight: f64) -> Self {
        Self {
            initial_weight,
            reference_count: 1,
        }
    }

    pub fn with_reference_count(mut self, n: usize) -> Self {
        self.reference_count = n;
        self
    }
}

/// A strategy plus the adaptive state the portfolio keeps for it.
///
/// `trace[i]` is the entry's weight at iteration `i`; it is append-only
/// and bounded by the run's iteration budget.
pub struct StrategyEntry<C> {
    pub(crate) strategy: Box<dyn SearchStrategy<C>>,
    pub(crate) config: EntryConfig,
    pub(crate) weight: f64,
    pub(crate) trace: Vec<f64>,
    pub(crate) usage: usize,
    pub(crate) improvements: usize,
    pub(crate) period_usage: Vec<usize>,
    pub(crate) period_improvements: Vec<usize>,
    pending_usage: usize,
    pending_improvements: usize,
}

impl<C> StrategyEntry<C> {
    pub fn new(strategy: Box<dyn SearchStrategy<C>>, config: EntryConfig) -> Self {
        Self {
            strategy,
            weight: config.initial_weight,
            config,
            trace: Vec::new(),
            usage: 0,
            improvements: 0,
            period_usage: Vec::new(),
            period_improvements: Vec::new(),
            pending_usage: 0,
            pending_improvements: 0,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    pub fn strategy(&self) -> &dyn SearchStrategy<C> {
        self.strategy.as_ref()
    }

    pub fn strategy_mut(&mut self) -> &mut dyn SearchStrategy<C> {
        self.strategy.as_mut()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Weight history, one value per recorded iteration.
    pub fn trace(&self) -> &[f64] {
        &self.trace
    }

    /// Times the roulette selected this entry.
    pub fn usage(&self) -> usize {
        self.usage
    }

    /// Times a candidate of this entry improved the incumbent.
    pub fn improvements(&self) -> usize {
        self.improvements
    }

    /// Selections per closed reporting period.
    pub fn period_usage(&self) -> &[usize] {
        &self.period_usage
    }

    /// Improvements per closed reporting period.
    pub fn period_improvements(&self) -> &[usize] {
        &self.period_improvements
    }

    pub(crate) fn record_use(&mut self) {
        self.usage += 1;
        self.pending_usage += 1;
    }

    pub(crate) fn record_improvement(&mut self) {
        self.improvements += 1;
        self.pending_improvements += 1;
    }

    /// Records the current weight at `iteration`.
    ///
    /// Slots already written are left alone; iterations the driver
    /// skipped carry the current weight forward.
    pub(crate) fn record_trace(&mut self, iteration: usize, budget: usize) {
        while self.trace.len() <= iteration && self.trace.len() < budget {
            self.trace.push(self.weight);
        }
    }

    /// Moves the pending counters into the tally of `period`.
    pub(crate) fn close_period(&mut self, period: usize) {
        if self.period_usage.len() <= period {
            self.period_usage.resize(period + 1, 0);
            self.period_improvements.resize(period + 1, 0);
        }
        self.period_usage[period] += self.pending_usage;
        self.period_improvements[period] += self.pending_improvements;
        self.pending_usage = 0;
        self.pending_improvements = 0;
    }

    pub(crate) fn reset(&mut self) {
        self.weight = self.config.initial_weight;
        self.trace.clear();
        self.usage = 0;
        self.improvements = 0;
        self.period_usage.clear();
        self.period_improvements.clear();
        self.pending_usage = 0;
        self.pending_improvements = 0;
    }
}
