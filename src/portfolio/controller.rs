//! The portfolio controller: selection, generation, reward, propagation.

use super::config::PortfolioConfig;
use super::roulette::RouletteSelector;
use super::types::{EntryConfig, SearchStrategy, StrategyEntry, StrategyKind};
use super::weights::WeightUpdateEngine;
use crate::error::{HyperheurError, Result};
use crate::pareto::ParetoFront;
use crate::problem::{Candidate, Sense};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Adaptive portfolio over a panel of search strategies.
///
/// Each iteration the driver calls [`generate`](Self::generate), which
/// picks a strategy by roulette over the current weights and asks it for
/// a candidate, then evaluates the candidate and hands it back through
/// [`update_reference`](Self::update_reference). That rewards or decays
/// the strategy that produced it, records every weight into its trace,
/// and propagates a copy of the candidate to every panel member
/// (tournament propagation).
///
/// The controller is single-threaded: `generate` and `update_reference`
/// must alternate on one thread. Independent controllers can run in
/// parallel.
pub struct PortfolioController<C> {
    entries: Vec<StrategyEntry<C>>,
    selector: RouletteSelector,
    engine: WeightUpdateEngine,
    sense: Sense,
    initial_weight: f64,
    incumbent: Option<Candidate<C>>,
    active: Option<usize>,
    population: Vec<Candidate<C>>,
    front: Option<ParetoFront<C>>,
    rng: StdRng,
}

impl<C: Clone + PartialEq> PortfolioController<C> {
    /// Builds a controller where every strategy starts at
    /// `config.initial_weight`.
    pub fn new(
        strategies: Vec<Box<dyn SearchStrategy<C>>>,
        sense: Sense,
        config: &PortfolioConfig,
    ) -> Result<Self> {
        let entry_config = EntryConfig::new(config.initial_weight);
        let entries = strategies
            .into_iter()
            .map(|s| StrategyEntry::new(s, entry_config))
            .collect();
        Self::from_entries(entries, sense, config)
    }

    /// Builds a controller from pre-configured entries.
    pub fn from_entries(
        entries: Vec<StrategyEntry<C>>,
        sense: Sense,
        config: &PortfolioConfig,
    ) -> Result<Self> {
        config.validate().map_err(HyperheurError::InvalidConfig)?;
        if entries.is_empty() {
            return Err(HyperheurError::EmptyPanel);
        }
        let rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let front = config
            .track_front
            .then(|| ParetoFront::new(sense).with_duplicates(config.duplicates));

        tracing::debug!(strategies = entries.len(), ?sense, "portfolio created");

        Ok(Self {
            entries,
            selector: RouletteSelector::new(config.degenerate),
            engine: WeightUpdateEngine::from_config(config),
            sense,
            initial_weight: config.initial_weight,
            incumbent: None,
            active: None,
            population: Vec::new(),
            front,
            rng,
        })
    }

    /// Replaces the tracked front, e.g. with one that keeps diversity
    /// scores.
    pub fn with_front(mut self, front: ParetoFront<C>) -> Self {
        self.front = Some(front);
        self
    }

    /// Installs the initial reference and the seed population.
    ///
    /// Every strategy receives a copy of `initial` as its reference;
    /// entries with a positive reference count also receive the first
    /// `reference_count` members of `population`.
    pub fn seed(&mut self, initial: Candidate<C>, population: Vec<Candidate<C>>) -> Result<()> {
        initial.check()?;
        if let Some(front) = self.front.as_mut() {
            front.insert(&initial)?;
        }
        for entry in &mut self.entries {
            entry.strategy.set_initial_reference(initial.clone());
            let k = entry.config.reference_count;
            if k > 0 && !population.is_empty() {
                entry
                    .strategy
                    .seed_population(population.iter().take(k).cloned().collect());
            }
        }
        self.incumbent = Some(initial);
        self.population = population;
        Ok(())
    }

    /// Draws the index of the next active entry.
    pub fn roulette(&mut self) -> Result<usize> {
        let weights = self.weights();
        self.selector.select(&weights, &mut self.rng)
    }

    /// Selects a strategy and returns its candidate.
    ///
    /// If the selected strategy cannot move, the other members are tried
    /// in panel order, then a copy of any member's reference, then a copy
    /// of the first seed-population member. The entry that produced the
    /// candidate becomes active.
    ///
    /// # Errors
    ///
    /// [`HyperheurError::ExhaustedPanel`] when every fallback is empty;
    /// roulette errors under [`DegeneratePolicy::Reject`](super::DegeneratePolicy::Reject).
    pub fn generate(&mut self) -> Result<Candidate<C>> {
        let selected = self.roulette()?;
        self.active = Some(selected);
        self.entries[selected].record_use();
        tracing::trace!(
            strategy = ?self.entries[selected].kind(),
            weight = self.entries[selected].weight,
            "strategy selected"
        );

        if let Some(candidate) = self.entries[selected].strategy.generate(&mut self.rng) {
            return Ok(candidate);
        }

        for i in (0..self.entries.len()).filter(|&i| i != selected) {
            if let Some(candidate) = self.entries[i].strategy.generate(&mut self.rng) {
                tracing::debug!(
                    selected = ?self.entries[selected].kind(),
                    fallback = ?self.entries[i].kind(),
                    "selected strategy could not move, fell back"
                );
                self.active = Some(i);
                return Ok(candidate);
            }
        }

        let reference = self
            .entries
            .iter()
            .find_map(|e| e.strategy.reference().cloned())
            .or_else(|| self.population.first().cloned());
        match reference {
            Some(candidate) => {
                tracing::warn!("no strategy could move, reusing a reference solution");
                Ok(candidate)
            }
            None => {
                self.active = None;
                tracing::warn!("panel exhausted");
                Err(HyperheurError::ExhaustedPanel)
            }
        }
    }

    /// Feeds an evaluated candidate back into the portfolio.
    ///
    /// Rewards or decays the active entry, records every trace, hands a
    /// copy of the candidate to each member, and inserts it into the
    /// tracked front. Returns whether the candidate improved the
    /// incumbent.
    ///
    /// Nothing is updated when the candidate is rejected; the active
    /// entry is cleared either way.
    pub fn update_reference(&mut self, candidate: Candidate<C>, iteration: usize) -> Result<bool> {
        let active = self.active.take().ok_or(HyperheurError::NoActiveStrategy)?;
        candidate.check()?;
        if let Some(first) = self.front.as_ref().and_then(|f| f.members().first()) {
            if first.arity() != candidate.arity() {
                return Err(HyperheurError::ObjectiveArity {
                    expected: first.arity(),
                    found: candidate.arity(),
                });
            }
        }

        let improved =
            WeightUpdateEngine::improves(&candidate, self.incumbent.as_ref(), self.sense)?;
        let weight = self.engine.update(&mut self.entries[active], improved);
        self.engine.record_trace(&mut self.entries, iteration);
        tracing::trace!(
            iteration,
            strategy = ?self.entries[active].kind(),
            improved,
            weight,
            "weight updated"
        );

        for entry in &mut self.entries {
            entry
                .strategy
                .update_reference(candidate.clone(), iteration, &mut self.rng);
        }

        if let Some(front) = self.front.as_mut() {
            front.insert(&candidate)?;
        }
        if improved {
            self.incumbent = Some(candidate);
        }
        Ok(improved)
    }

    /// Replaces the incumbent without touching any weight.
    pub fn set_incumbent(&mut self, candidate: Candidate<C>) -> Result<()> {
        candidate.check()?;
        self.incumbent = Some(candidate);
        Ok(())
    }

    /// Resets every weight to its entry's initial weight.
    ///
    /// Used at change points of dynamic problems.
    pub fn reset_weights(&mut self) {
        for entry in &mut self.entries {
            entry.weight = entry.config.initial_weight;
        }
        tracing::debug!(initial_weight = self.initial_weight, "weights reset");
    }

    /// Closes reporting period `period` on every entry.
    pub fn close_period(&mut self, period: usize) {
        for entry in &mut self.entries {
            entry.close_period(period);
        }
    }

    /// Returns the portfolio to its freshly built state: weights, traces,
    /// counters, incumbent, and front are cleared. Strategies keep their
    /// own state until the next [`seed`](Self::seed).
    pub fn reinitialize(&mut self) {
        for entry in &mut self.entries {
            entry.reset();
        }
        self.incumbent = None;
        self.active = None;
        self.population.clear();
        if let Some(front) = self.front.as_mut() {
            front.clear();
        }
        tracing::debug!("portfolio reinitialized");
    }
}

impl<C> PortfolioController<C> {
    pub fn entries(&self) -> &[StrategyEntry<C>] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&StrategyEntry<C>> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kinds(&self) -> Vec<StrategyKind> {
        self.entries.iter().map(StrategyEntry::kind).collect()
    }

    /// Current weights in panel order.
    pub fn weights(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.weight).collect()
    }

    /// Weight traces in panel order.
    pub fn traces(&self) -> Vec<&[f64]> {
        self.entries.iter().map(StrategyEntry::trace).collect()
    }

    /// The entry selected by the last `generate`, until the matching
    /// `update_reference`.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Best candidate seen so far on the primary objective.
    pub fn incumbent(&self) -> Option<&Candidate<C>> {
        self.incumbent.as_ref()
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn front(&self) -> Option<&ParetoFront<C>> {
        self.front.as_ref()
    }

    pub fn population(&self) -> &[Candidate<C>] {
        &self.population
    }
}
