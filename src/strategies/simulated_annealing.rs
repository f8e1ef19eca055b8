//! Simulated annealing as a portfolio member.
//!
//! # References
//!
//! Kirkpatrick et al. (1983), Cerny (1985), Lundy & Mees (1986)

use super::acceptance::Acceptance;
use crate::portfolio::{SearchStrategy, StrategyKind};
use crate::problem::{Candidate, Problem};
use rand::RngCore;
use std::sync::Arc;

/// Cooling schedule for temperature reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// `T_{k+1} = alpha * T_k`.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// `T_k = T_0 - k * (T_0 - T_min) / linear_steps`.
    Linear,

    /// `T_{k+1} = T_k / (1 + beta * T_k)`.
    LundyMees {
        /// Cooling parameter, positive.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

/// Configuration for [`SimulatedAnnealing`].
///
/// # Examples
///
/// ```
/// use u_hyperheur::strategies::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_min_temperature(0.001)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 })
///     .with_iterations_per_temperature(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Temperature floor.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Portfolio iterations between two cooling steps.
    ///
    /// Cooling follows the global iteration index, so the schedule
    /// advances at the same pace whether or not the roulette picks this
    /// strategy.
    pub iterations_per_temperature: usize,

    /// Number of cooling steps for [`CoolingSchedule::Linear`] to reach
    /// the floor.
    pub linear_steps: usize,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 10,
            linear_steps: 1000,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_linear_steps(mut self, n: usize) -> Self {
        self.linear_steps = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return Err("min_temperature must be less than initial_temperature".into());
        }
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be positive".into());
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return Err(format!("geometric alpha must be in (0, 1), got {alpha}"));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 {
                    return Err(format!("lundy-mees beta must be positive, got {beta}"));
                }
            }
            CoolingSchedule::Linear => {}
        }
        Ok(())
    }
}

/// Random-neighbor moves with Metropolis acceptance.
pub struct SimulatedAnnealing<P: Problem> {
    problem: Arc<P>,
    config: SaConfig,
    reference: Option<Candidate<P::Code>>,
    temperature: f64,
    step: usize,
}

impl<P: Problem> SimulatedAnnealing<P> {
    pub fn new(problem: Arc<P>, config: SaConfig) -> Self {
        let temperature = config.initial_temperature;
        Self {
            problem,
            config,
            reference: None,
            temperature,
            step: 0,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Cools until the schedule matches `iteration`.
    fn advance(&mut self, iteration: usize) {
        let target = (iteration + 1) / self.config.iterations_per_temperature.max(1);
        while self.step < target && self.temperature > self.config.min_temperature {
            self.temperature = cool(self.temperature, &self.config, self.step);
            self.step += 1;
        }
        self.step = self.step.max(target);
    }
}

impl<P: Problem> SearchStrategy<P::Code> for SimulatedAnnealing<P> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SimulatedAnnealing
    }

    fn generate(&mut self, rng: &mut dyn RngCore) -> Option<Candidate<P::Code>> {
        let reference = self.reference.as_ref()?;
        let code = self.problem.neighbors(&reference.code, 1, rng).pop()?;
        Some(self.problem.candidate(code))
    }

    fn update_reference(
        &mut self,
        candidate: Candidate<P::Code>,
        iteration: usize,
        rng: &mut dyn RngCore,
    ) {
        if Acceptance::Metropolis.accepts(
            self.reference.as_ref(),
            &candidate,
            self.problem.sense(),
            self.temperature,
            rng,
        ) {
            self.reference = Some(candidate);
        }
        self.advance(iteration);
    }

    fn reference(&self) -> Option<&Candidate<P::Code>> {
        self.reference.as_ref()
    }

    fn set_initial_reference(&mut self, reference: Candidate<P::Code>) {
        self.reference = Some(reference);
        self.temperature = self.config.initial_temperature;
        self.step = 0;
    }
}

/// Apply the cooling schedule to compute the next temperature.
fn cool(temperature: f64, config: &SaConfig, step: usize) -> f64 {
    let next = match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            if config.linear_steps == 0 {
                config.min_temperature
            } else {
                config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / config.linear_steps as f64
            }
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    };
    next.max(config.min_temperature)
}
