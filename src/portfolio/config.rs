//! Portfolio configuration.

use crate::pareto::DuplicatePolicy;

/// What the roulette does when every weight is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DegeneratePolicy {
    /// Fall back to a uniform draw over the panel.
    ///
    /// Long runs can decay every weight to zero through underflow, so this
    /// keeps the portfolio alive.
    #[default]
    Uniform,
    /// Report [`HyperheurError::DegenerateWeights`](crate::HyperheurError::DegenerateWeights).
    Reject,
}

/// Configuration for the portfolio controller and its driver.
///
/// # Weight adaptation
///
/// After each iteration the active strategy's weight becomes
/// `w * (1 - decay) + reward` if its candidate improved the incumbent and
/// `w * (1 - decay)` otherwise. Repeated successes converge to
/// `reward / decay`, repeated failures to `min_weight`.
///
/// # Examples
///
/// ```
/// use u_hyperheur::portfolio::PortfolioConfig;
///
/// let config = PortfolioConfig::default()
///     .with_max_iterations(2000)
///     .with_reward(10.0, 0.1)
///     .with_initial_weight(50.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioConfig {
    /// Iteration budget of the run. Also bounds every weight trace.
    pub max_iterations: usize,

    /// Weight every strategy starts with (and returns to on reset).
    pub initial_weight: f64,

    /// Amount added to the weight of a strategy that improved the incumbent.
    pub reward: f64,

    /// Fraction of the weight lost by the active strategy each iteration,
    /// in (0, 1].
    pub decay: f64,

    /// Lower bound applied after every weight update.
    pub min_weight: f64,

    /// Roulette behaviour when all weights are degenerate.
    pub degenerate: DegeneratePolicy,

    /// Iterations between problem changes (dynamic problems).
    ///
    /// At each change point the weights are reset to `initial_weight` and
    /// an offline-performance segment is closed. 0 disables change points.
    pub change_period: usize,

    /// Number of reporting periods for usage/improvement tallies.
    pub periods: usize,

    /// Whether the controller maintains a Pareto front of every evaluated
    /// candidate (multi-objective panels).
    pub track_front: bool,

    /// Duplicate predicate for the tracked front.
    pub duplicates: DuplicatePolicy,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            initial_weight: 50.0,
            reward: 10.0,
            decay: 0.1,
            min_weight: 0.0,
            degenerate: DegeneratePolicy::default(),
            change_period: 0,
            periods: 10,
            track_front: false,
            duplicates: DuplicatePolicy::default(),
            seed: None,
        }
    }
}

impl PortfolioConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_initial_weight(mut self, w: f64) -> Self {
        self.initial_weight = w;
        self
    }

    /// Sets the reward and decay constants.
    pub fn with_reward(mut self, reward: f64, decay: f64) -> Self {
        self.reward = reward;
        self.decay = decay;
        self
    }

    pub fn with_min_weight(mut self, w: f64) -> Self {
        self.min_weight = w;
        self
    }

    pub fn with_degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate = policy;
        self
    }

    pub fn with_change_period(mut self, n: usize) -> Self {
        self.change_period = n;
        self
    }

    pub fn with_periods(mut self, n: usize) -> Self {
        self.periods = n.max(1);
        self
    }

    pub fn with_front(mut self, track: bool) -> Self {
        self.track_front = track;
        self
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Length of one reporting period in iterations.
    pub fn period_length(&self) -> usize {
        (self.max_iterations / self.periods.max(1)).max(1)
    }

    /// Reporting period of `iteration`. Leftover iterations past the last
    /// full period fold into the last one.
    pub fn period_index(&self, iteration: usize) -> usize {
        (iteration / self.period_length()).min(self.periods.max(1) - 1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be positive".into());
        }
        if !(self.initial_weight.is_finite() && self.initial_weight > 0.0) {
            return Err(format!(
                "initial_weight must be positive and finite, got {}",
                self.initial_weight
            ));
        }
        if !(self.reward.is_finite() && self.reward >= 0.0) {
            return Err(format!("reward must be non-negative, got {}", self.reward));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(format!("decay must be in (0, 1], got {}", self.decay));
        }
        if !(self.min_weight.is_finite() && self.min_weight >= 0.0) {
            return Err(format!(
                "min_weight must be non-negative, got {}",
                self.min_weight
            ));
        }
        if self.periods == 0 {
            return Err("periods must be positive".into());
        }
        Ok(())
    }
}
