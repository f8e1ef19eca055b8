//! Single-objective acceptance rules.

use crate::problem::{Candidate, Sense};
use rand::Rng;

/// Decides whether a strategy moves its reference to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Acceptance {
    /// Accept candidates at least as good as the reference.
    #[default]
    Best,
    /// Accept every candidate.
    Anyone,
    /// Accept improvements; accept a worsening `delta` with probability
    /// `exp(-|delta| / T)`.
    Metropolis,
}

impl Acceptance {
    /// Applies the rule. `temperature` is only read by
    /// [`Acceptance::Metropolis`].
    ///
    /// A malformed candidate is never accepted; a malformed (or missing)
    /// reference always is replaced.
    pub fn accepts<C, R: Rng + ?Sized>(
        self,
        reference: Option<&Candidate<C>>,
        candidate: &Candidate<C>,
        sense: Sense,
        temperature: f64,
        rng: &mut R,
    ) -> bool {
        if candidate.check().is_err() {
            return false;
        }
        let (Some(current), Some(value)) = (
            reference.filter(|r| r.check().is_ok()).and_then(Candidate::primary),
            candidate.primary(),
        ) else {
            return true;
        };

        match self {
            Acceptance::Best => sense.at_least(value, current),
            Acceptance::Anyone => true,
            Acceptance::Metropolis => {
                if sense.at_least(value, current) {
                    true
                } else if temperature > 0.0 {
                    let delta = (value - current).abs();
                    rng.random::<f64>() < (-delta / temperature).exp()
                } else {
                    false
                }
            }
        }
    }
}
