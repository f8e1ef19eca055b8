//! Problem context and candidate representation.
//!
//! The core never encodes problem-specific state or operators. A
//! [`Problem`] supplies the optimization [`Sense`] and objective
//! evaluation; [`Candidate`] carries a code and its objective vector
//! between strategies, the controller, and the Pareto front.

mod types;

pub use types::{Candidate, Problem, Sense};

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small problems shared by unit tests across modules.

    use super::{Problem, Sense};
    use rand::{Rng, RngCore};

    /// Maximize the number of `true` bits.
    pub struct OneMax {
        pub n: usize,
    }

    impl Problem for OneMax {
        type Code = Vec<bool>;

        fn sense(&self) -> Sense {
            Sense::Maximize
        }

        fn evaluate(&self, code: &Vec<bool>) -> Vec<f64> {
            vec![code.iter().filter(|&&b| b).count() as f64]
        }

        fn random_code(&self, rng: &mut dyn RngCore) -> Vec<bool> {
            (0..self.n).map(|_| rng.random_bool(0.5)).collect()
        }

        fn neighbors(
            &self,
            code: &Vec<bool>,
            count: usize,
            rng: &mut dyn RngCore,
        ) -> Vec<Vec<bool>> {
            (0..count)
                .map(|_| {
                    let mut next = code.clone();
                    let i = rng.random_range(0..self.n);
                    next[i] = !next[i];
                    next
                })
                .collect()
        }

        fn distance(&self, a: &Vec<bool>, b: &Vec<bool>) -> f64 {
            a.iter().zip(b).filter(|(x, y)| x != y).count() as f64
        }
    }

    /// Maximize `(ones, zeros + first_bit)`: distinct one-counts trade
    /// off against each other, and a leading `true` bit is free.
    pub struct TwoObjectives {
        pub n: usize,
    }

    impl Problem for TwoObjectives {
        type Code = Vec<bool>;

        fn sense(&self) -> Sense {
            Sense::Maximize
        }

        fn evaluate(&self, code: &Vec<bool>) -> Vec<f64> {
            let ones = code.iter().filter(|&&b| b).count() as f64;
            let first = if code.first().copied().unwrap_or(false) { 1.0 } else { 0.0 };
            vec![ones, self.n as f64 - ones + first]
        }

        fn random_code(&self, rng: &mut dyn RngCore) -> Vec<bool> {
            (0..self.n).map(|_| rng.random_bool(0.5)).collect()
        }

        fn neighbors(
            &self,
            code: &Vec<bool>,
            count: usize,
            rng: &mut dyn RngCore,
        ) -> Vec<Vec<bool>> {
            (0..count)
                .map(|_| {
                    let mut next = code.clone();
                    let i = rng.random_range(0..self.n);
                    next[i] = !next[i];
                    next
                })
                .collect()
        }

        fn distance(&self, a: &Vec<bool>, b: &Vec<bool>) -> f64 {
            a.iter().zip(b).filter(|(x, y)| x != y).count() as f64
        }
    }
}
