//! Non-dominated front maintenance under streaming insertion.

use super::dominance::dominates;
use crate::error::{HyperheurError, Result};
use crate::problem::{Candidate, Sense};
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether two candidates are duplicates.
///
/// A duplicate of an existing member is never admitted to the front,
/// even though equal objective vectors do not dominate each other.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuplicatePolicy {
    /// Candidates with equal codes are duplicates.
    SameCode,
    /// Candidates whose objectives all differ by at most `tolerance` are
    /// duplicates.
    SameObjectives {
        /// Absolute per-objective tolerance.
        tolerance: f64,
    },
    /// Either of the above.
    Either {
        /// Absolute per-objective tolerance.
        tolerance: f64,
    },
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::Either { tolerance: 1e-9 }
    }
}

impl DuplicatePolicy {
    /// Returns `true` if `a` and `b` are duplicates under this policy.
    pub fn is_duplicate<C: PartialEq>(&self, a: &Candidate<C>, b: &Candidate<C>) -> bool {
        match *self {
            DuplicatePolicy::SameCode => a.code == b.code,
            DuplicatePolicy::SameObjectives { tolerance } => {
                same_objectives(&a.objectives, &b.objectives, tolerance)
            }
            DuplicatePolicy::Either { tolerance } => {
                a.code == b.code || same_objectives(&a.objectives, &b.objectives, tolerance)
            }
        }
    }
}

fn same_objectives(a: &[f64], b: &[f64], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}

type DistanceFn<C> = Arc<dyn Fn(&C, &C) -> f64 + Send + Sync>;

/// A set of mutually non-dominated candidates.
///
/// Invariants, held after every call:
/// - no member dominates another member;
/// - no two members are duplicates under the front's [`DuplicatePolicy`];
/// - every member has the same number of finite objective values.
///
/// Membership is binary: a removed member is dropped immediately.
///
/// # Diversity tracking
///
/// A front built with [`with_distance`](ParetoFront::with_distance)
/// annotates every member with its cumulative distance to all other
/// members, updated incrementally on each insertion and removal.
/// [`most_isolated`](ParetoFront::most_isolated) returns the member in the
/// least explored region of the front.
///
/// # Examples
///
/// ```
/// use u_hyperheur::pareto::ParetoFront;
/// use u_hyperheur::problem::{Candidate, Sense};
///
/// let mut front = ParetoFront::new(Sense::Maximize);
/// assert!(front.insert(&Candidate::evaluated("a", vec![10.0, 2.0])).unwrap());
/// assert!(front.insert(&Candidate::evaluated("b", vec![3.0, 9.0])).unwrap());
/// assert!(!front.insert(&Candidate::evaluated("c", vec![2.0, 2.0])).unwrap());
/// assert_eq!(front.len(), 2);
/// ```
#[derive(Clone)]
pub struct ParetoFront<C> {
    sense: Sense,
    duplicates: DuplicatePolicy,
    members: Vec<Candidate<C>>,
    distance: Option<DistanceFn<C>>,
    scores: Vec<f64>,
}

impl<C: fmt::Debug> fmt::Debug for ParetoFront<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParetoFront")
            .field("sense", &self.sense)
            .field("duplicates", &self.duplicates)
            .field("members", &self.members)
            .field("scores", &self.scores)
            .finish()
    }
}

impl<C> ParetoFront<C> {
    /// Creates an empty front with the default duplicate policy.
    pub fn new(sense: Sense) -> Self {
        Self {
            sense,
            duplicates: DuplicatePolicy::default(),
            members: Vec::new(),
            distance: None,
            scores: Vec::new(),
        }
    }

    /// Creates an empty front that tracks cumulative pairwise distances.
    pub fn with_distance<F>(sense: Sense, distance: F) -> Self
    where
        F: Fn(&C, &C) -> f64 + Send + Sync + 'static,
    {
        Self {
            distance: Some(Arc::new(distance)),
            ..Self::new(sense)
        }
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn members(&self) -> &[Candidate<C>] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Candidate<C>> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Objective vectors of all members, in membership order.
    pub fn objectives(&self) -> Vec<Vec<f64>> {
        self.members.iter().map(|m| m.objectives.clone()).collect()
    }

    /// Cumulative distance of each member to all others.
    ///
    /// Empty when diversity tracking is disabled.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn tracks_diversity(&self) -> bool {
        self.distance.is_some()
    }

    /// The member with the largest cumulative distance to the rest of the
    /// front (first one on ties).
    ///
    /// Returns `None` if the front is empty or diversity tracking is
    /// disabled.
    pub fn most_isolated(&self) -> Option<&Candidate<C>> {
        self.scores
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &s)| match best {
                Some((_, b)) if b >= s => best,
                _ => Some((i, s)),
            })
            .map(|(i, _)| &self.members[i])
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.scores.clear();
    }

    fn push(&mut self, candidate: Candidate<C>) {
        if let Some(distance) = &self.distance {
            let mut total = 0.0;
            for (member, score) in self.members.iter().zip(self.scores.iter_mut()) {
                let d = distance(&member.code, &candidate.code);
                *score += d;
                total += d;
            }
            self.scores.push(total);
        }
        self.members.push(candidate);
    }

    fn remove_at(&mut self, index: usize) {
        let removed = self.members.remove(index);
        if let Some(distance) = &self.distance {
            self.scores.remove(index);
            for (member, score) in self.members.iter().zip(self.scores.iter_mut()) {
                *score = (*score - distance(&member.code, &removed.code)).max(0.0);
            }
        }
    }
}

impl<C: Clone + PartialEq> ParetoFront<C> {
    /// Offers a candidate to the front.
    ///
    /// 1. A malformed candidate (missing or non-finite objectives, or an
    ///    objective count that differs from the members') is an error and
    ///    leaves the front untouched.
    /// 2. An empty front accepts unconditionally.
    /// 3. A duplicate of an existing member is rejected.
    /// 4. A candidate dominated by any member is rejected.
    /// 5. Otherwise every member the candidate dominates is removed and a
    ///    copy of the candidate is added.
    ///
    /// Returns whether the candidate was admitted.
    pub fn insert(&mut self, candidate: &Candidate<C>) -> Result<bool> {
        candidate.check()?;
        if let Some(first) = self.members.first() {
            if first.arity() != candidate.arity() {
                return Err(HyperheurError::ObjectiveArity {
                    expected: first.arity(),
                    found: candidate.arity(),
                });
            }
        }

        if self.members.is_empty() {
            self.push(candidate.clone());
            return Ok(true);
        }

        if self
            .members
            .iter()
            .any(|m| self.duplicates.is_duplicate(m, candidate))
        {
            return Ok(false);
        }

        let sense = self.sense;
        if self
            .members
            .iter()
            .any(|m| dominates(&m.objectives, &candidate.objectives, sense))
        {
            return Ok(false);
        }

        let mut i = 0;
        while i < self.members.len() {
            if dominates(&candidate.objectives, &self.members[i].objectives, sense) {
                self.remove_at(i);
            } else {
                i += 1;
            }
        }
        self.push(candidate.clone());
        Ok(true)
    }

    /// Returns `true` if a member has the given code.
    pub fn contains_code(&self, code: &C) -> bool {
        self.members.iter().any(|m| &m.code == code)
    }
}

/// Not-dominated acceptance.
///
/// Seeds an empty front with `current`, rejects a candidate that
/// `current` dominates, and otherwise accepts exactly when the front
/// admits the candidate.
pub fn accept_not_dominated<C: Clone + PartialEq>(
    front: &mut ParetoFront<C>,
    current: &Candidate<C>,
    candidate: &Candidate<C>,
) -> Result<bool> {
    if front.is_empty() {
        front.insert(current)?;
    }
    if dominates(&current.objectives, &candidate.objectives, front.sense()) {
        return Ok(false);
    }
    front.insert(candidate)
}

/// Tabu-style not-dominated acceptance.
///
/// Always moves to the candidate; the front absorbs it if it qualifies.
pub fn accept_not_dominated_tabu<C: Clone + PartialEq>(
    front: &mut ParetoFront<C>,
    current: &Candidate<C>,
    candidate: &Candidate<C>,
) -> Result<bool> {
    if front.is_empty() {
        front.insert(current)?;
    }
    front.insert(candidate)?;
    Ok(true)
}
