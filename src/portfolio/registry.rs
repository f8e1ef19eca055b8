//! Construction of strategy panels by variant.

use super::types::{SearchStrategy, StrategyKind};
use crate::error::{HyperheurError, Result};
use std::collections::BTreeMap;

type Factory<C> = Box<dyn Fn() -> Box<dyn SearchStrategy<C>> + Send + Sync>;

/// Maps each [`StrategyKind`] to a constructor.
///
/// The portfolio itself never names a concrete strategy; panels are
/// assembled from whatever variants the registry knows.
pub struct StrategyRegistry<C> {
    factories: BTreeMap<StrategyKind, Factory<C>>,
}

impl<C> Default for StrategyRegistry<C> {
    fn default() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }
}

impl<C> StrategyRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the factory for `kind`.
    pub fn register<F>(&mut self, kind: StrategyKind, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn SearchStrategy<C>> + Send + Sync + 'static,
    {
        self.factories.insert(kind, Box::new(factory));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, kind: StrategyKind, factory: F) -> Self
    where
        F: Fn() -> Box<dyn SearchStrategy<C>> + Send + Sync + 'static,
    {
        self.register(kind, factory);
        self
    }

    pub fn contains(&self, kind: StrategyKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Registered variants in a stable order.
    pub fn kinds(&self) -> Vec<StrategyKind> {
        self.factories.keys().copied().collect()
    }

    /// Instantiates one strategy per requested variant, in order.
    ///
    /// With the `parallel` feature the factories run on the rayon pool.
    ///
    /// # Errors
    ///
    /// [`HyperheurError::UnknownStrategy`] if any variant has no factory.
    pub fn build(&self, kinds: &[StrategyKind]) -> Result<Vec<Box<dyn SearchStrategy<C>>>> {
        let factories = kinds
            .iter()
            .map(|k| {
                self.factories
                    .get(k)
                    .ok_or(HyperheurError::UnknownStrategy(*k))
            })
            .collect::<Result<Vec<_>>>()?;

        #[cfg(feature = "parallel")]
        let panel = {
            use rayon::prelude::*;
            factories.par_iter().map(|f| f()).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let panel = factories.iter().map(|f| f()).collect();

        tracing::debug!(?kinds, "panel built");
        Ok(panel)
    }

    /// Instantiates every registered variant.
    pub fn build_all(&self) -> Vec<Box<dyn SearchStrategy<C>>> {
        self.factories.values().map(|f| f()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Candidate;
    use rand::RngCore;

    struct Named(&'static str);

    impl SearchStrategy<u8> for Named {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Custom(self.0)
        }
        fn generate(&mut self, _rng: &mut dyn RngCore) -> Option<Candidate<u8>> {
            None
        }
        fn update_reference(&mut self, _c: Candidate<u8>, _it: usize, _rng: &mut dyn RngCore) {}
        fn reference(&self) -> Option<&Candidate<u8>> {
            None
        }
        fn set_initial_reference(&mut self, _r: Candidate<u8>) {}
    }

    fn registry() -> StrategyRegistry<u8> {
        StrategyRegistry::new()
            .with(StrategyKind::Custom("a"), || Box::new(Named("a")))
            .with(StrategyKind::Custom("b"), || Box::new(Named("b")))
    }

    #[test]
    fn test_build_preserves_order() {
        let panel = registry()
            .build(&[
                StrategyKind::Custom("b"),
                StrategyKind::Custom("a"),
                StrategyKind::Custom("b"),
            ])
            .unwrap();
        let kinds: Vec<_> = panel.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                StrategyKind::Custom("b"),
                StrategyKind::Custom("a"),
                StrategyKind::Custom("b"),
            ]
        );
    }

    #[test]
    fn test_unknown_kind() {
        let result = registry().build(&[StrategyKind::Custom("a"), StrategyKind::TabuSearch]);
        assert!(matches!(
            result,
            Err(HyperheurError::UnknownStrategy(StrategyKind::TabuSearch))
        ));
    }

    #[test]
    fn test_kinds_and_build_all() {
        let reg = registry();
        assert!(reg.contains(StrategyKind::Custom("a")));
        assert!(!reg.contains(StrategyKind::HillClimbing));
        assert_eq!(reg.kinds().len(), 2);
        assert_eq!(reg.build_all().len(), 2);
    }
}
