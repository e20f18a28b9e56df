use std::sync::Arc;

use crate::error::Result;
use crate::genetics::Gene;
use crate::optimize::Fitness;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

use super::Alterer;

/// Applies a list of alterers one after another.
///
/// The returned count is the sum of the counts of the inner alterers. An
/// empty composite alters nothing.
#[derive(Debug, Clone)]
pub struct CompositeAlterer<G: Gene, C: Fitness> {
    alterers: Vec<Arc<dyn Alterer<G, C>>>,
}

impl<G: Gene, C: Fitness> CompositeAlterer<G, C> {
    pub fn new() -> Self {
        Self {
            alterers: Vec::new(),
        }
    }

    /// Composes the given alterers.
    pub fn of(alterers: Vec<Arc<dyn Alterer<G, C>>>) -> Self {
        Self { alterers }
    }

    /// Appends an alterer.
    pub fn with<A>(mut self, alterer: A) -> Self
    where
        A: Alterer<G, C> + 'static,
    {
        self.alterers.push(Arc::new(alterer));
        self
    }

    pub fn len(&self) -> usize {
        self.alterers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alterers.is_empty()
    }
}

impl<G: Gene, C: Fitness> Default for CompositeAlterer<G, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Gene, C: Fitness> Alterer<G, C> for CompositeAlterer<G, C> {
    fn alter(
        &self,
        population: &mut Population<G, C>,
        generation: u64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<usize> {
        let mut altered = 0;
        for alterer in &self.alterers {
            altered += alterer.alter(population, generation, rng)?;
        }
        Ok(altered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alteration::Mutator;
    use crate::error::GeneticError;
    use crate::genetics::DoubleGene;
    use crate::test_support::population_of;

    #[derive(Debug)]
    struct Counting(usize);

    impl Alterer<DoubleGene, f64> for Counting {
        fn alter(
            &self,
            _population: &mut Population<DoubleGene, f64>,
            _generation: u64,
            _rng: &mut RandomNumberGenerator,
        ) -> Result<usize> {
            Ok(self.0)
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl Alterer<DoubleGene, f64> for Failing {
        fn alter(
            &self,
            _population: &mut Population<DoubleGene, f64>,
            _generation: u64,
            _rng: &mut RandomNumberGenerator,
        ) -> Result<usize> {
            Err(GeneticError::Alteration("boom".to_string()))
        }
    }

    #[test]
    fn test_empty_composite_is_identity() {
        let mut population = population_of(&[1.0, 2.0]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let composite = CompositeAlterer::<DoubleGene, f64>::new();
        assert!(composite.is_empty());
        assert_eq!(composite.alter(&mut population, 1, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_counts_are_summed() {
        let mut population = population_of(&[1.0, 2.0]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let composite = CompositeAlterer::new()
            .with(Counting(2))
            .with(Mutator::new(0.0).unwrap())
            .with(Counting(3));
        assert_eq!(composite.len(), 3);
        assert_eq!(composite.alter(&mut population, 1, &mut rng).unwrap(), 5);
    }

    #[test]
    fn test_error_propagates() {
        let mut population = population_of(&[1.0]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let composite = CompositeAlterer::new().with(Counting(1)).with(Failing);
        assert_eq!(
            composite.alter(&mut population, 1, &mut rng).unwrap_err(),
            GeneticError::Alteration("boom".to_string())
        );
    }
}
