use std::sync::Arc;

use crate::error::{GeneticError, Result};
use crate::genetics::Gene;
use crate::optimize::{Fitness, Optimize};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::selector::Selector;
use crate::seq::Seq;

/// A selector that picks the best individuals of the population.
///
/// The population is ranked best first and the top `count` individuals are
/// taken. If `count` exceeds the population size, the ranking is repeated
/// from the top until `count` individuals are selected.
///
/// Elite selection is deterministic; the random number generator is unused.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EliteSelector;

impl EliteSelector {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Gene, C: Fitness> Selector<G, C> for EliteSelector {
    fn select(
        &self,
        population: &Population<G, C>,
        count: usize,
        optimize: Optimize,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Population<G, C>> {
        if count == 0 {
            return Ok(Population::new());
        }
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut ranked = population.copy();
        ranked.sort_best_first(optimize);

        Ok(ranked.iter().cycle().take(count).map(Arc::clone).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fitness_values, population_of};

    #[test]
    fn test_selects_best_maximum() {
        let population = population_of(&[0.5, 0.8, 0.3, 0.9, 0.1]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let selected = EliteSelector
            .select(&population, 3, Optimize::Maximum, &mut rng)
            .unwrap();
        assert_eq!(fitness_values(&selected), vec![0.9, 0.8, 0.5]);
    }

    #[test]
    fn test_selects_best_minimum() {
        let population = population_of(&[0.5, 0.8, 0.3, 0.9, 0.1]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let selected = EliteSelector
            .select(&population, 2, Optimize::Minimum, &mut rng)
            .unwrap();
        assert_eq!(fitness_values(&selected), vec![0.1, 0.3]);
    }

    #[test]
    fn test_cycles_when_count_exceeds_size() {
        let population = population_of(&[2.0, 1.0]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let selected = EliteSelector
            .select(&population, 5, Optimize::Maximum, &mut rng)
            .unwrap();
        assert_eq!(fitness_values(&selected), vec![2.0, 1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_input_population_untouched() {
        let population = population_of(&[1.0, 3.0, 2.0]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        EliteSelector
            .select(&population, 3, Optimize::Maximum, &mut rng)
            .unwrap();
        assert_eq!(fitness_values(&population), vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_empty_population() {
        let population = population_of(&[]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let result = EliteSelector.select(&population, 1, Optimize::Maximum, &mut rng);
        assert_eq!(result.unwrap_err(), GeneticError::EmptyPopulation);
    }
}
