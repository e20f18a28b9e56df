use std::fmt::Debug;

use crate::error::Result;
use crate::genetics::Gene;
use crate::optimize::{Fitness, Optimize};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

/// Trait for selection strategies.
///
/// The engine uses one selector to pick the parents of the offspring and one
/// to pick the survivors. Both run concurrently on the same input population.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use evostream::genetics::{Chromosome, DoubleGene, Genotype};
/// use evostream::optimize::Optimize;
/// use evostream::phenotype::{identity_scaler, FitnessFunction, Phenotype};
/// use evostream::population::Population;
/// use evostream::rng::RandomNumberGenerator;
/// use evostream::selection::{Selector, TournamentSelector};
///
/// let function: FitnessFunction<DoubleGene, f64> =
///     Arc::new(|gt: &Genotype<DoubleGene>| gt.gene().value());
///
/// let population: Population<DoubleGene, f64> = [1.0, 5.0, 3.0]
///     .iter()
///     .map(|v| {
///         let gene = DoubleGene::new(*v, 0.0, 10.0).unwrap();
///         let genotype = Genotype::of(vec![Chromosome::of(vec![gene]).unwrap()]).unwrap();
///         Arc::new(Phenotype::new(genotype, function.clone(), identity_scaler(), 1))
///     })
///     .collect();
///
/// let mut rng = RandomNumberGenerator::from_seed(42);
/// let selector = TournamentSelector::new(3).unwrap();
/// let selected = selector
///     .select(&population, 4, Optimize::Maximum, &mut rng)
///     .unwrap();
///
/// assert_eq!(selected.len(), 4);
/// assert_eq!(population.len(), 3);
/// ```
pub trait Selector<G, C>: Debug + Send + Sync
where
    G: Gene,
    C: Fitness,
{
    /// Selects `count` individuals from `population`.
    ///
    /// Implementations must return a new population of exactly `count`
    /// individuals and must not modify `population`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPopulation` if `population` is empty and `count > 0`.
    fn select(
        &self,
        population: &Population<G, C>,
        count: usize,
        optimize: Optimize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<G, C>>;
}
