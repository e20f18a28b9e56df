use std::fmt::Debug;

use crate::error::Result;
use crate::genetics::Gene;
use crate::optimize::Fitness;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

/// Trait for operators that change the offspring population.
///
/// Implementations must keep the population size unchanged.
pub trait Alterer<G, C>: Debug + Send + Sync
where
    G: Gene,
    C: Fitness,
{
    /// Alters `population` in place and returns the number of individuals
    /// that were replaced.
    ///
    /// Replacement phenotypes are born in `generation`.
    fn alter(
        &self,
        population: &mut Population<G, C>,
        generation: u64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<usize>;
}
