use std::sync::Arc;

use crate::error::{GeneticError, Result};
use crate::genetics::Gene;
use crate::optimize::{Fitness, Optimize};
use crate::phenotype::Phenotype;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::selector::Selector;
use crate::seq::Seq;

/// A selector that picks individuals through tournament selection.
///
/// Each pick draws `tournament_size` individuals uniformly at random (with
/// replacement) and keeps the best one. This is repeated until `count`
/// individuals are selected, so the same individual may be selected more than
/// once.
///
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best individuals)
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawTournamentSelector")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelector {
    tournament_size: usize,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTournamentSelector {
    tournament_size: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTournamentSelector> for TournamentSelector {
    type Error = GeneticError;

    fn try_from(raw: RawTournamentSelector) -> Result<Self> {
        Self::new(raw.tournament_size)
    }
}

impl TournamentSelector {
    /// Creates a new `TournamentSelector` with the specified tournament size.
    ///
    /// A tournament size of 1 is equivalent to random selection.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `tournament_size` is zero.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size == 0 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    fn run_tournament<G: Gene, C: Fitness>(
        &self,
        population: &Population<G, C>,
        optimize: Optimize,
        rng: &mut RandomNumberGenerator,
    ) -> Arc<Phenotype<G, C>> {
        let individuals = population.as_slice();
        let mut winner = &individuals[rng.gen_index(individuals.len())];
        for _ in 1..self.tournament_size {
            let challenger = &individuals[rng.gen_index(individuals.len())];
            if optimize.is_better(challenger.fitness(), winner.fitness()) {
                winner = challenger;
            }
        }
        Arc::clone(winner)
    }
}

impl Default for TournamentSelector {
    fn default() -> Self {
        Self { tournament_size: 3 }
    }
}

impl<G: Gene, C: Fitness> Selector<G, C> for TournamentSelector {
    fn select(
        &self,
        population: &Population<G, C>,
        count: usize,
        optimize: Optimize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<G, C>> {
        if count == 0 {
            return Ok(Population::new());
        }
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut selected = Population::with_capacity(count);
        for _ in 0..count {
            selected.push(self.run_tournament(population, optimize, rng));
        }
        Ok(selected)
    }
}
