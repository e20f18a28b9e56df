//! # Evolution results
//!
//! [`EvolutionStart`] is the input of one generation step, [`EvolutionResult`]
//! its immutable output, and [`EvolutionDurations`] the timing of the
//! pipeline phases that produced it.

use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::genetics::{Gene, Genotype};
use crate::optimize::{Fitness, Optimize};
use crate::phenotype::Phenotype;
use crate::population::Population;
use crate::seq::{ISeq, Seq};

/// The population and generation a generation step starts from.
#[derive(Debug, Clone)]
pub struct EvolutionStart<G: Gene, C: Fitness> {
    population: Population<G, C>,
    generation: u64,
}

impl<G: Gene, C: Fitness> EvolutionStart<G, C> {
    pub fn new(population: Population<G, C>, generation: u64) -> Self {
        Self {
            population,
            generation,
        }
    }

    pub fn population(&self) -> &Population<G, C> {
        &self.population
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Elapsed times of the phases of one generation step.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EvolutionDurations {
    pub offspring_selection: Duration,
    pub survivors_selection: Duration,
    pub offspring_alter: Duration,
    pub offspring_filter: Duration,
    pub survivor_filter: Duration,
    pub evaluation: Duration,
    pub evolve: Duration,
}

impl EvolutionDurations {
    pub const ZERO: Self = Self {
        offspring_selection: Duration::ZERO,
        survivors_selection: Duration::ZERO,
        offspring_alter: Duration::ZERO,
        offspring_filter: Duration::ZERO,
        survivor_filter: Duration::ZERO,
        evaluation: Duration::ZERO,
        evolve: Duration::ZERO,
    };

    /// Orders two durations by their total `evolve` time, ignoring the
    /// individual phases.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.evolve.cmp(&other.evolve)
    }
}

/// The immutable outcome of one generation step.
///
/// The best and worst phenotypes are computed on first access and memoized.
#[derive(Debug, Clone)]
pub struct EvolutionResult<G: Gene, C: Fitness> {
    optimize: Optimize,
    population: ISeq<Arc<Phenotype<G, C>>>,
    generation: u64,
    total_generations: u64,
    durations: EvolutionDurations,
    kill_count: usize,
    invalid_count: usize,
    alter_count: usize,
    best: OnceLock<Option<Arc<Phenotype<G, C>>>>,
    worst: OnceLock<Option<Arc<Phenotype<G, C>>>>,
}

impl<G: Gene, C: Fitness> EvolutionResult<G, C> {
    /// Creates a result. The total generation count starts at 1.
    pub fn new(
        optimize: Optimize,
        population: Population<G, C>,
        generation: u64,
        durations: EvolutionDurations,
        kill_count: usize,
        invalid_count: usize,
        alter_count: usize,
    ) -> Self {
        Self {
            optimize,
            population: population.seal(),
            generation,
            total_generations: 1,
            durations,
            kill_count,
            invalid_count,
            alter_count,
            best: OnceLock::new(),
            worst: OnceLock::new(),
        }
    }

    /// Returns the same result with a different total generation count.
    pub fn with_total_generations(mut self, total_generations: u64) -> Self {
        self.total_generations = total_generations;
        self
    }

    pub fn optimize(&self) -> Optimize {
        self.optimize
    }

    /// Returns a copy of the population; the result itself is not changed
    /// by modifying it.
    pub fn population(&self) -> Population<G, C> {
        Population::from(&self.population)
    }

    /// The sealed individuals of this result.
    pub fn individuals(&self) -> &ISeq<Arc<Phenotype<G, C>>> {
        &self.population
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The number of generations evolved by the producing stream so far.
    pub fn total_generations(&self) -> u64 {
        self.total_generations
    }

    pub fn durations(&self) -> &EvolutionDurations {
        &self.durations
    }

    /// Individuals replaced because they exceeded the maximal age.
    pub fn kill_count(&self) -> usize {
        self.kill_count
    }

    /// Individuals replaced because they were invalid.
    pub fn invalid_count(&self) -> usize {
        self.invalid_count
    }

    pub fn alter_count(&self) -> usize {
        self.alter_count
    }

    pub fn best_phenotype(&self) -> Option<&Arc<Phenotype<G, C>>> {
        self.best
            .get_or_init(|| self.extreme(|a, b| self.optimize.is_better(a, b)))
            .as_ref()
    }

    pub fn worst_phenotype(&self) -> Option<&Arc<Phenotype<G, C>>> {
        self.worst
            .get_or_init(|| self.extreme(|a, b| self.optimize.is_better(b, a)))
            .as_ref()
    }

    pub fn best_fitness(&self) -> Option<&C> {
        self.best_phenotype().map(|p| p.fitness())
    }

    pub fn worst_fitness(&self) -> Option<&C> {
        self.worst_phenotype().map(|p| p.fitness())
    }

    pub fn best_genotype(&self) -> Option<&Genotype<G>> {
        self.best_phenotype().map(|p| p.genotype())
    }

    /// The start of the following generation step.
    pub fn next_start(&self) -> EvolutionStart<G, C> {
        EvolutionStart::new(self.population(), self.generation + 1)
    }

    /// Compares two results by their best phenotype, `Greater` meaning
    /// `self` is the better one. A result without individuals is the worst.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self.best_fitness(), other.best_fitness()) {
            (Some(a), Some(b)) => self.optimize.compare(a, b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }

    fn extreme<F>(&self, prefer: F) -> Option<Arc<Phenotype<G, C>>>
    where
        F: Fn(&C, &C) -> bool,
    {
        self.population
            .iter()
            .reduce(|kept, candidate| {
                if prefer(candidate.fitness(), kept.fitness()) {
                    candidate
                } else {
                    kept
                }
            })
            .cloned()
    }
}
