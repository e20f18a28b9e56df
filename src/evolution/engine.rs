//! # Engine
//!
//! The `Engine` runs the generational pipeline. One call to
//! [`Engine::evolve`] turns an [`EvolutionStart`] into an [`EvolutionResult`]:
//!
//! 1. offspring and survivors are selected concurrently from the start population
//! 2. the offspring are altered, then filtered
//! 3. the survivors are filtered, concurrently with step 2
//! 4. survivors and offspring are combined, survivors first
//! 5. the combined population is evaluated in parallel
//!
//! Unevaluated individuals of the start population, such as a freshly
//! created initial population, are evaluated on the executor before step 1.
//!
//! Filtering replaces every invalid individual, and every individual older
//! than the maximal phenotype age, with a new random individual born in the
//! current generation.
//!
//! Each phase gets its own random number generator, forked from the
//! engine's generator in a fixed order at the start of `evolve`, so a seeded
//! engine produces the same populations on any executor.
//!
//! ## Example
//!
//! ```rust
//! use evostream::evolution::{limits, Engine, Executor};
//! use evostream::genetics::{Chromosome, DoubleGene, Genotype};
//! use evostream::seq::Seq;
//!
//! let template = Genotype::of(vec![
//!     Chromosome::of(vec![DoubleGene::new(0.0, 0.0, 10.0).unwrap(); 2]).unwrap(),
//! ])
//! .unwrap();
//!
//! let engine = Engine::builder_from_template(
//!     |gt: &Genotype<DoubleGene>| gt.chromosome().genes().iter().map(|g| g.value()).sum::<f64>(),
//!     template,
//! )
//! .population_size(20)
//! .executor(Executor::sequential())
//! .seed(42)
//! .build()
//! .unwrap();
//!
//! let best = engine
//!     .stream()
//!     .limit(limits::by_fixed_generation(10))
//!     .best_phenotype()
//!     .unwrap()
//!     .unwrap();
//!
//! assert!(*best.fitness() > 0.0);
//! ```

use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::alteration::Alterer;
use crate::error::{GeneticError, Result};
use crate::genetics::{Gene, Genotype, GenotypeFactory};
use crate::optimize::{Fitness, Optimize};
use crate::phenotype::{FitnessFunction, FitnessScaler, Phenotype};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::Selector;
use crate::seq::Seq;
use crate::timing::{Clock, TimedResult, Timer};

use super::builder::EngineBuilder;
use super::executor::{catch_panic, Executor};
use super::options::EvolutionParams;
use super::result::{EvolutionDurations, EvolutionResult, EvolutionStart};
use super::stream::EvolutionStream;

/// Counts of the individuals replaced by one filter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FilterCounts {
    killed: usize,
    invalid: usize,
}

/// The generators of the random phases of one `evolve` call.
struct PhaseRngs {
    offspring_selection: RandomNumberGenerator,
    survivors_selection: RandomNumberGenerator,
    alter: RandomNumberGenerator,
    offspring_filter: RandomNumberGenerator,
    survivor_filter: RandomNumberGenerator,
}

struct OffspringBranch<G: Gene, C: Fitness> {
    population: Population<G, C>,
    selection: std::time::Duration,
    alter: std::time::Duration,
    filter: std::time::Duration,
    alter_count: usize,
    counts: FilterCounts,
}

struct SurvivorBranch<G: Gene, C: Fitness> {
    population: Population<G, C>,
    selection: std::time::Duration,
    filter: std::time::Duration,
    counts: FilterCounts,
}

/// A configured generational evolution engine.
///
/// Engines are created with [`Engine::builder`] and are immutable apart from
/// their random number generator.
pub struct Engine<G: Gene, C: Fitness> {
    pub(super) function: FitnessFunction<G, C>,
    pub(super) scaler: FitnessScaler<C>,
    pub(super) factory: GenotypeFactory<G>,
    pub(super) offspring_selector: Arc<dyn Selector<G, C>>,
    pub(super) survivors_selector: Arc<dyn Selector<G, C>>,
    pub(super) alterer: Arc<dyn Alterer<G, C>>,
    pub(super) params: EvolutionParams,
    pub(super) executor: Executor,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) rng: Mutex<RandomNumberGenerator>,
}

impl<G: Gene, C: Fitness> Engine<G, C> {
    /// Starts building an engine for `function` whose genotypes are created
    /// by `factory`.
    pub fn builder<F>(function: F, factory: GenotypeFactory<G>) -> EngineBuilder<G, C>
    where
        F: Fn(&Genotype<G>) -> C + Send + Sync + 'static,
    {
        EngineBuilder::new(Arc::new(function), factory)
    }

    /// Starts building an engine whose genotypes have the shape of
    /// `template`.
    pub fn builder_from_template<F>(function: F, template: Genotype<G>) -> EngineBuilder<G, C>
    where
        F: Fn(&Genotype<G>) -> C + Send + Sync + 'static,
    {
        EngineBuilder::new(Arc::new(function), crate::genetics::factory_of(template))
    }

    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    pub fn optimize(&self) -> Optimize {
        self.params.optimize()
    }

    pub fn population_size(&self) -> usize {
        self.params.population_size()
    }

    pub fn offspring_count(&self) -> usize {
        self.params.offspring_count()
    }

    pub fn survivors_count(&self) -> usize {
        self.params.survivors_count()
    }

    pub fn maximal_phenotype_age(&self) -> u64 {
        self.params.maximal_phenotype_age()
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn genotype_factory(&self) -> &GenotypeFactory<G> {
        &self.factory
    }

    /// Performs one generation step.
    ///
    /// Individuals of the start population without a fitness value are
    /// evaluated on the executor first.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a selector, the alterer or the
    /// fitness evaluation; a panic in one of these phases is returned as the
    /// phase's error. No partial result is produced.
    pub fn evolve(&self, start: &EvolutionStart<G, C>) -> Result<EvolutionResult<G, C>> {
        let clock = self.clock.as_ref();
        let mut timer = Timer::started(clock);
        let generation = start.generation();
        let optimize = self.optimize();
        let PhaseRngs {
            offspring_selection: mut offspring_selection_rng,
            survivors_selection: mut survivors_selection_rng,
            alter: mut alter_rng,
            offspring_filter: mut offspring_filter_rng,
            survivor_filter: mut survivor_filter_rng,
        } = self.phase_rngs()?;

        let start_evaluation =
            TimedResult::of(clock, || self.executor.evaluate(start.population())).transpose()?;

        let (offspring, survivors) = self.executor.join(
            || -> Result<OffspringBranch<G, C>> {
                let selected = TimedResult::of(clock, || {
                    catch_panic(
                        || {
                            self.offspring_selector.select(
                                start.population(),
                                self.offspring_count(),
                                optimize,
                                &mut offspring_selection_rng,
                            )
                        },
                        |message| {
                            GeneticError::Selection(format!("Offspring selector panicked: {message}"))
                        },
                    )
                })
                .transpose()?;
                trace!(generation, duration = ?selected.duration, "offspring selected");

                let mut population = selected.result;
                let altered = TimedResult::of(clock, || {
                    catch_panic(
                        || self.alterer.alter(&mut population, generation, &mut alter_rng),
                        |message| GeneticError::Alteration(format!("Alterer panicked: {message}")),
                    )
                })
                .transpose()?;
                trace!(generation, altered = altered.result, duration = ?altered.duration, "offspring altered");

                let filtered = TimedResult::of(clock, || {
                    self.filter(&mut population, generation, &mut offspring_filter_rng)
                })
                .transpose()?;
                trace!(generation, duration = ?filtered.duration, "offspring filtered");

                Ok(OffspringBranch {
                    population,
                    selection: selected.duration,
                    alter: altered.duration,
                    filter: filtered.duration,
                    alter_count: altered.result,
                    counts: filtered.result,
                })
            },
            || -> Result<SurvivorBranch<G, C>> {
                let selected = TimedResult::of(clock, || {
                    catch_panic(
                        || {
                            self.survivors_selector.select(
                                start.population(),
                                self.survivors_count(),
                                optimize,
                                &mut survivors_selection_rng,
                            )
                        },
                        |message| {
                            GeneticError::Selection(format!("Survivors selector panicked: {message}"))
                        },
                    )
                })
                .transpose()?;
                trace!(generation, duration = ?selected.duration, "survivors selected");

                let mut population = selected.result;
                let filtered = TimedResult::of(clock, || {
                    self.filter(&mut population, generation, &mut survivor_filter_rng)
                })
                .transpose()?;
                trace!(generation, duration = ?filtered.duration, "survivors filtered");

                Ok(SurvivorBranch {
                    population,
                    selection: selected.duration,
                    filter: filtered.duration,
                    counts: filtered.result,
                })
            },
        );
        let offspring = offspring?;
        let survivors = survivors?;

        let mut population = survivors.population;
        population.add_all(offspring.population);

        let evaluation = TimedResult::of(clock, || self.executor.evaluate(&population)).transpose()?;
        trace!(generation, duration = ?evaluation.duration, "population evaluated");

        let durations = EvolutionDurations {
            offspring_selection: offspring.selection,
            survivors_selection: survivors.selection,
            offspring_alter: offspring.alter,
            offspring_filter: offspring.filter,
            survivor_filter: survivors.filter,
            evaluation: start_evaluation.duration + evaluation.duration,
            evolve: timer.stop(clock),
        };
        let kill_count = offspring.counts.killed + survivors.counts.killed;
        let invalid_count = offspring.counts.invalid + survivors.counts.invalid;

        debug!(
            generation,
            population = population.len(),
            kill_count,
            invalid_count,
            alter_count = offspring.alter_count,
            duration = ?durations.evolve,
            "generation evolved"
        );

        Ok(EvolutionResult::new(
            optimize,
            population,
            generation,
            durations,
            kill_count,
            invalid_count,
            offspring.alter_count,
        ))
    }

    /// Returns an unlimited stream starting from a random population in
    /// generation 1.
    pub fn stream(&self) -> EvolutionStream<'_, G, C> {
        self.stream_from_genotypes(Vec::new())
    }

    /// Returns an unlimited stream whose initial population starts with the
    /// given genotypes.
    ///
    /// Genotypes beyond the population size are ignored; a shortfall is
    /// filled with random individuals.
    pub fn stream_from_genotypes<I>(&self, genotypes: I) -> EvolutionStream<'_, G, C>
    where
        I: IntoIterator<Item = Genotype<G>>,
    {
        let genotypes: Vec<Genotype<G>> = genotypes
            .into_iter()
            .take(self.population_size())
            .collect();
        EvolutionStream::new(
            move || {
                let mut population = Population::with_capacity(self.population_size());
                for genotype in genotypes {
                    population.push(Arc::new(self.phenotype_of(genotype, 1)));
                }
                self.fill_population(population, 1)
                    .map(|population| EvolutionStart::new(population, 1))
            },
            move |start| self.evolve(start),
        )
    }

    /// Returns an unlimited stream resuming from `population` at
    /// `generation`, for example the population of an earlier result.
    pub fn stream_from_population(
        &self,
        population: Population<G, C>,
        generation: u64,
    ) -> EvolutionStream<'_, G, C> {
        EvolutionStream::new(
            move || {
                self.fill_population(population, generation)
                    .map(|population| EvolutionStart::new(population, generation))
            },
            move |start| self.evolve(start),
        )
    }

    /// Creates a phenotype for `genotype` sharing this engine's fitness
    /// function and scaler.
    pub fn phenotype_of(&self, genotype: Genotype<G>, generation: u64) -> Phenotype<G, C> {
        Phenotype::new(
            genotype,
            Arc::clone(&self.function),
            Arc::clone(&self.scaler),
            generation,
        )
    }

    fn new_phenotype(&self, generation: u64, rng: &mut RandomNumberGenerator) -> Phenotype<G, C> {
        self.phenotype_of((self.factory)(rng), generation)
    }

    /// Tops `population` up to the population size with new individuals.
    fn fill_population(
        &self,
        mut population: Population<G, C>,
        generation: u64,
    ) -> Result<Population<G, C>> {
        let missing = self.population_size().saturating_sub(population.len());
        if missing > 0 {
            let mut rng = self.lock_rng()?;
            population.fill(missing, || self.new_phenotype(generation, &mut rng));
        }
        Ok(population)
    }

    /// Replaces invalid and over-aged individuals in place.
    fn filter(
        &self,
        population: &mut Population<G, C>,
        generation: u64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<FilterCounts> {
        let mut counts = FilterCounts::default();
        let maximal_age = self.maximal_phenotype_age();

        for index in 0..population.len() {
            let (invalid, too_old) = {
                let individual = population.get(index)?;
                (
                    !individual.is_valid(),
                    individual.age(generation) > maximal_age,
                )
            };

            if invalid {
                counts.invalid += 1;
            } else if too_old {
                counts.killed += 1;
            } else {
                continue;
            }
            population.set(index, Arc::new(self.new_phenotype(generation, rng)))?;
        }
        Ok(counts)
    }

    fn lock_rng(&self) -> Result<std::sync::MutexGuard<'_, RandomNumberGenerator>> {
        self.rng
            .lock()
            .map_err(|_| GeneticError::Other("Random number generator lock poisoned".to_string()))
    }

    fn phase_rngs(&self) -> Result<PhaseRngs> {
        let mut rng = self.lock_rng()?;
        Ok(PhaseRngs {
            offspring_selection: rng.fork(),
            survivors_selection: rng.fork(),
            alter: rng.fork(),
            offspring_filter: rng.fork(),
            survivor_filter: rng.fork(),
        })
    }
}

impl<G: Gene, C: Fitness> std::fmt::Debug for Engine<G, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("offspring_selector", &self.offspring_selector)
            .field("survivors_selector", &self.survivors_selector)
            .field("alterer", &self.alterer)
            .field("params", &self.params)
            .field("executor", &self.executor)
            .field("clock", &self.clock)
            .finish()
    }
}
