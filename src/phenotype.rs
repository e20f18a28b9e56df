//! # Phenotype
//!
//! A `Phenotype` is one individual of a population: a [`Genotype`], the
//! generation it was born in, and its fitness.
//!
//! The fitness is computed lazily as `scaler(function(genotype))` the first
//! time it is requested and memoized afterwards, so a phenotype never calls
//! its fitness function more than once. Phenotypes are never changed after
//! creation; altering an individual means replacing it with a new phenotype.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use evostream::genetics::{Chromosome, DoubleGene, Genotype};
//! use evostream::phenotype::{FitnessFunction, FitnessScaler, Phenotype};
//!
//! let gene = DoubleGene::new(3.0, 0.0, 10.0).unwrap();
//! let genotype = Genotype::of(vec![Chromosome::of(vec![gene]).unwrap()]).unwrap();
//!
//! let function: FitnessFunction<DoubleGene, f64> =
//!     Arc::new(|gt: &Genotype<DoubleGene>| gt.gene().value());
//! let scaler: FitnessScaler<f64> = Arc::new(|f: f64| f * 2.0);
//!
//! let phenotype = Phenotype::new(genotype, function, scaler, 1);
//! assert!(!phenotype.is_evaluated());
//! assert_eq!(*phenotype.fitness(), 6.0);
//! assert_eq!(*phenotype.raw_fitness(), 3.0);
//! assert_eq!(phenotype.age(4), 3);
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::genetics::{Gene, Genotype};
use crate::optimize::Fitness;

/// The fitness function shared by all phenotypes of an engine.
pub type FitnessFunction<G, C> = Arc<dyn Fn(&Genotype<G>) -> C + Send + Sync>;

/// Post-processing applied to the raw fitness value.
pub type FitnessScaler<C> = Arc<dyn Fn(C) -> C + Send + Sync>;

/// Returns the scaler that leaves the fitness unchanged.
pub fn identity_scaler<C: Fitness>() -> FitnessScaler<C> {
    Arc::new(|fitness| fitness)
}

/// An individual: genotype, birth generation and lazily evaluated fitness.
pub struct Phenotype<G: Gene, C: Fitness> {
    genotype: Genotype<G>,
    generation: u64,
    function: FitnessFunction<G, C>,
    scaler: FitnessScaler<C>,
    raw_fitness: OnceLock<C>,
    fitness: OnceLock<C>,
}

impl<G: Gene, C: Fitness> Phenotype<G, C> {
    /// Creates a phenotype born in `generation`. The fitness is not evaluated.
    pub fn new(
        genotype: Genotype<G>,
        function: FitnessFunction<G, C>,
        scaler: FitnessScaler<C>,
        generation: u64,
    ) -> Self {
        Self {
            genotype,
            generation,
            function,
            scaler,
            raw_fitness: OnceLock::new(),
            fitness: OnceLock::new(),
        }
    }

    /// Creates a phenotype for another genotype, sharing this phenotype's
    /// fitness function and scaler.
    pub fn new_instance(&self, genotype: Genotype<G>, generation: u64) -> Self {
        Self::new(
            genotype,
            Arc::clone(&self.function),
            Arc::clone(&self.scaler),
            generation,
        )
    }

    pub fn genotype(&self) -> &Genotype<G> {
        &self.genotype
    }

    /// The generation this phenotype was born in.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `current_generation - generation`, or zero for a phenotype
    /// from the future.
    pub fn age(&self, current_generation: u64) -> u64 {
        current_generation.saturating_sub(self.generation)
    }

    /// Returns the unscaled fitness, evaluating it on first use.
    pub fn raw_fitness(&self) -> &C {
        self.raw_fitness.get_or_init(|| (self.function)(&self.genotype))
    }

    /// Returns the scaled fitness, evaluating it on first use.
    pub fn fitness(&self) -> &C {
        self.fitness
            .get_or_init(|| (self.scaler)(self.raw_fitness().clone()))
    }

    /// Forces the fitness evaluation.
    pub fn evaluate(&self) -> &Self {
        self.fitness();
        self
    }

    /// Returns `true` if the fitness has already been computed.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.get().is_some()
    }

    /// Delegates to the genotype's validity.
    pub fn is_valid(&self) -> bool {
        self.genotype.is_valid()
    }
}

impl<G: Gene, C: Fitness> fmt::Debug for Phenotype<G, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Phenotype")
            .field("genotype", &self.genotype)
            .field("generation", &self.generation)
            .field("fitness", &self.fitness.get())
            .finish()
    }
}
