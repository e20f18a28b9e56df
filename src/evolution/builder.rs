use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::alteration::{Alterer, CompositeAlterer, Mutator, SinglePointCrossover};
use crate::error::Result;
use crate::genetics::{Gene, GenotypeFactory};
use crate::optimize::{Fitness, Optimize};
use crate::phenotype::{identity_scaler, FitnessFunction, FitnessScaler};
use crate::rng::RandomNumberGenerator;
use crate::selection::{Selector, TournamentSelector};
use crate::timing::{Clock, SystemClock};

use super::engine::Engine;
use super::executor::Executor;
use super::options::{EvolutionParams, EvolutionParamsBuilder};

/// Fluent configuration of an [`Engine`].
///
/// Unset collaborators take their defaults:
/// - both selectors are a [`TournamentSelector`] of size 3
/// - the alterer is a [`SinglePointCrossover`] with probability 0.2 followed
///   by a [`Mutator`] with probability 0.15
/// - the parameters are [`EvolutionParams::default`]
/// - the executor is rayon's global pool and the clock is the system clock
/// - the random number generator is seeded from system entropy
pub struct EngineBuilder<G: Gene, C: Fitness> {
    function: FitnessFunction<G, C>,
    factory: GenotypeFactory<G>,
    scaler: FitnessScaler<C>,
    offspring_selector: Option<Arc<dyn Selector<G, C>>>,
    survivors_selector: Option<Arc<dyn Selector<G, C>>>,
    alterer: Option<Arc<dyn Alterer<G, C>>>,
    params: EvolutionParamsBuilder,
    executor: Executor,
    clock: Arc<dyn Clock>,
    rng: Option<RandomNumberGenerator>,
}

impl<G: Gene, C: Fitness> EngineBuilder<G, C> {
    pub fn new(function: FitnessFunction<G, C>, factory: GenotypeFactory<G>) -> Self {
        Self {
            function,
            factory,
            scaler: identity_scaler(),
            offspring_selector: None,
            survivors_selector: None,
            alterer: None,
            params: EvolutionParams::builder(),
            executor: Executor::default(),
            clock: Arc::new(SystemClock),
            rng: None,
        }
    }

    /// Sets the post-processing applied to every raw fitness value.
    pub fn fitness_scaler<F>(mut self, scaler: F) -> Self
    where
        F: Fn(C) -> C + Send + Sync + 'static,
    {
        self.scaler = Arc::new(scaler);
        self
    }

    /// Uses `selector` for both offspring and survivors.
    pub fn selector<S>(mut self, selector: S) -> Self
    where
        S: Selector<G, C> + 'static,
    {
        let selector: Arc<dyn Selector<G, C>> = Arc::new(selector);
        self.offspring_selector = Some(Arc::clone(&selector));
        self.survivors_selector = Some(selector);
        self
    }

    pub fn offspring_selector<S>(mut self, selector: S) -> Self
    where
        S: Selector<G, C> + 'static,
    {
        self.offspring_selector = Some(Arc::new(selector));
        self
    }

    pub fn survivors_selector<S>(mut self, selector: S) -> Self
    where
        S: Selector<G, C> + 'static,
    {
        self.survivors_selector = Some(Arc::new(selector));
        self
    }

    /// Sets the alterer applied to the offspring.
    pub fn alterer<A>(mut self, alterer: A) -> Self
    where
        A: Alterer<G, C> + 'static,
    {
        self.alterer = Some(Arc::new(alterer));
        self
    }

    /// Applies the given alterers one after another.
    pub fn alterers(mut self, alterers: Vec<Arc<dyn Alterer<G, C>>>) -> Self {
        self.alterer = Some(Arc::new(CompositeAlterer::of(alterers)));
        self
    }

    pub fn optimize(mut self, optimize: Optimize) -> Self {
        self.params = self.params.optimize(optimize);
        self
    }

    pub fn minimizing(self) -> Self {
        self.optimize(Optimize::Minimum)
    }

    pub fn maximizing(self) -> Self {
        self.optimize(Optimize::Maximum)
    }

    pub fn population_size(mut self, size: usize) -> Self {
        self.params = self.params.population_size(size);
        self
    }

    pub fn offspring_fraction(mut self, fraction: f64) -> Self {
        self.params = self.params.offspring_fraction(fraction);
        self
    }

    pub fn maximal_phenotype_age(mut self, age: u64) -> Self {
        self.params = self.params.maximal_phenotype_age(age);
        self
    }

    /// Replaces all numeric parameters at once.
    pub fn params(mut self, params: EvolutionParams) -> Self {
        self.params = EvolutionParams::builder()
            .population_size(params.population_size())
            .offspring_fraction(params.offspring_fraction())
            .maximal_phenotype_age(params.maximal_phenotype_age())
            .optimize(params.optimize());
        self
    }

    pub fn executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seeds the engine's random number generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Some(RandomNumberGenerator::from_seed(seed));
        self
    }

    pub fn random(mut self, rng: RandomNumberGenerator) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error naming the offending parameter if the
    /// parameters are invalid.
    pub fn build(self) -> Result<Engine<G, C>> {
        let params = self.params.build().inspect_err(|e| {
            warn!(error = %e, "rejected engine configuration");
        })?;

        let offspring_selector = self
            .offspring_selector
            .unwrap_or_else(|| Arc::new(TournamentSelector::default()));
        let survivors_selector = self
            .survivors_selector
            .unwrap_or_else(|| Arc::new(TournamentSelector::default()));
        let alterer = self.alterer.unwrap_or_else(|| {
            Arc::new(
                CompositeAlterer::<G, C>::new()
                    .with(SinglePointCrossover::default())
                    .with(Mutator::default()),
            )
        });

        Ok(Engine {
            function: self.function,
            scaler: self.scaler,
            factory: self.factory,
            offspring_selector,
            survivors_selector,
            alterer,
            params,
            executor: self.executor,
            clock: self.clock,
            rng: Mutex::new(self.rng.unwrap_or_default()),
        })
    }
}
