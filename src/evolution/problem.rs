//! # Codec and Problem
//!
//! A [`Codec`] maps between a problem's domain type `T` and the genotypes
//! the engine evolves. A [`Problem`] pairs a codec with a fitness function
//! on the domain type, so an engine can be built without writing the
//! genotype-level fitness function by hand.
//!
//! ```rust
//! use evostream::evolution::problem::{codec_of, problem_of};
//! use evostream::evolution::{limits, Engine, Executor};
//! use evostream::genetics::{factory_of, Chromosome, DoubleGene, Genotype};
//!
//! let template = Genotype::of(vec![
//!     Chromosome::of(vec![DoubleGene::new(0.0, -5.0, 5.0).unwrap()]).unwrap(),
//! ])
//! .unwrap();
//! let codec = codec_of(factory_of(template), |gt: &Genotype<DoubleGene>| gt.gene().value());
//! let problem = problem_of(|x: f64| -(x * x), codec.clone());
//!
//! let engine = Engine::builder_for_problem(problem)
//!     .population_size(20)
//!     .executor(Executor::sequential())
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let x = engine
//!     .stream()
//!     .limit(limits::by_fixed_generation(20))
//!     .best_value(&codec)
//!     .unwrap()
//!     .unwrap();
//! assert!((-5.0..=5.0).contains(&x));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::genetics::{Gene, Genotype, GenotypeFactory};
use crate::optimize::Fitness;

use super::builder::EngineBuilder;
use super::engine::Engine;

/// Mapping between a domain type and genotypes.
pub trait Codec<T, G: Gene>: Send + Sync {
    /// The factory creating random genotypes of the encoded shape.
    fn encoding(&self) -> GenotypeFactory<G>;

    /// Converts a genotype back into a domain value.
    fn decode(&self, genotype: &Genotype<G>) -> T;
}

/// A fitness function on a domain type together with its codec.
pub trait Problem<T, G: Gene, C: Fitness>: Send + Sync {
    type Codec: Codec<T, G>;

    fn fitness(&self, value: T) -> C;

    fn codec(&self) -> &Self::Codec;
}

/// A codec assembled from a genotype factory and a decoder function.
pub struct FnCodec<T, G: Gene> {
    encoding: GenotypeFactory<G>,
    decoder: Arc<dyn Fn(&Genotype<G>) -> T + Send + Sync>,
}

pub fn codec_of<T, G, D>(encoding: GenotypeFactory<G>, decoder: D) -> FnCodec<T, G>
where
    G: Gene,
    D: Fn(&Genotype<G>) -> T + Send + Sync + 'static,
{
    FnCodec {
        encoding,
        decoder: Arc::new(decoder),
    }
}

impl<T, G: Gene> Codec<T, G> for FnCodec<T, G> {
    fn encoding(&self) -> GenotypeFactory<G> {
        Arc::clone(&self.encoding)
    }

    fn decode(&self, genotype: &Genotype<G>) -> T {
        (self.decoder)(genotype)
    }
}

impl<T, G: Gene> Clone for FnCodec<T, G> {
    fn clone(&self) -> Self {
        Self {
            encoding: Arc::clone(&self.encoding),
            decoder: Arc::clone(&self.decoder),
        }
    }
}

impl<T, G: Gene> fmt::Debug for FnCodec<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCodec").finish_non_exhaustive()
    }
}

/// A problem assembled from a fitness function and a codec.
pub struct FnProblem<T, G, C, F, K> {
    fitness: F,
    codec: K,
    _marker: PhantomData<fn(T) -> (G, C)>,
}

pub fn problem_of<T, G, C, F, K>(fitness: F, codec: K) -> FnProblem<T, G, C, F, K>
where
    G: Gene,
    C: Fitness,
    F: Fn(T) -> C + Send + Sync,
    K: Codec<T, G>,
{
    FnProblem {
        fitness,
        codec,
        _marker: PhantomData,
    }
}

impl<T, G, C, F, K> Problem<T, G, C> for FnProblem<T, G, C, F, K>
where
    G: Gene,
    C: Fitness,
    F: Fn(T) -> C + Send + Sync,
    K: Codec<T, G>,
{
    type Codec = K;

    fn fitness(&self, value: T) -> C {
        (self.fitness)(value)
    }

    fn codec(&self) -> &K {
        &self.codec
    }
}

impl<G: Gene, C: Fitness> Engine<G, C> {
    /// Starts building an engine that evaluates genotypes by decoding them
    /// with the problem's codec and applying the problem's fitness function.
    pub fn builder_for_problem<T, P>(problem: P) -> EngineBuilder<G, C>
    where
        T: 'static,
        P: Problem<T, G, C> + 'static,
    {
        let factory = problem.codec().encoding();
        let problem = Arc::new(problem);
        Engine::builder(
            move |genotype: &Genotype<G>| problem.fitness(problem.codec().decode(genotype)),
            factory,
        )
    }
}
