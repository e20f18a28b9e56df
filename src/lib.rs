//! # evostream
//!
//! A generational evolution engine. An [`Engine`] repeatedly selects,
//! alters, filters and evaluates a population of phenotypes; an
//! [`EvolutionStream`] drives it generation by generation until one of its
//! [limits](evolution::limits) stops it.

pub mod alteration;
pub mod error;
pub mod evolution;
pub mod genetics;
pub mod optimize;
pub mod phenotype;
pub mod population;
pub mod rng;
pub mod selection;
pub mod seq;
pub mod timing;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use alteration::{Alterer, CompositeAlterer, Mutator, SinglePointCrossover};
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{
    limits, Codec, Engine, EngineBuilder, EvolutionDurations, EvolutionParams, EvolutionResult,
    EvolutionStart, EvolutionStream, Executor, Limit, Problem,
};
pub use genetics::{
    BitGene, Chromosome, DoubleGene, Gene, Genotype, GenotypeFactory, NumericGene,
};
pub use optimize::{Fitness, Optimize};
pub use phenotype::Phenotype;
pub use population::Population;
pub use rng::RandomNumberGenerator;
pub use selection::{EliteSelector, RouletteWheelSelector, Selector, TournamentSelector};
pub use seq::{ISeq, MSeq, Seq};
