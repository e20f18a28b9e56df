//! # Alteration
//!
//! Alterers recombine or mutate the offspring population in place. An
//! altered individual is never modified: it is replaced by a new phenotype,
//! born in the current generation, that shares the fitness function of the
//! individual it replaces.

pub mod alterer;
pub mod composite;
pub mod crossover;
pub mod mutator;

pub use alterer::Alterer;
pub use composite::CompositeAlterer;
pub use crossover::SinglePointCrossover;
pub use mutator::Mutator;
