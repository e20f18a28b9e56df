//! # Genetics
//!
//! The encoded representation of candidate solutions: genes, chromosomes
//! (fixed-length gene sequences) and genotypes (fixed-length chromosome
//! sequences). Validity is decided by the genes.
pub mod chromosome;
pub mod gene;
pub mod genotype;

pub use chromosome::Chromosome;
pub use gene::{BitGene, DoubleGene, Gene, NumericGene};
pub use genotype::{factory_of, Genotype, GenotypeFactory};
