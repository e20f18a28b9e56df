use std::sync::Arc;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::seq::{ISeq, Seq};

use super::{chromosome::Chromosome, gene::Gene};

/// Creates new random genotypes for initial populations and replacements.
pub type GenotypeFactory<G> = Arc<dyn Fn(&mut RandomNumberGenerator) -> Genotype<G> + Send + Sync>;

/// A non-empty, immutable sequence of chromosomes.
#[derive(Debug, Clone, PartialEq)]
pub struct Genotype<G: Gene> {
    chromosomes: ISeq<Chromosome<G>>,
}

impl<G: Gene> Genotype<G> {
    /// Creates a genotype from the given chromosomes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `chromosomes` is empty.
    pub fn new(chromosomes: ISeq<Chromosome<G>>) -> Result<Self> {
        if chromosomes.is_empty() {
            return Err(GeneticError::Configuration(
                "Genotype must contain at least one chromosome".to_string(),
            ));
        }
        Ok(Self { chromosomes })
    }

    /// Creates a genotype from a vector of chromosomes.
    pub fn of(chromosomes: Vec<Chromosome<G>>) -> Result<Self> {
        Self::new(ISeq::from_vec(chromosomes))
    }

    pub fn chromosomes(&self) -> &ISeq<Chromosome<G>> {
        &self.chromosomes
    }

    /// Returns the first chromosome.
    pub fn chromosome(&self) -> &Chromosome<G> {
        &self.chromosomes.as_slice()[0]
    }

    /// Returns the first gene of the first chromosome.
    pub fn gene(&self) -> &G {
        self.chromosome().gene()
    }

    /// Returns the total number of genes over all chromosomes.
    pub fn gene_count(&self) -> usize {
        self.chromosomes.iter().map(|c| c.length()).sum()
    }

    /// Returns `true` if every chromosome is valid.
    pub fn is_valid(&self) -> bool {
        self.chromosomes.for_all(|chromosome| chromosome.is_valid())
    }

    /// Creates a randomised genotype with the same shape.
    pub fn new_instance(&self, rng: &mut RandomNumberGenerator) -> Self {
        Self {
            chromosomes: self.chromosomes.map(|c| c.new_instance(rng)),
        }
    }

    /// Returns a genotype with the chromosome at `index` replaced.
    pub fn with_chromosome(&self, index: usize, chromosome: Chromosome<G>) -> Result<Self> {
        let mut chromosomes = self.chromosomes.copy();
        chromosomes.set(index, chromosome)?;
        Ok(Self {
            chromosomes: chromosomes.seal(),
        })
    }
}

impl<G: Gene> Seq<Chromosome<G>> for Genotype<G> {
    fn as_slice(&self) -> &[Chromosome<G>] {
        self.chromosomes.as_slice()
    }
}

/// Uses `template` as a genotype factory: every call creates a new random
/// genotype of the same shape.
pub fn factory_of<G: Gene>(template: Genotype<G>) -> GenotypeFactory<G> {
    Arc::new(move |rng: &mut RandomNumberGenerator| template.new_instance(rng))
}
