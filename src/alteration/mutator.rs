use std::sync::Arc;

use crate::error::{require_probability, Result};
use crate::genetics::{Chromosome, Gene, Genotype};
use crate::optimize::Fitness;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::seq::{ISeq, Seq};

use super::Alterer;

/// Replaces each gene, with the given probability, by a new random instance.
///
/// # Examples
///
/// ```
/// use evostream::alteration::Mutator;
///
/// let mutator = Mutator::new(0.15).unwrap();
/// assert_eq!(mutator.probability(), 0.15);
/// assert!(Mutator::new(1.5).is_err());
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawMutator")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mutator {
    probability: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMutator {
    probability: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMutator> for Mutator {
    type Error = crate::error::GeneticError;

    fn try_from(raw: RawMutator) -> Result<Self> {
        Self::new(raw.probability)
    }
}

impl Mutator {
    /// Creates a mutator with the given per-gene probability.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `probability` is not in `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: require_probability("Mutation probability", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Mutates the genes of `chromosome`, returning `None` if no gene changed.
    fn mutate_chromosome<G: Gene>(
        &self,
        chromosome: &Chromosome<G>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<Chromosome<G>>> {
        let mut mutated = false;
        let genes: ISeq<G> = chromosome
            .iter()
            .map(|gene| {
                if rng.gen_bool(self.probability) {
                    mutated = true;
                    gene.new_instance(rng)
                } else {
                    gene.clone()
                }
            })
            .collect();

        if mutated {
            chromosome.with_genes(genes).map(Some)
        } else {
            Ok(None)
        }
    }

    fn mutate_genotype<G: Gene>(
        &self,
        genotype: &Genotype<G>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<Genotype<G>>> {
        let mut result: Option<Genotype<G>> = None;
        for (index, chromosome) in genotype.iter().enumerate() {
            if let Some(mutated) = self.mutate_chromosome(chromosome, rng)? {
                let base = result.as_ref().unwrap_or(genotype);
                result = Some(base.with_chromosome(index, mutated)?);
            }
        }
        Ok(result)
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self { probability: 0.15 }
    }
}

impl<G: Gene, C: Fitness> Alterer<G, C> for Mutator {
    fn alter(
        &self,
        population: &mut Population<G, C>,
        generation: u64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<usize> {
        if self.probability == 0.0 {
            return Ok(0);
        }

        let mut altered = 0;
        for index in 0..population.len() {
            let individual = Arc::clone(population.get(index)?);
            if let Some(genotype) = self.mutate_genotype(individual.genotype(), rng)? {
                population.set(index, Arc::new(individual.new_instance(genotype, generation)))?;
                altered += 1;
            }
        }
        Ok(altered)
    }
}
