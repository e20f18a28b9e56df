use std::sync::Arc;

use crate::error::{require_probability, Result};
use crate::genetics::{Chromosome, Gene};
use crate::optimize::Fitness;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::seq::{ISeq, Seq};

use super::Alterer;

/// Single-point crossover.
///
/// Each individual is chosen as a recombination partner with the given
/// probability. A chosen individual is paired with a random mate, one
/// chromosome index is picked, and the genes after a random cut point are
/// swapped between the two chromosomes. Both partners are replaced.
///
/// Chromosomes with fewer than two genes are left unchanged.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawSinglePointCrossover")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinglePointCrossover {
    probability: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSinglePointCrossover {
    probability: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSinglePointCrossover> for SinglePointCrossover {
    type Error = crate::error::GeneticError;

    fn try_from(raw: RawSinglePointCrossover) -> Result<Self> {
        Self::new(raw.probability)
    }
}

impl SinglePointCrossover {
    /// Creates a crossover with the given per-individual probability.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `probability` is not in `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: require_probability("Crossover probability", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Swaps the genes in `[cut, length)` between `a` and `b`.
    pub fn crossover<G: Gene>(
        a: &Chromosome<G>,
        b: &Chromosome<G>,
        cut: usize,
    ) -> Result<(Chromosome<G>, Chromosome<G>)> {
        let head_a = a.genes().sub_seq(0, cut)?;
        let head_b = b.genes().sub_seq(0, cut)?;
        let tail_a = a.genes().sub_seq(cut, a.length())?;
        let tail_b = b.genes().sub_seq(cut, b.length())?;

        let first: ISeq<G> = head_a.iter().chain(tail_b.iter()).cloned().collect();
        let second: ISeq<G> = head_b.iter().chain(tail_a.iter()).cloned().collect();
        Ok((a.with_genes(first)?, b.with_genes(second)?))
    }
}

impl Default for SinglePointCrossover {
    fn default() -> Self {
        Self { probability: 0.2 }
    }
}

impl<G: Gene, C: Fitness> Alterer<G, C> for SinglePointCrossover {
    fn alter(
        &self,
        population: &mut Population<G, C>,
        generation: u64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<usize> {
        let size = population.len();
        if size < 2 || self.probability == 0.0 {
            return Ok(0);
        }

        let mut altered = 0;
        for i in 0..size {
            if !rng.gen_bool(self.probability) {
                continue;
            }
            // Draw from [0, size - 1) and skip over `i` to get a distinct mate.
            let mut j = rng.gen_index(size - 1);
            if j >= i {
                j += 1;
            }

            let first = Arc::clone(population.get(i)?);
            let second = Arc::clone(population.get(j)?);
            let index = rng.gen_index(first.genotype().length().min(second.genotype().length()));
            let a = first.genotype().get(index)?;
            let b = second.genotype().get(index)?;

            let length = a.length().min(b.length());
            if length < 2 || a.length() != b.length() {
                continue;
            }
            let cut = rng.gen_range(1..length);
            let (a, b) = Self::crossover(a, b, cut)?;

            let genotype_a = first.genotype().with_chromosome(index, a)?;
            let genotype_b = second.genotype().with_chromosome(index, b)?;
            population.set(i, Arc::new(first.new_instance(genotype_a, generation)))?;
            population.set(j, Arc::new(second.new_instance(genotype_b, generation)))?;
            altered += 2;
        }
        Ok(altered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::BitGene;
    use crate::test_support::population_of;

    fn bits(values: &[bool]) -> Chromosome<BitGene> {
        Chromosome::of(values.iter().map(|b| BitGene(*b)).collect()).unwrap()
    }

    #[test]
    fn test_probability_is_validated() {
        assert!(SinglePointCrossover::new(1.01).is_err());
        assert!(SinglePointCrossover::new(0.2).is_ok());
        assert_eq!(SinglePointCrossover::default().probability(), 0.2);
    }

    #[test]
    fn test_crossover_swaps_tails() {
        let a = bits(&[true, true, true, true]);
        let b = bits(&[false, false, false, false]);

        let (x, y) = SinglePointCrossover::crossover(&a, &b, 1).unwrap();
        let x: Vec<bool> = x.iter().map(|g| g.bit()).collect();
        let y: Vec<bool> = y.iter().map(|g| g.bit()).collect();

        assert_eq!(x, vec![true, false, false, false]);
        assert_eq!(y, vec![false, true, true, true]);
    }

    #[test]
    fn test_single_gene_chromosomes_are_skipped() {
        let mut population = population_of(&[1.0, 2.0, 3.0]);
        let mut rng = RandomNumberGenerator::from_seed(9);

        let altered = SinglePointCrossover::new(1.0)
            .unwrap()
            .alter(&mut population, 2, &mut rng)
            .unwrap();

        assert_eq!(altered, 0);
        assert!(population.iter().all(|p| p.generation() == 1));
    }

    #[test]
    fn test_small_population_is_untouched() {
        let mut population = population_of(&[1.0]);
        let mut rng = RandomNumberGenerator::from_seed(9);

        let altered = SinglePointCrossover::new(1.0)
            .unwrap()
            .alter(&mut population, 2, &mut rng)
            .unwrap();
        assert_eq!(altered, 0);
    }
}
