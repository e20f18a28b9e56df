use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::seq::{ISeq, MSeq, Seq};

use super::gene::Gene;

/// A non-empty, immutable sequence of genes.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome<G: Gene> {
    genes: ISeq<G>,
}

impl<G: Gene> Chromosome<G> {
    /// Creates a chromosome from the given genes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `genes` is empty.
    pub fn new(genes: ISeq<G>) -> Result<Self> {
        if genes.is_empty() {
            return Err(GeneticError::Configuration(
                "Chromosome must contain at least one gene".to_string(),
            ));
        }
        Ok(Self { genes })
    }

    /// Creates a chromosome from a vector of genes.
    pub fn of(genes: Vec<G>) -> Result<Self> {
        Self::new(ISeq::from_vec(genes))
    }

    /// Creates a chromosome of `length` random genes shaped like `template`.
    pub fn random(template: &G, length: usize, rng: &mut RandomNumberGenerator) -> Result<Self> {
        let genes = MSeq::filled(length, || template.new_instance(rng));
        Self::new(genes.seal())
    }

    pub fn genes(&self) -> &ISeq<G> {
        &self.genes
    }

    /// Returns the first gene.
    pub fn gene(&self) -> &G {
        &self.genes.as_slice()[0]
    }

    /// Returns `true` if every gene is valid.
    pub fn is_valid(&self) -> bool {
        self.genes.for_all(|gene| gene.is_valid())
    }

    /// Creates a chromosome of the same length with freshly randomised genes.
    pub fn new_instance(&self, rng: &mut RandomNumberGenerator) -> Self {
        Self {
            genes: self.genes.map(|gene| gene.new_instance(rng)),
        }
    }

    /// Creates a chromosome with the same length holding `genes`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the length differs.
    pub fn with_genes(&self, genes: ISeq<G>) -> Result<Self> {
        if genes.length() != self.genes.length() {
            return Err(GeneticError::Configuration(format!(
                "Chromosome length must stay {}, but was {}",
                self.genes.length(),
                genes.length()
            )));
        }
        Ok(Self { genes })
    }
}

impl<G: Gene> Seq<G> for Chromosome<G> {
    fn as_slice(&self) -> &[G] {
        self.genes.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::gene::{BitGene, DoubleGene};

    #[test]
    fn test_empty_chromosome_is_rejected() {
        assert!(Chromosome::<BitGene>::of(Vec::new()).is_err());
    }

    #[test]
    fn test_validity_delegates_to_genes() {
        let valid = DoubleGene::new(0.5, 0.0, 1.0).unwrap();
        let invalid = valid.with_value(2.0);

        assert!(Chromosome::of(vec![valid, valid]).unwrap().is_valid());
        assert!(!Chromosome::of(vec![valid, invalid]).unwrap().is_valid());
    }

    #[test]
    fn test_new_instance_keeps_length() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let chromosome = Chromosome::random(&BitGene(false), 16, &mut rng).unwrap();
        let other = chromosome.new_instance(&mut rng);

        assert_eq!(other.length(), 16);
    }

    #[test]
    fn test_with_genes_checks_length() {
        let chromosome = Chromosome::of(vec![BitGene(true), BitGene(false)]).unwrap();
        assert!(chromosome
            .with_genes(ISeq::from_vec(vec![BitGene(false)]))
            .is_err());

        let flipped = chromosome
            .with_genes(ISeq::from_vec(vec![BitGene(false), BitGene(true)]))
            .unwrap();
        assert_eq!(flipped.gene(), &BitGene(false));
    }
}
