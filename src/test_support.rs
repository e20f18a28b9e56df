use std::sync::Arc;

use crate::genetics::{Chromosome, DoubleGene, Genotype};
use crate::phenotype::{identity_scaler, FitnessFunction, Phenotype};
use crate::population::Population;

pub(crate) fn value_of() -> FitnessFunction<DoubleGene, f64> {
    Arc::new(|gt: &Genotype<DoubleGene>| gt.gene().value())
}

pub(crate) fn genotype_of(value: f64) -> Genotype<DoubleGene> {
    let gene = DoubleGene::new(value, 0.0, 100.0).unwrap();
    Genotype::of(vec![Chromosome::of(vec![gene]).unwrap()]).unwrap()
}

pub(crate) fn phenotype_of(value: f64, generation: u64) -> Phenotype<DoubleGene, f64> {
    Phenotype::new(genotype_of(value), value_of(), identity_scaler(), generation)
}

pub(crate) fn population_of(values: &[f64]) -> Population<DoubleGene, f64> {
    values
        .iter()
        .map(|v| Arc::new(phenotype_of(*v, 1)))
        .collect()
}

pub(crate) fn fitness_values(population: &Population<DoubleGene, f64>) -> Vec<f64> {
    population.into_iter().map(|p| *p.fitness()).collect()
}
