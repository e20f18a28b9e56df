//! # Population
//!
//! The mutable, dynamically sized collection of phenotypes belonging to one
//! generation. Phenotypes are immutable and held behind `Arc`, so cloning a
//! population is a shallow copy: a new container sharing the same
//! individuals.

use std::fmt;
use std::sync::Arc;

use crate::error::{GeneticError, OptionExt, Result};
use crate::genetics::Gene;
use crate::optimize::{Fitness, Optimize};
use crate::phenotype::Phenotype;
use crate::seq::{ISeq, MSeq, Seq};

/// An ordered collection of phenotypes.
pub struct Population<G: Gene, C: Fitness> {
    individuals: Vec<Arc<Phenotype<G, C>>>,
}

impl<G: Gene, C: Fitness> Population<G, C> {
    /// Creates an empty population.
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
        }
    }

    /// Creates an empty population with room for `capacity` individuals.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Appends one individual.
    pub fn push(&mut self, phenotype: Arc<Phenotype<G, C>>) {
        self.individuals.push(phenotype);
    }

    /// Replaces the individual at `index`, returning the previous one.
    pub fn set(
        &mut self,
        index: usize,
        phenotype: Arc<Phenotype<G, C>>,
    ) -> Result<Arc<Phenotype<G, C>>> {
        let length = self.individuals.len();
        let slot = self
            .individuals
            .get_mut(index)
            .ok_or_else_genetic(|| GeneticError::IndexOutOfRange { index, length })?;
        Ok(std::mem::replace(slot, phenotype))
    }

    /// Appends `count` phenotypes created by `factory`.
    pub fn fill<F>(&mut self, count: usize, mut factory: F) -> &mut Self
    where
        F: FnMut() -> Phenotype<G, C>,
    {
        self.individuals.reserve(count);
        for _ in 0..count {
            self.individuals.push(Arc::new(factory()));
        }
        self
    }

    /// Moves all individuals of `other` to the end of this population.
    pub fn add_all(&mut self, other: Population<G, C>) {
        self.individuals.extend(other.individuals);
    }

    /// Returns a shallow copy: a new container sharing the same phenotypes.
    pub fn copy(&self) -> Self {
        Self {
            individuals: self.individuals.clone(),
        }
    }

    /// Returns the best individual for the given direction.
    pub fn best(&self, optimize: Optimize) -> Option<&Arc<Phenotype<G, C>>> {
        self.individuals.iter().reduce(|best, candidate| {
            if optimize.is_better(candidate.fitness(), best.fitness()) {
                candidate
            } else {
                best
            }
        })
    }

    /// Returns the worst individual for the given direction.
    pub fn worst(&self, optimize: Optimize) -> Option<&Arc<Phenotype<G, C>>> {
        self.individuals.iter().reduce(|worst, candidate| {
            if optimize.is_better(worst.fitness(), candidate.fitness()) {
                candidate
            } else {
                worst
            }
        })
    }

    /// Sorts the individuals best first.
    pub fn sort_best_first(&mut self, optimize: Optimize) {
        self.individuals
            .sort_by(|a, b| optimize.compare(b.fitness(), a.fitness()));
    }

    /// Returns `true` if every individual has a cached fitness value.
    pub fn is_evaluated(&self) -> bool {
        self.individuals.iter().all(|p| p.is_evaluated())
    }

    /// Seals the current individuals into an immutable sequence.
    pub fn seal(self) -> ISeq<Arc<Phenotype<G, C>>> {
        MSeq::from_vec(self.individuals).seal()
    }

    pub fn into_vec(self) -> Vec<Arc<Phenotype<G, C>>> {
        self.individuals
    }
}

impl<G: Gene, C: Fitness> Seq<Arc<Phenotype<G, C>>> for Population<G, C> {
    fn as_slice(&self) -> &[Arc<Phenotype<G, C>>] {
        &self.individuals
    }
}

impl<G: Gene, C: Fitness> Default for Population<G, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Gene, C: Fitness> Clone for Population<G, C> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<G: Gene, C: Fitness> From<Vec<Arc<Phenotype<G, C>>>> for Population<G, C> {
    fn from(individuals: Vec<Arc<Phenotype<G, C>>>) -> Self {
        Self { individuals }
    }
}

impl<G: Gene, C: Fitness> From<&ISeq<Arc<Phenotype<G, C>>>> for Population<G, C> {
    fn from(sealed: &ISeq<Arc<Phenotype<G, C>>>) -> Self {
        Self {
            individuals: sealed.to_vec(),
        }
    }
}

impl<G: Gene, C: Fitness> FromIterator<Arc<Phenotype<G, C>>> for Population<G, C> {
    fn from_iter<I: IntoIterator<Item = Arc<Phenotype<G, C>>>>(iter: I) -> Self {
        Self {
            individuals: iter.into_iter().collect(),
        }
    }
}

impl<G: Gene, C: Fitness> IntoIterator for Population<G, C> {
    type Item = Arc<Phenotype<G, C>>;
    type IntoIter = std::vec::IntoIter<Arc<Phenotype<G, C>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<'a, G: Gene, C: Fitness> IntoIterator for &'a Population<G, C> {
    type Item = &'a Arc<Phenotype<G, C>>;
    type IntoIter = std::slice::Iter<'a, Arc<Phenotype<G, C>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

impl<G: Gene, C: Fitness> fmt::Debug for Population<G, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.individuals.iter()).finish()
    }
}
