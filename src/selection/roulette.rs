use std::sync::Arc;

use crate::error::{GeneticError, Result};
use crate::genetics::Gene;
use crate::optimize::{Fitness, Optimize};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::selector::Selector;
use crate::seq::Seq;

/// A selector that picks individuals with probability proportional to their
/// fitness (fitness proportionate selection).
///
/// The fitness values must convert to `f64`. For maximization, negative
/// values are shifted so that the smallest value has weight zero. For
/// minimization, each value is replaced by its distance to the largest value.
/// If every weight ends up zero, all individuals are equally likely.
///
/// # Examples
///
/// ```
/// use evostream::optimize::Optimize;
/// use evostream::selection::RouletteWheelSelector;
///
/// let selector = RouletteWheelSelector::new();
/// let probabilities = selector.probabilities(&[1.0, 3.0], Optimize::Maximum).unwrap();
/// assert_eq!(probabilities, vec![0.25, 0.75]);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouletteWheelSelector;

impl RouletteWheelSelector {
    pub fn new() -> Self {
        Self
    }

    /// Calculates the selection probability of each fitness value.
    ///
    /// # Errors
    ///
    /// Returns a `Selection` error if any value is not finite.
    pub fn probabilities(&self, fitness: &[f64], optimize: Optimize) -> Result<Vec<f64>> {
        if fitness.iter().any(|f| !f.is_finite()) {
            return Err(GeneticError::Selection(
                "Roulette wheel selection requires finite fitness values".to_string(),
            ));
        }
        if fitness.is_empty() {
            return Ok(Vec::new());
        }

        let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let max = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let weights: Vec<f64> = match optimize {
            Optimize::Maximum => {
                let shift = if min < 0.0 { min } else { 0.0 };
                fitness.iter().map(|f| f - shift).collect()
            }
            Optimize::Minimum => fitness.iter().map(|f| max - f).collect(),
        };

        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            let uniform = 1.0 / fitness.len() as f64;
            return Ok(vec![uniform; fitness.len()]);
        }

        Ok(weights.iter().map(|w| w / sum).collect())
    }

    fn cumulative(probabilities: &[f64]) -> Vec<f64> {
        let mut cumulative = 0.0;
        let mut probs: Vec<f64> = probabilities
            .iter()
            .map(|p| {
                cumulative += p;
                cumulative
            })
            .collect();

        // Guard against rounding in the running sum.
        if let Some(last) = probs.last_mut() {
            *last = 1.0;
        }
        probs
    }

    fn select_index(cumulative: &[f64], rng: &mut RandomNumberGenerator) -> usize {
        let r: f64 = rng.gen_range(0.0..1.0);
        cumulative
            .iter()
            .position(|p| r < *p)
            .unwrap_or(cumulative.len() - 1)
    }
}

impl<G, C> Selector<G, C> for RouletteWheelSelector
where
    G: Gene,
    C: Fitness + Copy + Into<f64>,
{
    fn select(
        &self,
        population: &Population<G, C>,
        count: usize,
        optimize: Optimize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<G, C>> {
        if count == 0 {
            return Ok(Population::new());
        }
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let fitness: Vec<f64> = population.iter().map(|p| (*p.fitness()).into()).collect();
        let cumulative = Self::cumulative(&self.probabilities(&fitness, optimize)?);

        let individuals = population.as_slice();
        Ok((0..count)
            .map(|_| Arc::clone(&individuals[Self::select_index(&cumulative, rng)]))
            .collect())
    }
}
