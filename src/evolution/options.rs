//! # EvolutionParams
//!
//! The `EvolutionParams` struct holds the numeric configuration of an
//! [`Engine`](crate::evolution::Engine): the population size, the fraction of
//! the population produced as offspring each generation, the maximal age of
//! a phenotype before it is replaced, and the optimization direction.
//!
//! ## Example
//!
//! ```rust
//! use evostream::evolution::options::EvolutionParams;
//! use evostream::optimize::Optimize;
//!
//! let params = EvolutionParams::builder()
//!     .population_size(10)
//!     .offspring_fraction(0.6)
//!     .maximal_phenotype_age(5)
//!     .optimize(Optimize::Minimum)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.offspring_count(), 6);
//! assert_eq!(params.survivors_count(), 4);
//!
//! let defaults = EvolutionParams::default();
//! assert_eq!(defaults.population_size(), 50);
//! assert_eq!(defaults.offspring_count(), 30);
//! ```
//!
//! With the `serde` feature enabled, the parameters can be read from and
//! written to any serde format; missing fields take their default values.

use crate::error::{GeneticError, Result};
use crate::optimize::Optimize;

pub const DEFAULT_POPULATION_SIZE: usize = 50;
pub const DEFAULT_OFFSPRING_FRACTION: f64 = 0.6;
pub const DEFAULT_MAXIMAL_PHENOTYPE_AGE: u64 = 70;

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionParams {
    population_size: usize,
    offspring_fraction: f64,
    maximal_phenotype_age: u64,
    optimize: Optimize,
}

impl EvolutionParams {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if any value is out of range, see
    /// [`EvolutionParams::validate`].
    pub fn new(
        population_size: usize,
        offspring_fraction: f64,
        maximal_phenotype_age: u64,
        optimize: Optimize,
    ) -> Result<Self> {
        let params = Self {
            population_size,
            offspring_fraction,
            maximal_phenotype_age,
            optimize,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn offspring_fraction(&self) -> f64 {
        self.offspring_fraction
    }

    pub fn maximal_phenotype_age(&self) -> u64 {
        self.maximal_phenotype_age
    }

    pub fn optimize(&self) -> Optimize {
        self.optimize
    }

    /// The number of offspring per generation, `round(fraction * size)`.
    pub fn offspring_count(&self) -> usize {
        (self.offspring_fraction * self.population_size as f64).round() as usize
    }

    /// The number of survivors per generation, `size - offspring_count`.
    pub fn survivors_count(&self) -> usize {
        self.population_size.saturating_sub(self.offspring_count())
    }

    /// Checks that the parameters describe a runnable engine.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if
    /// - the population size is zero
    /// - the offspring fraction is not in `[0, 1]`
    /// - the maximal phenotype age is zero
    /// - the derived offspring or survivors count is zero
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.offspring_fraction) {
            return Err(GeneticError::Configuration(format!(
                "Offspring fraction must be in [0, 1], but was {}",
                self.offspring_fraction
            )));
        }
        if self.maximal_phenotype_age == 0 {
            return Err(GeneticError::Configuration(
                "Maximal phenotype age must be greater than zero".to_string(),
            ));
        }
        if self.offspring_count() == 0 {
            return Err(GeneticError::Configuration(format!(
                "Offspring count must be greater than zero, but fraction {} of population size {} is 0",
                self.offspring_fraction, self.population_size
            )));
        }
        if self.survivors_count() == 0 {
            return Err(GeneticError::Configuration(format!(
                "Survivors count must be greater than zero, but fraction {} of population size {} leaves none",
                self.offspring_fraction, self.population_size
            )));
        }
        Ok(())
    }

    /// Returns a builder for creating an `EvolutionParams` instance.
    pub fn builder() -> EvolutionParamsBuilder {
        EvolutionParamsBuilder::default()
    }
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            offspring_fraction: DEFAULT_OFFSPRING_FRACTION,
            maximal_phenotype_age: DEFAULT_MAXIMAL_PHENOTYPE_AGE,
            optimize: Optimize::Maximum,
        }
    }
}

/// Builder for `EvolutionParams`.
///
/// Unset values take their defaults.
#[derive(Debug, Clone, Default)]
pub struct EvolutionParamsBuilder {
    population_size: Option<usize>,
    offspring_fraction: Option<f64>,
    maximal_phenotype_age: Option<u64>,
    optimize: Option<Optimize>,
}

impl EvolutionParamsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn offspring_fraction(mut self, value: f64) -> Self {
        self.offspring_fraction = Some(value);
        self
    }

    pub fn maximal_phenotype_age(mut self, value: u64) -> Self {
        self.maximal_phenotype_age = Some(value);
        self
    }

    pub fn optimize(mut self, value: Optimize) -> Self {
        self.optimize = Some(value);
        self
    }

    /// Builds validated parameters.
    pub fn build(self) -> Result<EvolutionParams> {
        let defaults = EvolutionParams::default();
        EvolutionParams::new(
            self.population_size.unwrap_or(defaults.population_size),
            self.offspring_fraction
                .unwrap_or(defaults.offspring_fraction),
            self.maximal_phenotype_age
                .unwrap_or(defaults.maximal_phenotype_age),
            self.optimize.unwrap_or(defaults.optimize),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = EvolutionParams::default();
        assert_eq!(params.population_size(), 50);
        assert_eq!(params.offspring_fraction(), 0.6);
        assert_eq!(params.maximal_phenotype_age(), 70);
        assert_eq!(params.optimize(), Optimize::Maximum);
        assert_eq!(params.offspring_count(), 30);
        assert_eq!(params.survivors_count(), 20);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_offspring_count_rounds() {
        let params = EvolutionParams::new(7, 0.5, 1, Optimize::Maximum).unwrap();
        assert_eq!(params.offspring_count(), 4);
        assert_eq!(params.survivors_count(), 3);
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            EvolutionParams::builder().population_size(0).build(),
            EvolutionParams::builder().offspring_fraction(1.5).build(),
            EvolutionParams::builder().offspring_fraction(-0.1).build(),
            EvolutionParams::builder().maximal_phenotype_age(0).build(),
            EvolutionParams::builder().offspring_fraction(0.0).build(),
            EvolutionParams::builder().offspring_fraction(1.0).build(),
            EvolutionParams::builder()
                .population_size(1)
                .offspring_fraction(0.4)
                .build(),
        ];
        for case in cases {
            assert!(matches!(case, Err(GeneticError::Configuration(_))));
        }
    }

    #[test]
    fn test_error_names_parameter() {
        let err = EvolutionParams::builder()
            .maximal_phenotype_age(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Maximal phenotype age"));
    }
}
