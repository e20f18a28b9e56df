use std::fmt::Debug;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Trait for the smallest unit of an encoded solution.
///
/// Genes are values: altering a gene means creating a new one.
pub trait Gene: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Returns `true` if this gene holds a legal value.
    fn is_valid(&self) -> bool;

    /// Creates a new random gene with the same constraints as this one.
    fn new_instance(&self, rng: &mut RandomNumberGenerator) -> Self;
}

/// A gene whose allele can be read as a number.
pub trait NumericGene: Gene {
    fn numeric_value(&self) -> f64;
}

/// A floating point gene constrained to `[min, max]`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleGene {
    value: f64,
    min: f64,
    max: f64,
}

impl DoubleGene {
    /// Creates a gene with the given value and bounds.
    ///
    /// The value is not checked against the bounds; an out-of-range value
    /// makes the gene invalid.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `min > max` or a bound is not finite.
    pub fn new(value: f64, min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(GeneticError::Configuration(format!(
                "Invalid gene bounds [{}, {}]",
                min, max
            )));
        }
        Ok(Self { value, min, max })
    }

    /// Creates a gene with a uniformly distributed value in `[min, max)`.
    pub fn random(min: f64, max: f64, rng: &mut RandomNumberGenerator) -> Result<Self> {
        let template = Self::new(min, min, max)?;
        Ok(template.new_instance(rng))
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns a gene with the same bounds and the given value.
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            min: self.min,
            max: self.max,
        }
    }
}

impl Gene for DoubleGene {
    fn is_valid(&self) -> bool {
        self.value.is_finite() && self.value >= self.min && self.value <= self.max
    }

    fn new_instance(&self, rng: &mut RandomNumberGenerator) -> Self {
        let value = if self.min < self.max {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        };
        self.with_value(value)
    }
}

impl NumericGene for DoubleGene {
    fn numeric_value(&self) -> f64 {
        self.value
    }
}

/// A single bit.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitGene(pub bool);

impl BitGene {
    pub fn bit(&self) -> bool {
        self.0
    }
}

impl Gene for BitGene {
    fn is_valid(&self) -> bool {
        true
    }

    fn new_instance(&self, rng: &mut RandomNumberGenerator) -> Self {
        BitGene(rng.gen_bool(0.5))
    }
}
