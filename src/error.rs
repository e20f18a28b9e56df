//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Configuration problems are reported when an engine or limit is built,
//! bounds problems at the access site, and phase failures are returned from
//! [`Engine::evolve`](crate::evolution::Engine::evolve) without any partially
//! built population becoming visible.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use evostream::error::{GeneticError, Result};
//!
//! fn checked_count(count: usize) -> Result<usize> {
//!     if count == 0 {
//!         return Err(GeneticError::Configuration(
//!             "Offspring count must be positive".to_string(),
//!         ));
//!     }
//!     Ok(count)
//! }
//!
//! assert!(checked_count(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use evostream::error::{GeneticError, OptionExt};
//!
//! fn find_best_candidate(candidates: &[i32]) -> evostream::error::Result<i32> {
//!     candidates.iter().max().cloned().ok_or_else_genetic(||
//!         GeneticError::EmptyPopulation
//!     )
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while configuring or running an evolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneticError {
    /// An invalid parameter was given to a builder, selector, alterer or limit.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An index outside of `[0, length)` was used to access a sequence.
    #[error("Index {index} is out of bounds [0, {length})")]
    IndexOutOfRange { index: usize, length: usize },

    /// A sub-range outside of `[0, length]` or with `start > end` was requested.
    #[error("Invalid index range [{start}, {end}) for length {length}")]
    InvalidRange {
        start: usize,
        end: usize,
        length: usize,
    },

    /// An operation needed at least one individual.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// The selection phase failed.
    #[error("Selection error: {0}")]
    Selection(String),

    /// The alteration phase failed.
    #[error("Alteration error: {0}")]
    Alteration(String),

    /// The fitness evaluation phase failed.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for evolution operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use evostream::error::ResultExt;
///
/// fn parse_generation(raw: &str) -> evostream::error::Result<u64> {
///     let generation = raw.parse::<u64>().context("Invalid generation")?;
///     Ok(generation)
/// }
///
/// assert!(parse_generation("12").is_ok());
/// assert!(parse_generation("twelve").is_err());
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to a `GeneticError::Other` prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using `err_fn`.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}

/// Checks that `value` is a valid probability in `[0, 1]`.
pub(crate) fn require_probability(name: &str, value: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GeneticError::Configuration(format!(
            "{} must be in the range [0, 1], but was {}",
            name, value
        )));
    }
    Ok(value)
}
