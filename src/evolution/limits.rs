//! # Limits
//!
//! Termination predicates for an [`EvolutionStream`](super::EvolutionStream).
//! A limit is tested once per generation with the freshly evolved result and
//! returns `true` to keep going. Most limits are stateful; a limit instance
//! belongs to exactly one stream.
//!
//! Any `FnMut(&EvolutionResult<G, C>) -> bool` closure is a limit as well.
//!
//! ```rust
//! use evostream::evolution::limits::{self, Limit};
//! use evostream::evolution::{EvolutionDurations, EvolutionResult};
//! use evostream::genetics::DoubleGene;
//! use evostream::optimize::Optimize;
//! use evostream::population::Population;
//!
//! let result: EvolutionResult<DoubleGene, f64> = EvolutionResult::new(
//!     Optimize::Maximum,
//!     Population::new(),
//!     1,
//!     EvolutionDurations::ZERO,
//!     0,
//!     0,
//!     0,
//! );
//!
//! let mut limit = limits::by_fixed_generation(3);
//! assert!(limit.test(&result));
//! assert!(limit.test(&result));
//! assert!(!limit.test(&result));
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{require_probability, GeneticError, Result};
use crate::genetics::{Gene, NumericGene};
use crate::optimize::Fitness;
use crate::seq::Seq;
use crate::timing::{Clock, SystemClock};

use super::result::EvolutionResult;

/// A stateful continuation predicate on evolution results.
pub trait Limit<G: Gene, C: Fitness> {
    /// Returns `true` if the stream should continue after `result`.
    fn test(&mut self, result: &EvolutionResult<G, C>) -> bool;
}

impl<G, C, F> Limit<G, C> for F
where
    G: Gene,
    C: Fitness,
    F: FnMut(&EvolutionResult<G, C>) -> bool,
{
    fn test(&mut self, result: &EvolutionResult<G, C>) -> bool {
        self(result)
    }
}

/// Never stops the stream.
pub fn infinite<G: Gene, C: Fitness>() -> impl Limit<G, C> {
    |_: &EvolutionResult<G, C>| true
}

/// Stops once the limit has been tested `generations` times.
///
/// The counter is incremented before the comparison, so the stream yields
/// `generations - 1` results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedGeneration {
    generations: u64,
    current: u64,
}

pub fn by_fixed_generation(generations: u64) -> FixedGeneration {
    FixedGeneration {
        generations,
        current: 0,
    }
}

impl<G: Gene, C: Fitness> Limit<G, C> for FixedGeneration {
    fn test(&mut self, _result: &EvolutionResult<G, C>) -> bool {
        self.current += 1;
        self.current < self.generations
    }
}

/// Stops once the best fitness has not improved for more than `generations`
/// consecutive results.
///
/// The first result sets the baseline. Each following result that is not
/// better than the best seen so far counts as steady; the stream continues
/// for `generations` steady results and stops on the next one.
#[derive(Debug, Clone)]
pub struct SteadyFitness<C> {
    generations: usize,
    best: Option<C>,
    steady: usize,
}

/// # Errors
///
/// Returns a `Configuration` error if `generations` is zero.
pub fn by_steady_fitness<C: Fitness>(generations: usize) -> Result<SteadyFitness<C>> {
    if generations == 0 {
        return Err(GeneticError::Configuration(
            "Steady fitness generations must be at least 1".to_string(),
        ));
    }
    Ok(SteadyFitness {
        generations,
        best: None,
        steady: 0,
    })
}

impl<C: Fitness> SteadyFitness<C> {
    /// The number of consecutive non-improving results since the current
    /// best was set.
    pub fn steady(&self) -> usize {
        self.steady
    }
}

impl<G: Gene, C: Fitness> Limit<G, C> for SteadyFitness<C> {
    fn test(&mut self, result: &EvolutionResult<G, C>) -> bool {
        let Some(fitness) = result.best_fitness() else {
            return true;
        };

        match &self.best {
            Some(best) if !result.optimize().is_better(fitness, best) => {
                self.steady += 1;
                self.steady <= self.generations
            }
            _ => {
                self.best = Some(fitness.clone());
                self.steady = 0;
                true
            }
        }
    }
}

/// Stops once `duration` has passed since the first test.
///
/// A duration too large to be added to the start instant never expires.
#[derive(Debug, Clone)]
pub struct ExecutionTime {
    duration: Duration,
    clock: Arc<dyn Clock>,
    start: Option<Instant>,
}

pub fn by_execution_time(duration: Duration) -> ExecutionTime {
    by_execution_time_with_clock(duration, Arc::new(SystemClock))
}

pub fn by_execution_time_with_clock(duration: Duration, clock: Arc<dyn Clock>) -> ExecutionTime {
    ExecutionTime {
        duration,
        clock,
        start: None,
    }
}

impl<G: Gene, C: Fitness> Limit<G, C> for ExecutionTime {
    fn test(&mut self, _result: &EvolutionResult<G, C>) -> bool {
        let now = self.clock.now();
        let start = *self.start.get_or_insert(now);
        start.checked_add(self.duration).map_or(true, |end| now < end)
    }
}

/// Stops once the best fitness is better than `threshold`.
#[derive(Debug, Clone)]
pub struct FitnessThreshold<C> {
    threshold: C,
}

pub fn by_fitness_threshold<C: Fitness>(threshold: C) -> FitnessThreshold<C> {
    FitnessThreshold { threshold }
}

impl<G: Gene, C: Fitness> Limit<G, C> for FitnessThreshold<C> {
    fn test(&mut self, result: &EvolutionResult<G, C>) -> bool {
        match result.best_fitness() {
            Some(best) => !result.optimize().is_better(best, &self.threshold),
            None => true,
        }
    }
}

/// The relative difference of two values, `|a - b| / max(|a|, |b|)`.
fn relative_difference(a: f64, b: f64) -> f64 {
    let divisor = a.abs().max(b.abs());
    (a - b).abs() / if divisor <= 1e-20 { 1.0 } else { divisor }
}

/// Count, extremes, sum and mean of a sample of values.
///
/// An empty sample has a `min` of positive infinity, a `max` of negative
/// infinity and a `NaN` mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    count: usize,
    min: f64,
    max: f64,
    sum: f64,
}

impl Moments {
    pub const EMPTY: Self = Self {
        count: 0,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        sum: 0.0,
    };

    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Self {
        values.into_iter().fold(Self::EMPTY, Self::accept)
    }

    fn accept(self, value: f64) -> Self {
        Self {
            count: self.count + 1,
            min: self.min.min(value),
            max: self.max.max(value),
            sum: self.sum + value,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

type WindowPredicate = Box<dyn Fn(&Moments, &Moments) -> bool + Send + Sync>;
type PopulationPredicate = Box<dyn Fn(f64, &Moments) -> bool + Send + Sync>;
type GenePredicate = Box<dyn Fn(&Moments) -> bool + Send + Sync>;

/// Compares the best fitness of the last `short_window` results with the
/// best fitness of the last `long_window` results.
///
/// The stream always continues until `long_window` results have been seen;
/// after that it continues while the predicate, given the short and the long
/// window moments, returns `true`.
pub struct FitnessConvergence {
    short_window: usize,
    long_window: usize,
    proceed: WindowPredicate,
    history: VecDeque<f64>,
}

impl std::fmt::Debug for FitnessConvergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FitnessConvergence")
            .field("short_window", &self.short_window)
            .field("long_window", &self.long_window)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

/// Stops once the moving mean of the best fitness over the short window is
/// within `epsilon` (relative) of the moving mean over the long window.
///
/// # Errors
///
/// Returns a `Configuration` error if `short_window < 1`,
/// `short_window >= long_window` or `epsilon` is not in `[0, 1]`.
pub fn by_fitness_convergence(
    short_window: usize,
    long_window: usize,
    epsilon: f64,
) -> Result<FitnessConvergence> {
    let epsilon = require_probability("Epsilon", epsilon)?;
    by_fitness_convergence_with(short_window, long_window, move |short, long| {
        relative_difference(short.mean(), long.mean()) >= epsilon
    })
}

/// Continues while `proceed(short, long)` holds for the moments of the best
/// fitness over the two windows.
///
/// # Errors
///
/// Returns a `Configuration` error if `short_window < 1` or
/// `short_window >= long_window`.
pub fn by_fitness_convergence_with<P>(
    short_window: usize,
    long_window: usize,
    proceed: P,
) -> Result<FitnessConvergence>
where
    P: Fn(&Moments, &Moments) -> bool + Send + Sync + 'static,
{
    if short_window < 1 || short_window >= long_window {
        return Err(GeneticError::Configuration(format!(
            "Fitness convergence windows must satisfy 1 <= short < long, but were {short_window} and {long_window}"
        )));
    }
    Ok(FitnessConvergence {
        short_window,
        long_window,
        proceed: Box::new(proceed),
        history: VecDeque::with_capacity(long_window),
    })
}

impl<G, C> Limit<G, C> for FitnessConvergence
where
    G: Gene,
    C: Fitness + Copy + Into<f64>,
{
    fn test(&mut self, result: &EvolutionResult<G, C>) -> bool {
        let Some(best) = result.best_fitness() else {
            return true;
        };

        if self.history.len() == self.long_window {
            self.history.pop_front();
        }
        self.history.push_back((*best).into());
        if self.history.len() < self.long_window {
            return true;
        }

        let long = Moments::of(self.history.iter().copied());
        let short = Moments::of(
            self.history
                .iter()
                .skip(self.long_window - self.short_window)
                .copied(),
        );
        (self.proceed)(&short, &long)
    }
}

/// Compares the best fitness of a result with the fitness moments of its
/// whole population, continuing while the predicate returns `true`.
pub struct PopulationConvergence {
    proceed: PopulationPredicate,
}

impl std::fmt::Debug for PopulationConvergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopulationConvergence").finish_non_exhaustive()
    }
}

/// Stops once the best fitness of a result is within `epsilon` (relative)
/// of its mean fitness.
///
/// # Errors
///
/// Returns a `Configuration` error if `epsilon` is not in `[0, 1]`.
pub fn by_population_convergence(epsilon: f64) -> Result<PopulationConvergence> {
    let epsilon = require_probability("Epsilon", epsilon)?;
    Ok(by_population_convergence_with(move |best, moments| {
        relative_difference(best, moments.mean()) >= epsilon
    }))
}

/// Continues while `proceed(best, moments)` holds, where `moments` summarizes
/// the fitness of the whole population.
pub fn by_population_convergence_with<P>(proceed: P) -> PopulationConvergence
where
    P: Fn(f64, &Moments) -> bool + Send + Sync + 'static,
{
    PopulationConvergence {
        proceed: Box::new(proceed),
    }
}

impl<G, C> Limit<G, C> for PopulationConvergence
where
    G: Gene,
    C: Fitness + Copy + Into<f64>,
{
    fn test(&mut self, result: &EvolutionResult<G, C>) -> bool {
        let Some(best) = result.best_fitness() else {
            return true;
        };

        let moments = Moments::of(result.individuals().iter().map(|p| (*p.fitness()).into()));
        (self.proceed)((*best).into(), &moments)
    }
}

/// Tests every gene position of the population for convergence and stops
/// once the fraction of converged positions reaches `converged_gene_rate`.
///
/// A position's moments are taken over the values of that gene across all
/// individuals, with the genes of a genotype numbered chromosome by
/// chromosome.
pub struct GeneConvergence {
    converged_gene_rate: f64,
    converged: GenePredicate,
}

impl std::fmt::Debug for GeneConvergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneConvergence")
            .field("converged_gene_rate", &self.converged_gene_rate)
            .finish_non_exhaustive()
    }
}

/// A gene position counts as converged once
/// `max * convergence_rate <= mean` over its values.
///
/// # Errors
///
/// Returns a `Configuration` error if either rate is not in `[0, 1]`.
pub fn by_gene_convergence(
    convergence_rate: f64,
    converged_gene_rate: f64,
) -> Result<GeneConvergence> {
    let convergence_rate = require_probability("Convergence rate", convergence_rate)?;
    by_gene_convergence_with(
        move |moments| moments.max() * convergence_rate <= moments.mean(),
        converged_gene_rate,
    )
}

/// A gene position counts as converged when `converged` returns `true` for
/// its moments.
///
/// # Errors
///
/// Returns a `Configuration` error if `converged_gene_rate` is not in
/// `[0, 1]`.
pub fn by_gene_convergence_with<P>(
    converged: P,
    converged_gene_rate: f64,
) -> Result<GeneConvergence>
where
    P: Fn(&Moments) -> bool + Send + Sync + 'static,
{
    Ok(GeneConvergence {
        converged_gene_rate: require_probability("Converged gene rate", converged_gene_rate)?,
        converged: Box::new(converged),
    })
}

impl<G: NumericGene, C: Fitness> Limit<G, C> for GeneConvergence {
    fn test(&mut self, result: &EvolutionResult<G, C>) -> bool {
        let mut positions: Vec<Moments> = Vec::new();
        for phenotype in result.individuals().iter() {
            let values = phenotype
                .genotype()
                .iter()
                .flat_map(|chromosome| chromosome.iter())
                .map(NumericGene::numeric_value);
            for (index, value) in values.enumerate() {
                match positions.get_mut(index) {
                    Some(moments) => *moments = moments.accept(value),
                    None => positions.push(Moments::EMPTY.accept(value)),
                }
            }
        }
        if positions.is_empty() {
            return true;
        }

        let converged = positions.iter().filter(|moments| (self.converged)(*moments)).count();
        (converged as f64) / (positions.len() as f64) < self.converged_gene_rate
    }
}
