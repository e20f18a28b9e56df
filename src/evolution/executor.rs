//! # Executor
//!
//! The concurrency substrate an engine runs its pipeline on. The engine owns
//! no threads; it forks and joins its phases through the executor it was
//! built with.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::{GeneticError, Result};
use crate::genetics::Gene;
use crate::optimize::Fitness;
use crate::population::Population;
use crate::seq::Seq;

/// Where the pipeline phases and the fitness evaluation run.
#[derive(Debug, Clone, Default)]
pub enum Executor {
    /// Rayon's global thread pool.
    #[default]
    Global,
    /// A caller-supplied rayon thread pool.
    Pool(Arc<ThreadPool>),
    /// Everything on the calling thread.
    Sequential,
}

impl Executor {
    pub fn global() -> Self {
        Self::Global
    }

    pub fn pool(pool: Arc<ThreadPool>) -> Self {
        Self::Pool(pool)
    }

    pub fn sequential() -> Self {
        Self::Sequential
    }

    /// Runs `a` and `b`, potentially in parallel, and returns both results.
    pub fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        match self {
            Self::Global => rayon::join(a, b),
            Self::Pool(pool) => pool.join(a, b),
            Self::Sequential => (a(), b()),
        }
    }

    /// Evaluates the fitness of every individual lacking a cached value.
    ///
    /// # Errors
    ///
    /// Returns an `Evaluation` error if the fitness function panics.
    pub fn evaluate<G: Gene, C: Fitness>(&self, population: &Population<G, C>) -> Result<()> {
        let individuals = population.as_slice();
        let evaluate_all = || {
            match self {
                Self::Sequential => individuals.iter().for_each(|p| {
                    p.evaluate();
                }),
                _ => individuals.par_iter().for_each(|p| {
                    p.evaluate();
                }),
            }
            Ok(())
        };
        let to_error =
            |message: String| GeneticError::Evaluation(format!("Fitness function panicked: {message}"));
        match self {
            Self::Pool(pool) => catch_panic(|| pool.install(evaluate_all), to_error),
            _ => catch_panic(evaluate_all, to_error),
        }
    }
}

/// Runs `f`, turning a panic into the error `to_error` builds from the
/// panic message.
pub(crate) fn catch_panic<R, F, E>(f: F, to_error: E) -> Result<R>
where
    F: FnOnce() -> Result<R>,
    E: FnOnce(String) -> GeneticError,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(to_error(message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::{DoubleGene, Genotype};
    use crate::phenotype::{identity_scaler, Phenotype};
    use crate::test_support::{genotype_of, population_of};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_join_all_variants() {
        let pool = Arc::new(rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap());
        for executor in [Executor::global(), Executor::pool(pool), Executor::sequential()] {
            let (a, b) = executor.join(|| 1 + 1, || "two");
            assert_eq!(a, 2);
            assert_eq!(b, "two");
        }
    }

    #[test]
    fn test_evaluate_fills_cache() {
        let population = population_of(&[1.0, 2.0, 3.0, 4.0]);
        assert!(!population.is_evaluated());

        Executor::global().evaluate(&population).unwrap();
        assert!(population.is_evaluated());
    }

    #[test]
    fn test_evaluate_reports_panic() {
        let pool = Arc::new(rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap());
        for executor in [Executor::global(), Executor::pool(pool), Executor::sequential()] {
            let failing = Population::from(vec![Arc::new(Phenotype::new(
                genotype_of(1.0),
                Arc::new(|_: &Genotype<DoubleGene>| -> f64 { panic!("no fitness") }),
                identity_scaler(),
                1,
            ))]);
            match executor.evaluate(&failing) {
                Err(GeneticError::Evaluation(message)) => assert!(message.contains("no fitness")),
                other => panic!("Expected Evaluation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_catch_panic_passes_results_through() {
        assert_eq!(catch_panic(|| Ok(3), GeneticError::Other), Ok(3));
        assert_eq!(
            catch_panic(|| -> Result<i32> { Err(GeneticError::EmptyPopulation) }, GeneticError::Other),
            Err(GeneticError::EmptyPopulation)
        );
        assert_eq!(
            catch_panic(|| -> Result<i32> { panic!("lost") }, GeneticError::Alteration),
            Err(GeneticError::Alteration("lost".to_string()))
        );
    }

    #[test]
    fn test_sequential_runs_in_order() {
        let counter = AtomicUsize::new(0);
        let (a, b) = Executor::sequential().join(
            || counter.fetch_add(1, Ordering::SeqCst),
            || counter.fetch_add(1, Ordering::SeqCst),
        );
        assert_eq!((a, b), (0, 1));
    }
}
