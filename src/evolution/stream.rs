//! # EvolutionStream
//!
//! A lazy, single-pass and potentially infinite sequence of
//! [`EvolutionResult`]s. Each pull evolves the current start and advances
//! it to the result's population in the following generation.
//!
//! Limits registered with [`EvolutionStream::limit`] are combined with a
//! logical AND and tested in registration order. The first result for which
//! a limit returns `false` is not yielded and ends the stream. An evolve
//! error is yielded once and ends the stream as well.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::genetics::{Gene, Genotype};
use crate::optimize::Fitness;
use crate::phenotype::Phenotype;

use super::limits::Limit;
use super::problem::Codec;
use super::result::{EvolutionResult, EvolutionStart};

type StartSupplier<'a, G, C> = Box<dyn FnOnce() -> Result<EvolutionStart<G, C>> + 'a>;
type EvolveFunction<'a, G, C> =
    Box<dyn Fn(&EvolutionStart<G, C>) -> Result<EvolutionResult<G, C>> + 'a>;

/// An iterator of evolution results.
pub struct EvolutionStream<'a, G: Gene, C: Fitness> {
    supplier: Option<StartSupplier<'a, G, C>>,
    evolve: EvolveFunction<'a, G, C>,
    start: Option<EvolutionStart<G, C>>,
    limits: Vec<Box<dyn Limit<G, C> + 'a>>,
    total_generations: u64,
    done: bool,
}

impl<'a, G: Gene, C: Fitness> EvolutionStream<'a, G, C> {
    /// Creates a stream from an initial-start supplier, invoked on the first
    /// pull, and an evolve function.
    pub fn new<S, E>(supplier: S, evolve: E) -> Self
    where
        S: FnOnce() -> Result<EvolutionStart<G, C>> + 'a,
        E: Fn(&EvolutionStart<G, C>) -> Result<EvolutionResult<G, C>> + 'a,
    {
        Self {
            supplier: Some(Box::new(supplier)),
            evolve: Box::new(evolve),
            start: None,
            limits: Vec::new(),
            total_generations: 0,
            done: false,
        }
    }

    /// Adds a limit; the stream continues only while all limits return
    /// `true`.
    pub fn limit<L>(mut self, limit: L) -> Self
    where
        L: Limit<G, C> + 'a,
    {
        self.limits.push(Box::new(limit));
        self
    }

    /// The number of results evolved so far.
    pub fn total_generations(&self) -> u64 {
        self.total_generations
    }

    /// Consumes the stream and returns the result with the best phenotype.
    ///
    /// # Errors
    ///
    /// Returns the first evolve error.
    pub fn best_result(self) -> Result<Option<EvolutionResult<G, C>>> {
        let mut best: Option<EvolutionResult<G, C>> = None;
        for result in self {
            let result = result?;
            best = match best {
                Some(current) if current.compare(&result).is_ge() => Some(current),
                _ => Some(result),
            };
        }
        Ok(best)
    }

    /// Consumes the stream and returns the best phenotype of all results.
    pub fn best_phenotype(self) -> Result<Option<Arc<Phenotype<G, C>>>> {
        Ok(self
            .best_result()?
            .and_then(|result| result.best_phenotype().cloned()))
    }

    /// Consumes the stream and returns the genotype of the best phenotype.
    pub fn best_genotype(self) -> Result<Option<Genotype<G>>> {
        Ok(self
            .best_phenotype()?
            .map(|phenotype| phenotype.genotype().clone()))
    }

    /// Consumes the stream and decodes the best genotype with `codec`.
    pub fn best_value<T, K>(self, codec: &K) -> Result<Option<T>>
    where
        K: Codec<T, G> + ?Sized,
    {
        Ok(self.best_genotype()?.map(|genotype| codec.decode(&genotype)))
    }

    fn next_start(&mut self) -> Option<Result<EvolutionStart<G, C>>> {
        if let Some(start) = self.start.take() {
            return Some(Ok(start));
        }
        self.supplier.take().map(|supplier| supplier())
    }
}

impl<G: Gene, C: Fitness> Iterator for EvolutionStream<'_, G, C> {
    type Item = Result<EvolutionResult<G, C>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = match self.next_start()? {
            Ok(start) => start,
            Err(e) => {
                warn!(error = %e, "failed to create the initial population");
                self.done = true;
                return Some(Err(e));
            }
        };

        let result = match (self.evolve)(&start) {
            Ok(result) => result,
            Err(e) => {
                warn!(generation = start.generation(), error = %e, "evolution step failed");
                self.done = true;
                return Some(Err(e));
            }
        };

        self.total_generations += 1;
        let result = result.with_total_generations(self.total_generations);

        if !self.limits.iter_mut().all(|limit| limit.test(&result)) {
            debug!(
                generation = result.generation(),
                total_generations = self.total_generations,
                "evolution stream stopped by limit"
            );
            self.done = true;
            return None;
        }

        self.start = Some(result.next_start());
        Some(Ok(result))
    }
}

impl<G: Gene, C: Fitness> std::fmt::Debug for EvolutionStream<'_, G, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvolutionStream")
            .field("start", &self.start)
            .field("limits", &self.limits.len())
            .field("total_generations", &self.total_generations)
            .field("done", &self.done)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneticError;
    use crate::evolution::limits;
    use crate::evolution::result::EvolutionDurations;
    use crate::genetics::DoubleGene;
    use crate::optimize::Optimize;
    use crate::population::Population;
    use crate::seq::Seq;
    use crate::test_support::population_of;

    // Each generation's population holds a single individual whose fitness
    // is the generation number.
    fn counting_stream<'a>() -> EvolutionStream<'a, DoubleGene, f64> {
        EvolutionStream::new(
            || Ok(EvolutionStart::new(Population::new(), 1)),
            |start: &EvolutionStart<DoubleGene, f64>| {
                Ok(EvolutionResult::new(
                    Optimize::Maximum,
                    population_of(&[start.generation() as f64]),
                    start.generation(),
                    EvolutionDurations::ZERO,
                    0,
                    0,
                    0,
                ))
            },
        )
    }

    #[test]
    fn test_generations_advance() {
        let generations: Vec<u64> = counting_stream()
            .take(4)
            .map(|r| r.unwrap().generation())
            .collect();
        assert_eq!(generations, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_total_generations() {
        let totals: Vec<u64> = counting_stream()
            .take(3)
            .map(|r| r.unwrap().total_generations())
            .collect();
        assert_eq!(totals, vec![1, 2, 3]);
    }

    #[test]
    fn test_fixed_generation_yields_one_less() {
        let results: Vec<_> = counting_stream()
            .limit(limits::by_fixed_generation(3))
            .collect();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_limits_are_anded() {
        let results: Vec<_> = counting_stream()
            .limit(limits::by_fixed_generation(10))
            .limit(|r: &EvolutionResult<DoubleGene, f64>| r.generation() < 4)
            .collect();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_nothing_after_stop() {
        let mut stream = counting_stream().limit(limits::by_fixed_generation(2));
        assert!(stream.next().is_some());
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
        assert_eq!(stream.total_generations(), 2);
    }

    #[test]
    fn test_error_ends_stream() {
        let mut stream: EvolutionStream<'_, DoubleGene, f64> = EvolutionStream::new(
            || Ok(EvolutionStart::new(Population::new(), 1)),
            |_: &EvolutionStart<DoubleGene, f64>| Err(GeneticError::Selection("boom".to_string())),
        );
        assert!(matches!(stream.next(), Some(Err(GeneticError::Selection(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_best_result() {
        let best = counting_stream()
            .limit(limits::by_fixed_generation(6))
            .best_result()
            .unwrap()
            .unwrap();
        assert_eq!(best.generation(), 5);
        assert_eq!(best.best_fitness(), Some(&5.0));
    }

    #[test]
    fn test_best_phenotype_and_genotype() {
        let phenotype = counting_stream()
            .limit(limits::by_fixed_generation(4))
            .best_phenotype()
            .unwrap()
            .unwrap();
        assert_eq!(*phenotype.fitness(), 3.0);

        let genotype = counting_stream()
            .limit(limits::by_fixed_generation(4))
            .best_genotype()
            .unwrap()
            .unwrap();
        assert_eq!(genotype.chromosome().get(0).unwrap().value(), 3.0);
    }

    #[test]
    fn test_best_result_of_empty_stream() {
        let best = counting_stream()
            .limit(limits::by_fixed_generation(1))
            .best_result()
            .unwrap();
        assert!(best.is_none());
    }

    #[test]
    fn test_best_result_propagates_error() {
        let stream: EvolutionStream<'_, DoubleGene, f64> = EvolutionStream::new(
            || Err(GeneticError::EmptyPopulation),
            |_: &EvolutionStart<DoubleGene, f64>| unreachable!(),
        );
        assert_eq!(stream.best_result().unwrap_err(), GeneticError::EmptyPopulation);
    }
}
