use std::sync::Arc;
use std::time::Duration;

use evostream::{
    evolution::{
        limits::{self, Limit},
        EvolutionDurations, EvolutionResult,
    },
    genetics::{Chromosome, DoubleGene, Genotype},
    optimize::Optimize,
    phenotype::{identity_scaler, FitnessFunction, Phenotype},
    population::Population,
    timing::{Clock, ManualClock},
};

fn result_with(values: &[f64], optimize: Optimize) -> EvolutionResult<DoubleGene, f64> {
    let function: FitnessFunction<DoubleGene, f64> =
        Arc::new(|genotype: &Genotype<DoubleGene>| genotype.gene().value());
    let population: Population<DoubleGene, f64> = values
        .iter()
        .map(|value| {
            let gene = DoubleGene::new(*value, -1000.0, 1000.0).unwrap();
            let genotype = Genotype::of(vec![Chromosome::of(vec![gene]).unwrap()]).unwrap();
            Arc::new(Phenotype::new(
                genotype,
                Arc::clone(&function),
                identity_scaler(),
                1,
            ))
        })
        .collect();

    EvolutionResult::new(optimize, population, 1, EvolutionDurations::ZERO, 0, 0, 0)
}

fn best(value: f64) -> EvolutionResult<DoubleGene, f64> {
    result_with(&[value, value - 1.0], Optimize::Maximum)
}

#[test]
fn test_steady_fitness_boundary() {
    for n in 1..=5 {
        let mut limit = limits::by_steady_fitness::<f64>(n).unwrap();
        let flat = best(10.0);

        // Baseline call.
        assert!(limit.test(&flat));
        // Exactly n further non-improving calls keep going.
        for call in 0..n {
            assert!(limit.test(&flat), "n = {n}, call {call} stopped early");
        }
        // Call n + 2 stops.
        assert!(!limit.test(&flat), "n = {n} did not stop");
    }
}

#[test]
fn test_steady_fitness_worse_values_are_steady() {
    let mut limit = limits::by_steady_fitness::<f64>(2).unwrap();
    assert!(limit.test(&best(10.0)));
    assert!(limit.test(&best(9.0)));
    assert!(limit.test(&best(8.0)));
    assert!(!limit.test(&best(7.0)));
}

#[test]
fn test_steady_fitness_improvement_resets() {
    let mut limit = limits::by_steady_fitness::<f64>(2).unwrap();
    assert!(limit.test(&best(1.0)));
    assert!(limit.test(&best(1.0)));
    assert!(limit.test(&best(1.0)));
    assert!(limit.test(&best(2.0)));
    assert!(limit.test(&best(2.0)));
    assert!(limit.test(&best(2.0)));
    assert!(!limit.test(&best(2.0)));
}

#[test]
fn test_steady_fitness_rejects_zero_generations() {
    assert!(limits::by_steady_fitness::<f64>(0).is_err());
}

#[test]
fn test_execution_time() {
    let clock = Arc::new(ManualClock::new());
    let shared: Arc<dyn Clock> = clock.clone();
    let mut limit = limits::by_execution_time_with_clock(Duration::from_millis(100), shared);
    let result = best(1.0);

    clock.advance(Duration::from_secs(5));
    assert!(Limit::<DoubleGene, f64>::test(&mut limit, &result));
    clock.advance(Duration::from_millis(99));
    assert!(Limit::<DoubleGene, f64>::test(&mut limit, &result));
    clock.advance(Duration::from_millis(1));
    assert!(!Limit::<DoubleGene, f64>::test(&mut limit, &result));
}

#[test]
fn test_fitness_threshold() {
    let mut maximizing = limits::by_fitness_threshold(5.0);
    assert!(maximizing.test(&result_with(&[1.0, 5.0], Optimize::Maximum)));
    assert!(!maximizing.test(&result_with(&[1.0, 5.5], Optimize::Maximum)));

    let mut minimizing = limits::by_fitness_threshold(5.0);
    assert!(minimizing.test(&result_with(&[5.0, 9.0], Optimize::Minimum)));
    assert!(!minimizing.test(&result_with(&[4.0, 9.0], Optimize::Minimum)));
}

#[test]
fn test_fitness_convergence() {
    let mut limit = limits::by_fitness_convergence(2, 4, 0.05).unwrap();
    let values = [1.0, 2.0, 4.0, 8.0, 8.0, 8.0, 8.0, 8.0];
    let verdicts: Vec<bool> = values.iter().map(|v| limit.test(&best(*v))).collect();

    // Windows: [1,2,4,8] short 6 long 3.75, [2,4,8,8] short 8 long 5.5,
    // [4,8,8,8] short 8 long 7, [8,8,8,8] converged.
    assert_eq!(
        verdicts,
        vec![true, true, true, true, true, true, false, false]
    );
}

#[test]
fn test_population_convergence() {
    let mut limit = limits::by_population_convergence(0.01).unwrap();
    assert!(limit.test(&result_with(&[10.0, 1.0], Optimize::Maximum)));
    assert!(!limit.test(&result_with(&[10.0, 10.0], Optimize::Maximum)));
}

#[test]
fn test_closure_limit() {
    let mut calls = 0;
    let mut limit = |_: &EvolutionResult<DoubleGene, f64>| {
        calls += 1;
        calls < 3
    };
    let result = best(1.0);
    assert!(limit.test(&result));
    assert!(limit.test(&result));
    assert!(!limit.test(&result));
}
