#![cfg(feature = "serde")]

use std::time::Duration;

use evostream::{
    evolution::{EvolutionDurations, EvolutionParams},
    optimize::Optimize,
    Mutator, SinglePointCrossover, TournamentSelector,
};

#[test]
fn test_params_from_json() {
    let params: EvolutionParams = serde_json::from_str(
        r#"{ "population_size": 10, "offspring_fraction": 0.4, "optimize": "Minimum" }"#,
    )
    .unwrap();

    assert_eq!(params.population_size(), 10);
    assert_eq!(params.offspring_fraction(), 0.4);
    assert_eq!(params.maximal_phenotype_age(), 70);
    assert_eq!(params.optimize(), Optimize::Minimum);
    assert!(params.validate().is_ok());
}

#[test]
fn test_params_round_trip() {
    let params = EvolutionParams::builder()
        .population_size(12)
        .maximal_phenotype_age(3)
        .build()
        .unwrap();
    let json = serde_json::to_string(&params).unwrap();
    let restored: EvolutionParams = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, params);
}

#[test]
fn test_durations_serialize() {
    let durations = EvolutionDurations {
        evolve: Duration::from_millis(5),
        ..EvolutionDurations::ZERO
    };
    let json = serde_json::to_value(durations).unwrap();
    assert_eq!(json["evolve"]["nanos"], 5_000_000);
}

#[test]
fn test_operators_from_json() {
    let mutator: Mutator = serde_json::from_str(r#"{ "probability": 0.2 }"#).unwrap();
    assert_eq!(mutator, Mutator::new(0.2).unwrap());

    let crossover: SinglePointCrossover =
        serde_json::from_str(r#"{ "probability": 0.6 }"#).unwrap();
    assert_eq!(crossover.probability(), 0.6);

    let selector: TournamentSelector =
        serde_json::from_str(r#"{ "tournament_size": 3 }"#).unwrap();
    assert_eq!(selector.tournament_size(), 3);
}

#[test]
fn test_operators_reject_invalid_json() {
    let error = serde_json::from_str::<Mutator>(r#"{ "probability": 1.5 }"#).unwrap_err();
    assert!(error.to_string().contains("Mutation probability"));

    assert!(serde_json::from_str::<SinglePointCrossover>(r#"{ "probability": -0.1 }"#).is_err());
    assert!(serde_json::from_str::<TournamentSelector>(r#"{ "tournament_size": 0 }"#).is_err());
}
