//! # Evolution
//!
//! The generational engine, its configuration, and the stream of results it
//! produces.

pub mod builder;
pub mod engine;
pub mod executor;
pub mod limits;
pub mod options;
pub mod problem;
pub mod result;
pub mod stream;

pub use builder::EngineBuilder;
pub use engine::Engine;
pub use executor::Executor;
pub use limits::Limit;
pub use options::{EvolutionParams, EvolutionParamsBuilder};
pub use problem::{Codec, Problem};
pub use result::{EvolutionDurations, EvolutionResult, EvolutionStart};
pub use stream::EvolutionStream;
