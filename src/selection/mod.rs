pub mod elitist;
pub mod roulette;
pub mod selector;
pub mod tournament;

pub use elitist::EliteSelector;
pub use roulette::RouletteWheelSelector;
pub use selector::Selector;
pub use tournament::TournamentSelector;
