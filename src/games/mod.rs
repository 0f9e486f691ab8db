pub mod resolver;
pub mod simulation;
pub mod types;
pub mod weighted;
pub mod weights;

pub use resolver::BetResolver;
pub use simulation::SpinTotals;
pub use types::*;
pub use weights::{OutcomeWeights, SpinParameters, SymbolWeights};
