//! reelbet - three-reel slot bet resolution
//!
//! Resolves single bets (symbol triple, win classification, payout) and runs
//! batches of spins for expectation, win rate and return-to-player. The
//! resolver is stateless apart from a read-only symbol catalog, so one
//! instance can be shared freely across threads.

pub mod api;
pub mod config;
pub mod errors;
pub mod games;

pub use config::{BetLimits, ConfigLoader, ReelbetConfig};
pub use errors::{BetError, ConfigurationError, ReelbetError, ReelbetResult};
pub use games::{BetOptions, BetResolver, BetResponse, SpinStats, SymbolCatalog, WinType};
