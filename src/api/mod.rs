//! Bet API Service
//!
//! HTTP boundary for the resolver: stake and spin-count checks, error mapping,
//! CORS and request tracking. Holds no state beyond the shared resolver.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
