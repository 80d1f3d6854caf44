//! DCA Simulator Core - Domain entities, services, and traits.
//!
//! This crate contains the simulation engine for recurring-investment
//! (dollar-cost-averaging) strategies: schedule generation, allocation
//! normalization, deterministic execution over historical prices,
//! aggregation, and transaction reporting.
//!
//! It is storage- and UI-agnostic: asset resolution and run persistence are
//! traits implemented by collaborators, and historical prices arrive through
//! the `dcasim-market-data` crate.

pub mod assets;
pub mod constants;
pub mod errors;
pub mod pricing;
pub mod scenario;
pub mod schedule;
pub mod simulation;
pub mod utils;

// Re-export common types from scenario and simulation modules
pub use scenario::*;
pub use simulation::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
