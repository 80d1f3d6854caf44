mod aggregator;
mod engine;
mod model;
mod reporter;
mod repository;
mod service;
mod traits;


pub use aggregator::aggregate;
pub use engine::execute;
pub use model::{BreakdownRow, DealLog, SimulationResult, SimulationRunSummary};
pub use reporter::{monthly_summaries, transactions, AssetTransaction, MonthlySummary, Transaction};
pub use repository::InMemorySimulationRepository;
pub use service::{SimulationState, SimulatorService};
pub use traits::SimulationRepositoryTrait;
