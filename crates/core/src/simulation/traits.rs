use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::Result;

use super::model::{SimulationResult, SimulationRunSummary};

/// Persists completed runs.
///
/// Identifiers are assigned at save time by the implementation, keeping
/// the simulation pipeline itself free of nondeterminism.
#[async_trait]
pub trait SimulationRepositoryTrait: Send + Sync {
    /// Store a completed run and return its assigned id.
    async fn save(&self, result: &SimulationResult) -> Result<Uuid>;

    /// The most recent stored runs, newest first.
    async fn load_recent(&self, limit: usize) -> Result<Vec<SimulationRunSummary>>;
}
