//! In-memory run history.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::Result;

use super::model::{SimulationResult, SimulationRunSummary};
use super::traits::SimulationRepositoryTrait;

/// Default repository keeping run history in process memory.
#[derive(Default)]
pub struct InMemorySimulationRepository {
    runs: Mutex<Vec<(Uuid, SimulationResult)>>,
}

impl InMemorySimulationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SimulationRepositoryTrait for InMemorySimulationRepository {
    async fn save(&self, result: &SimulationResult) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let mut runs = self.runs.lock().expect("run history lock poisoned");
        runs.push((id, result.clone()));
        Ok(id)
    }

    async fn load_recent(&self, limit: usize) -> Result<Vec<SimulationRunSummary>> {
        let runs = self.runs.lock().expect("run history lock poisoned");
        Ok(runs
            .iter()
            .rev()
            .take(limit)
            .map(|(id, result)| SimulationRunSummary {
                id: *id,
                scenario_name: result.scenario_name.clone(),
                run_at: result.run_at,
                total_invested: result.total_invested,
                profit_pct: result.profit_pct,
            })
            .collect())
    }
}
