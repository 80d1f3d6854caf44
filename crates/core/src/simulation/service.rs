//! Simulation orchestration.
//!
//! The service owns the run lifecycle: validate, snapshot, resolve prices,
//! execute, aggregate, persist. One run is active at a time; starting a
//! new run cancels the previous one. Session state lives behind a std
//! mutex that is never held across an await point.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::{info, warn};
use tokio::sync::watch;

use dcasim_market_data::ProviderRegistry;

use crate::assets::AssetRepositoryTrait;
use crate::errors::{Error, Result};
use crate::pricing::PriceResolver;
use crate::scenario::{validate, ScenarioConfig, ScenarioSnapshot, ValidationReport};
use crate::schedule;

use super::model::SimulationResult;
use super::traits::SimulationRepositoryTrait;
use super::{aggregator, engine};

/// Lifecycle of the simulation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// No validated scenario yet.
    Idle,
    /// A scenario passed validation and can run.
    Ready,
    /// A run is in flight.
    Running,
    /// The last run finished and its result is available.
    Completed,
}

struct Session {
    state: SimulationState,
    cancel: Option<watch::Sender<bool>>,
    /// Monotonic run counter. A finishing run may only update session
    /// state when it is still the newest one.
    run_seq: u64,
    last_snapshot: Option<ScenarioSnapshot>,
    last_result: Option<SimulationResult>,
}

/// Entry point for running simulations.
pub struct SimulatorService {
    resolver: PriceResolver,
    repository: Arc<dyn SimulationRepositoryTrait>,
    session: Mutex<Session>,
}

impl SimulatorService {
    pub fn new(
        assets: Arc<dyn AssetRepositoryTrait>,
        registry: Arc<ProviderRegistry>,
        repository: Arc<dyn SimulationRepositoryTrait>,
    ) -> Self {
        Self {
            resolver: PriceResolver::new(assets, registry),
            repository,
            session: Mutex::new(Session {
                state: SimulationState::Idle,
                cancel: None,
                run_seq: 0,
                last_snapshot: None,
                last_result: None,
            }),
        }
    }

    /// Validate a scenario and move the session to `Ready` when it passes.
    pub fn validate_scenario(&self, config: &ScenarioConfig) -> ValidationReport {
        let report = validate(config);
        if report.is_ready() {
            let mut session = self.lock_session();
            if session.state == SimulationState::Idle {
                session.state = SimulationState::Ready;
            }
        }
        report
    }

    /// Run a scenario to completion.
    ///
    /// Validates, snapshots the configuration, then resolves prices and
    /// executes. A previously running simulation is cancelled first. On
    /// any failure the session returns to `Idle`.
    pub async fn run(&self, config: &ScenarioConfig) -> Result<SimulationResult> {
        let report = validate(config);
        if !report.is_ready() {
            return Err(Error::Configuration(report));
        }
        let snapshot = config.snapshot();

        let (token, mut cancel_rx) = {
            let (tx, rx) = watch::channel(false);
            let mut session = self.lock_session();
            if let Some(previous) = session.cancel.replace(tx) {
                let _ = previous.send(true);
            }
            session.run_seq += 1;
            session.state = SimulationState::Running;
            session.last_snapshot = Some(snapshot.clone());
            (session.run_seq, rx)
        };

        let outcome = self.run_inner(&snapshot, &mut cancel_rx).await;

        let mut session = self.lock_session();
        // A superseded run must not clobber the state of the run that
        // replaced it.
        if session.run_seq == token {
            session.cancel = None;
            match &outcome {
                Ok(result) => {
                    session.state = SimulationState::Completed;
                    session.last_result = Some(result.clone());
                }
                Err(_) => session.state = SimulationState::Idle,
            }
        }
        outcome
    }

    async fn run_inner(
        &self,
        snapshot: &ScenarioSnapshot,
        cancel_rx: &mut watch::Receiver<bool>,
    ) -> Result<SimulationResult> {
        let schedule = schedule::generate(snapshot)?;
        let codes: Vec<String> = snapshot
            .active_allocations()
            .iter()
            .map(|a| a.asset_code.clone())
            .collect();

        let prices = tokio::select! {
            resolved = self.resolver.resolve(&codes, snapshot.start_date, snapshot.end_date) => {
                resolved?
            }
            _ = cancel_rx.changed() => {
                info!("Simulation '{}' cancelled during price resolution", snapshot.name);
                return Err(Error::Cancelled);
            }
        };
        if *cancel_rx.borrow() {
            return Err(Error::Cancelled);
        }

        let deals = engine::execute(snapshot, &schedule, &prices);
        let result = aggregator::aggregate(snapshot, deals, &prices, Utc::now());
        info!(
            "Simulation '{}' completed: {} executed, {} skipped, invested {}",
            snapshot.name,
            result.executed_deal_count,
            result.skipped_deal_count,
            result.total_invested
        );

        // History is best effort; a storage failure does not invalidate
        // the computed result.
        if let Err(err) = self.repository.save(&result).await {
            warn!("Failed to persist simulation run: {err}");
        }

        Ok(result)
    }

    /// Cancel the in-flight run, if any.
    pub fn cancel(&self) {
        let mut session = self.lock_session();
        if let Some(cancel) = session.cancel.take() {
            let _ = cancel.send(true);
            session.state = SimulationState::Idle;
        }
    }

    /// Drop session state and return to `Idle`. Does not touch stored
    /// run history.
    pub fn reset(&self) {
        let mut session = self.lock_session();
        if let Some(cancel) = session.cancel.take() {
            let _ = cancel.send(true);
        }
        session.state = SimulationState::Idle;
        session.last_snapshot = None;
        session.last_result = None;
    }

    pub fn state(&self) -> SimulationState {
        self.lock_session().state
    }

    /// The configuration snapshot of the last started run.
    pub fn last_run_snapshot(&self) -> Option<ScenarioSnapshot> {
        self.lock_session().last_snapshot.clone()
    }

    /// The result of the last completed run.
    pub fn last_result(&self) -> Option<SimulationResult> {
        self.lock_session().last_result.clone()
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Session> {
        self.session.lock().expect("session lock poisoned")
    }
}
