//! Workflow controller: upload → normalize → generate → normalize.
//!
//! Owns the only writable [`WorkflowState`]. Every run takes a new run id;
//! a transition is applied only while that id is still the current one, so
//! responses that arrive after a reset or a newer run change nothing.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use super::state::{RunOutcome, WorkflowState};
use crate::config::BoothConfig;
use crate::error::{GenerationError, Slot, ValidationError, WorkflowError};
use crate::locator::LocatorNormalizer;
use crate::payload::Payload;
use crate::stages::{Endpoints, GenerationStage, UploadStage};
use crate::transport::Transport;

/// Explicit configuration for one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    pub backend_origin: String,
    pub placeholder_hosts: Vec<String>,
}

impl WorkflowOptions {
    pub fn new(backend_origin: impl Into<String>) -> Self {
        Self {
            backend_origin: backend_origin.into(),
            placeholder_hosts: crate::locator::DEFAULT_PLACEHOLDER_HOSTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn from_config(cfg: &BoothConfig) -> Self {
        Self {
            backend_origin: cfg.backend_origin.clone(),
            placeholder_hosts: cfg.placeholder_hosts.clone(),
        }
    }
}

pub struct WorkflowController<T> {
    upload: UploadStage<T>,
    generation: GenerationStage<T>,
    normalizer: LocatorNormalizer,
    state: watch::Sender<WorkflowState>,
    /// Id of the run allowed to publish transitions.
    active_run: Mutex<u64>,
}

impl<T: Transport> WorkflowController<T> {
    pub fn new(transport: Arc<T>, options: WorkflowOptions) -> Self {
        let endpoints = Endpoints::for_origin(&options.backend_origin);
        let (state, _) = watch::channel(WorkflowState::Idle);
        Self {
            upload: UploadStage::new(Arc::clone(&transport), endpoints.upload),
            generation: GenerationStage::new(transport, endpoints.generate),
            normalizer: LocatorNormalizer::with_placeholders(
                options.backend_origin,
                options.placeholder_hosts,
            ),
            state,
            active_run: Mutex::new(0),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Read-only subscription; receivers see every published transition.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Back to `Idle` from any state. A run still in flight is superseded.
    pub fn reset(&self) {
        let mut active = self.lock_active();
        *active += 1;
        self.state.send_replace(WorkflowState::Idle);
        tracing::info!(run = *active, "workflow reset");
    }

    /// Runs the whole workflow for two payloads.
    ///
    /// Never returns an error: every failure ends in `WorkflowState::Failed`.
    pub async fn run(&self, first: Option<Payload>, second: Option<Payload>) -> RunOutcome {
        let (first, second) = match (first, second) {
            (Some(a), Some(b)) => (a, b),
            (a, b) => {
                let err = WorkflowError::from(match (a, b) {
                    (None, Some(_)) => ValidationError::MissingPayload(Slot::First),
                    (Some(_), None) => ValidationError::MissingPayload(Slot::Second),
                    _ => ValidationError::NoPayloads,
                });
                tracing::warn!(error = %err, "run rejected");
                let state = WorkflowState::Failed {
                    message: err.user_message(),
                };
                self.begin(state.clone());
                return RunOutcome::Finished(state);
            }
        };

        let run = self.begin(WorkflowState::Busy);
        tracing::info!(run, "workflow started");

        let state = match self.execute(run, first, second).await {
            Ok(Some(result_locator)) => WorkflowState::Success { result_locator },
            Ok(None) => {
                tracing::warn!(run, "run superseded before generation");
                return RunOutcome::Superseded;
            }
            Err(e) => {
                tracing::warn!(run, error = %e, "workflow failed");
                WorkflowState::Failed {
                    message: e.user_message(),
                }
            }
        };

        if self.publish(run, state.clone()) {
            tracing::info!(run, state = ?state, "workflow finished");
            RunOutcome::Finished(state)
        } else {
            RunOutcome::Superseded
        }
    }

    /// `Ok(None)` when the run lost ownership before the generation request.
    async fn execute(
        &self,
        run: u64,
        first: Payload,
        second: Payload,
    ) -> Result<Option<String>, WorkflowError> {
        let (raw_first, raw_second) = self.upload.upload_both(first, second).await?;
        let first_locator = self.normalizer.normalize(&raw_first);
        let second_locator = self.normalizer.normalize(&raw_second);

        if !self.is_active(run) {
            return Ok(None);
        }

        let raw_result = self
            .generation
            .generate(&first_locator, &second_locator)
            .await?;
        let result = self.normalizer.normalize(&raw_result);
        if result.is_empty() {
            return Err(GenerationError::MissingResult.into());
        }
        Ok(Some(result))
    }

    /// Starts a new run id and publishes its first state.
    fn begin(&self, state: WorkflowState) -> u64 {
        let mut active = self.lock_active();
        *active += 1;
        self.state.send_replace(state);
        *active
    }

    /// Publishes `state` if `run` is still active.
    fn publish(&self, run: u64, state: WorkflowState) -> bool {
        let active = self.lock_active();
        if *active != run {
            tracing::warn!(run, active = *active, "discarding result of superseded run");
            return false;
        }
        self.state.send_replace(state);
        true
    }

    fn is_active(&self, run: u64) -> bool {
        *self.lock_active() == run
    }

    fn lock_active(&self) -> MutexGuard<'_, u64> {
        // The guarded value is a plain counter, so a poisoned lock is still usable.
        self.active_run
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
