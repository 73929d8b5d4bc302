//! Regeneration Orchestrator
//!
//! `Idle -> Persisting -> Requesting -> (Succeeded | Failed)`
//!
//! Persistence always settles before the regeneration request goes out. A
//! failed persist is logged and the request is sent anyway. Only one
//! sequence runs at a time; the trigger is enabled only while `Idle`.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::domain::{ReferenceDataset, SolverResult};
use crate::edit::EditManager;
use crate::gateway::{CacheBuster, Gateway, TransportError};
use crate::loader::Reload;

use super::progress::{ProgressConfig, ProgressTicker};

/// Instruction shown when the backend cannot be reached
pub const START_BACKEND_HINT: &str =
    "Cannot connect to the scheduling backend. Start it with `cd backend && python api_server.py` and try again.";

/// Where the sequence currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenPhase {
    Idle,
    Persisting,
    Requesting,
    Succeeded,
    Failed,
}

impl RegenPhase {
    pub fn is_idle(self) -> bool {
        matches!(self, RegenPhase::Idle)
    }
}

impl fmt::Display for RegenPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegenPhase::Idle => "idle",
            RegenPhase::Persisting => "saving data",
            RegenPhase::Requesting => "generating schedule",
            RegenPhase::Succeeded => "done",
            RegenPhase::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// What the regeneration request carries
pub enum RegenMode<'a> {
    /// Management view: persist the editor's dataset, then send it inline
    Inline(&'a mut EditManager),
    /// Schedule view shortcut: no payload, the server uses what it holds
    ServerHeld,
}

/// Cache-defeating redirect to the schedule view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub refresh: CacheBuster,
}

impl Navigation {
    pub fn now() -> Self {
        Self {
            refresh: CacheBuster::now(),
        }
    }

    /// Root view URL with the `refresh` token
    pub fn url(&self) -> String {
        format!("/?refresh={}", self.refresh)
    }

    /// How the schedule view must load after following this redirect
    pub fn reload(&self) -> Reload {
        Reload::With(self.refresh)
    }
}

/// A completed regeneration
#[derive(Debug, Clone)]
pub struct RegenSuccess {
    pub result: SolverResult,
    pub navigation: Navigation,
}

/// Why a regeneration did not complete
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegenFailure {
    /// Backend could not be reached at all
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Backend answered, but not with success
    #[error("Regeneration failed: {}", .0.as_deref().unwrap_or("no detail"))]
    Rejected(Option<String>),

    /// Another sequence is still running
    #[error("Regeneration already in progress")]
    InFlight,
}

impl RegenFailure {
    /// Message for the user, distinct per failure class
    pub fn user_message(&self) -> String {
        match self {
            RegenFailure::Unreachable(_) => START_BACKEND_HINT.to_string(),
            RegenFailure::Rejected(Some(detail)) => format!("Error generating schedule: {}", detail),
            RegenFailure::Rejected(None) => "Failed to generate schedule.".to_string(),
            RegenFailure::InFlight => "A schedule is already being generated.".to_string(),
        }
    }
}

impl From<TransportError> for RegenFailure {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Unreachable(detail) => RegenFailure::Unreachable(detail),
            TransportError::Rejected { message, .. } => RegenFailure::Rejected(message),
            other => RegenFailure::Rejected(Some(other.to_string())),
        }
    }
}

/// Returns the orchestrator to `Idle` if a sequence is dropped mid-flight
struct InFlightGuard<'a> {
    phase: &'a watch::Sender<RegenPhase>,
    progress: &'a watch::Sender<u8>,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(phase: &'a watch::Sender<RegenPhase>, progress: &'a watch::Sender<u8>) -> Self {
        Self {
            phase,
            progress,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Regeneration abandoned while {}; returning to idle", *self.phase.borrow());
            self.progress.send_replace(0);
            self.phase.send_replace(RegenPhase::Idle);
        }
    }
}

/// Runs regeneration sequences for one view
pub struct RegenerationOrchestrator {
    gateway: Arc<dyn Gateway>,
    progress_config: ProgressConfig,
    phase: watch::Sender<RegenPhase>,
    progress: Arc<watch::Sender<u8>>,
}

impl RegenerationOrchestrator {
    pub fn new(gateway: Arc<dyn Gateway>, progress_config: ProgressConfig) -> Self {
        let (phase, _) = watch::channel(RegenPhase::Idle);
        let (progress, _) = watch::channel(0u8);
        Self {
            gateway,
            progress_config,
            phase,
            progress: Arc::new(progress),
        }
    }

    pub fn phase(&self) -> RegenPhase {
        *self.phase.borrow()
    }

    /// Whether the "Regenerate" control should be enabled
    pub fn trigger_enabled(&self) -> bool {
        self.phase().is_idle()
    }

    pub fn progress(&self) -> u8 {
        *self.progress.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<RegenPhase> {
        self.phase.subscribe()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    /// Return to `Idle` after a success the view chose not to leave
    pub fn reset(&self) {
        self.phase.send_replace(RegenPhase::Idle);
        self.progress.send_replace(0);
    }

    /// Atomically move `Idle -> Persisting`; false if a sequence is running
    fn try_begin(&self) -> bool {
        self.phase.send_if_modified(|phase| {
            if phase.is_idle() {
                *phase = RegenPhase::Persisting;
                true
            } else {
                false
            }
        })
    }

    /// Run one full sequence
    pub async fn run(&self, mode: RegenMode<'_>) -> Result<RegenSuccess, RegenFailure> {
        if !self.try_begin() {
            debug!("Regeneration requested while {}; ignoring", self.phase());
            return Err(RegenFailure::InFlight);
        }

        let guard = InFlightGuard::new(&self.phase, &self.progress);
        let outcome = self.sequence(mode).await;
        guard.disarm();

        match outcome {
            Ok(success) => {
                self.progress.send_replace(100);
                self.phase.send_replace(RegenPhase::Succeeded);
                info!("Regeneration succeeded, redirecting to {}", success.navigation.url());
                Ok(success)
            }
            Err(failure) => {
                self.phase.send_replace(RegenPhase::Failed);
                warn!("Regeneration failed: {}", failure);
                self.progress.send_replace(0);
                self.phase.send_replace(RegenPhase::Idle);
                Err(failure)
            }
        }
    }

    async fn sequence(&self, mode: RegenMode<'_>) -> Result<RegenSuccess, RegenFailure> {
        let inline: Option<ReferenceDataset> = match mode {
            RegenMode::Inline(editor) => {
                match editor.persist_now().await {
                    Ok(_) => debug!("Reference data persisted before regeneration"),
                    Err(e) => warn!("Persist before regeneration failed, continuing: {}", e),
                }
                Some(editor.dataset().clone())
            }
            RegenMode::ServerHeld => None,
        };

        self.phase.send_replace(RegenPhase::Requesting);
        let ticker = ProgressTicker::start(self.progress_config, Arc::clone(&self.progress));
        let response = self.gateway.request_regeneration(inline.as_ref()).await;
        ticker.stop();

        let result = response?;
        if !result.success {
            return Err(RegenFailure::Rejected(result.error));
        }
        Ok(RegenSuccess {
            result,
            navigation: Navigation::now(),
        })
    }
}
