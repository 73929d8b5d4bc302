//! Regeneration Orchestrator - persist, request, then redirect
//!
//! This module provides:
//! - RegenerationOrchestrator with an observable phase
//! - Cosmetic progress that never reports completion early
//! - Failure classification into user-facing messages

pub mod orchestrator;
pub mod progress;

pub use orchestrator::{
    Navigation, RegenFailure, RegenMode, RegenPhase, RegenSuccess, RegenerationOrchestrator, START_BACKEND_HINT,
};
pub use progress::{MAX_TIMER_PROGRESS, ProgressConfig, ProgressTicker};
