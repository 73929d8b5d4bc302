//! Cosmetic progress for a regeneration request.
//!
//! The value advances on a fixed timer and stops below 100. Only the
//! orchestrator sets 100, and only once the real response has arrived.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Highest value the timer may reach on its own
pub const MAX_TIMER_PROGRESS: u8 = 99;

/// Timer settings for the progress indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressConfig {
    pub tick: Duration,
    pub step: u8,
    pub cap: u8,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(500),
            step: 10,
            cap: 90,
        }
    }
}

impl ProgressConfig {
    pub fn new(tick: Duration, step: u8, cap: u8) -> Self {
        Self {
            tick,
            step: step.max(1),
            cap: cap.min(MAX_TIMER_PROGRESS),
        }
    }

    /// Value shown after `ticks` timer ticks
    pub fn value_after(&self, ticks: u32) -> u8 {
        let raw = u32::from(self.step).saturating_mul(ticks);
        raw.min(u32::from(self.cap)) as u8
    }
}

/// Background task advancing the shared progress value
pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    pub fn start(config: ProgressConfig, progress: Arc<watch::Sender<u8>>) -> Self {
        progress.send_replace(0);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.tick);
            // first tick completes immediately
            interval.tick().await;
            let mut ticks = 0u32;
            loop {
                interval.tick().await;
                ticks = ticks.saturating_add(1);
                let value = config.value_after(ticks);
                progress.send_if_modified(|p| {
                    if *p < value {
                        *p = value;
                        true
                    } else {
                        false
                    }
                });
                if value >= config.cap {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop advancing; the last value stays put
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
