//! Timestamp utilities for Rota
//!
//! Cache-defeating tokens and navigation targets are plain millisecond
//! timestamps; they carry no meaning beyond being fresh.

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
