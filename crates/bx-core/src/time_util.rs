//! Wall-clock helpers.
//!
//! BTCEXA stamps signed requests and socket auth frames with the current
//! Unix time in milliseconds.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as **milliseconds** since Unix epoch.
#[inline]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
