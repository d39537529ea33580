//! Upload key generation

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Build the storage key for an uploaded file: `{millis}-{original_name}`
pub fn upload_key(millis: i64, original_name: &str) -> String {
    format!("{}-{}", millis, original_name)
}

/// Millisecond clock that never hands out the same value twice.
///
/// Returns the wall-clock epoch millis, or the previous value plus one when
/// the clock has not moved (or went backwards).
#[derive(Debug, Default)]
pub struct KeyClock {
    last: AtomicI64,
}

impl KeyClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_millis(&self) -> i64 {
        self.next_after(Utc::now().timestamp_millis())
    }

    fn next_after(&self, now: i64) -> i64 {
        let mut issued = now;
        // fetch_update never fails with a closure that always returns Some
        let _ = self.last.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            issued = if now > last { now } else { last + 1 };
            Some(issued)
        });
        issued
    }
}
