//! Entity identifiers.
//!
//! Articles and suggestions are keyed by their creation timestamp in
//! milliseconds. Two entities created within the same millisecond still get
//! distinct ids: the generator never hands out a value twice per process.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Returns a fresh timestamp-based id, strictly greater than any id issued
/// before by this process.
pub fn next_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ISSUED.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ISSUED.compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}
