//! Store metrics.

use metrics::{counter, histogram};
use std::time::Instant;

/// Record how long a store operation took.
pub fn record_store_duration(store: &str, operation: &'static str, duration_secs: f64) {
    histogram!(
        "store_operation_duration_seconds",
        "store" => store.to_string(),
        "operation" => operation
    )
    .record(duration_secs);
}

/// Count a persisted value that could not be read and was reset to its default.
pub fn record_store_recovery(store: &str) {
    counter!("store_recoveries_total", "store" => store.to_string()).increment(1);
}

/// Times one store operation.
///
/// ```ignore
/// let timer = StoreTimer::new("token-storage", "save");
/// backend.save(key, &bytes)?;
/// timer.record();
/// ```
pub struct StoreTimer {
    store: String,
    operation: &'static str,
    start: Instant,
}

impl StoreTimer {
    pub fn new(store: impl Into<String>, operation: &'static str) -> Self {
        Self {
            store: store.into(),
            operation,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_store_duration(&self.store, self.operation, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_timer_creation() {
        let timer = StoreTimer::new("account-storage", "load");
        assert_eq!(timer.store, "account-storage");
        assert_eq!(timer.operation, "load");
        timer.record();
    }
}
