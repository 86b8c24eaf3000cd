use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cheap shared counters for a single relayer direction: plain atomics, in
/// the teacher's `AppState` idiom (bare `AtomicBool`/`AtomicI64` fields
/// rather than a metrics-framework registry). A full Prometheus exporter is
/// metrics *wiring*, which spec.md §1 lists as out of scope; these counters
/// are the observability spec.md §6 does ask for.
#[derive(Debug, Default)]
pub struct Counters {
    pub relayed_total: AtomicU64,
    pub relayed_confirmed_total: AtomicU64,
}

/// Handle shared between the `MessageRelayer` and `ConfirmationReactor` for
/// one direction. Cloning is cheap (`Arc`); both tasks only ever increment.
#[derive(Debug, Clone, Default)]
pub struct RelayerMetrics {
    inner: Arc<Counters>,
}

impl RelayerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_relayed(&self) {
        self.inner.relayed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_relayed_confirmed(&self) {
        self.inner
            .relayed_confirmed_total
            .fetch_add(1, Ordering::Relaxed);
    }

    /// `(relayed_total, relayed_confirmed_total)`, for logging/tests.
    pub fn snapshot(&self) -> (u64, u64) {
        (
            self.inner.relayed_total.load(Ordering::Relaxed),
            self.inner.relayed_confirmed_total.load(Ordering::Relaxed),
        )
    }
}
