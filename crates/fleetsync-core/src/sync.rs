//! Background sync worker registration
//!
//! The host may provide an external background-update agent, typically a
//! service worker. The core only attempts registration and records the
//! outcome; a failure leaves the app fully functional without background
//! sync.

/// An external background-update agent supplied by the host
pub trait SyncWorker: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Install/register the worker with the host environment
    fn register(&self) -> anyhow::Result<()>;
}

/// Register a background sync worker, logging the outcome
///
/// Returns whether registration took. Failure is logged and swallowed,
/// never raised.
pub fn register_sync_worker(worker: &dyn SyncWorker) -> bool {
    match worker.register() {
        Ok(()) => {
            tracing::info!(worker = worker.name(), "background sync worker registered");
            true
        }
        Err(e) => {
            tracing::warn!(
                worker = worker.name(),
                error = %e,
                "background sync worker registration failed"
            );
            false
        }
    }
}
