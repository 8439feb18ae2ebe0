//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::{panic_message, CacheError};

/// Shortest interval the sweep will honour; a zero interval would spin.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

// == Sweep Target ==
/// Something that can drop its expired entries in one pass.
pub trait Sweep: Send + Sync + 'static {
    /// Runs one pass and returns how many entries were removed.
    fn sweep(&self) -> usize;
}

// == Observability Sink ==
/// Receives failures from background sweep passes.
///
/// Reporting is fire-and-forget: the sweep neither waits on nor inspects
/// the sink.
pub trait ObservabilitySink: Send + Sync + 'static {
    fn report(&self, error: &CacheError);
}

/// Default sink that logs failures through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ObservabilitySink for TracingSink {
    fn report(&self, error: &CacheError) {
        error!(error = %error, "TTL sweep failed");
    }
}

/// Spawns a background task that periodically sweeps `target`.
///
/// The task sleeps for `interval` between passes. A pass that panics is
/// reported to `sink` as [`CacheError::CleanupFailed`] and the loop carries
/// on with the next tick.
///
/// # Returns
/// A JoinHandle for the spawned task; aborting it stops the sweep.
///
/// # Example
/// ```ignore
/// let store = Arc::new(CacheStore::<String, String>::new());
/// let handle = spawn_sweep_task(store, Duration::from_secs(60), Arc::new(TracingSink));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<S>(
    target: Arc<S>,
    interval: Duration,
    sink: Arc<dyn ObservabilitySink>,
) -> JoinHandle<()>
where
    S: Sweep + ?Sized,
{
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            match panic::catch_unwind(AssertUnwindSafe(|| target.sweep())) {
                Ok(0) => debug!("TTL sweep: no expired entries found"),
                Ok(removed) => info!("TTL sweep: removed {} expired entries", removed),
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    sink.report(&CacheError::CleanupFailed(format!(
                        "Error cleaning up the cache: {reason}"
                    )));
                }
            }
        }
    })
}
