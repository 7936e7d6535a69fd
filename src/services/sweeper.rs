use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::throttle::ThrottleGuard;

/// Spawns a task that sweeps expired throttle entries every `interval`.
///
/// The first sweep runs one `interval` after the call. Time is read from the
/// tokio clock, so a paused runtime drives it too.
///
/// The task runs for the lifetime of the runtime; abort the handle to stop it.
pub fn spawn_sweeper(guard: Arc<ThrottleGuard>, interval: Duration) -> JoinHandle<()> {
    info!(?interval, "Starting throttle sweeper");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // first tick completes immediately
        loop {
            ticker.tick().await;
            let removed = guard.sweep_expired(tokio::time::Instant::now().into_std());
            if removed > 0 {
                info!(removed, remaining = guard.len(), "Swept expired verification entries");
            } else {
                debug!(remaining = guard.len(), "Sweep found nothing to remove");
            }
        }
    })
}
