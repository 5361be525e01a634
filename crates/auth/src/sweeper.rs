use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::authenticator::Authenticator;

/// Spawn the periodic expiry sweep.
///
/// Runs every `sweep_interval` for the life of the process, removing OTP
/// and session records past their expiry rules so the store stays bounded
/// independent of request traffic.
pub fn spawn_sweeper(auth: Arc<Authenticator>) -> JoinHandle<()> {
    let interval = auth.config().sweep_interval;
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so we don't sweep
        // at startup.
        timer.tick().await;
        loop {
            timer.tick().await;
            match auth.sweep_expired().await {
                Ok(0) => {}
                Ok(n) => info!(removed = n, "expiry sweep removed dead auth records"),
                Err(e) => warn!(error = %e, "expiry sweep failed"),
            }
        }
    })
}
