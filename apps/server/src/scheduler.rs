//! Background scheduler for the periodic rate broadcast.
//!
//! Runs `broadcast` once after a start-up delay and then on a fixed
//! interval until the server shuts down.

use std::sync::Arc;

use ratecast_core::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::main_lib::AppState;

/// Initial delay before the first broadcast (60 seconds to let server fully start)
const INITIAL_DELAY_SECS: u64 = 60;

/// Upper bound for one scheduled broadcast
const BROADCAST_TIMEOUT_SECS: u64 = 10 * 60;

/// Spawn the broadcast loop with the default start-up delay.
pub fn start_broadcast_scheduler(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    spawn_broadcast_loop(state, Duration::from_secs(INITIAL_DELAY_SECS), every)
}

pub(crate) fn spawn_broadcast_loop(
    state: Arc<AppState>,
    initial_delay: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Broadcast scheduler started ({}s interval)", every.as_secs());

        let root = state.shutdown.context();
        let mut ticks = interval_at(Instant::now() + initial_delay, every);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = root.cancelled() => break,
                _ = ticks.tick() => run_scheduled_broadcast(&state).await,
            }
        }

        info!("Broadcast scheduler stopped");
    })
}

/// Runs a single scheduled broadcast.
async fn run_scheduled_broadcast(state: &Arc<AppState>) {
    info!("Running scheduled rate broadcast...");
    let ctx = state
        .shutdown
        .context()
        .with_timeout(Duration::from_secs(BROADCAST_TIMEOUT_SECS));

    match state.notification_service.broadcast(&ctx).await {
        Ok(result) if result.failed_recipients.is_empty() => {
            info!("Scheduled broadcast delivered to {} subscribers", result.subscribers)
        }
        Ok(result) => warn!(
            "Scheduled broadcast failed for {} of {} subscribers: {:?}",
            result.failed_recipients.len(),
            result.subscribers,
            result.failed_recipients
        ),
        Err(e @ (Error::Cancelled | Error::DeadlineExceeded)) => {
            warn!("Scheduled broadcast interrupted: {}", e)
        }
        Err(e) => error!("Scheduled broadcast failed: {}", e),
    }
}
