use crate::shard::peer_client::ShardClientPool;
use crate::shard::service::ShardService;
use crate::topology::NodeInfo;
use std::sync::Arc;
use tokio::time;
use tokio::time::Duration;

/// ReplicationLoopHandle owns the background task that keeps a replica caught
/// up with its shard master. Dropping the handle stops the loop.
///
/// Each tick pulls at most one log entry from the master and applies it
/// through the replica's internal write path. Transient failures are logged
/// and retried on the next tick; the loop never terminates on its own.
pub struct ReplicationLoopHandle {
    // will be dropped
    _stopper: stop_signal::Stopper,
}

impl ReplicationLoopHandle {
    pub fn spawn_background_task(
        logger: slog::Logger,
        poll_interval: Duration,
        service: Arc<ShardService>,
        pool: Arc<ShardClientPool>,
        master: NodeInfo,
    ) -> Self {
        let (stopper, stop_check) = stop_signal::new();

        tokio::task::spawn(Self::replication_task(
            stop_check,
            logger,
            poll_interval,
            service,
            pool,
            master,
        ));

        ReplicationLoopHandle { _stopper: stopper }
    }

    async fn replication_task(
        stop_check: stop_signal::StopCheck,
        logger: slog::Logger,
        poll_interval: Duration,
        service: Arc<ShardService>,
        pool: Arc<ShardClientPool>,
        master: NodeInfo,
    ) {
        // Resume from wherever this node's own log left off (-1 if empty).
        // State and log are only ever rebuilt together, so the cursor can
        // never point past data the store doesn't have.
        let mut last_applied = service.last_log_entry().map(|e| e.index).unwrap_or(-1);
        slog::info!(
            logger,
            "Starting replication from master '{}' after index {}",
            master.name,
            last_applied
        );

        let mut interval = time::interval(poll_interval);
        loop {
            interval.tick().await;
            if stop_check.should_stop() {
                break;
            }

            let mut client = match pool.client_for(&master).await {
                Ok(client) => client,
                Err(e) => {
                    slog::warn!(logger, "Replication dial to master failed: {}", e);
                    continue;
                }
            };

            match client.next_log_entry(last_applied).await {
                Ok(Some(entry)) => {
                    let index = entry.index;
                    match service.apply_log_entry(entry) {
                        Ok(()) => {
                            slog::debug!(logger, "Applied replicated log entry {}", index);
                            last_applied = index;
                        }
                        Err(e) => {
                            slog::error!(logger, "Failed to apply log entry {}: {}", index, e);
                        }
                    }
                }
                Ok(None) => {
                    // Caught up. Nothing to do this cycle.
                }
                Err(status) => {
                    slog::warn!(logger, "Replication pull failed, will retry: {}", status);
                }
            }
        }
    }
}

mod stop_signal {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    pub struct Stopper {
        stop_signal: Arc<AtomicBool>,
    }

    pub struct StopCheck {
        stop_signal: Arc<AtomicBool>,
    }

    impl Drop for Stopper {
        fn drop(&mut self) {
            self.stop_signal.store(true, Ordering::Release);
        }
    }

    impl StopCheck {
        pub fn should_stop(&self) -> bool {
            self.stop_signal.load(Ordering::Acquire)
        }
    }

    pub fn new() -> (Stopper, StopCheck) {
        let stop_signal = Arc::new(AtomicBool::new(false));

        let stopper = Stopper {
            stop_signal: stop_signal.clone(),
        };
        let stop_check = StopCheck { stop_signal };

        (stopper, stop_check)
    }
}
