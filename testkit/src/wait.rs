//! Generic poll-until-condition helper offered to harness consumers.
//!
//! The tool's own pipelines never suspend; this exists for tests that need to
//! wait for an external effect (a row appearing, a port opening) without
//! hand-rolling sleep loops.

use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;

/// Raised when a polled condition does not become true within its bound.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Condition not met within {timeout:?}")]
pub struct TimeoutError {
    pub timeout: Duration,
}

/// Polling cadence: evaluate, sleep `interval` if false, give up after
/// `timeout` overall.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Repeatedly evaluate `condition` until it returns true or the configured
/// timeout elapses.
pub async fn poll_until<F>(mut condition: F, config: PollConfig) -> Result<(), TimeoutError>
where
    F: FnMut() -> bool,
{
    let started = Instant::now();

    loop {
        if condition() {
            return Ok(());
        }

        if started.elapsed() >= config.timeout {
            return Err(TimeoutError {
                timeout: config.timeout,
            });
        }

        sleep(config.interval).await;
    }
}

/// [`poll_until`] with the default cadence (100ms interval, 5s bound).
pub async fn wait_for<F>(condition: F) -> Result<(), TimeoutError>
where
    F: FnMut() -> bool,
{
    poll_until(condition, PollConfig::default()).await
}
