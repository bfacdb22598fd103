//! Bounded, time-limited access to external I/O

use crate::error::{Result, RuntimeError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Shared limiter every list, geo-IP and repository call goes through
///
/// Caps the number of outstanding calls across all concurrent evaluations
/// and gives each call its own timeout. Waiting for a permit counts against
/// that timeout.
#[derive(Debug, Clone)]
pub struct IoLimiter {
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl IoLimiter {
    pub fn new(max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Permits not currently held
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `call` under a permit, failing with [`RuntimeError::Timeout`]
    /// when it does not finish in time
    pub async fn run<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let guarded = async {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| RuntimeError::LimiterClosed)?;
            call.await
        };

        match tokio::time::timeout(self.timeout, guarded).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("{} exceeded {:?}", operation, self.timeout);
                Err(RuntimeError::Timeout {
                    operation,
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }
}
