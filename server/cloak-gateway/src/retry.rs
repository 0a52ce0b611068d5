//! Retry combinator for backend calls.
//!
//! The delay before retry `n` (1-indexed) is `base_delay * 2^n`. Only
//! faults classified retriable are attempted again; argument, auth,
//! existence and expiry failures surface immediately.

use std::future::Future;
use std::time::Duration;

use error_common::Fault;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut call: F) -> Result<T, E>
where
    E: Fault,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        if attempt > 0 {
            tokio::time::sleep(policy.base_delay * 2u32.saturating_pow(attempt)).await;
        }

        match call().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if !e.code().is_retriable() || attempt >= max_attempts {
                    return Err(e);
                }
                debug!(attempt, code = %e.code(), "retrying backend call");
            }
        }
    }
}
