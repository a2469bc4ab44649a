use std::future::Future;
use std::time::Duration;

/// Fixed-interval readiness gate: one initial check, then up to `retries`
/// further checks separated by `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    interval: Duration,
    retries: u32,
}

impl Poller {
    pub fn new(interval: Duration, retries: u32) -> Self {
        Self { interval, retries }
    }

    /// Total number of checks a failing predicate receives.
    pub fn max_checks(&self) -> u32 {
        self.retries + 1
    }

    /// Resolves to `Ok(true)` as soon as `check` does, `Ok(false)` once the
    /// retries are spent. An error from `check` ends polling immediately.
    pub async fn poll<F, Fut, E>(&self, mut check: F) -> Result<bool, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        if check().await? {
            return Ok(true);
        }
        for _ in 0..self.retries {
            tokio::time::sleep(self.interval).await;
            if check().await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
