use std::time::Duration;

use tsp_structs::config::MasterConfig;

/// How often a sub-problem is retried and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_ms: u64) -> Self {
        Self {
            max_attempts,
            backoff_ms,
        }
    }

    /// Single attempt, no delay.
    pub fn none() -> Self {
        Self::new(1, 0)
    }

    pub fn from_config(config: &MasterConfig) -> Self {
        Self::new(config.max_attempts, config.backoff_ms)
    }

    /// Attempts to make, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before `attempt` (0 based). The first attempt starts right away and
    /// every retry doubles the previous delay.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }

    /// Worker index for `attempt` of a sub-problem first assigned to `first`.
    pub fn worker_for(&self, first: usize, attempt: u32, num_workers: usize) -> usize {
        (first + attempt as usize) % num_workers
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&MasterConfig::default())
    }
}
