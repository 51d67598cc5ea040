//! Application Configuration
//!
//! Configuration for the ledger application layer.

use std::time::Duration;

/// Retry policy for the optimistic claim loop
///
/// Kept as an explicit value rather than inlined control flow so the
/// attempt bound and backoff curve are independently verifiable. Retry
/// exists specifically for the optimistic-concurrency race; infrastructure
/// faults propagate immediately and are never retried here.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts before the claim fails with `ClaimRejected`
    pub max_attempts: u32,
    /// Base delay for exponential backoff between attempts
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the attempt after `attempt` (zero-based):
    /// `base_delay * 2^attempt`, i.e. 50/100/200ms under defaults.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    pub fn base_delay_ms(&self) -> u64 {
        self.base_delay.as_millis() as u64
    }
}

/// Ledger application configuration
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    pub retry: RetryPolicy,
}

impl LedgerConfig {
    /// Near-zero backoff profile so contention tests don't sleep for real
    pub fn fast_retry() -> Self {
        Self {
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
            },
        }
    }
}
