//! Domain Entities
//!
//! Core business entities for the credit ledger domain.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// CreditAccount entity - the per-user pair of credit counters
///
/// Invariant: `claimed_credits <= earned_credits` at every observable
/// instant. The counters are owned by the store in use; this struct is a
/// read snapshot, never a cache to base decisions on.
#[derive(Debug, Clone)]
pub struct CreditAccount {
    pub user_id: Uuid,
    pub earned_credits: i64,
    pub claimed_credits: i64,
    pub created_at: DateTime<Utc>,
}

impl CreditAccount {
    /// Create a freshly provisioned account with both counters at zero
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            earned_credits: 0,
            claimed_credits: 0,
            created_at: Utc::now(),
        }
    }

    /// Credits still available for claiming
    pub fn available_credits(&self) -> i64 {
        self.earned_credits - self.claimed_credits
    }

    /// Whether the snapshot satisfies the ledger invariant
    pub fn is_consistent(&self) -> bool {
        self.claimed_credits >= 0 && self.claimed_credits <= self.earned_credits
    }
}

/// Multiplier applied when no row exists for a (user, quiz category) pair.
///
/// Multiplier rows are per-(user, category) earning amplifiers owned by the
/// multiplier store; the ledger only ever reads them.
pub const DEFAULT_MULTIPLIER: i64 = 1;
