//! Claim Credits Use Case
//!
//! The invariant-checked side of the ledger. A claim proceeds
//! optimistically from an earned-credits snapshot and detects conflicts at
//! commit time via the store's atomic guard-and-mutate primitive, retrying
//! under a bounded policy instead of taking a lock up front.

use crate::application::config::LedgerConfig;
use crate::domain::repository::CreditStore;
use crate::error::{LedgerError, LedgerResult};
use std::sync::Arc;
use uuid::Uuid;

/// Claim Credits Use Case
///
/// Every attempt either commits exactly once or the whole call fails
/// loudly; no request is silently lost. `ClaimRejected` after the retry
/// budget means the claimable balance was genuinely insufficient at the
/// time of the request (or a concurrent claim won the race), which is a
/// normal rejection, not a fault.
pub struct ClaimCreditsUseCase<R>
where
    R: CreditStore,
{
    credit_store: Arc<R>,
    config: Arc<LedgerConfig>,
}

impl<R> ClaimCreditsUseCase<R>
where
    R: CreditStore,
{
    pub fn new(credit_store: Arc<R>, config: Arc<LedgerConfig>) -> Self {
        Self {
            credit_store,
            config,
        }
    }

    /// Claim `amount` credits for `user_id`.
    ///
    /// `pinned_claimed`, when supplied, additionally requires the claimed
    /// counter to still equal that value at commit time (optimistic
    /// versioning for callers that displayed a balance to the user).
    pub async fn execute(
        &self,
        user_id: Uuid,
        amount: i64,
        pinned_claimed: Option<i64>,
    ) -> LedgerResult<()> {
        if amount <= 0 {
            tracing::debug!(user_id = %user_id, amount = amount, "Non-positive claim amount");
            return Err(LedgerError::InvalidAmount);
        }

        let policy = &self.config.retry;
        // Unknown accounts surface here, before any attempt is spent.
        let mut earned = self.credit_store.get_earned(user_id).await?;

        for attempt in 0..policy.max_attempts {
            let applied = self
                .credit_store
                .conditional_add_claimed(user_id, amount, earned, pinned_claimed)
                .await?;

            if applied {
                tracing::info!(
                    user_id = %user_id,
                    amount = amount,
                    attempt = attempt,
                    "Claim committed"
                );
                return Ok(());
            }

            if attempt + 1 == policy.max_attempts {
                break;
            }

            // A moved snapshot means the guard failed because of a
            // concurrent earn, not real contention: retry immediately with
            // the fresh value. An unchanged snapshot points at a competing
            // claim, so back off and give it time to finish.
            let fresh = self.credit_store.get_earned(user_id).await?;
            if fresh == earned {
                tokio::time::sleep(policy.delay_for(attempt)).await;
            } else {
                tracing::debug!(
                    user_id = %user_id,
                    stale = earned,
                    fresh = fresh,
                    "Earned snapshot moved, retrying without backoff"
                );
            }
            earned = fresh;
        }

        tracing::warn!(
            user_id = %user_id,
            amount = amount,
            attempts = policy.max_attempts,
            "Claim validation failed after retries"
        );
        Err(LedgerError::ClaimRejected)
    }
}
