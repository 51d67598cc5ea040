//! Add Earned Credits Use Case

use crate::domain::repository::CreditStore;
use crate::error::{LedgerError, LedgerResult};
use std::sync::Arc;
use uuid::Uuid;

/// Add Earned Credits Use Case
///
/// The unconditional, monotonic side of the ledger: earned credits only
/// grow through this path. Negative amounts are rejected before any
/// storage access (administrative corrections are a separate privileged
/// path, not this one).
pub struct AddEarnedCreditsUseCase<R>
where
    R: CreditStore,
{
    credit_store: Arc<R>,
}

impl<R> AddEarnedCreditsUseCase<R>
where
    R: CreditStore,
{
    pub fn new(credit_store: Arc<R>) -> Self {
        Self { credit_store }
    }

    pub async fn execute(&self, user_id: Uuid, amount: i64) -> LedgerResult<()> {
        if amount < 0 {
            tracing::debug!(user_id = %user_id, amount = amount, "Negative earn amount");
            return Err(LedgerError::InvalidAmount);
        }

        self.credit_store.add_earned(user_id, amount).await
    }
}
