//! In-Memory Repository Implementation
//!
//! Single-process backend with no external database. There is no
//! database-level atomicity to lean on, so atomicity is emulated with a
//! transaction queue: one `tokio::sync::Mutex` guarding all ledger state.
//! The mutex admits waiters in FIFO order, so at most one logical
//! transaction executes at a time and queued operations resolve in
//! submission order. `conditional_add_claimed` runs its guard checks and
//! the mutation inside one lock acquisition, so no other mutation can be
//! observed between the check and the write.
//!
//! The queue is process-wide rather than per-account. Claims are
//! infrequent relative to request volume, so global serialization is an
//! acceptable trade for not managing fine-grained locks.

use crate::domain::entities::{CreditAccount, DEFAULT_MULTIPLIER};
use crate::domain::repository::{CreditStore, MultiplierResolver};
use crate::domain::value_objects::QuizCategory;
use crate::error::{LedgerError, LedgerResult};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct AccountCounters {
    earned_credits: i64,
    claimed_credits: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct LedgerState {
    accounts: HashMap<Uuid, AccountCounters>,
    multipliers: HashMap<(Uuid, String), i64>,
}

/// In-memory backed repository
#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    state: Arc<Mutex<LedgerState>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CreditStore for MemoryLedgerStore {
    async fn create_account(&self, user_id: Uuid) -> LedgerResult<()> {
        let mut state = self.state.lock().await;
        state.accounts.entry(user_id).or_insert(AccountCounters {
            earned_credits: 0,
            claimed_credits: 0,
            created_at: Utc::now(),
        });

        tracing::info!(user_id = %user_id, "Credit account provisioned");
        Ok(())
    }

    async fn get_earned(&self, user_id: Uuid) -> LedgerResult<i64> {
        let state = self.state.lock().await;
        state
            .accounts
            .get(&user_id)
            .map(|a| a.earned_credits)
            .ok_or(LedgerError::AccountNotFound)
    }

    async fn get_claimed(&self, user_id: Uuid) -> LedgerResult<i64> {
        let state = self.state.lock().await;
        state
            .accounts
            .get(&user_id)
            .map(|a| a.claimed_credits)
            .ok_or(LedgerError::AccountNotFound)
    }

    async fn get_account(&self, user_id: Uuid) -> LedgerResult<CreditAccount> {
        let state = self.state.lock().await;
        state
            .accounts
            .get(&user_id)
            .map(|a| CreditAccount {
                user_id,
                earned_credits: a.earned_credits,
                claimed_credits: a.claimed_credits,
                created_at: a.created_at,
            })
            .ok_or(LedgerError::AccountNotFound)
    }

    async fn add_earned(&self, user_id: Uuid, amount: i64) -> LedgerResult<()> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .get_mut(&user_id)
            .ok_or(LedgerError::AccountNotFound)?;

        account.earned_credits = account.earned_credits.saturating_add(amount);

        tracing::info!(
            user_id = %user_id,
            amount = amount,
            earned = account.earned_credits,
            "Earned credits added"
        );
        Ok(())
    }

    async fn conditional_add_claimed(
        &self,
        user_id: Uuid,
        amount: i64,
        max_earned_floor: i64,
        expected_claimed: Option<i64>,
    ) -> LedgerResult<bool> {
        // One queued transaction: guards and mutation are not separable.
        let mut state = self.state.lock().await;
        let Some(account) = state.accounts.get_mut(&user_id) else {
            return Ok(false);
        };

        // An amount large enough to overflow the counter can never satisfy
        // `claimed + amount <= earned`, so overflow is a guard failure.
        let Some(candidate) = account.claimed_credits.checked_add(amount) else {
            return Ok(false);
        };
        if candidate > account.earned_credits {
            return Ok(false);
        }
        if account.earned_credits < max_earned_floor {
            return Ok(false);
        }
        if let Some(expected) = expected_claimed {
            if account.claimed_credits != expected {
                return Ok(false);
            }
        }

        account.claimed_credits = candidate;

        tracing::info!(
            user_id = %user_id,
            amount = amount,
            claimed = account.claimed_credits,
            "Credits claimed"
        );
        Ok(true)
    }
}

impl MultiplierResolver for MemoryLedgerStore {
    async fn multiplier_for(&self, user_id: Uuid, category: &QuizCategory) -> LedgerResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .multipliers
            .get(&(user_id, category.as_str().to_string()))
            .copied()
            .unwrap_or(DEFAULT_MULTIPLIER))
    }

    async fn set_multiplier(
        &self,
        user_id: Uuid,
        category: &QuizCategory,
        value: i64,
    ) -> LedgerResult<()> {
        if value < 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let mut state = self.state.lock().await;
        state
            .multipliers
            .insert((user_id, category.as_str().to_string()), value);

        tracing::info!(
            user_id = %user_id,
            category = %category,
            value = value,
            "Multiplier set"
        );
        Ok(())
    }
}
