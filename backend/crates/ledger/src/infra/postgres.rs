//! PostgreSQL Repository Implementations
//!
//! The invariant `claimed <= earned` is expressed as a conditional UPDATE
//! whose WHERE clause encodes every guard, so the check-and-mutate step is
//! a single round trip and correctness rests on the database's own
//! row-level locking rather than any application-level lock.

use crate::domain::entities::{CreditAccount, DEFAULT_MULTIPLIER};
use crate::domain::repository::{CreditStore, MultiplierResolver};
use crate::domain::value_objects::QuizCategory;
use crate::error::{LedgerError, LedgerResult};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent schema bootstrap, called once at startup.
    ///
    /// Setup concern only; the CHECK constraints are a backstop, not the
    /// concurrency mechanism (that is the conditional UPDATE below).
    pub async fn ensure_schema(&self) -> LedgerResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS credit_accounts (
                user_id UUID PRIMARY KEY,
                earned_credits BIGINT NOT NULL DEFAULT 0
                    CHECK (earned_credits >= 0),
                claimed_credits BIGINT NOT NULL DEFAULT 0
                    CHECK (claimed_credits >= 0 AND claimed_credits <= earned_credits),
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quiz_multipliers (
                user_id UUID NOT NULL,
                quiz_category TEXT NOT NULL,
                multiplier BIGINT NOT NULL CHECK (multiplier >= 0),
                PRIMARY KEY (user_id, quiz_category)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Ledger schema ready");
        Ok(())
    }
}

impl CreditStore for PgLedgerRepository {
    async fn create_account(&self, user_id: Uuid) -> LedgerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO credit_accounts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        tracing::info!(user_id = %user_id, "Credit account provisioned");
        Ok(())
    }

    async fn get_earned(&self, user_id: Uuid) -> LedgerResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT earned_credits FROM credit_accounts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LedgerError::AccountNotFound)
    }

    async fn get_claimed(&self, user_id: Uuid) -> LedgerResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT claimed_credits FROM credit_accounts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LedgerError::AccountNotFound)
    }

    async fn get_account(&self, user_id: Uuid) -> LedgerResult<CreditAccount> {
        let row = sqlx::query_as::<_, CreditAccountRow>(
            r#"
            SELECT user_id, earned_credits, claimed_credits, created_at
            FROM credit_accounts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LedgerError::AccountNotFound)?;

        Ok(row.into_account())
    }

    async fn add_earned(&self, user_id: Uuid, amount: i64) -> LedgerResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE credit_accounts
            SET earned_credits = earned_credits + $2
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            tracing::warn!(user_id = %user_id, "Earn on unknown account");
            return Err(LedgerError::AccountNotFound);
        }

        tracing::info!(user_id = %user_id, amount = amount, "Earned credits added");
        Ok(())
    }

    async fn conditional_add_claimed(
        &self,
        user_id: Uuid,
        amount: i64,
        max_earned_floor: i64,
        expected_claimed: Option<i64>,
    ) -> LedgerResult<bool> {
        // Guards and mutation in one statement; rows_affected is the verdict.
        // The invariant check is written `claimed <= earned - $2` rather than
        // `claimed + $2 <= earned`: with non-negative counters and a positive
        // amount the subtraction cannot overflow BIGINT, so an absurdly large
        // amount is a plain guard failure instead of a database error. The SET
        // only runs once the guard holds, at which point the sum fits.
        let affected = match expected_claimed {
            Some(expected) => {
                sqlx::query(
                    r#"
                    UPDATE credit_accounts
                    SET claimed_credits = claimed_credits + $2
                    WHERE user_id = $1
                      AND claimed_credits <= earned_credits - $2
                      AND earned_credits >= $3
                      AND claimed_credits = $4
                    "#,
                )
                .bind(user_id)
                .bind(amount)
                .bind(max_earned_floor)
                .bind(expected)
                .execute(&self.pool)
                .await?
                .rows_affected()
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE credit_accounts
                    SET claimed_credits = claimed_credits + $2
                    WHERE user_id = $1
                      AND claimed_credits <= earned_credits - $2
                      AND earned_credits >= $3
                    "#,
                )
                .bind(user_id)
                .bind(amount)
                .bind(max_earned_floor)
                .execute(&self.pool)
                .await?
                .rows_affected()
            }
        };

        if affected == 1 {
            tracing::info!(user_id = %user_id, amount = amount, "Credits claimed");
            Ok(true)
        } else {
            tracing::debug!(user_id = %user_id, amount = amount, "Claim guard failed");
            Ok(false)
        }
    }
}

impl MultiplierResolver for PgLedgerRepository {
    async fn multiplier_for(&self, user_id: Uuid, category: &QuizCategory) -> LedgerResult<i64> {
        let value = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT multiplier FROM quiz_multipliers
            WHERE user_id = $1 AND quiz_category = $2
            "#,
        )
        .bind(user_id)
        .bind(category.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(value.unwrap_or(DEFAULT_MULTIPLIER))
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

        sqlx::query(
            r#"
            INSERT INTO quiz_multipliers (user_id, quiz_category, multiplier)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, quiz_category)
            DO UPDATE SET multiplier = EXCLUDED.multiplier
            "#,
        )
        .bind(user_id)
        .bind(category.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            user_id = %user_id,
            category = %category,
            value = value,
            "Multiplier set"
        );
        Ok(())
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct CreditAccountRow {
    user_id: Uuid,
    earned_credits: i64,
    claimed_credits: i64,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl CreditAccountRow {
    fn into_account(self) -> CreditAccount {
        CreditAccount {
            user_id: self.user_id,
            earned_credits: self.earned_credits,
            claimed_credits: self.claimed_credits,
            created_at: self.created_at,
        }
    }
}
