//! Record Quiz Result Use Case
//!
//! Entry point of the earning data flow: quiz completion → raw score ×
//! multiplier → earned credits. The quiz engine that produced the
//! `(score, total)` outcome is an external collaborator; only the
//! conversion and the earn call live here.

use crate::domain::repository::{CreditStore, MultiplierResolver};
use crate::domain::services::earned_credits;
use crate::domain::value_objects::{QuizCategory, QuizOutcome};
use crate::error::LedgerResult;
use std::sync::Arc;
use uuid::Uuid;

/// Input DTO for recording a quiz result
#[derive(Debug, Clone)]
pub struct RecordQuizResultInput {
    pub category: QuizCategory,
    pub outcome: QuizOutcome,
}

/// Output DTO for recording a quiz result
#[derive(Debug, Clone)]
pub struct RecordQuizResultOutput {
    pub credits_earned: i64,
    pub multiplier: i64,
}

/// Record Quiz Result Use Case
pub struct RecordQuizResultUseCase<R, M>
where
    R: CreditStore,
    M: MultiplierResolver,
{
    credit_store: Arc<R>,
    multipliers: Arc<M>,
}

impl<R, M> RecordQuizResultUseCase<R, M>
where
    R: CreditStore,
    M: MultiplierResolver,
{
    pub fn new(credit_store: Arc<R>, multipliers: Arc<M>) -> Self {
        Self {
            credit_store,
            multipliers,
        }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        input: RecordQuizResultInput,
    ) -> LedgerResult<RecordQuizResultOutput> {
        let multiplier = self
            .multipliers
            .multiplier_for(user_id, &input.category)
            .await?;

        let credits = earned_credits(&input.outcome, multiplier);

        // Called even for zero credits so an unknown account still fails
        // with AccountNotFound.
        self.credit_store.add_earned(user_id, credits).await?;

        tracing::info!(
            user_id = %user_id,
            category = %input.category,
            score = input.outcome.score(),
            total = input.outcome.total(),
            multiplier = multiplier,
            credits = credits,
            "Quiz result recorded"
        );

        Ok(RecordQuizResultOutput {
            credits_earned: credits,
            multiplier,
        })
    }
}
