//! HTTP Handlers
//!
//! Thin request/response mapping over the use cases. Identity resolution
//! is an upstream middleware concern; handlers trust the resolved
//! `userId` path segment.

use crate::application::add_earned::AddEarnedCreditsUseCase;
use crate::application::claim::ClaimCreditsUseCase;
use crate::application::config::LedgerConfig;
use crate::application::record_quiz_result::{RecordQuizResultInput, RecordQuizResultUseCase};
use crate::domain::repository::{CreditStore, MultiplierResolver};
use crate::domain::value_objects::{QuizCategory, QuizOutcome};
use crate::error::{LedgerError, LedgerResult};
use crate::presentation::dto::{
    BalanceResponse, ClaimRequest, CreateAccountRequest, CreateAccountResponse, EarnRequest,
    MultiplierRequest, QuizResultRequest, QuizResultResponse,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;
use uuid::Uuid;

/// Shared state for ledger handlers
#[derive(Clone)]
pub struct LedgerAppState<R>
where
    R: CreditStore + MultiplierResolver + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<LedgerConfig>,
}

/// POST /api/credits/accounts
pub async fn create_account<R>(
    State(state): State<LedgerAppState<R>>,
    body: Option<Json<CreateAccountRequest>>,
) -> LedgerResult<impl IntoResponse>
where
    R: CreditStore + MultiplierResolver + Clone + Send + Sync + 'static,
{
    let user_id = body
        .and_then(|Json(req)| req.user_id)
        .unwrap_or_else(Uuid::new_v4);

    state.repo.create_account(user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse { user_id }),
    ))
}

/// GET /api/credits/accounts/{userId}/balance
pub async fn get_balance<R>(
    State(state): State<LedgerAppState<R>>,
    Path(user_id): Path<Uuid>,
) -> LedgerResult<Json<BalanceResponse>>
where
    R: CreditStore + MultiplierResolver + Clone + Send + Sync + 'static,
{
    let account = state.repo.get_account(user_id).await?;

    Ok(Json(BalanceResponse {
        earned_credits: account.earned_credits,
        claimed_credits: account.claimed_credits,
        available_credits: account.available_credits(),
    }))
}

/// POST /api/credits/accounts/{userId}/quiz-results
pub async fn record_quiz_result<R>(
    State(state): State<LedgerAppState<R>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<QuizResultRequest>,
) -> LedgerResult<Json<QuizResultResponse>>
where
    R: CreditStore + MultiplierResolver + Clone + Send + Sync + 'static,
{
    let category = QuizCategory::new(req.category).ok_or(LedgerError::InvalidOutcome)?;
    let outcome = QuizOutcome::new(req.score, req.total).ok_or(LedgerError::InvalidOutcome)?;

    let use_case = RecordQuizResultUseCase::new(state.repo.clone(), state.repo.clone());
    let output = use_case
        .execute(user_id, RecordQuizResultInput { category, outcome })
        .await?;

    Ok(Json(QuizResultResponse {
        credits_earned: output.credits_earned,
        multiplier: output.multiplier,
    }))
}

/// POST /api/credits/accounts/{userId}/earnings
///
/// Direct earn endpoint for collaborators that already computed the
/// amount (the quiz-results endpoint is the usual path).
pub async fn add_earned<R>(
    State(state): State<LedgerAppState<R>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<EarnRequest>,
) -> LedgerResult<impl IntoResponse>
where
    R: CreditStore + MultiplierResolver + Clone + Send + Sync + 'static,
{
    let use_case = AddEarnedCreditsUseCase::new(state.repo.clone());
    use_case.execute(user_id, req.amount).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/credits/accounts/{userId}/claims
pub async fn claim_credits<R>(
    State(state): State<LedgerAppState<R>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ClaimRequest>,
) -> LedgerResult<impl IntoResponse>
where
    R: CreditStore + MultiplierResolver + Clone + Send + Sync + 'static,
{
    let use_case = ClaimCreditsUseCase::new(state.repo.clone(), state.config.clone());
    use_case
        .execute(user_id, req.amount, req.expected_claimed)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/credits/accounts/{userId}/multipliers/{category}
pub async fn set_multiplier<R>(
    State(state): State<LedgerAppState<R>>,
    Path((user_id, category)): Path<(Uuid, String)>,
    Json(req): Json<MultiplierRequest>,
) -> LedgerResult<impl IntoResponse>
where
    R: CreditStore + MultiplierResolver + Clone + Send + Sync + 'static,
{
    let category = QuizCategory::new(category).ok_or(LedgerError::InvalidOutcome)?;
    state
        .repo
        .set_multiplier(user_id, &category, req.value)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
