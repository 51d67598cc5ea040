//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for POST /api/credits/accounts
///
/// `userId` is optional; omitted means the server mints one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Response for POST /api/credits/accounts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountResponse {
    pub user_id: Uuid,
}

/// Response for GET /api/credits/accounts/{userId}/balance
///
/// A point-in-time snapshot, not linearized with respect to concurrent
/// writers; clients must not assume it stays valid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub earned_credits: i64,
    pub claimed_credits: i64,
    pub available_credits: i64,
}

/// Request for POST /api/credits/accounts/{userId}/quiz-results
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultRequest {
    pub category: String,
    pub score: i64,
    pub total: i64,
}

/// Response for POST /api/credits/accounts/{userId}/quiz-results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultResponse {
    pub credits_earned: i64,
    pub multiplier: i64,
}

/// Request for POST /api/credits/accounts/{userId}/earnings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnRequest {
    pub amount: i64,
}

/// Request for POST /api/credits/accounts/{userId}/claims
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub amount: i64,
    /// Optional optimistic pin: the claim only commits while the claimed
    /// counter still equals this value
    #[serde(default)]
    pub expected_claimed: Option<i64>,
}

/// Request for PUT /api/credits/accounts/{userId}/multipliers/{category}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiplierRequest {
    pub value: i64,
}
