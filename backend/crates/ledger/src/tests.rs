//! Unit tests for the ledger crate

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use std::time::Duration;

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(50));
        assert_eq!(policy.base_delay_ms(), 50);
    }

    #[test]
    fn test_backoff_curve_doubles() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for(0), Duration::from_millis(50));
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    }

    #[test]
    fn test_fast_retry_profile() {
        let config = LedgerConfig::fast_retry();

        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.retry.base_delay <= Duration::from_millis(1));
    }
}

#[cfg(test)]
mod domain_tests {
    use crate::domain::entities::*;
    use crate::domain::services::earned_credits;
    use crate::domain::value_objects::*;
    use uuid::Uuid;

    #[test]
    fn test_account_starts_at_zero() {
        let account = CreditAccount::new(Uuid::new_v4());

        assert_eq!(account.earned_credits, 0);
        assert_eq!(account.claimed_credits, 0);
        assert_eq!(account.available_credits(), 0);
        assert!(account.is_consistent());
    }

    #[test]
    fn test_available_credits() {
        let mut account = CreditAccount::new(Uuid::new_v4());
        account.earned_credits = 100;
        account.claimed_credits = 40;

        assert_eq!(account.available_credits(), 60);
        assert!(account.is_consistent());

        account.claimed_credits = 101;
        assert!(!account.is_consistent());
    }

    #[test]
    fn test_quiz_category_validation() {
        assert!(QuizCategory::new("history").is_some());
        assert!(QuizCategory::new("  geography  ").is_some());
        assert!(QuizCategory::new("").is_none());
        assert!(QuizCategory::new("   ").is_none());
        assert!(QuizCategory::new("x".repeat(65)).is_none());

        let category = QuizCategory::new("  math ").unwrap();
        assert_eq!(category.as_str(), "math");
    }

    #[test]
    fn test_quiz_outcome_validation() {
        assert!(QuizOutcome::new(0, 0).is_some());
        assert!(QuizOutcome::new(7, 10).is_some());
        assert!(QuizOutcome::new(10, 10).is_some());
        assert!(QuizOutcome::new(11, 10).is_none());
        assert!(QuizOutcome::new(-1, 10).is_none());
        assert!(QuizOutcome::new(0, -1).is_none());
    }

    #[test]
    fn test_earned_credits_computation() {
        let outcome = QuizOutcome::new(7, 10).unwrap();

        assert_eq!(earned_credits(&outcome, 1), 7);
        assert_eq!(earned_credits(&outcome, 3), 21);
        assert_eq!(earned_credits(&outcome, 0), 0);
        // Negative multipliers never produce negative credits
        assert_eq!(earned_credits(&outcome, -5), 0);
        // Saturates instead of wrapping
        assert_eq!(earned_credits(&outcome, i64::MAX), i64::MAX);
    }
}

#[cfg(test)]
mod dto_tests {
    use crate::presentation::dto::*;

    #[test]
    fn test_balance_response_serialization() {
        let response = BalanceResponse {
            earned_credits: 100,
            claimed_credits: 40,
            available_credits: 60,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("earnedCredits"));
        assert!(json.contains("claimedCredits"));
        assert!(json.contains("availableCredits"));
    }

    #[test]
    fn test_claim_request_deserialization() {
        let json = r#"{"amount":50}"#;
        let request: ClaimRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.amount, 50);
        assert!(request.expected_claimed.is_none());
    }

    #[test]
    fn test_claim_request_with_pin() {
        let json = r#"{"amount":50,"expectedClaimed":0}"#;
        let request: ClaimRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.amount, 50);
        assert_eq!(request.expected_claimed, Some(0));
    }

    #[test]
    fn test_quiz_result_request_deserialization() {
        let json = r#"{"category":"history","score":7,"total":10}"#;
        let request: QuizResultRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.category, "history");
        assert_eq!(request.score, 7);
        assert_eq!(request.total, 10);
    }

    #[test]
    fn test_create_account_request_optional_id() {
        let request: CreateAccountRequest = serde_json::from_str("{}").unwrap();
        assert!(request.user_id.is_none());

        let json = r#"{"userId":"00000000-0000-0000-0000-000000000000"}"#;
        let request: CreateAccountRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.user_id, Some(uuid::Uuid::nil()));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(LedgerError, StatusCode)> = vec![
            (LedgerError::InvalidAmount, StatusCode::BAD_REQUEST),
            (LedgerError::AccountNotFound, StatusCode::NOT_FOUND),
            (LedgerError::ClaimRejected, StatusCode::CONFLICT),
            (LedgerError::InvalidOutcome, StatusCode::UNPROCESSABLE_ENTITY),
            (
                LedgerError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_error_display() {
        assert!(LedgerError::InvalidAmount.to_string().contains("amount"));
        assert!(
            LedgerError::ClaimRejected
                .to_string()
                .contains("cannot exceed earned")
        );
        assert!(
            LedgerError::AccountNotFound
                .to_string()
                .contains("not found")
        );
    }

    #[test]
    fn test_error_to_app_error_kind() {
        use kernel::error::kind::ErrorKind;

        assert_eq!(LedgerError::InvalidAmount.kind(), ErrorKind::BadRequest);
        assert_eq!(LedgerError::AccountNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(LedgerError::ClaimRejected.kind(), ErrorKind::Conflict);
    }
}

#[cfg(test)]
mod store_tests {
    use crate::domain::repository::{CreditStore, MultiplierResolver};
    use crate::domain::value_objects::QuizCategory;
    use crate::error::LedgerError;
    use crate::infra::memory::MemoryLedgerStore;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_account_is_idempotent() {
        let store = MemoryLedgerStore::new();
        let user = Uuid::new_v4();

        store.create_account(user).await.unwrap();
        store.add_earned(user, 10).await.unwrap();
        // Re-provisioning must not reset the counters
        store.create_account(user).await.unwrap();

        assert_eq!(store.get_earned(user).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_reads_on_unknown_account() {
        let store = MemoryLedgerStore::new();
        let user = Uuid::new_v4();

        assert!(matches!(
            store.get_earned(user).await,
            Err(LedgerError::AccountNotFound)
        ));
        assert!(matches!(
            store.get_claimed(user).await,
            Err(LedgerError::AccountNotFound)
        ));
        assert!(matches!(
            store.get_account(user).await,
            Err(LedgerError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn test_conditional_add_claimed_guards() {
        let store = MemoryLedgerStore::new();
        let user = Uuid::new_v4();
        store.create_account(user).await.unwrap();
        store.add_earned(user, 100).await.unwrap();

        // Would exceed earned
        assert!(!store.conditional_add_claimed(user, 101, 100, None).await.unwrap());
        // Earned floor not met (stale-snapshot guard)
        assert!(!store.conditional_add_claimed(user, 10, 200, None).await.unwrap());
        // Claimed pin mismatch
        assert!(!store.conditional_add_claimed(user, 10, 100, Some(5)).await.unwrap());
        // Unknown account is a guard failure, not an error
        assert!(
            !store
                .conditional_add_claimed(Uuid::new_v4(), 1, 0, None)
                .await
                .unwrap()
        );

        // Guard failures left state untouched
        assert_eq!(store.get_claimed(user).await.unwrap(), 0);

        // All guards hold
        assert!(store.conditional_add_claimed(user, 10, 100, Some(0)).await.unwrap());
        assert_eq!(store.get_claimed(user).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_overflowing_claim_amount_is_guard_failure() {
        // An amount that would overflow the claimed counter can never
        // satisfy the invariant; it must be reported as an ordinary guard
        // failure, not a panic or a wrapped negative counter.
        let store = MemoryLedgerStore::new();
        let user = Uuid::new_v4();
        store.create_account(user).await.unwrap();
        store.add_earned(user, 2).await.unwrap();
        assert!(store.conditional_add_claimed(user, 1, 0, None).await.unwrap());

        assert!(
            !store
                .conditional_add_claimed(user, i64::MAX, 0, None)
                .await
                .unwrap()
        );

        let account = store.get_account(user).await.unwrap();
        assert_eq!(account.claimed_credits, 1);
        assert!(account.is_consistent());
    }

    #[tokio::test]
    async fn test_multiplier_defaults_to_one() {
        let store = MemoryLedgerStore::new();
        let user = Uuid::new_v4();
        let category = QuizCategory::new("science").unwrap();

        assert_eq!(store.multiplier_for(user, &category).await.unwrap(), 1);

        store.set_multiplier(user, &category, 3).await.unwrap();
        assert_eq!(store.multiplier_for(user, &category).await.unwrap(), 3);

        assert!(matches!(
            store.set_multiplier(user, &category, -1).await,
            Err(LedgerError::InvalidAmount)
        ));
    }
}

#[cfg(test)]
mod ledger_tests {
    use crate::application::add_earned::AddEarnedCreditsUseCase;
    use crate::application::claim::ClaimCreditsUseCase;
    use crate::application::config::LedgerConfig;
    use crate::application::record_quiz_result::{RecordQuizResultInput, RecordQuizResultUseCase};
    use crate::domain::repository::{CreditStore, MultiplierResolver};
    use crate::domain::value_objects::{QuizCategory, QuizOutcome};
    use crate::error::LedgerError;
    use crate::infra::memory::MemoryLedgerStore;
    use std::sync::Arc;
    use uuid::Uuid;

    fn claim_use_case(
        store: &Arc<MemoryLedgerStore>,
    ) -> ClaimCreditsUseCase<MemoryLedgerStore> {
        ClaimCreditsUseCase::new(store.clone(), Arc::new(LedgerConfig::fast_retry()))
    }

    async fn provisioned(earned: i64) -> (Arc<MemoryLedgerStore>, Uuid) {
        let store = Arc::new(MemoryLedgerStore::new());
        let user = Uuid::new_v4();
        store.create_account(user).await.unwrap();
        if earned > 0 {
            store.add_earned(user, earned).await.unwrap();
        }
        (store, user)
    }

    #[tokio::test]
    async fn test_claim_within_balance_succeeds() {
        let (store, user) = provisioned(100).await;
        let claim = claim_use_case(&store);

        claim.execute(user, 50, None).await.unwrap();

        assert_eq!(store.get_claimed(user).await.unwrap(), 50);
        assert_eq!(store.get_earned(user).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_claim_beyond_remaining_rejected_and_state_unchanged() {
        let (store, user) = provisioned(100).await;
        let claim = claim_use_case(&store);

        claim.execute(user, 50, None).await.unwrap();

        // 51 > 100 - 50 remaining
        let result = claim.execute(user, 51, None).await;
        assert!(matches!(result, Err(LedgerError::ClaimRejected)));

        assert_eq!(store.get_claimed(user).await.unwrap(), 50);
        assert_eq!(store.get_earned(user).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_claim_on_zero_balance_rejected() {
        let (store, user) = provisioned(0).await;
        let claim = claim_use_case(&store);

        let result = claim.execute(user, 1, None).await;
        assert!(matches!(result, Err(LedgerError::ClaimRejected)));
        assert_eq!(store.get_claimed(user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_positive_claim_amounts_rejected_without_storage_access() {
        let store = Arc::new(MemoryLedgerStore::new());
        let claim = claim_use_case(&store);

        // Unknown user: validation fires before any read, so the error is
        // InvalidAmount, not AccountNotFound
        let unknown = Uuid::new_v4();
        assert!(matches!(
            claim.execute(unknown, -5, None).await,
            Err(LedgerError::InvalidAmount)
        ));
        assert!(matches!(
            claim.execute(unknown, 0, None).await,
            Err(LedgerError::InvalidAmount)
        ));
    }

    #[tokio::test]
    async fn test_extreme_claim_amount_rejected_and_state_unchanged() {
        // i64::MAX passes the positive-amount validation; it must surface
        // as ClaimRejected with both counters untouched.
        let (store, user) = provisioned(100).await;
        let claim = claim_use_case(&store);

        let result = claim.execute(user, i64::MAX, None).await;
        assert!(matches!(result, Err(LedgerError::ClaimRejected)));

        assert_eq!(store.get_claimed(user).await.unwrap(), 0);
        assert_eq!(store.get_earned(user).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_claim_on_unknown_account() {
        let store = Arc::new(MemoryLedgerStore::new());
        let claim = claim_use_case(&store);

        assert!(matches!(
            claim.execute(Uuid::new_v4(), 1, None).await,
            Err(LedgerError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn test_earn_on_unknown_account() {
        let store = Arc::new(MemoryLedgerStore::new());
        let earn = AddEarnedCreditsUseCase::new(store.clone());

        assert!(matches!(
            earn.execute(Uuid::new_v4(), 30).await,
            Err(LedgerError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn test_negative_earn_rejected() {
        let (store, user) = provisioned(10).await;
        let earn = AddEarnedCreditsUseCase::new(store.clone());

        assert!(matches!(
            earn.execute(user, -1).await,
            Err(LedgerError::InvalidAmount)
        ));
        assert_eq!(store.get_earned(user).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_pinned_claim_commits_only_at_expected_claimed() {
        let (store, user) = provisioned(100).await;
        let claim = claim_use_case(&store);

        claim.execute(user, 30, None).await.unwrap();

        // Pin taken before the first claim is now stale
        assert!(matches!(
            claim.execute(user, 10, Some(0)).await,
            Err(LedgerError::ClaimRejected)
        ));
        assert_eq!(store.get_claimed(user).await.unwrap(), 30);

        claim.execute(user, 10, Some(30)).await.unwrap();
        assert_eq!(store.get_claimed(user).await.unwrap(), 40);
    }

    #[tokio::test]
    async fn test_quiz_result_applies_multiplier() {
        let (store, user) = provisioned(0).await;
        let category = QuizCategory::new("history").unwrap();
        store.set_multiplier(user, &category, 3).await.unwrap();

        let use_case = RecordQuizResultUseCase::new(store.clone(), store.clone());
        let output = use_case
            .execute(
                user,
                RecordQuizResultInput {
                    category,
                    outcome: QuizOutcome::new(7, 10).unwrap(),
                },
            )
            .await
            .unwrap();

        assert_eq!(output.multiplier, 3);
        assert_eq!(output.credits_earned, 21);
        assert_eq!(store.get_earned(user).await.unwrap(), 21);
    }

    #[tokio::test]
    async fn test_quiz_result_without_multiplier_row() {
        let (store, user) = provisioned(0).await;

        let use_case = RecordQuizResultUseCase::new(store.clone(), store.clone());
        let output = use_case
            .execute(
                user,
                RecordQuizResultInput {
                    category: QuizCategory::new("geography").unwrap(),
                    outcome: QuizOutcome::new(4, 10).unwrap(),
                },
            )
            .await
            .unwrap();

        assert_eq!(output.multiplier, 1);
        assert_eq!(output.credits_earned, 4);
    }

    #[tokio::test]
    async fn test_quiz_result_on_unknown_account() {
        let store = Arc::new(MemoryLedgerStore::new());
        let use_case = RecordQuizResultUseCase::new(store.clone(), store.clone());

        let result = use_case
            .execute(
                Uuid::new_v4(),
                RecordQuizResultInput {
                    category: QuizCategory::new("history").unwrap(),
                    outcome: QuizOutcome::new(0, 10).unwrap(),
                },
            )
            .await;

        assert!(matches!(result, Err(LedgerError::AccountNotFound)));
    }
}

#[cfg(test)]
mod concurrency_tests {
    use crate::application::claim::ClaimCreditsUseCase;
    use crate::application::config::{LedgerConfig, RetryPolicy};
    use crate::domain::repository::CreditStore;
    use crate::error::LedgerError;
    use crate::infra::memory::MemoryLedgerStore;
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    async fn provisioned(earned: i64) -> (Arc<MemoryLedgerStore>, Uuid) {
        let store = Arc::new(MemoryLedgerStore::new());
        let user = Uuid::new_v4();
        store.create_account(user).await.unwrap();
        if earned > 0 {
            store.add_earned(user, earned).await.unwrap();
        }
        (store, user)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_no_lost_updates_unit_claims() {
        // N concurrent unit claims against earned = K must commit exactly
        // min(N, K) times, never more, never fewer due to a race.
        let (store, user) = provisioned(5).await;
        let config = Arc::new(LedgerConfig::fast_retry());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let config = config.clone();
            handles.push(tokio::spawn(async move {
                ClaimCreditsUseCase::new(store, config)
                    .execute(user, 1, None)
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(LedgerError::ClaimRejected) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(successes, 5);
        assert_eq!(store.get_claimed(user).await.unwrap(), 5);
        assert_eq!(store.get_earned(user).await.unwrap(), 5);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_two_racing_claims_exactly_one_wins() {
        // Two claims of 60 against earned = 100: 60 + 60 > 100, so exactly
        // one commits.
        let (store, user) = provisioned(100).await;
        let config = Arc::new(LedgerConfig::fast_retry());

        let mut handles = Vec::new();
        for _ in 0..2 {
            let store = store.clone();
            let config = config.clone();
            handles.push(tokio::spawn(async move {
                ClaimCreditsUseCase::new(store, config)
                    .execute(user, 60, None)
                    .await
            }));
        }

        let mut successes = 0;
        let mut rejections = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(LedgerError::ClaimRejected) => rejections += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(rejections, 1);
        assert_eq!(store.get_claimed(user).await.unwrap(), 60);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invariant_holds_under_interleaved_earns_and_claims() {
        let (store, user) = provisioned(10).await;
        let config = Arc::new(LedgerConfig::fast_retry());

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            let config = config.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    store.add_earned(user, 3).await.map(|_| ())
                } else {
                    match ClaimCreditsUseCase::new(store, config)
                        .execute(user, 2, None)
                        .await
                    {
                        Ok(()) | Err(LedgerError::ClaimRejected) => Ok(()),
                        Err(e) => Err(e),
                    }
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let account = store.get_account(user).await.unwrap();
        assert!(
            account.is_consistent(),
            "claimed {} exceeds earned {}",
            account.claimed_credits,
            account.earned_credits
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_claim_converges_when_earn_lands_mid_retry() {
        // The first attempt fails against a zero balance; while the claim
        // backs off, a concurrent earn covers it. The retry loop must pick
        // up the fresh snapshot and commit within the budget.
        let (store, user) = provisioned(0).await;
        let config = Arc::new(LedgerConfig {
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(50),
            },
        });

        let claimer = {
            let store = store.clone();
            tokio::spawn(async move {
                ClaimCreditsUseCase::new(store, config)
                    .execute(user, 10, None)
                    .await
            })
        };

        let earner = {
            let store = store.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                store.add_earned(user, 10).await
            })
        };

        earner.await.unwrap().unwrap();
        claimer.await.unwrap().unwrap();

        assert_eq!(store.get_claimed(user).await.unwrap(), 10);
        assert_eq!(store.get_earned(user).await.unwrap(), 10);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_claimed_counter_is_monotonic() {
        let (store, user) = provisioned(50).await;
        let config = Arc::new(LedgerConfig::fast_retry());

        let mut last_claimed = 0;
        for _ in 0..5 {
            let _ = ClaimCreditsUseCase::new(store.clone(), config.clone())
                .execute(user, 7, None)
                .await;
            let claimed = store.get_claimed(user).await.unwrap();
            assert!(claimed >= last_claimed, "claimed counter decreased");
            last_claimed = claimed;
        }
    }
}
