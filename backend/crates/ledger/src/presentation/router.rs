//! Ledger Router

use crate::application::config::LedgerConfig;
use crate::domain::repository::{CreditStore, MultiplierResolver};
use crate::infra::memory::MemoryLedgerStore;
use crate::infra::postgres::PgLedgerRepository;
use crate::presentation::handlers::{self, LedgerAppState};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

/// Create the ledger router with the PostgreSQL repository
pub fn ledger_router(repo: PgLedgerRepository, config: LedgerConfig) -> Router {
    ledger_router_generic(repo, config)
}

/// Create the ledger router with the in-memory store
pub fn ledger_router_memory(store: MemoryLedgerStore, config: LedgerConfig) -> Router {
    ledger_router_generic(store, config)
}

/// Create a ledger router for any repository implementation
pub fn ledger_router_generic<R>(repo: R, config: LedgerConfig) -> Router
where
    R: CreditStore + MultiplierResolver + Clone + Send + Sync + 'static,
{
    let state = LedgerAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/accounts", post(handlers::create_account::<R>))
        .route(
            "/accounts/{user_id}/balance",
            get(handlers::get_balance::<R>),
        )
        .route(
            "/accounts/{user_id}/quiz-results",
            post(handlers::record_quiz_result::<R>),
        )
        .route(
            "/accounts/{user_id}/earnings",
            post(handlers::add_earned::<R>),
        )
        .route(
            "/accounts/{user_id}/claims",
            post(handlers::claim_credits::<R>),
        )
        .route(
            "/accounts/{user_id}/multipliers/{category}",
            put(handlers::set_multiplier::<R>),
        )
        .with_state(state)
}
