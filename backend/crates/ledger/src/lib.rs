//! Credit Ledger Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases
//! - `infra/` - Storage backend implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Concurrency Model
//! - The invariant `claimed_credits <= earned_credits` holds at every
//!   observable instant, enforced by a single atomic guard-and-mutate
//!   primitive per backend
//! - In-memory backend: one FIFO transaction queue (a fair mutex), at most
//!   one logical transaction in flight
//! - PostgreSQL backend: conditional UPDATE whose WHERE clause encodes the
//!   guards; atomicity rests on row-level locking, no application locks
//! - Claims retry a bounded number of times with exponential backoff;
//!   infrastructure faults propagate immediately and are never retried

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{LedgerConfig, RetryPolicy};
pub use error::{LedgerError, LedgerResult};
pub use infra::memory::MemoryLedgerStore;
pub use infra::postgres::PgLedgerRepository;
pub use presentation::router::{ledger_router, ledger_router_generic, ledger_router_memory};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
