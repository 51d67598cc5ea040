//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer: a PostgreSQL store and an in-memory store,
//! selected once at process startup.

use crate::domain::entities::CreditAccount;
use crate::domain::value_objects::QuizCategory;
use crate::error::LedgerResult;
use uuid::Uuid;

/// Credit store trait - primitive counter operations
///
/// All mutation of an account's counters funnels through `add_earned` and
/// `conditional_add_claimed`; the invariant `claimed <= earned` is auditable
/// at a single call site per backend.
#[trait_variant::make(CreditStore: Send)]
pub trait LocalCreditStore {
    /// Provision an account with both counters at zero.
    /// Idempotent: provisioning an existing account is a no-op.
    async fn create_account(&self, user_id: Uuid) -> LedgerResult<()>;

    /// Current earned total. `AccountNotFound` if the user does not exist.
    async fn get_earned(&self, user_id: Uuid) -> LedgerResult<i64>;

    /// Current claimed total. `AccountNotFound` if the user does not exist.
    async fn get_claimed(&self, user_id: Uuid) -> LedgerResult<i64>;

    /// Read both counters as one snapshot (not linearized against writers).
    async fn get_account(&self, user_id: Uuid) -> LedgerResult<CreditAccount>;

    /// Add `amount` to earned credits, unconditionally.
    /// `AccountNotFound` if the user does not exist.
    async fn add_earned(&self, user_id: Uuid, amount: i64) -> LedgerResult<()>;

    /// Atomically add `amount` to claimed credits iff, at the moment of
    /// mutation: the account still exists, `claimed + amount <= earned`,
    /// `earned >= max_earned_floor` (guards against a stale snapshot seeing
    /// a transient decrease), and, when supplied, `claimed ==
    /// expected_claimed` (optimistic versioning).
    ///
    /// Returns `true` iff the mutation was applied. Guard failure is the
    /// ordinary contention case and returns `false`, never an error; the
    /// caller is expected to retry.
    ///
    /// This is deliberately a single guard-and-mutate primitive rather than
    /// separate read and write calls, so no read-then-write race is possible
    /// between two concurrent claims.
    async fn conditional_add_claimed(
        &self,
        user_id: Uuid,
        amount: i64,
        max_earned_floor: i64,
        expected_claimed: Option<i64>,
    ) -> LedgerResult<bool>;
}

/// Multiplier resolver trait - per-(user, quiz category) earning amplifier
///
/// The ledger reads multipliers but does not own their consistency.
#[trait_variant::make(MultiplierResolver: Send)]
pub trait LocalMultiplierResolver {
    /// Resolve the multiplier for a (user, category) pair.
    /// Falls back to [`DEFAULT_MULTIPLIER`](crate::domain::entities::DEFAULT_MULTIPLIER)
    /// when no row exists.
    async fn multiplier_for(&self, user_id: Uuid, category: &QuizCategory) -> LedgerResult<i64>;

    /// Set the multiplier for a (user, category) pair (provisioning path).
    async fn set_multiplier(
        &self,
        user_id: Uuid,
        category: &QuizCategory,
        value: i64,
    ) -> LedgerResult<()>;
}
