//! Domain Services
//!
//! Pure functions of the credit ledger domain.

use crate::domain::value_objects::QuizOutcome;

/// Convert a quiz outcome into earned credits.
///
/// Raw score times the per-(user, category) multiplier. Negative
/// multipliers clamp to zero; the product saturates instead of wrapping.
pub fn earned_credits(outcome: &QuizOutcome, multiplier: i64) -> i64 {
    outcome.score().saturating_mul(multiplier.max(0))
}
