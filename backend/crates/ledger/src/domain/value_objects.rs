//! Domain Value Objects
//!
//! Immutable value types for the credit ledger domain.

/// Quiz category - the key space for per-user multipliers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuizCategory(String);

impl QuizCategory {
    pub const MAX_LEN: usize = 64;

    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.len() > Self::MAX_LEN {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuizCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quiz outcome - the `(score, total)` pair produced by the quiz engine
///
/// The engine itself is an external collaborator; the ledger only consumes
/// the outcome to compute earned credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    score: i64,
    total: i64,
}

impl QuizOutcome {
    pub fn new(score: i64, total: i64) -> Option<Self> {
        if score < 0 || total < 0 || score > total {
            return None;
        }
        Some(Self { score, total })
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn total(&self) -> i64 {
        self.total
    }
}
