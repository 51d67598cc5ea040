//! Application Layer
//!
//! Use cases orchestrating the domain against the repository traits.

pub mod add_earned;
pub mod claim;
pub mod config;
pub mod record_quiz_result;
