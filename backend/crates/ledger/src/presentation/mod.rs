//! Presentation Layer
//!
//! HTTP routing, handlers, and DTOs.

pub mod dto;
pub mod handlers;
pub mod router;
