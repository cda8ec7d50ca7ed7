//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - The common error type and its HTTP rendering
//! - Typed IDs for users, tours and reviews
//! - Field-level validation errors shared by every request validator
//! - The JSON success envelope
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod response;
pub mod validation;
