//! Domain Services
//!
//! Stateless rules over users and credentials.

pub mod credential;
pub mod role_gate;
pub mod token_freshness;
