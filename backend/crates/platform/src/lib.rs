//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password policy and hashing (Argon2id)
//! - Signed bearer tokens (HS256 JWT)
//! - Cookie management
//! - Client address extraction
//! - Small crypto helpers (Base64 decoding, constant-time compare)

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod token;
