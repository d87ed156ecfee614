//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, constant-time comparison, Base64)
//! - Password hashing (Argon2id)
//! - JWT signing and verification (HS256)
//! - Outbound email delivery

pub mod crypto;
pub mod jwt;
pub mod mail;
pub mod password;
