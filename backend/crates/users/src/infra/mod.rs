//! Infrastructure Layer
//!
//! Account stores and the HTTP client for OAuth2 providers.

pub mod memory;
pub mod oauth;
pub mod postgres;
