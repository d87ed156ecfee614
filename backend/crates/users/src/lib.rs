//! Users (Identity) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, reset tokens, repository traits
//! - `application/` - Use cases and the JWT token issuer
//! - `infra/` - PostgreSQL and in-memory stores, OAuth2 userinfo client
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Signup with email, role and confirmed password
//! - Email/password login returning an access/refresh JWT pair
//! - Stateless password reset tokens delivered by email
//! - Social signup/login through Google or Facebook access tokens
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Reset tokens are HMAC-bound to the current password hash
//! - Login failures never reveal which of email or password was wrong

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::UsersConfig;
pub use error::{UsersError, UsersResult};
pub use infra::memory::InMemoryAccountRepository;
pub use infra::oauth::HttpProfileFetcher;
pub use infra::postgres::PgAccountRepository;
pub use presentation::router::users_router;
