//! Domain Layer
//!
//! Contains entities, value objects, services and the traits for
//! persistence and provider lookup.

pub mod entity;
pub mod identity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::account::Account;
pub use identity::{ProfileFetcher, SocialProfile};
pub use repository::AccountRepository;
