//! Domain Services

pub mod reset_token;
