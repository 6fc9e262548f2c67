//! Domain models for Libris.

pub mod refresh_session;
pub mod user;
