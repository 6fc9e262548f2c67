//! SurrealDB repository implementations.

mod refresh_session;
mod user;

pub use refresh_session::SurrealRefreshSessionRepository;
pub use user::SurrealUserRepository;
