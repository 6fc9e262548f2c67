//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups that find nothing return
//! [`LibrisError::NotFound`](crate::error::LibrisError::NotFound) so that
//! callers can tell a missing row apart from a storage failure.

use uuid::Uuid;

use crate::error::LibrisResult;
use crate::models::{
    refresh_session::{RefreshSession, UpsertRefreshSession},
    user::{CreateUser, User},
};

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = LibrisResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = LibrisResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = LibrisResult<User>> + Send;
}

/// Storage for the single active refresh session of each user.
pub trait RefreshSessionRepository: Send + Sync {
    /// Insert the user's session, or replace the existing one, in a single
    /// atomic statement.
    fn upsert(
        &self,
        input: UpsertRefreshSession,
    ) -> impl Future<Output = LibrisResult<RefreshSession>> + Send;

    fn get_by_user(&self, user_id: Uuid) -> impl Future<Output = LibrisResult<RefreshSession>> + Send;

    /// Remove the user's session. Succeeds when there is none.
    fn delete_by_user(&self, user_id: Uuid) -> impl Future<Output = LibrisResult<()>> + Send;
}
