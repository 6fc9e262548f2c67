//! SurrealDB implementation of [`RefreshSessionRepository`].
//!
//! Each user owns at most one `refresh_session` record, addressed as
//! `refresh_session:<user id>`. Writes go through a single `UPSERT`
//! statement, so a concurrent login or refresh can never leave two rows
//! behind. A write that loses a commit race is retried and becomes the last
//! writer.

use chrono::{DateTime, Utc};
use libris_core::error::LibrisResult;
use libris_core::models::refresh_session::{RefreshSession, UpsertRefreshSession};
use libris_core::repository::RefreshSessionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;
use crate::retry::retry_on_conflict;

#[derive(Debug, SurrealValue)]
struct RefreshSessionRow {
    session_id: String,
    user_id: String,
    jti: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::InvalidRow(format!("invalid {field} UUID: {e}")))
}

impl RefreshSessionRow {
    fn try_into_session(self) -> Result<RefreshSession, DbError> {
        Ok(RefreshSession {
            id: parse_uuid("session", &self.session_id)?,
            user_id: parse_uuid("user", &self.user_id)?,
            jti: parse_uuid("jti", &self.jti)?,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the refresh session repository.
#[derive(Clone)]
pub struct SurrealRefreshSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRefreshSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// One `UPSERT` attempt. Each attempt stamps a fresh `session_id`.
    async fn upsert_once(
        &self,
        user_id: &str,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Vec<RefreshSessionRow>, DbError> {
        let mut result = self
            .db
            .query(
                "UPSERT type::record('refresh_session', $user_id) SET \
                 session_id = $session_id, \
                 user_id = $user_id, \
                 jti = $jti, \
                 expires_at = $expires_at, \
                 created_at = time::now()",
            )
            .bind(("user_id", user_id.to_owned()))
            .bind(("session_id", Uuid::new_v4().to_string()))
            .bind(("jti", jti.to_owned()))
            .bind(("expires_at", expires_at))
            .await
            .map_err(|e| DbError::from_statement("refresh_session", e))?
            .check()
            .map_err(|e| DbError::from_statement("refresh_session", e))?;

        Ok(result.take(0)?)
    }

    async fn delete_once(&self, user_id: &str) -> Result<(), DbError> {
        self.db
            .query("DELETE type::record('refresh_session', $user_id)")
            .bind(("user_id", user_id.to_owned()))
            .await
            .map_err(|e| DbError::from_statement("refresh_session", e))?
            .check()
            .map_err(|e| DbError::from_statement("refresh_session", e))?;

        Ok(())
    }
}

impl<C: Connection> RefreshSessionRepository for SurrealRefreshSessionRepository<C> {
    async fn upsert(&self, input: UpsertRefreshSession) -> LibrisResult<RefreshSession> {
        let user_id_str = input.user_id.to_string();
        let jti_str = input.jti.to_string();

        let rows = retry_on_conflict("refresh_session.upsert", || {
            self.upsert_once(&user_id_str, &jti_str, input.expires_at)
        })
        .await?;

        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "refresh_session".into(),
            id: user_id_str,
        })?;

        let session = row.try_into_session()?;
        debug!(
            user_id = %session.user_id,
            jti = %session.jti,
            "Stored refresh session"
        );

        Ok(session)
    }

    async fn get_by_user(&self, user_id: Uuid) -> LibrisResult<RefreshSession> {
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('refresh_session', $user_id)")
            .bind(("user_id", user_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RefreshSessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "refresh_session".into(),
            id: user_id_str,
        })?;

        Ok(row.try_into_session()?)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> LibrisResult<()> {
        let user_id_str = user_id.to_string();

        retry_on_conflict("refresh_session.delete", || self.delete_once(&user_id_str)).await?;

        Ok(())
    }
}
