//! Retry of writes rejected by optimistic transaction conflicts.
//!
//! Concurrent writes to the same record race at commit time; the loser is
//! told to retry. Re-running the statement makes it the last writer.

use std::time::Duration;

use tracing::debug;

use crate::error::DbError;

/// Each conflict means another writer committed, so attempts only run out
/// under sustained contention.
pub(crate) const MAX_ATTEMPTS: u32 = 16;
const BACKOFF_STEP: Duration = Duration::from_millis(2);

/// Run `attempt` until it succeeds, fails with a non-conflict error, or
/// `MAX_ATTEMPTS` is reached.
pub(crate) async fn retry_on_conflict<T, F, Fut>(
    operation: &str,
    mut attempt: F,
) -> Result<T, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbError>>,
{
    let mut tries = 1;
    loop {
        match attempt().await {
            Err(err) if err.is_conflict() && tries < MAX_ATTEMPTS => {
                debug!(operation, attempt = tries, "Write conflict, retrying");
                tokio::time::sleep(BACKOFF_STEP * tries).await;
                tries += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn conflicts_are_retried_until_success() {
        let calls = &AtomicU32::new(0);

        let out = retry_on_conflict("test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 3 {
                Err(DbError::Conflict("write conflict".into()))
            } else {
                Ok(7)
            }
        })
        .await
        .unwrap();

        assert_eq!(out, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let calls = &AtomicU32::new(0);

        let err = retry_on_conflict::<(), _, _>("test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DbError::Query("syntax".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, DbError::Query(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = &AtomicU32::new(0);

        let err = retry_on_conflict::<(), _, _>("test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DbError::Conflict("write conflict".into()))
        })
        .await
        .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }
}
