//! Persisted chat sessions.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::SessionRecord;

/// Get a session, ignoring it if idle for longer than `max_idle_secs`.
pub async fn get_session(
    pool: &SqlitePool,
    session_id: &str,
    max_idle_secs: Option<i64>,
) -> Result<Option<SessionRecord>> {
    let record = match max_idle_secs {
        Some(secs) => {
            sqlx::query_as::<_, SessionRecord>(
                r#"
                SELECT session_id, state, version, updated_at
                FROM chat_sessions
                WHERE session_id = ? AND updated_at >= datetime('now', ?)
                "#,
            )
            .bind(session_id)
            .bind(format!("-{} seconds", secs))
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, SessionRecord>(
                r#"
                SELECT session_id, state, version, updated_at
                FROM chat_sessions
                WHERE session_id = ?
                "#,
            )
            .bind(session_id)
            .fetch_optional(pool)
            .await?
        }
    };

    Ok(record)
}

/// Insert or replace a session's state, returning the new version.
pub async fn upsert_session(pool: &SqlitePool, session_id: &str, state: &str) -> Result<i64> {
    let version = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO chat_sessions (session_id, state, version, updated_at)
        VALUES (?, ?, 1, datetime('now'))
        ON CONFLICT(session_id) DO UPDATE SET
            state = excluded.state,
            version = chat_sessions.version + 1,
            updated_at = datetime('now')
        RETURNING version
        "#,
    )
    .bind(session_id)
    .bind(state)
    .fetch_one(pool)
    .await?;

    Ok(version)
}

/// Delete a session.
pub async fn delete_session(pool: &SqlitePool, session_id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM chat_sessions
        WHERE session_id = ?
        "#,
    )
    .bind(session_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Session",
            id: session_id.to_string(),
        });
    }

    Ok(())
}

/// Delete sessions idle for longer than `max_idle_secs`. Returns rows removed.
pub async fn purge_expired_sessions(pool: &SqlitePool, max_idle_secs: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM chat_sessions
        WHERE updated_at < datetime('now', ?)
        "#,
    )
    .bind(format!("-{} seconds", max_idle_secs))
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
