//! Session storage backends.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use database::{session as session_store, Database, DatabaseError};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::error::IntakeError;
use crate::session::ConversationSession;

/// Keyed storage for conversation sessions.
///
/// `put` returns the stored version, which increases by one on every write.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<ConversationSession>, IntakeError>;

    async fn put(&self, session: &ConversationSession) -> Result<u64, IntakeError>;

    async fn delete(&self, session_id: &str) -> Result<(), IntakeError>;
}

struct StoredSession {
    session: ConversationSession,
    version: u64,
    touched: Instant,
}

/// In-process session store with idle expiry.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, StoredSession>>,
    ttl: Option<Duration>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    /// Create a store whose sessions never expire.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    /// Create a store that drops sessions idle for longer than `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    fn is_expired(&self, stored: &StoredSession) -> bool {
        self.ttl.is_some_and(|ttl| stored.touched.elapsed() > ttl)
    }

    /// Drop `session_id` if it is still expired once the write lock is held.
    ///
    /// A `put` may land between the caller's read and this write, in which
    /// case the fresh session is kept and returned.
    async fn evict_if_expired(&self, session_id: &str) -> Option<ConversationSession> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(session_id) {
            Some(stored) if !self.is_expired(stored) => Some(stored.session.clone()),
            Some(_) => {
                debug!(session_id, "Session expired");
                sessions.remove(session_id);
                None
            }
            None => None,
        }
    }

    /// Remove expired sessions, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| !self.is_expired(stored));
        before - sessions.len()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Current version of a stored session.
    pub async fn version(&self, session_id: &str) -> Option<u64> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|stored| stored.version)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<ConversationSession>, IntakeError> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(session_id) {
                Some(stored) if !self.is_expired(stored) => return Ok(Some(stored.session.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        Ok(self.evict_if_expired(session_id).await)
    }

    async fn put(&self, session: &ConversationSession) -> Result<u64, IntakeError> {
        let mut sessions = self.sessions.write().await;
        let version = sessions
            .get(&session.session_id)
            .filter(|stored| !self.is_expired(stored))
            .map_or(1, |stored| stored.version + 1);

        sessions.insert(
            session.session_id.clone(),
            StoredSession {
                session: session.clone(),
                version,
                touched: Instant::now(),
            },
        );
        Ok(version)
    }

    async fn delete(&self, session_id: &str) -> Result<(), IntakeError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}

/// Session store persisted in the `chat_sessions` table.
pub struct SqliteSessionStore {
    database: Database,
    ttl: Option<Duration>,
}

impl SqliteSessionStore {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            ttl: None,
        }
    }

    pub fn with_ttl(database: Database, ttl: Duration) -> Self {
        Self {
            database,
            ttl: Some(ttl),
        }
    }

    fn ttl_secs(&self) -> Option<i64> {
        self.ttl.map(|ttl| ttl.as_secs() as i64)
    }

    /// Remove expired sessions, returning how many were dropped.
    pub async fn purge_expired(&self) -> Result<u64, IntakeError> {
        match self.ttl_secs() {
            Some(secs) => Ok(session_store::purge_expired_sessions(self.database.pool(), secs).await?),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<ConversationSession>, IntakeError> {
        let record =
            session_store::get_session(self.database.pool(), session_id, self.ttl_secs()).await?;
        match record {
            Some(record) => Ok(Some(serde_json::from_str(&record.state)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, session: &ConversationSession) -> Result<u64, IntakeError> {
        let state = serde_json::to_string(session)?;
        let version =
            session_store::upsert_session(self.database.pool(), &session.session_id, &state).await?;
        Ok(version as u64)
    }

    async fn delete(&self, session_id: &str) -> Result<(), IntakeError> {
        match session_store::delete_session(self.database.pool(), session_id).await {
            Ok(()) | Err(DatabaseError::NotFound { .. }) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
