//! In-memory session store
//!
//! Sessions are the only place the daily spending limit lives: the limit is
//! deliberately ephemeral per-session state, not a database record. A
//! server restart therefore logs everyone out and clears all limits.
//!
//! Tokens are opaque hex strings; lookups are by exact token. Expiry is
//! last-activity based and expired entries are swept lazily whenever a new
//! session is created.

use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use tally_core::limits::DailyLimit;

/// Default session lifetime since last activity
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A logged-in user's session
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    /// Daily spending limit, absent until the user sets one
    pub daily_limit: Option<DailyLimit>,
    last_activity: Instant,
}

impl Session {
    fn new(user_id: i64, username: String) -> Self {
        Self {
            user_id,
            username,
            daily_limit: None,
            last_activity: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_activity.elapsed() > ttl
    }
}

/// Session manager holding all live sessions behind an RwLock
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a session for a user and return its token
    pub async fn create(&self, user_id: i64, username: &str) -> String {
        // Token = SHA-256 over timestamp + counter + username; opaque and
        // unguessable enough for a self-hosted single-tenant deployment
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = COUNTER.fetch_add(1, Ordering::SeqCst);

        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_le_bytes());
        hasher.update(counter.to_le_bytes());
        hasher.update(username.as_bytes());
        let token = hex::encode(hasher.finalize());

        let mut sessions = self.sessions.write().await;

        // Clean up expired sessions while we're here
        let ttl = self.ttl;
        sessions.retain(|_, s| !s.is_expired(ttl));

        sessions.insert(token.clone(), Session::new(user_id, username.to_string()));
        token
    }

    /// Look up a session by token, refreshing its activity timestamp
    pub async fn get(&self, token: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(token)?;
        if session.is_expired(self.ttl) {
            sessions.remove(token);
            return None;
        }
        session.last_activity = Instant::now();
        Some(session.clone())
    }

    /// Replace the session's daily limit (last write wins)
    pub async fn set_daily_limit(&self, token: &str, limit: DailyLimit) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(session) => {
                session.daily_limit = Some(limit);
                session.last_activity = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Destroy a session (logout). Returns whether it existed.
    pub async fn remove(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token).is_some()
    }

    /// Number of live sessions (tests and status output)
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn create_get_remove() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);

        let token = manager.create(1, "alice").await;
        let session = manager.get(&token).await.unwrap();
        assert_eq!(session.user_id, 1);
        assert_eq!(session.username, "alice");
        assert!(session.daily_limit.is_none());

        assert!(manager.remove(&token).await);
        assert!(manager.get(&token).await.is_none());
    }

    #[tokio::test]
    async fn tokens_are_unique() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        let a = manager.create(1, "alice").await;
        let b = manager.create(1, "alice").await;
        assert_ne!(a, b);
        assert_eq!(manager.len().await, 2);
    }

    #[tokio::test]
    async fn daily_limit_is_per_session() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        let a = manager.create(1, "alice").await;
        let b = manager.create(1, "alice").await;

        let limit = DailyLimit::new(
            Decimal::from_str_exact("20.00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        assert!(manager.set_daily_limit(&a, limit).await);

        assert!(manager.get(&a).await.unwrap().daily_limit.is_some());
        assert!(manager.get(&b).await.unwrap().daily_limit.is_none());
    }

    #[tokio::test]
    async fn expired_sessions_are_gone() {
        let manager = SessionManager::new(Duration::from_millis(0));
        let token = manager.create(1, "alice").await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(manager.get(&token).await.is_none());
    }

    #[tokio::test]
    async fn set_limit_on_unknown_token_is_refused() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        let limit = DailyLimit::new(
            Decimal::from_str_exact("5.00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        assert!(!manager.set_daily_limit("nope", limit).await);
    }
}
