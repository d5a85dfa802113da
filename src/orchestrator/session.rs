//! Session State Store
//!
//! In-memory sessions keyed by `(app, user, session)`, each holding an
//! insertion-ordered map of named fields written by pipeline stages.
//! Sessions live for the process lifetime; nothing is persisted to disk.
//!
//! The outer map tolerates concurrent insertion and lookup of distinct
//! keys. Turns for the same session are assumed single-writer; callers
//! needing same-session concurrency must serialize externally.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Identity of one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub app: String,
    pub user: String,
    pub session: String,
}

impl SessionKey {
    pub fn new(app: impl Into<String>, user: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            user: user.into(),
            session: session.into(),
        }
    }
}

/// Field map for one session, preserving first-insertion order.
#[derive(Debug, Default, Clone)]
struct SessionRecord {
    fields: Vec<(String, Value)>,
}

impl SessionRecord {
    fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// The store itself.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionKey, SessionRecord>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session. Idempotent: creating an existing session is a
    /// logged no-op, never an error.
    pub async fn create(&self, key: &SessionKey) {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(key) {
            debug!(user = %key.user, session = %key.session, "session already exists");
            return;
        }
        sessions.insert(key.clone(), SessionRecord::default());
    }

    /// Write a field, creating the session if it is somehow absent.
    pub async fn set_field(&self, key: &SessionKey, name: &str, value: Value) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(key.clone()).or_default().set(name, value);
    }

    /// Read a field; `None` when the session or the field does not exist.
    pub async fn get_field(&self, key: &SessionKey, name: &str) -> Option<Value> {
        let sessions = self.sessions.read().await;
        sessions.get(key).and_then(|r| r.get(name).cloned())
    }

    /// Field names of a session in insertion order.
    pub async fn field_names(&self, key: &SessionKey) -> Vec<String> {
        let sessions = self.sessions.read().await;
        sessions
            .get(key)
            .map(|r| r.fields.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let store = SessionStore::new();
        let key = SessionKey::new("app", "user_01", "session_01");

        store.create(&key).await;
        store.set_field(&key, "detected_language", json!("hi-IN")).await;
        store.create(&key).await;

        // A duplicate create must not wipe existing fields.
        assert_eq!(
            store.get_field(&key, "detected_language").await,
            Some(json!("hi-IN"))
        );
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_fields_preserve_insertion_order_across_overwrites() {
        let store = SessionStore::new();
        let key = SessionKey::new("app", "user_01", "session_01");
        store.create(&key).await;

        store.set_field(&key, "translated_query", json!("first")).await;
        store.set_field(&key, "english_response", json!("reply")).await;
        store.set_field(&key, "translated_query", json!("second")).await;

        assert_eq!(
            store.field_names(&key).await,
            vec!["translated_query", "english_response"]
        );
        assert_eq!(
            store.get_field(&key, "translated_query").await,
            Some(json!("second"))
        );
    }

    #[tokio::test]
    async fn test_missing_session_or_field_reads_as_absent() {
        let store = SessionStore::new();
        let key = SessionKey::new("app", "ghost", "none");
        assert_eq!(store.get_field(&key, "anything").await, None);
        assert!(store.field_names(&key).await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_distinct_sessions() {
        let store = Arc::new(SessionStore::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let key = SessionKey::new("app", format!("user_{i}"), "session_01");
                store.create(&key).await;
                store.set_field(&key, "translated_query", json!(format!("query {i}"))).await;
                store.get_field(&key, "translated_query").await
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let value = handle.await.unwrap();
            assert_eq!(value, Some(json!(format!("query {i}"))));
        }
        assert_eq!(store.session_count().await, 8);
    }
}
