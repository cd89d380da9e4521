use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier of an open persistence session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to the unit of work that owns tracked collections.
///
/// Cloning the handle does not open a new session: every clone reports the
/// same [`SessionId`].
#[derive(Clone)]
pub struct PersistSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    id: SessionId,
    name: String,
    opened_at: DateTime<Utc>,
}

impl PersistSession {
    /// Opens a new session with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id: SessionId::new(),
                name: name.into(),
                opened_at: Utc::now(),
            }),
        }
    }

    /// Returns the identifier of this session.
    pub fn id(&self) -> SessionId {
        self.inner.id
    }

    /// Returns the display name given when the session was opened.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the time the session was opened.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.inner.opened_at
    }

    /// Checks whether `other` is a handle to this same session.
    pub fn same_session(&self, other: &PersistSession) -> bool {
        self.inner.id == other.inner.id
    }
}

impl fmt::Debug for PersistSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistSession")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let session = PersistSession::new("orders");
        let clone = session.clone();

        assert!(session.same_session(&clone));
        assert_eq!(session.id(), clone.id());
        assert_eq!(clone.name(), "orders");
    }

    #[test]
    fn test_new_sessions_are_distinct() {
        let a = PersistSession::new("a");
        let b = PersistSession::new("a");

        assert!(!a.same_session(&b));
        assert_ne!(a.id(), b.id());
        assert!(a.opened_at() <= Utc::now());
    }
}
