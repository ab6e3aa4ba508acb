//! Signed-in identity and the process-wide session slot

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Numeric role code carried by every session.
///
/// Any integer the server sends is accepted; codes without a named variant
/// are kept in `Other` and written back unchanged. A session with no `role`
/// at all is rejected, since no guard could evaluate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
    Staff,
    Nurse,
    Other(i64),
}

impl Role {
    pub fn code(self) -> i64 {
        match self {
            Role::Admin => 0,
            Role::Doctor => 1,
            Role::Patient => 2,
            Role::Staff => 3,
            Role::Nurse => 4,
            Role::Other(code) => code,
        }
    }
}

impl From<i64> for Role {
    fn from(code: i64) -> Self {
        match code {
            0 => Role::Admin,
            1 => Role::Doctor,
            2 => Role::Patient,
            3 => Role::Staff,
            4 => Role::Nurse,
            other => Role::Other(other),
        }
    }
}

impl From<Role> for i64 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Doctor => f.write_str("doctor"),
            Role::Patient => f.write_str("patient"),
            Role::Staff => f.write_str("staff"),
            Role::Nurse => f.write_str("nurse"),
            Role::Other(code) => write!(f, "role {code}"),
        }
    }
}

/// Authenticated identity as returned by sign-in, sign-up and profile update.
///
/// Fields the client does not interpret are kept in `extra` so that a
/// persisted session round-trips exactly what the server sent.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

// Hand-written so the bearer token never ends up in logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("token", &if self.has_token() { "<redacted>" } else { "<empty>" })
            .finish_non_exhaustive()
    }
}

/// Shared slot holding the current session.
///
/// The session is only ever swapped wholesale, so a snapshot is always a
/// complete, consistent identity.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Arc<Session>>>>,
}

impl SessionContext {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session.map(Arc::new))),
        }
    }

    pub fn snapshot(&self) -> Option<Arc<Session>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, session: impl Into<Arc<Session>>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session.into());
    }

    /// Clears the slot, returning the session that was present.
    pub fn clear(&self) -> Option<Arc<Session>> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_signed_in(&self) -> bool {
        self.snapshot().is_some()
    }
}
