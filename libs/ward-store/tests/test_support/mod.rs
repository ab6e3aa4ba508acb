//! Shared doubles for store tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use ward_client::{
    ApiClient, ApiRequest, Error, MemorySessionStore, Method, Result, Role, RouteCatalog, Session,
    SessionStore, Transport,
};
use ward_store::Store;

pub const SENTINEL: &str = "Not authorized, token failed";

pub enum Reply {
    Ok(Value),
    Err(u16, String),
    /// Resolves when the test sends on the paired channel.
    Deferred(oneshot::Receiver<Value>),
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Transport that answers from a per-route queue of scripted replies.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn reply(&self, method: Method, path: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn ok(&self, method: Method, path: &str, body: Value) {
        self.reply(method, path, Reply::Ok(body));
    }

    pub fn fail(&self, method: Method, path: &str, status: u16, message: &str) {
        self.reply(method, path, Reply::Err(status, message.to_string()));
    }

    pub fn deferred(&self, method: Method, path: &str) -> oneshot::Sender<Value> {
        let (tx, rx) = oneshot::channel();
        self.reply(method, path, Reply::Deferred(rx));
        tx
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(Recorded {
            method: request.method.clone(),
            path: request.path.clone(),
            authorization: request
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: request.body.clone(),
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&(request.method.clone(), request.path.clone()))
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Ok(body)) => Ok(body),
            Some(Reply::Err(status, message)) => Err(Error::Api {
                status: Some(status),
                message,
            }),
            Some(Reply::Deferred(rx)) => rx.await.map_err(|_| Error::Api {
                status: None,
                message: "deferred reply dropped".to_string(),
            }),
            None => Err(Error::Api {
                status: Some(404),
                message: format!("no scripted reply for {} {}", request.method, request.path),
            }),
        }
    }
}

/// Session store that counts how often it was cleared.
#[derive(Default)]
pub struct CountingSessionStore {
    inner: MemorySessionStore,
    pub clears: AtomicUsize,
}

impl CountingSessionStore {
    pub fn with(session: Session) -> Self {
        Self {
            inner: MemorySessionStore::new(Some(session)),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for CountingSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        self.inner.load()
    }

    fn save(&self, session: &Session) -> Result<()> {
        self.inner.save(session)
    }

    fn clear(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

pub fn session(role: Role) -> Session {
    Session {
        id: "u1".to_string(),
        name: "Test User".to_string(),
        email: "user@example.org".to_string(),
        role,
        token: "tok".to_string(),
        extra: Map::new(),
    }
}

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub sessions: Arc<CountingSessionStore>,
    pub store: Store,
}

impl Harness {
    pub fn signed_in(role: Role) -> Self {
        Self::build(Some(session(role)))
    }

    pub fn signed_out() -> Self {
        Self::build(None)
    }

    pub fn map_store(self, f: impl FnOnce(Store) -> Store) -> Self {
        Self {
            transport: self.transport,
            sessions: self.sessions,
            store: f(self.store),
        }
    }

    fn build(session: Option<Session>) -> Self {
        let transport = Arc::new(ScriptedTransport::default());
        let sessions = Arc::new(match session {
            Some(s) => CountingSessionStore::with(s),
            None => CountingSessionStore::default(),
        });
        let client = ApiClient::new(transport.clone(), RouteCatalog::default());
        let store = Store::new(client, sessions.clone());
        Self {
            transport,
            sessions,
            store,
        }
    }
}
