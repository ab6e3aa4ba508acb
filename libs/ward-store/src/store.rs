//! Coordinating layer over all entity containers.

use crate::account::SessionManager;
use crate::container::{EntityContainer, MergeStrategy};
use crate::entity::Record;
use crate::error::{OpError, Result};
use crate::guard::{AccessGuard, GuardDecision};
use crate::slice::EntitySlice;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use ward_client::{ApiClient, EntityKind, Session, SessionStore};

/// One container per entity kind plus the session they all read.
///
/// Containers only report token rejections; ending the session is decided
/// here, once per rejection, in [`Store::settle`].
pub struct Store {
    client: ApiClient,
    sessions: SessionManager,
    slices: BTreeMap<EntityKind, EntitySlice<Record>>,
}

impl Store {
    /// Build the store and seed the session from `session_store`.
    pub fn new(client: ApiClient, session_store: Arc<dyn SessionStore>) -> Self {
        let sessions = SessionManager::new(session_store);
        sessions.restore();
        let slices = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, EntitySlice::new(kind, client.clone())))
            .collect();
        Self {
            client,
            sessions,
            slices,
        }
    }

    pub fn with_merge_strategy(mut self, kind: EntityKind, strategy: MergeStrategy) -> Self {
        let slice = EntitySlice::new(kind, self.client.clone()).with_merge_strategy(strategy);
        self.slices.insert(kind, slice);
        self
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn session(&self) -> Option<Arc<Session>> {
        self.sessions.current()
    }

    pub fn slice(&self, kind: EntityKind) -> &EntitySlice<Record> {
        // Seeded for every kind in `new`; `with_merge_strategy` only replaces.
        &self.slices[&kind]
    }

    /// Snapshot of one container for display.
    pub fn container(&self, kind: EntityKind) -> EntityContainer<Record> {
        self.slice(kind).snapshot()
    }

    pub fn guard(&self, guard: AccessGuard, location: &str) -> GuardDecision {
        let session = self.session();
        guard.evaluate(session.as_deref(), location)
    }

    pub fn reset(&self, kind: EntityKind) {
        self.slice(kind).reset();
    }

    pub async fn list(&self, kind: EntityKind) -> Result<()> {
        let result = self.slice(kind).list(self.sessions.context()).await;
        self.settle(kind, result)
    }

    pub async fn create(&self, kind: EntityKind, record: Value) -> Result<()> {
        let result = self.slice(kind).create(self.sessions.context(), record).await;
        self.settle(kind, result)
    }

    pub async fn update(&self, kind: EntityKind, record: Value) -> Result<()> {
        let result = self.slice(kind).update(self.sessions.context(), record).await;
        self.settle(kind, result)
    }

    pub async fn remove(&self, kind: EntityKind, id: &str) -> Result<()> {
        let result = self.slice(kind).remove(self.sessions.context(), id).await;
        self.settle(kind, result)
    }

    pub async fn detail(&self, kind: EntityKind, id: &str) -> Result<()> {
        let result = self.slice(kind).detail(self.sessions.context(), id).await;
        self.settle(kind, result)
    }

    pub async fn detail_user(&self, kind: EntityKind, id: &str) -> Result<()> {
        let result = self
            .slice(kind)
            .detail_user(self.sessions.context(), id)
            .await;
        self.settle(kind, result)
    }

    pub async fn list_enum(&self, kind: EntityKind, field: &str) -> Result<()> {
        let result = self
            .slice(kind)
            .list_enum(self.sessions.context(), field)
            .await;
        self.settle(kind, result)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Arc<Session>> {
        self.sessions.sign_in(&self.client, email, password).await
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<Arc<Session>> {
        self.sessions
            .sign_up(&self.client, name, email, password)
            .await
    }

    pub async fn update_profile(&self, profile: Value) -> Result<Arc<Session>> {
        let result = self.sessions.update_profile(&self.client, profile).await;
        self.settle(EntityKind::User, result)
    }

    pub async fn load_current_user(&self) -> Result<()> {
        self.sessions.load_current_user(&self.client).await
    }

    pub fn sign_out(&self) -> bool {
        self.sessions.sign_out()
    }

    /// Forced logout on a token rejection; everything else passes through.
    fn settle<T>(&self, kind: EntityKind, result: Result<T>) -> Result<T> {
        if let Err(OpError::AuthErrorDetected(message)) = &result {
            tracing::warn!(entity = %kind, message = %message, "Token rejected, ending session");
            self.sessions.sign_out();
        }
        result
    }
}
