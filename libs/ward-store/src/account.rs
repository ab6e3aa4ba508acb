//! Session lifecycle: restore, sign-in, profile refresh and sign-out

use crate::container::Lifecycle;
use crate::error::{OpError, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use ward_client::{ApiClient, Session, SessionContext, SessionStore};

/// Lifecycle of account operations plus the signed-in user's details.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountState {
    pub current_user: Option<Value>,
    #[serde(flatten)]
    pub status: Lifecycle,
}

/// Owns the session slot and its durable copy.
///
/// Everything that swaps the session goes through here, so the in-memory slot
/// and the persisted record never disagree for longer than one call.
#[derive(Clone)]
pub struct SessionManager {
    context: SessionContext,
    store: Arc<dyn SessionStore>,
    account: Arc<Mutex<AccountState>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            context: SessionContext::default(),
            store,
            account: Arc::new(Mutex::new(AccountState::default())),
        }
    }

    /// Seed the session slot from durable storage.
    pub fn restore(&self) -> Option<Arc<Session>> {
        match self.store.load() {
            Ok(Some(session)) => {
                tracing::info!(user_id = %session.id, role = %session.role, "Restored session");
                self.context.replace(session);
            }
            Ok(None) => tracing::debug!("No persisted session"),
            Err(e) => tracing::warn!(error = %e, "Failed to load persisted session"),
        }
        self.context.snapshot()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.context.snapshot()
    }

    pub fn account(&self) -> AccountState {
        self.lock_account().clone()
    }

    pub fn reset(&self) {
        self.lock_account().status.reset();
    }

    pub async fn sign_in(&self, client: &ApiClient, email: &str, password: &str) -> Result<Arc<Session>> {
        self.begin();
        let outcome = client.sign_in(email, password).await;
        self.establish(outcome, false)
    }

    pub async fn sign_up(
        &self,
        client: &ApiClient,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Arc<Session>> {
        self.begin();
        let outcome = client.sign_up(name, email, password).await;
        self.establish(outcome, false)
    }

    /// Update the signed-in user's profile; the response becomes the session.
    pub async fn update_profile(&self, client: &ApiClient, profile: Value) -> Result<Arc<Session>> {
        let session = self.context.snapshot();
        self.begin();
        let outcome = client.update_profile(session.as_deref(), profile).await;
        self.establish(outcome, true)
    }

    pub async fn load_current_user(&self, client: &ApiClient) -> Result<()> {
        let session = self.context.snapshot();
        self.begin();
        let outcome = client.current_user(session.as_deref()).await;
        let mut account = self.lock_account();
        match outcome {
            Ok(user) => {
                account.status.fulfill(false);
                account.current_user = Some(user);
                Ok(())
            }
            Err(e) => {
                let err = OpError::from_client(&e, false);
                account.status.reject(err.message());
                Err(err)
            }
        }
    }

    /// End the session and delete its durable copy.
    ///
    /// Returns whether a session was actually present.
    pub fn sign_out(&self) -> bool {
        let previous = self.context.clear();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to remove persisted session");
        }
        self.lock_account().current_user = None;
        match &previous {
            Some(session) => tracing::info!(user_id = %session.id, "Signed out"),
            None => tracing::debug!("Sign-out with no active session"),
        }
        previous.is_some()
    }

    fn begin(&self) {
        self.lock_account().status.begin();
    }

    fn establish(
        &self,
        outcome: ward_client::Result<Session>,
        profile_update: bool,
    ) -> Result<Arc<Session>> {
        match outcome {
            Ok(session) => {
                if let Err(e) = self.store.save(&session) {
                    tracing::warn!(error = %e, "Failed to persist session");
                }
                tracing::info!(user_id = %session.id, role = %session.role, "Session established");
                let session = Arc::new(session);
                self.context.replace(Arc::clone(&session));
                self.lock_account().status.fulfill(profile_update);
                Ok(session)
            }
            Err(e) => {
                let err = OpError::from_client(&e, profile_update);
                self.lock_account().status.reject(err.message());
                Err(err)
            }
        }
    }

    fn lock_account(&self) -> MutexGuard<'_, AccountState> {
        self.account.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
