//! Async driver for one entity container

use crate::container::{EntityContainer, MergeStrategy, Operation};
use crate::entity::{Entity, Record};
use crate::error::{OpError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use ward_client::{ApiClient, EntityKind, SessionContext};

/// Runs container operations against the API.
///
/// The container lock is only taken to mark an operation pending and to apply
/// its outcome, never across the request itself. Responses are applied in the
/// order they settle.
pub struct EntitySlice<R: Entity = Record> {
    kind: EntityKind,
    client: ApiClient,
    strategy: MergeStrategy,
    state: Arc<Mutex<EntityContainer<R>>>,
}

impl<R: Entity> Clone for EntitySlice<R> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            client: self.client.clone(),
            strategy: self.strategy,
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: Entity> EntitySlice<R> {
    pub fn new(kind: EntityKind, client: ApiClient) -> Self {
        Self {
            kind,
            client,
            strategy: MergeStrategy::default(),
            state: Arc::new(Mutex::new(EntityContainer::default())),
        }
    }

    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Copy of the current container state.
    pub fn snapshot(&self) -> EntityContainer<R> {
        self.lock().clone()
    }

    /// Clear the lifecycle flags without touching data.
    pub fn reset(&self) {
        self.lock().status.reset();
    }

    pub async fn list(&self, ctx: &SessionContext) -> Result<()> {
        let session = ctx.snapshot();
        let request = async {
            let value = self.client.list(self.kind, session.as_deref()).await?;
            decode::<Vec<R>>(value)
        };
        self.run(Operation::List, request, |c, records| c.apply_list(records))
            .await
    }

    pub async fn create(&self, ctx: &SessionContext, record: Value) -> Result<()> {
        let session = ctx.snapshot();
        let request = async {
            let value = self
                .client
                .create(self.kind, session.as_deref(), record)
                .await?;
            decode::<R>(value)
        };
        self.run(Operation::Create, request, |c, created| c.apply_create(created))
            .await
    }

    pub async fn update(&self, ctx: &SessionContext, record: Value) -> Result<()> {
        let session = ctx.snapshot();
        let strategy = self.strategy;
        let request = async {
            let value = self
                .client
                .update(self.kind, session.as_deref(), record)
                .await?;
            decode::<R>(value)
        };
        self.run(Operation::Update, request, move |c, updated| {
            c.apply_update(updated, strategy)
        })
        .await
    }

    pub async fn remove(&self, ctx: &SessionContext, id: &str) -> Result<()> {
        let session = ctx.snapshot();
        let request = self.client.remove(self.kind, session.as_deref(), id);
        self.run(Operation::Remove, request, |c, ()| c.apply_remove(id))
            .await
    }

    pub async fn detail(&self, ctx: &SessionContext, id: &str) -> Result<()> {
        let session = ctx.snapshot();
        let request = async {
            let value = self.client.detail(self.kind, session.as_deref(), id).await?;
            decode::<R>(value)
        };
        self.run(Operation::Detail, request, |c, record| c.apply_detail(record))
            .await
    }

    pub async fn detail_user(&self, ctx: &SessionContext, id: &str) -> Result<()> {
        let session = ctx.snapshot();
        let request = async {
            let value = self
                .client
                .detail_user(self.kind, session.as_deref(), id)
                .await?;
            decode::<R>(value)
        };
        self.run(Operation::DetailUser, request, |c, record| {
            c.apply_user_detail(record)
        })
        .await
    }

    pub async fn list_enum(&self, ctx: &SessionContext, field: &str) -> Result<()> {
        let session = ctx.snapshot();
        let request = async {
            let value = self
                .client
                .list_enum(self.kind, session.as_deref(), field)
                .await?;
            decode::<Vec<Value>>(value)
        };
        self.run(Operation::Enum, request, |c, values| c.apply_enum(field, values))
            .await
    }

    async fn run<T, F>(
        &self,
        operation: Operation,
        request: impl Future<Output = ward_client::Result<T>>,
        apply: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut EntityContainer<R>, T),
    {
        self.lock().status.begin();
        tracing::debug!(entity = %self.kind, operation = %operation, "Operation pending");

        let outcome = request.await;

        let mut container = self.lock();
        match outcome {
            Ok(payload) => {
                apply(&mut container, payload);
                tracing::debug!(entity = %self.kind, operation = %operation, "Operation fulfilled");
                Ok(())
            }
            Err(err) => {
                let op_error = OpError::from_client(&err, operation.invalidates_session());
                container.status.reject(op_error.message());
                tracing::debug!(
                    entity = %self.kind,
                    operation = %operation,
                    error = %op_error,
                    "Operation rejected"
                );
                Err(op_error)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, EntityContainer<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> ward_client::Result<T> {
    Ok(serde_json::from_value(value)?)
}
