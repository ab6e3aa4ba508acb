//! Ward entity store
//!
//! Client-side state for the ward hospital-management API:
//! - One generic container per entity kind with a shared request lifecycle
//! - A coordinating [`Store`] that ends the session when the server rejects the token
//! - Role-based access guards
//! - Dashboard aggregations over loaded containers
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ward_client::{ApiClient, ClientConfig, EntityKind, FileSessionStore};
//! use ward_store::{dashboard, Store};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::http(&ClientConfig::default())?;
//! let store = Store::new(client, Arc::new(FileSessionStore::new(None)));
//! store.list(EntityKind::Expense).await?;
//! let total = dashboard::expense_total(&store.container(EntityKind::Expense).records);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod container;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod guard;
pub mod slice;
pub mod store;

pub use account::{AccountState, SessionManager};
pub use container::{EntityContainer, Lifecycle, MergeStrategy, Operation};
pub use dashboard::AdminSummary;
pub use entity::{Entity, Record};
pub use error::{OpError, Result};
pub use guard::{AccessGuard, GuardDecision, Requirement, SIGN_IN_PATH};
pub use slice::EntitySlice;
pub use store::Store;
