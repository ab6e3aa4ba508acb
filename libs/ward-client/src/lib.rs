//! Ward API client
//!
//! Async client for the ward hospital-management REST API: session model and
//! persistence, bearer-token request headers, the per-entity route catalog and
//! an HTTP transport that normalizes the server's error payloads.
//!
//! # Examples
//!
//! ## Sign in and list expenses
//!
//! ```rust,no_run
//! use ward_client::{ApiClient, ClientConfig, EntityKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::http(&ClientConfig::default())?;
//! let session = client.sign_in("admin@example.org", "secret").await?;
//! let expenses = client.list(EntityKind::Expense, Some(&session)).await?;
//! # Ok(())
//! # }
//! ```
//!
pub mod api;
pub mod auth;
pub mod error;
pub mod routes;
pub mod session;
pub mod storage;
pub mod transport;

pub use api::ApiClient;
pub use auth::auth_headers;
pub use error::{Error, Result, AUTH_FAILURE_SENTINEL, UNAUTHENTICATED_MESSAGE};
pub use routes::{EntityKind, EntityRoutes, RouteCatalog, RouteTemplate};
pub use session::{Role, Session, SessionContext};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore, SESSION_KEY};
pub use transport::{ApiRequest, ClientConfig, HttpTransport, Transport};

// Re-exported so downstream transports need no direct reqwest dependency.
pub use reqwest::{header, Method};
