//! Typed client over the hospital-management API

use crate::auth::{auth_headers, json_headers};
use crate::error::{Error, Result};
use crate::routes::{account, EntityKind, RouteCatalog, RouteTemplate};
use crate::session::Session;
use crate::transport::{ApiRequest, ClientConfig, HttpTransport, Transport};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

/// API client. Every authenticated call takes the session explicitly; the
/// client holds no identity of its own.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    routes: Arc<RouteCatalog>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, routes: RouteCatalog) -> Self {
        Self {
            transport,
            routes: Arc::new(routes),
        }
    }

    /// Client over HTTP with the built-in route catalog.
    pub fn http(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(HttpTransport::new(config)?),
            RouteCatalog::default(),
        ))
    }

    pub fn routes(&self) -> &RouteCatalog {
        &self.routes
    }

    pub async fn list(&self, kind: EntityKind, session: Option<&Session>) -> Result<Value> {
        let route = self.route(kind, "list", |r| r.list.as_ref())?;
        self.authed(Method::GET, route, None, session, None).await
    }

    pub async fn create(
        &self,
        kind: EntityKind,
        session: Option<&Session>,
        record: Value,
    ) -> Result<Value> {
        let route = self.route(kind, "create", |r| r.create.as_ref())?;
        self.authed(Method::POST, route, None, session, Some(record))
            .await
    }

    /// Submit a full record; its `_id` selects the entry to update.
    pub async fn update(
        &self,
        kind: EntityKind,
        session: Option<&Session>,
        record: Value,
    ) -> Result<Value> {
        let route = self.route(kind, "update", |r| r.update.as_ref())?;
        let id = record
            .get("_id")
            .and_then(Value::as_str)
            .ok_or(Error::MissingId)?
            .to_string();
        self.authed(Method::PUT, route, Some(&id), session, Some(record))
            .await
    }

    pub async fn remove(&self, kind: EntityKind, session: Option<&Session>, id: &str) -> Result<()> {
        let route = self.route(kind, "remove", |r| r.remove.as_ref())?;
        self.authed(Method::DELETE, route, Some(id), session, None)
            .await?;
        Ok(())
    }

    pub async fn detail(&self, kind: EntityKind, session: Option<&Session>, id: &str) -> Result<Value> {
        let route = self.route(kind, "detail", |r| r.detail.as_ref())?;
        self.authed(Method::GET, route, Some(id), session, None)
            .await
    }

    /// Patient-facing variant of `detail` (`{entity}-detail-user`).
    pub async fn detail_user(
        &self,
        kind: EntityKind,
        session: Option<&Session>,
        id: &str,
    ) -> Result<Value> {
        let route = self.route(kind, "detail_user", |r| r.detail_user.as_ref())?;
        self.authed(Method::GET, route, Some(id), session, None)
            .await
    }

    /// Allowed values for a constrained field, e.g. `gender` or `paid`.
    pub async fn list_enum(
        &self,
        kind: EntityKind,
        session: Option<&Session>,
        field: &str,
    ) -> Result<Value> {
        let route = self.route(kind, "enum", |r| r.enums.get(field))?;
        self.authed(Method::GET, route, None, session, None).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let body = json!({ "email": email, "password": password });
        self.session_request(account::sign_in(), body).await
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<Session> {
        let body = json!({ "name": name, "email": email, "password": password });
        self.session_request(account::sign_up(), body).await
    }

    /// Details of the signed-in user (`GET user/{id}`).
    pub async fn current_user(&self, session: Option<&Session>) -> Result<Value> {
        let id = session.map(|s| s.id.clone()).unwrap_or_default();
        self.authed(Method::GET, &account::current_user(), Some(&id), session, None)
            .await
    }

    /// Update the signed-in user's own profile; the response is the new session.
    pub async fn update_profile(&self, session: Option<&Session>, profile: Value) -> Result<Session> {
        let value = self
            .authed(
                Method::PUT,
                &account::update_profile(),
                None,
                session,
                Some(profile),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    fn route<'a>(
        &'a self,
        kind: EntityKind,
        operation: &'static str,
        pick: impl FnOnce(&'a crate::routes::EntityRoutes) -> Option<&'a RouteTemplate>,
    ) -> Result<&'a RouteTemplate> {
        pick(self.routes.get(kind)).ok_or(Error::UnsupportedOperation {
            entity: kind.as_str(),
            operation,
        })
    }

    async fn authed(
        &self,
        method: Method,
        route: &RouteTemplate,
        id: Option<&str>,
        session: Option<&Session>,
        body: Option<Value>,
    ) -> Result<Value> {
        let headers = auth_headers(session, body.is_some())?;
        let actor = session.map(|s| s.id.as_str());
        let path = route.render(id, actor);
        tracing::debug!(method = %method, path = %path, "Sending request");

        let mut request = ApiRequest::new(method, path, headers);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.transport.send(request).await
    }

    async fn session_request(&self, route: RouteTemplate, body: Value) -> Result<Session> {
        let path = route.render(None, None);
        tracing::debug!(method = %Method::POST, path = %path, "Sending request");
        let request = ApiRequest::new(Method::POST, path, json_headers()).with_body(body);
        let value = self.transport.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }
}
