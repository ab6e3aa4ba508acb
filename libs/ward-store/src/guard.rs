//! Route-level access guards.
//!
//! Guards read the one canonical session and compare its role against the
//! requirement. They never mutate anything; the caller decides what to do with
//! a redirect.

use serde::Serialize;
use ward_client::{Role, Session};

/// Where unauthenticated or unauthorized visitors are sent.
pub const SIGN_IN_PATH: &str = "/signin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    /// Any signed-in session.
    Authenticated,
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum GuardDecision {
    Render,
    /// `from` is the originally requested location, kept for a post-login return.
    Redirect { to: String, from: String },
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessGuard {
    requirement: Requirement,
}

impl AccessGuard {
    pub const fn new(requirement: Requirement) -> Self {
        Self { requirement }
    }

    pub const fn admin() -> Self {
        Self::new(Requirement::Role(Role::Admin))
    }

    pub const fn doctor() -> Self {
        Self::new(Requirement::Role(Role::Doctor))
    }

    pub const fn patient() -> Self {
        Self::new(Requirement::Role(Role::Patient))
    }

    pub const fn authenticated() -> Self {
        Self::new(Requirement::Authenticated)
    }

    pub fn allows(&self, session: Option<&Session>) -> bool {
        match (session, self.requirement) {
            (None, _) => false,
            (Some(_), Requirement::Authenticated) => true,
            (Some(session), Requirement::Role(role)) => session.role == role,
        }
    }

    pub fn evaluate(&self, session: Option<&Session>, location: &str) -> GuardDecision {
        if self.allows(session) {
            GuardDecision::Render
        } else {
            GuardDecision::Redirect {
                to: SIGN_IN_PATH.to_string(),
                from: location.to_string(),
            }
        }
    }
}
