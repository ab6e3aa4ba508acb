//! Per-entity route catalog.
//!
//! Routes follow `{entity}-{op}[/{id}][/{actor}]`, where `actor` is the id of
//! the signed-in user. The server is not consistent about which endpoints take
//! the actor segment, so every template states it explicitly rather than the
//! client guessing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single endpoint path with its optional trailing segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTemplate {
    pub path: String,
    #[serde(default)]
    pub id: bool,
    #[serde(default)]
    pub actor: bool,
}

impl RouteTemplate {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id: false,
            actor: false,
        }
    }

    pub fn with_id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn with_actor(mut self) -> Self {
        self.actor = true;
        self
    }

    /// Render the path. Segments the template does not declare are ignored.
    pub fn render(&self, id: Option<&str>, actor: Option<&str>) -> String {
        let mut url = self.path.trim_matches('/').to_string();
        if self.id {
            if let Some(id) = id {
                url.push('/');
                url.push_str(&urlencoding::encode(id));
            }
        }
        if self.actor {
            if let Some(actor) = actor {
                url.push('/');
                url.push_str(&urlencoding::encode(actor));
            }
        }
        url
    }
}

/// The endpoints one entity container talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRoutes {
    pub create: Option<RouteTemplate>,
    pub list: Option<RouteTemplate>,
    pub detail: Option<RouteTemplate>,
    pub detail_user: Option<RouteTemplate>,
    pub update: Option<RouteTemplate>,
    pub remove: Option<RouteTemplate>,
    pub enums: BTreeMap<String, RouteTemplate>,
}

impl EntityRoutes {
    /// The full `{prefix}-create|list|detail|update|remove` set, all with actor.
    fn standard(prefix: &str) -> Self {
        Self {
            create: Some(RouteTemplate::new(format!("{prefix}-create")).with_actor()),
            list: Some(RouteTemplate::new(format!("{prefix}-list")).with_actor()),
            detail: Some(
                RouteTemplate::new(format!("{prefix}-detail"))
                    .with_id()
                    .with_actor(),
            ),
            detail_user: None,
            update: Some(
                RouteTemplate::new(format!("{prefix}-update"))
                    .with_id()
                    .with_actor(),
            ),
            remove: Some(
                RouteTemplate::new(format!("{prefix}-remove"))
                    .with_id()
                    .with_actor(),
            ),
            enums: BTreeMap::new(),
        }
    }

    fn without_update(mut self) -> Self {
        self.update = None;
        self
    }

    fn remove_without_actor(mut self) -> Self {
        if let Some(remove) = self.remove.as_mut() {
            remove.actor = false;
        }
        self
    }

    fn with_detail_user(mut self, path: &str) -> Self {
        self.detail_user = Some(RouteTemplate::new(path).with_id().with_actor());
        self
    }

    /// Adds `GET {scope}/{field}-values/{actor}`.
    fn with_enum(mut self, scope: &str, field: &str) -> Self {
        self.enums.insert(
            field.to_string(),
            RouteTemplate::new(format!("{scope}/{field}-values")).with_actor(),
        );
        self
    }
}

/// Every entity container the client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Building,
    Department,
    Designation,
    Doctor,
    Expense,
    Floor,
    Medicine,
    Patient,
    Prescription,
    Specialization,
    Test,
    TestCategory,
    Treatment,
    User,
    VaccineAppointment,
    VaccineCategory,
    Vendor,
}

impl EntityKind {
    pub const ALL: [EntityKind; 17] = [
        EntityKind::Building,
        EntityKind::Department,
        EntityKind::Designation,
        EntityKind::Doctor,
        EntityKind::Expense,
        EntityKind::Floor,
        EntityKind::Medicine,
        EntityKind::Patient,
        EntityKind::Prescription,
        EntityKind::Specialization,
        EntityKind::Test,
        EntityKind::TestCategory,
        EntityKind::Treatment,
        EntityKind::User,
        EntityKind::VaccineAppointment,
        EntityKind::VaccineCategory,
        EntityKind::Vendor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Building => "building",
            EntityKind::Department => "department",
            EntityKind::Designation => "designation",
            EntityKind::Doctor => "doctor",
            EntityKind::Expense => "expense",
            EntityKind::Floor => "floor",
            EntityKind::Medicine => "medicine",
            EntityKind::Patient => "patient",
            EntityKind::Prescription => "prescription",
            EntityKind::Specialization => "specialization",
            EntityKind::Test => "test",
            EntityKind::TestCategory => "test-category",
            EntityKind::Treatment => "treatment",
            EntityKind::User => "user",
            EntityKind::VaccineAppointment => "vaccine-appointment",
            EntityKind::VaccineCategory => "vaccine-category",
            EntityKind::Vendor => "vendor",
        }
    }

    /// Routes the server exposes for this entity.
    pub fn default_routes(self) -> EntityRoutes {
        match self {
            EntityKind::Building => EntityRoutes::standard("building").without_update(),
            EntityKind::Department => EntityRoutes::standard("depart"),
            EntityKind::Designation => EntityRoutes::standard("designate").without_update(),
            EntityKind::Doctor => EntityRoutes::standard("doctor")
                .remove_without_actor()
                .with_enum("doctor", "gender")
                .with_enum("doctor", "days")
                .with_enum("doctor", "duty"),
            EntityKind::Expense => EntityRoutes::standard("expenses").with_enum("expenses", "paid"),
            EntityKind::Floor => EntityRoutes::standard("floor"),
            EntityKind::Medicine => {
                EntityRoutes::standard("medicine").with_enum("medicine", "medicine-type")
            }
            EntityKind::Patient => EntityRoutes::standard("patient")
                .remove_without_actor()
                .with_detail_user("patient-detail-user")
                .with_enum("patient", "gender")
                .with_enum("patient", "patient-type")
                .with_enum("patient", "status"),
            EntityKind::Prescription => EntityRoutes::standard("pres")
                .remove_without_actor()
                .with_detail_user("pres-detail-user")
                .with_enum("pres", "paid")
                .with_enum("pres", "take"),
            EntityKind::Specialization => EntityRoutes::standard("specialize"),
            EntityKind::Test => EntityRoutes {
                update: Some(RouteTemplate::new("test-update").with_id()),
                remove: Some(RouteTemplate::new("test-remove").with_id()),
                ..EntityRoutes::standard("test")
            }
            .with_detail_user("test-detail-user")
            .with_enum("test", "paid"),
            EntityKind::TestCategory => EntityRoutes {
                create: Some(RouteTemplate::new("test-category/create").with_actor()),
                list: Some(RouteTemplate::new("test-categories").with_actor()),
                detail: Some(
                    RouteTemplate::new("test-category-detail")
                        .with_id()
                        .with_actor(),
                ),
                update: Some(RouteTemplate::new("test-category-update").with_id()),
                remove: Some(RouteTemplate::new("test-category").with_id()),
                ..EntityRoutes::default()
            },
            EntityKind::Treatment => EntityRoutes {
                create: Some(RouteTemplate::new("treatment-cat/create").with_actor()),
                list: Some(RouteTemplate::new("treatment-cat-list").with_actor()),
                detail: Some(
                    RouteTemplate::new("treatment-cat-detail")
                        .with_id()
                        .with_actor(),
                ),
                update: Some(RouteTemplate::new("treatment-cat-update").with_id()),
                remove: Some(RouteTemplate::new("treatment-cat").with_id()),
                ..EntityRoutes::default()
            },
            EntityKind::User => EntityRoutes {
                create: Some(RouteTemplate::new("register-users").with_actor()),
                list: Some(RouteTemplate::new("users/get")),
                detail: Some(RouteTemplate::new("users/other").with_id().with_actor()),
                update: Some(RouteTemplate::new("users/update").with_id().with_actor()),
                remove: Some(RouteTemplate::new("users/delete").with_id()),
                ..EntityRoutes::default()
            },
            EntityKind::VaccineAppointment => EntityRoutes::standard("vaccine-app")
                .with_enum("vaccine", "vaccine-day")
                .with_enum("vaccine", "vaccine-taken"),
            EntityKind::VaccineCategory => {
                EntityRoutes::standard("vaccine").with_enum("vaccine", "vaccine-type")
            }
            EntityKind::Vendor => EntityRoutes {
                list: Some(RouteTemplate::new("vendor-list").with_actor()),
                remove: Some(RouteTemplate::new("vendor-remove").with_id().with_actor()),
                ..EntityRoutes::default()
            },
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown entity kind: {s}"))
    }
}

/// Route table for all entities, with optional per-entity overrides.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    routes: BTreeMap<EntityKind, EntityRoutes>,
}

impl RouteCatalog {
    pub fn with_overrides(overrides: BTreeMap<EntityKind, EntityRoutes>) -> Self {
        let mut catalog = Self::default();
        for (kind, routes) in overrides {
            tracing::debug!(entity = %kind, "Using configured routes");
            catalog.routes.insert(kind, routes);
        }
        catalog
    }

    pub fn get(&self, kind: EntityKind) -> &EntityRoutes {
        // Every kind is seeded in `default()` and overrides only replace.
        &self.routes[&kind]
    }
}

impl Default for RouteCatalog {
    fn default() -> Self {
        Self {
            routes: EntityKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.default_routes()))
                .collect(),
        }
    }
}

/// Routes outside the per-entity catalog.
pub mod account {
    use super::RouteTemplate;

    pub fn sign_in() -> RouteTemplate {
        RouteTemplate::new("signin")
    }

    pub fn sign_up() -> RouteTemplate {
        RouteTemplate::new("signup")
    }

    /// `GET user/{id}`
    pub fn current_user() -> RouteTemplate {
        RouteTemplate::new("user").with_id()
    }

    /// `PUT user/{actor}`
    pub fn update_profile() -> RouteTemplate {
        RouteTemplate::new("user").with_actor()
    }
}
