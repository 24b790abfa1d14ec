//! REST DTOs shared between the API helpers and client state.
//!
//! DESIGN
//! ======
//! Field names mirror the backend's JSON. Where the backend is loose about
//! representation (numeric vs string ids, bare vs enveloped payloads) the
//! deserializers accept both so the UI never fails on a cosmetic difference.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Marketplace role. Closed set: adding a role forces every `match` on it to
/// be revisited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Mentee,
    Mentor,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mentee => "mentee",
            Self::Mentor => "mentor",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Default landing route for users holding this role.
    #[must_use]
    pub fn landing_path(self) -> &'static str {
        match self {
            Self::Mentee => "/mentee/dashboard",
            Self::Mentor => "/mentor/dashboard",
            Self::Admin | Self::SuperAdmin => "/admin/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "mentee" => Ok(Self::Mentee),
            "mentor" => Ok(Self::Mentor),
            "admin" => Ok(Self::Admin),
            "super_admin" | "superadmin" => Ok(Self::SuperAdmin),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}

/// What a user record says about its role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleClaim {
    /// No role on the record; the session is corrupted.
    Missing,
    Known(Role),
    /// A role string this client does not know about.
    Unrecognized(String),
}

/// The signed-in user as stored with the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, alias = "full_name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Raw role string; resolve with [`User::role_claim`].
    #[serde(default)]
    pub role: String,
    #[serde(default, alias = "avatar_url")]
    pub avatar: Option<String>,
}

impl User {
    #[must_use]
    pub fn role_claim(&self) -> RoleClaim {
        if self.role.trim().is_empty() {
            return RoleClaim::Missing;
        }
        match self.role.parse() {
            Ok(role) => RoleClaim::Known(role),
            Err(UnknownRole(raw)) => RoleClaim::Unrecognized(raw),
        }
    }

    /// The role if it is one this client knows.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self.role_claim() {
            RoleClaim::Known(role) => Some(role),
            RoleClaim::Missing | RoleClaim::Unrecognized(_) => None,
        }
    }
}

/// A notification as served by `/notifications`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub is_read: bool,
    /// Notification category (e.g. `"session_booked"`).
    #[serde(rename = "type", alias = "notification_type", default)]
    pub kind: String,
    /// ISO 8601 creation timestamp.
    #[serde(alias = "created_at", default)]
    pub timestamp: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Category-specific data (session id, ticket id, ...).
    #[serde(alias = "data", default)]
    pub payload: serde_json::Value,
}

/// Query options for `GET /notifications`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationFilter {
    pub unread_only: bool,
    pub kind: Option<String>,
}

/// `GET /notifications` body: either a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NotificationListBody {
    Bare(Vec<Notification>),
    Paginated { results: Vec<Notification> },
}

impl NotificationListBody {
    pub(crate) fn into_items(self) -> Vec<Notification> {
        match self {
            Self::Bare(items) | Self::Paginated { results: items } => items,
        }
    }
}

/// `GET /notifications/unread-count` body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UnreadCountBody {
    Bare(u32),
    Count { count: u32 },
    UnreadCount { unread_count: u32 },
}

impl UnreadCountBody {
    pub(crate) fn count(&self) -> u32 {
        match *self {
            Self::Bare(n) | Self::Count { count: n } | Self::UnreadCount { unread_count: n } => n,
        }
    }
}

/// Body for `POST /scheduling/sessions/{id}/rate/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionRating {
    pub rating: u8,
    pub feedback: String,
}

/// `GET /scheduling/sessions/{id}/video-room/` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRoom {
    pub room_url: String,
}

/// Identity known to the provider but without a local account yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Opaque token the registration endpoint uses to link the identity.
    #[serde(default)]
    pub registration_token: Option<String>,
}

/// `POST /auth/register/` payload built from the signup wizard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub field_of_study: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_token: Option<String>,
}

/// Session issued by `POST /auth/register/`.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthTokenBody {
    #[serde(default, alias = "access", alias = "access_token")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// `POST /auth/social/callback/` body.
#[derive(Debug, Deserialize)]
pub(crate) struct SocialCallbackBody {
    #[serde(default, alias = "access", alias = "access_token")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub needs_registration: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub registration_token: Option<String>,
}

impl SocialCallbackBody {
    pub(crate) fn pending_registration(&self) -> PendingRegistration {
        PendingRegistration {
            email: self.email.clone(),
            name: self.name.clone(),
            registration_token: self.registration_token.clone(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Ok(s),
        serde_json::Value::Number(n) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected a non-empty string or integer id")),
    }
}
