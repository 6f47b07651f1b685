//! Member and account models.
//!
//! The role carried here only decides what the dashboard offers to show;
//! the backend enforces every permission on its side.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::lenient::{pick_string, unwrap_record};
use validator::Validate;

use super::Normalize;

/// Dashboard role mirrored from the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Planner,
    #[default]
    Worker,
    Other(String),
}

impl Role {
    /// Parses backend role strings such as `ADMIN`, `ROLE_ADMIN` or `admin`.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_uppercase();
        let normalized = normalized.trim_start_matches("ROLE_");

        match normalized {
            "ADMIN" | "ADMINISTRATOR" => Self::Admin,
            "PLANNER" | "MANAGER" => Self::Planner,
            "WORKER" | "USER" | "MEMBER" => Self::Worker,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Whether member administration is shown.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether master-data imports and scenario runs are shown.
    pub fn can_manage_master_data(&self) -> bool {
        matches!(self, Self::Admin | Self::Planner)
    }

    /// Whether notice authoring and pinning are shown.
    pub fn can_manage_notices(&self) -> bool {
        matches!(self, Self::Admin | Self::Planner)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Planner => write!(f, "PLANNER"),
            Self::Worker => write!(f, "WORKER"),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// The signed-in account kept in the account store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Normalize for Account {
    fn normalize(value: &Value) -> Option<Self> {
        let value = match value.get("member") {
            Some(member @ Value::Object(_)) => member,
            _ => value,
        };

        let id = pick_string(value, &["id", "memberId", "member_id", "loginId", "email"])?;
        let name = pick_string(value, &["name", "memberName", "member_name", "username"])
            .unwrap_or_else(|| id.clone());
        let role = pick_string(value, &["role", "auth", "authority"])
            .map(|raw| Role::parse(&raw))
            .unwrap_or_default();

        Some(Self { id, name, role })
    }
}

/// Credentials posted to `/api/member/login`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Result of a successful login: the bearer token plus the account it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub account: Option<Account>,
}

impl Normalize for LoginResponse {
    fn normalize(value: &Value) -> Option<Self> {
        let value = unwrap_record(value);
        let token = pick_string(
            value,
            &["token", "accessToken", "access_token", "jwt", "data.token"],
        )?;
        let token = token.trim_start_matches("Bearer ").to_string();

        Some(Self {
            token,
            account: Account::normalize(value),
        })
    }
}

/// A member row in the member administration list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub department: Option<String>,
}

impl Normalize for Member {
    fn normalize(value: &Value) -> Option<Self> {
        let account = Account::normalize(value)?;
        Some(Self {
            id: account.id,
            name: account.name,
            email: pick_string(value, &["email", "mail"]),
            role: account.role,
            department: pick_string(value, &["department", "dept", "team"]),
        })
    }
}

/// Member create/upsert payload.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayload {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    pub role: Role,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}
