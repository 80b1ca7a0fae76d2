//! Identity payloads exchanged with the authentication endpoints.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Role attached to an authenticated identity.
///
/// The backend may grow roles the console does not know about; those are
/// kept verbatim in [`Role::Other`] so role comparisons stay exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Product catalogue administrator.
    Admin,
    /// Custom-order designer.
    Designer,
    /// Any other role label returned by the backend.
    Other(String),
}

impl Role {
    /// Wire label for the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Designer => "designer",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Self::Admin,
            "designer" => Self::Designer,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Other(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identity record produced by the verification endpoint or cached locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Backend identifier of the user.
    pub user_id: String,
    /// Login name.
    pub username: String,
    /// Role granted to the user.
    pub role: Role,
    /// Display name.
    pub name: String,
}

/// Success body of `GET /api/auth/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Server-confirmed identity.
    pub user: UserRecord,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password, sent over the configured transport only.
    pub password: String,
}

/// Success body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token.
    pub token: String,
    /// Identity the token was issued for.
    pub user: UserRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_keeps_unknown_labels_verbatim() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("designer"), Role::Designer);
        let other = Role::from("auditor");
        assert_eq!(other, Role::Other("auditor".to_string()));
        assert_eq!(other.to_string(), "auditor");
        assert_ne!(Role::from("Admin"), Role::Admin);
    }

    #[test]
    fn user_record_uses_camel_case_fields() {
        let user: UserRecord = serde_json::from_value(json!({
            "userId": "u-1",
            "username": "asha",
            "role": "designer",
            "name": "Asha"
        }))
        .expect("user record");
        assert_eq!(user.role, Role::Designer);
        assert_eq!(user.user_id, "u-1");

        let value = serde_json::to_value(&user).expect("serialize");
        assert_eq!(value["userId"], "u-1");
        assert_eq!(value["role"], "designer");
    }

    #[test]
    fn verify_response_requires_user_field() {
        let missing = serde_json::from_value::<VerifyResponse>(json!({"ok": true}));
        assert!(missing.is_err());
        let partial = serde_json::from_value::<VerifyResponse>(json!({"user": {"role": "admin"}}));
        assert!(partial.is_err());
    }
}
