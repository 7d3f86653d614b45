//! Auth DTOs shared between the console client and its binaries
//!
//! The login endpoint has shipped several response shapes over time, so the
//! response type accepts all of them and exposes a single accessor.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Nested `data` object some login responses carry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub token: Option<String>,
}

/// Login response data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub data: Option<LoginData>,
    #[serde(default)]
    pub admin: Option<AdminInfo>,
    #[serde(default)]
    pub user: Option<AdminInfo>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// Bearer token, first of `token`, `accessToken`, `data.token`
    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .or(self.access_token.as_deref())
            .or_else(|| self.data.as_ref().and_then(|d| d.token.as_deref()))
            .filter(|t| !t.is_empty())
    }

    /// Authenticated admin identity, `admin` preferred over `user`
    pub fn into_admin(self) -> Option<AdminInfo> {
        self.admin.or(self.user)
    }
}

/// Admin identity returned by the login endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminInfo {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl AdminInfo {
    /// Name to greet the admin with
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_precedence() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "accessToken": "b",
            "data": { "token": "c" }
        }))
        .unwrap();
        assert_eq!(resp.bearer_token(), Some("b"));

        let resp: LoginResponse =
            serde_json::from_value(json!({ "data": { "token": "c" } })).unwrap();
        assert_eq!(resp.bearer_token(), Some("c"));

        let resp: LoginResponse =
            serde_json::from_value(json!({ "token": "a", "accessToken": "b" })).unwrap();
        assert_eq!(resp.bearer_token(), Some("a"));
    }

    #[test]
    fn test_missing_token() {
        let resp: LoginResponse = serde_json::from_value(json!({ "message": "ok" })).unwrap();
        assert!(resp.bearer_token().is_none());
    }

    #[test]
    fn test_admin_falls_back_to_user() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "token": "t",
            "user": { "_id": "u1", "username": "root" }
        }))
        .unwrap();
        let admin = resp.into_admin().unwrap();
        assert_eq!(admin.id, "u1");
        assert_eq!(admin.display_name(), "root");
    }
}
