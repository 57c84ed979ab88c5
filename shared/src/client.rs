//! Client-related types shared between the API client and the console
//!
//! Request/response bodies of the auth endpoints.

use serde::{Deserialize, Serialize};

use crate::permissions::{self, Permission, Role};
use crate::serde_helpers::{null_as_default, string_or_number};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request (`POST auth/login/`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body
///
/// The backend answers `{success: true, access_token, refresh_token, user}`
/// or `{success: false, message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserInfo>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Logout request: the refresh token to revoke server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh: Option<String>,
}

/// Authenticated user identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "username")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

impl UserInfo {
    /// Roles the console knows about. Unknown role names are skipped.
    pub fn known_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().filter_map(|r| r.parse().ok())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Union of the permissions granted by every role the user holds
    pub fn permissions(&self) -> Vec<Permission> {
        permissions::permissions_for(self.known_roles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_success() {
        let body = r#"{
            "success": true,
            "access_token": "tok1",
            "refresh_token": "ref1",
            "user": {"id": 1, "roles": ["admin"]}
        }"#;
        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        assert!(resp.success);
        assert_eq!(resp.access_token.as_deref(), Some("tok1"));
        let user = resp.user.unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.roles, vec!["admin".to_string()]);
        assert!(!user.is_superuser);
    }

    #[test]
    fn test_login_response_failure() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"success": false, "message": "Invalid email or password"}"#)
                .unwrap();
        assert!(!resp.success);
        assert!(resp.user.is_none());
        assert_eq!(resp.message.as_deref(), Some("Invalid email or password"));
    }

    #[test]
    fn test_user_permissions_union() {
        let user = UserInfo {
            id: "1".into(),
            name: "Admin User".into(),
            email: "admin@cybercobra.gov".into(),
            roles: vec!["admin".into(), "operator".into(), "auditor".into()],
            is_superuser: true,
        };
        let perms = user.permissions();
        assert!(perms.contains(&Permission::ManageUsers));
        assert!(perms.contains(&Permission::ManageCameras));
        assert!(!perms.contains(&Permission::ViewPublicData));
        // manage_zones is granted by both roles but listed once
        assert_eq!(
            perms.iter().filter(|p| **p == Permission::ManageZones).count(),
            1
        );
    }
}
