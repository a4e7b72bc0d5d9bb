//! Authentication payloads.

use serde::{Deserialize, Serialize};

/// Role gate the dashboard routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Manager,
    Member,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Manager => "Manager",
            UserRole::Member => "Member",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(UserRole::Admin),
            "Manager" => Ok(UserRole::Manager),
            "Member" => Ok(UserRole::Member),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Identity snapshot kept alongside the tokens.
///
/// Only the fields the session needs survive; timestamps and team
/// membership of the full user record are dropped before persisting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub username: String,
}

/// Body of a successful login or admin registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterAdminRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_payload_ignores_extra_user_fields() {
        let payload: AuthPayload = serde_json::from_value(serde_json::json!({
            "accessToken": "a",
            "refreshToken": "r",
            "user": {
                "id": "u1",
                "email": "ada@example.com",
                "role": "Admin",
                "username": "ada",
                "teamId": "t1",
                "createdAt": "2024-01-01T00:00:00Z"
            }
        }))
        .unwrap();

        assert_eq!(payload.access_token.as_deref(), Some("a"));
        assert_eq!(payload.user.unwrap().role, UserRole::Admin);
    }

    #[test]
    fn role_parses_from_wire_name() {
        assert_eq!("Manager".parse::<UserRole>(), Ok(UserRole::Manager));
        assert!("manager".parse::<UserRole>().is_err());
    }
}
