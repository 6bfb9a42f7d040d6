use axum::http::HeaderMap;
use serde::Serialize;

pub const SESSION_USER_HEADER: &str = "x-session-user";
pub const SESSION_ROLE_HEADER: &str = "x-session-role";
pub const SESSION_DISPLAY_NAME_HEADER: &str = "x-session-display-name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// Who is asking. Filled in by whatever fronts this service after sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub display_name: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// `None` when the user header is missing or blank. An absent or unrecognised
    /// role is treated as a regular user.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let username = header_str(headers, SESSION_USER_HEADER)?.to_string();
        let role = header_str(headers, SESSION_ROLE_HEADER)
            .and_then(Role::parse)
            .unwrap_or(Role::User);
        let display_name = header_str(headers, SESSION_DISPLAY_NAME_HEADER).map(str::to_string);

        Some(Self {
            username,
            role,
            display_name,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
