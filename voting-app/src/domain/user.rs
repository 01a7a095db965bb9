use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: uuid::Uuid,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    pub fn new(google_id: String, email: String, name: String, avatar_url: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            google_id,
            email,
            name,
            avatar_url,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Roles are never stored: whoever signs in with the configured admin address is admin.
pub fn role_for_email(email: &str, admin_email: Option<&str>) -> Role {
    match admin_email.map(str::trim) {
        Some(admin) if !admin.is_empty() && admin.eq_ignore_ascii_case(email.trim()) => {
            Role::Admin
        }
        _ => Role::User,
    }
}

/// The caller behind a request, materialised from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
