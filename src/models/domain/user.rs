use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Instructor,
    Admin,
}

/// Local mirror of an identity owned by the external auth provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: &str, name: Option<&str>, email: &str, role: UserRole) -> Self {
        User {
            id: id.to_string(),
            name: name.map(str::to_string),
            email: email.to_string(),
            role,
            created_at: Some(Utc::now()),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
