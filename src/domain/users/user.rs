use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::enums::Role;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub languages: Vec<String>,
    pub is_verified: bool,
    pub is_open_to_work: bool,
    pub email_verified: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Partial update of the caller's own account. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub languages: Option<Vec<String>>,
    pub is_open_to_work: Option<bool>,
}
