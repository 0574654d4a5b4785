use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::enums::Role;
use crate::domain::users::user::{User, UserPatch};

/// Credential view of a user, only used by the auth use cases.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub email_verified: bool,
    pub role: Role,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::Conflict` when the email is already taken.
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
        email_verified: bool,
    ) -> anyhow::Result<User>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> anyhow::Result<Option<User>>;
    async fn set_image(&self, id: Uuid, image_url: &str) -> anyhow::Result<bool>;
    async fn store_email_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    /// Deletes the token and marks the email verified. Returns the owner when the
    /// token existed and had not expired at `now`.
    async fn consume_email_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Uuid>>;
}
