use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::hash_token;
use crate::domain::errors::DomainError;

pub struct VerifyEmail<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> VerifyEmail<'a, R> {
    pub async fn execute(&self, token: &str) -> anyhow::Result<Uuid> {
        if token.trim().is_empty() {
            return Err(DomainError::validation("token is required").into());
        }
        self.repo
            .consume_email_token(&hash_token(token), chrono::Utc::now())
            .await?
            .ok_or_else(|| DomainError::validation("invalid or expired token").into())
    }
}
