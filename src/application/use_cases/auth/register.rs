use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::{generate_token, hash_token, normalize_email};
use crate::domain::enums::Role;
use crate::domain::errors::DomainError;
use crate::domain::users::user::User;

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub admin_emails: &'a [String],
    pub require_email_verification: bool,
    pub token_ttl: chrono::Duration,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Registered {
    pub user: User,
    /// Present when the account must confirm its email before logging in.
    pub verification_token: Option<String>,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> anyhow::Result<Registered> {
        let email = normalize_email(&req.email);
        let name = req.name.trim();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(DomainError::validation("invalid email address").into());
        }
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty").into());
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ))
            .into());
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        let role = if self
            .admin_emails
            .iter()
            .any(|a| normalize_email(a) == email)
        {
            Role::Admin
        } else {
            Role::User
        };
        let user = self
            .repo
            .create_user(&email, name, &hash, role, !self.require_email_verification)
            .await?;

        let verification_token = if self.require_email_verification {
            let token = generate_token();
            let expires_at = chrono::Utc::now() + self.token_ttl;
            self.repo
                .store_email_token(user.id, &hash_token(&token), expires_at)
                .await?;
            Some(token)
        } else {
            None
        };
        Ok(Registered {
            user,
            verification_token,
        })
    }
}
