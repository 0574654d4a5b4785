use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::application::use_cases::auth::normalize_email;
use crate::domain::errors::DomainError;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub require_email_verification: bool,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    /// `Ok(None)` for unknown email or wrong password.
    pub async fn execute(&self, req: &LoginRequest) -> anyhow::Result<Option<UserRow>> {
        let row = match self.repo.find_by_email(&normalize_email(&req.email)).await? {
            Some(r) => r,
            None => return Ok(None),
        };
        let Some(hash) = row.password_hash.clone().filter(|h| !h.is_empty()) else {
            return Ok(None);
        };
        let parsed = PasswordHash::new(&hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed)
            .is_err()
        {
            return Ok(None);
        }
        if self.require_email_verification && !row.email_verified {
            return Err(DomainError::forbidden("email address is not verified").into());
        }
        Ok(Some(UserRow {
            password_hash: None,
            ..row
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;
    use crate::application::use_cases::auth::register::{Register, RegisterRequest};

    async fn registered(store: &InMemoryStore, gated: bool) {
        Register {
            repo: store,
            admin_emails: &[],
            require_email_verification: gated,
            token_ttl: chrono::Duration::hours(1),
        }
        .execute(&RegisterRequest {
            email: "sam@example.com".into(),
            name: "Sam".into(),
            password: "hunter2hunter2".into(),
        })
        .await
        .unwrap();
    }

    fn creds(password: &str) -> LoginRequest {
        LoginRequest {
            email: "SAM@example.com".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn verifies_password() {
        let store = InMemoryStore::default();
        registered(&store, false).await;
        let uc = Login {
            repo: &store,
            require_email_verification: false,
        };
        let ok = uc.execute(&creds("hunter2hunter2")).await.unwrap().unwrap();
        assert_eq!(ok.email, "sam@example.com");
        assert!(ok.password_hash.is_none());
        assert!(uc.execute(&creds("wrong-password")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unverified_email_is_refused_when_gated() {
        let store = InMemoryStore::default();
        registered(&store, true).await;
        let uc = Login {
            repo: &store,
            require_email_verification: true,
        };
        let err = uc.execute(&creds("hunter2hunter2")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Forbidden(_))
        ));
    }
}
