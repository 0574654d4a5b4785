use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::application::ports::verification_repository::VerificationRepository;
use crate::domain::errors::{DomainError, is_http_url};
use crate::domain::verifications::verification::Verification;

pub struct SubmitVerification<'a, U, V>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
{
    pub users: &'a U,
    pub verifications: &'a V,
}

impl<'a, U, V> SubmitVerification<'a, U, V>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        id_front_image: &str,
        id_back_image: &str,
    ) -> anyhow::Result<Verification> {
        let front = id_front_image.trim();
        let back = id_back_image.trim();
        if !is_http_url(front) || !is_http_url(back) {
            return Err(DomainError::validation("both ID images must be uploaded first").into());
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound("user"))?;
        if user.is_verified {
            return Err(DomainError::conflict("account is already verified").into());
        }
        if self
            .verifications
            .find_pending_for_user(user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict("a verification request is already pending").into());
        }
        let v = self
            .verifications
            .create_pending(user_id, front, back)
            .await?;
        tracing::info!(user_id = %user_id, verification_id = %v.id, "verification_submitted");
        Ok(v)
    }
}
