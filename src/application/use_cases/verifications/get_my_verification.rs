use uuid::Uuid;

use crate::application::ports::verification_repository::VerificationRepository;
use crate::domain::verifications::verification::Verification;

pub struct GetMyVerification<'a, V: VerificationRepository + ?Sized> {
    pub verifications: &'a V,
}

impl<'a, V: VerificationRepository + ?Sized> GetMyVerification<'a, V> {
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<Option<Verification>> {
        self.verifications.latest_for_user(user_id).await
    }
}
