use uuid::Uuid;

use crate::application::access;
use crate::application::ports::user_repository::UserRepository;
use crate::application::ports::verification_repository::VerificationRepository;
use crate::domain::verifications::verification::PendingVerification;

pub struct ListPendingVerifications<'a, U, V>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
{
    pub users: &'a U,
    pub verifications: &'a V,
}

impl<'a, U, V> ListPendingVerifications<'a, U, V>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
{
    pub async fn execute(&self, actor_id: Uuid) -> anyhow::Result<Vec<PendingVerification>> {
        access::require_admin(self.users, actor_id).await?;
        self.verifications.list_pending().await
    }
}
