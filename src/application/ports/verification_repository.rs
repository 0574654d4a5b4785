use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::verifications::verification::{PendingVerification, Resolution, Verification};

#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Fails with `DomainError::Conflict` if the user already has a pending request.
    async fn create_pending(
        &self,
        user_id: Uuid,
        id_front_image: &str,
        id_back_image: &str,
    ) -> anyhow::Result<Verification>;
    async fn latest_for_user(&self, user_id: Uuid) -> anyhow::Result<Option<Verification>>;
    async fn find_pending_for_user(&self, user_id: Uuid)
    -> anyhow::Result<Option<Verification>>;
    /// Oldest first.
    async fn list_pending(&self) -> anyhow::Result<Vec<PendingVerification>>;
    /// Applies `resolution` only while the record is still PENDING, and flips the
    /// user's verified flag on approval in the same transaction. `None` when the
    /// record was not pending any more.
    async fn resolve_pending(
        &self,
        verification_id: Uuid,
        resolution: &Resolution,
        resolved_by: Uuid,
    ) -> anyhow::Result<Option<Verification>>;
}
