use uuid::Uuid;

use crate::application::access;
use crate::application::ports::realtime_port::{RealtimeEvent, RealtimePort};
use crate::application::ports::user_repository::UserRepository;
use crate::application::ports::verification_repository::VerificationRepository;
use crate::domain::enums::VerificationStatus;
use crate::domain::errors::DomainError;
use crate::domain::verifications::verification::{self, Verification};

pub struct UpdateVerificationStatus<'a, U, V, N>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
    N: RealtimePort + ?Sized,
{
    pub users: &'a U,
    pub verifications: &'a V,
    pub realtime: &'a N,
}

impl<'a, U, V, N> UpdateVerificationStatus<'a, U, V, N>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
    N: RealtimePort + ?Sized,
{
    /// Resolves `user_id`'s pending request. Admin only.
    pub async fn execute(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        status: VerificationStatus,
        reason: Option<String>,
    ) -> anyhow::Result<Verification> {
        let admin = access::require_admin(self.users, actor_id).await?;
        if status == VerificationStatus::Pending {
            return Err(DomainError::validation("status must be APPROVED or REJECTED").into());
        }
        let pending = self
            .verifications
            .find_pending_for_user(user_id)
            .await?
            .ok_or(DomainError::NotFound("pending verification"))?;
        let resolution = verification::resolve(pending.status, status, reason)?;

        // Guarded on PENDING in storage: a concurrent resolution makes this miss.
        let resolved = self
            .verifications
            .resolve_pending(pending.id, &resolution, admin.id)
            .await?
            .ok_or_else(|| DomainError::InvalidTransition {
                from: "resolved".into(),
                to: status.to_string(),
            })?;
        tracing::info!(
            verification_id = %resolved.id,
            user_id = %user_id,
            admin_id = %admin.id,
            status = %resolved.status,
            "verification_resolved"
        );

        let (title, body) = match resolved.status {
            VerificationStatus::Approved => (
                "Verification approved",
                "Your identity has been verified.".to_string(),
            ),
            _ => (
                "Verification rejected",
                resolved
                    .rejection_reason
                    .clone()
                    .unwrap_or_else(|| "Your verification request was rejected.".into()),
            ),
        };
        let delivered = self
            .realtime
            .send_to_user(
                user_id,
                RealtimeEvent::Notification {
                    kind: "verification".into(),
                    title: title.into(),
                    body,
                    data: serde_json::json!({
                        "verificationId": resolved.id,
                        "status": resolved.status,
                    }),
                },
            )
            .await;
        tracing::debug!(user_id = %user_id, delivered, "verification_notification_sent");
        Ok(resolved)
    }
}
