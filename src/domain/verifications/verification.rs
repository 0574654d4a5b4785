use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::enums::VerificationStatus;
use crate::domain::errors::DomainError;

#[derive(Debug, Clone)]
pub struct Verification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: VerificationStatus,
    pub id_front_image: String,
    pub id_back_image: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
}

/// Pending request joined with the requester, for the admin queue.
#[derive(Debug, Clone)]
pub struct PendingVerification {
    pub verification: Verification,
    pub user_name: String,
    pub user_email: String,
    pub user_image: Option<String>,
}

/// Outcome of resolving a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub status: VerificationStatus,
    pub reason: Option<String>,
}

impl VerificationStatus {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }
}

/// PENDING -> APPROVED | REJECTED. Nothing else, and never back to PENDING.
/// A reason is only kept on rejection.
pub fn resolve(
    current: VerificationStatus,
    target: VerificationStatus,
    reason: Option<String>,
) -> Result<Resolution, DomainError> {
    if target == VerificationStatus::Pending {
        return Err(DomainError::validation("status must be APPROVED or REJECTED"));
    }
    if current.is_resolved() {
        return Err(DomainError::InvalidTransition {
            from: current.to_string(),
            to: target.to_string(),
        });
    }
    let reason = match target {
        VerificationStatus::Rejected => reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
        _ => None,
    };
    Ok(Resolution {
        status: target,
        reason,
    })
}
