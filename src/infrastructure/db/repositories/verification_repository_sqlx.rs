use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::verification_repository::VerificationRepository;
use crate::domain::enums::VerificationStatus;
use crate::domain::verifications::verification::{PendingVerification, Resolution, Verification};
use crate::infrastructure::db::{PgPool, enum_col, map_unique_violation};

const VERIFICATION_COLUMNS: &str = "v.id, v.user_id, v.status, v.id_front_image, v.id_back_image, \
                                    v.rejection_reason, v.created_at, v.resolved_at, v.resolved_by";

pub struct SqlxVerificationRepository {
    pub pool: PgPool,
}

impl SqlxVerificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn verification_from_row(r: &PgRow) -> anyhow::Result<Verification> {
    Ok(Verification {
        id: r.get("id"),
        user_id: r.get("user_id"),
        status: enum_col(r, "status")?,
        id_front_image: r.get("id_front_image"),
        id_back_image: r.get("id_back_image"),
        rejection_reason: r.get("rejection_reason"),
        created_at: r.get("created_at"),
        resolved_at: r.get("resolved_at"),
        resolved_by: r.get("resolved_by"),
    })
}

#[async_trait]
impl VerificationRepository for SqlxVerificationRepository {
    async fn create_pending(
        &self,
        user_id: Uuid,
        id_front_image: &str,
        id_back_image: &str,
    ) -> anyhow::Result<Verification> {
        let row = sqlx::query(&format!(
            "INSERT INTO verifications AS v (user_id, id_front_image, id_back_image)
             VALUES ($1, $2, $3)
             RETURNING {VERIFICATION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(id_front_image)
        .bind(id_back_image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "a verification request is already pending"))?;
        verification_from_row(&row)
    }

    async fn latest_for_user(&self, user_id: Uuid) -> anyhow::Result<Option<Verification>> {
        let row = sqlx::query(&format!(
            "SELECT {VERIFICATION_COLUMNS} FROM verifications v
             WHERE v.user_id = $1 ORDER BY v.created_at DESC, v.id DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(verification_from_row).transpose()
    }

    async fn find_pending_for_user(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Verification>> {
        let row = sqlx::query(&format!(
            "SELECT {VERIFICATION_COLUMNS} FROM verifications v
             WHERE v.user_id = $1 AND v.status = 'PENDING'"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(verification_from_row).transpose()
    }

    async fn list_pending(&self) -> anyhow::Result<Vec<PendingVerification>> {
        let rows = sqlx::query(&format!(
            "SELECT {VERIFICATION_COLUMNS}, u.name AS user_name, u.email AS user_email,
                    u.image AS user_image
             FROM verifications v JOIN users u ON u.id = v.user_id
             WHERE v.status = 'PENDING'
             ORDER BY v.created_at ASC, v.id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|r| {
                Ok::<_, anyhow::Error>(PendingVerification {
                    verification: verification_from_row(r)?,
                    user_name: r.get("user_name"),
                    user_email: r.get("user_email"),
                    user_image: r.get("user_image"),
                })
            })
            .collect()
    }

    async fn resolve_pending(
        &self,
        verification_id: Uuid,
        resolution: &Resolution,
        resolved_by: Uuid,
    ) -> anyhow::Result<Option<Verification>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "UPDATE verifications AS v
             SET status = $2, rejection_reason = $3, resolved_at = now(), resolved_by = $4
             WHERE v.id = $1 AND v.status = 'PENDING'
             RETURNING {VERIFICATION_COLUMNS}"
        ))
        .bind(verification_id)
        .bind(resolution.status.as_str())
        .bind(resolution.reason.as_deref())
        .bind(resolved_by)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let verification = verification_from_row(&row)?;
        if verification.status == VerificationStatus::Approved {
            sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = $1")
                .bind(verification.user_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(Some(verification))
    }
}
