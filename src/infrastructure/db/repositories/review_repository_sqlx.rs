use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::review_repository::ReviewRepository;
use crate::domain::reviews::review::{NewReview, RatingSummary, Review};
use crate::infrastructure::db::PgPool;

const REVIEW_SELECT: &str = "SELECT r.id, r.reviewer_id, u.name AS reviewer_name, \
    u.image AS reviewer_image, r.about_id, r.contract_id, r.listing_id, r.rating, r.comment, \
    r.created_at FROM reviews r JOIN users u ON u.id = r.reviewer_id";

pub struct SqlxReviewRepository {
    pub pool: PgPool,
}

impl SqlxReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn review_from_row(r: &PgRow) -> Review {
    Review {
        id: r.get("id"),
        reviewer_id: r.get("reviewer_id"),
        reviewer_name: r.get("reviewer_name"),
        reviewer_image: r.get("reviewer_image"),
        about_id: r.get("about_id"),
        contract_id: r.get("contract_id"),
        listing_id: r.get("listing_id"),
        rating: r.get("rating"),
        comment: r.get("comment"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl ReviewRepository for SqlxReviewRepository {
    async fn create(&self, review: &NewReview) -> anyhow::Result<(Review, RatingSummary)> {
        let mut tx = self.pool.begin().await?;
        // Serializes concurrent reviews of the same user so the stored
        // average always covers every committed review.
        sqlx::query("SELECT user_id FROM profiles WHERE user_id = $1 FOR UPDATE")
            .bind(review.about_id)
            .fetch_optional(&mut *tx)
            .await?;
        let row = sqlx::query(
            r#"WITH r AS (
                   INSERT INTO reviews (reviewer_id, about_id, contract_id, listing_id, rating, comment)
                   VALUES ($1, $2, $3, $4, $5, $6)
                   RETURNING *
               )
               SELECT r.id, r.reviewer_id, u.name AS reviewer_name, u.image AS reviewer_image,
                      r.about_id, r.contract_id, r.listing_id, r.rating, r.comment, r.created_at
               FROM r JOIN users u ON u.id = r.reviewer_id"#,
        )
        .bind(review.reviewer_id)
        .bind(review.about_id)
        .bind(review.contract_id)
        .bind(review.listing_id)
        .bind(review.rating)
        .bind(review.comment.as_deref())
        .fetch_one(&mut *tx)
        .await?;
        let created = review_from_row(&row);

        let summary = sqlx::query(
            "SELECT COUNT(*)::BIGINT AS count, AVG(rating)::DOUBLE PRECISION AS average
             FROM reviews WHERE about_id = $1",
        )
        .bind(review.about_id)
        .fetch_one(&mut *tx)
        .await?;
        let summary = RatingSummary {
            count: summary.get("count"),
            average: summary.get("average"),
        };
        sqlx::query(
            "UPDATE profiles SET average_rating = $2, updated_at = now() WHERE user_id = $1",
        )
        .bind(review.about_id)
        .bind(summary.average)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok((created, summary))
    }

    async fn list_for_user(&self, about_id: Uuid) -> anyhow::Result<Vec<Review>> {
        let rows = sqlx::query(&format!(
            "{REVIEW_SELECT} WHERE r.about_id = $1 ORDER BY r.created_at DESC, r.id"
        ))
        .bind(about_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(review_from_row).collect())
    }

    async fn list_for_listing(&self, listing_id: Uuid) -> anyhow::Result<Vec<Review>> {
        let rows = sqlx::query(&format!(
            "{REVIEW_SELECT} WHERE r.listing_id = $1 ORDER BY r.created_at DESC, r.id"
        ))
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(review_from_row).collect())
    }

    async fn summary_for_user(&self, about_id: Uuid) -> anyhow::Result<RatingSummary> {
        let row = sqlx::query(
            "SELECT COUNT(*)::BIGINT AS count, AVG(rating)::DOUBLE PRECISION AS average
             FROM reviews WHERE about_id = $1",
        )
        .bind(about_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(RatingSummary {
            count: row.get("count"),
            average: row.get("average"),
        })
    }
}
