use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::reviews::review::{NewReview, RatingSummary, Review};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Inserts the review and refreshes the reviewed user's cached average
    /// rating in the same transaction.
    async fn create(&self, review: &NewReview) -> anyhow::Result<(Review, RatingSummary)>;
    async fn list_for_user(&self, about_id: Uuid) -> anyhow::Result<Vec<Review>>;
    async fn list_for_listing(&self, listing_id: Uuid) -> anyhow::Result<Vec<Review>>;
    async fn summary_for_user(&self, about_id: Uuid) -> anyhow::Result<RatingSummary>;
}
