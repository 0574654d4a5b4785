use uuid::Uuid;

use crate::application::ports::review_repository::ReviewRepository;
use crate::domain::reviews::review::Review;

pub struct ListReviewsForUser<'a, R: ReviewRepository + ?Sized> {
    pub reviews: &'a R,
}

impl<'a, R: ReviewRepository + ?Sized> ListReviewsForUser<'a, R> {
    pub async fn execute(&self, about_id: Uuid) -> anyhow::Result<Vec<Review>> {
        self.reviews.list_for_user(about_id).await
    }
}

pub struct ListReviewsForListing<'a, R: ReviewRepository + ?Sized> {
    pub reviews: &'a R,
}

impl<'a, R: ReviewRepository + ?Sized> ListReviewsForListing<'a, R> {
    pub async fn execute(&self, listing_id: Uuid) -> anyhow::Result<Vec<Review>> {
        self.reviews.list_for_listing(listing_id).await
    }
}
