use uuid::Uuid;

use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::{Listing, NewListing};

pub struct CreateListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> CreateListing<'a, R> {
    pub async fn execute(&self, owner_id: Uuid, listing: NewListing) -> anyhow::Result<Listing> {
        // Title is validated trimmed but stored exactly as submitted.
        listing.validate()?;
        self.repo.create(owner_id, &listing).await
    }
}
