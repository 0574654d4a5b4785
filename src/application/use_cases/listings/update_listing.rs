use uuid::Uuid;

use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::errors::DomainError;
use crate::domain::listings::listing::{Listing, ListingPatch};

pub struct UpdateListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> UpdateListing<'a, R> {
    /// `Ok(None)` when the listing is missing or owned by someone else.
    pub async fn execute(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ListingPatch,
    ) -> anyhow::Result<Option<Listing>> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(DomainError::validation("nothing to update").into());
        }
        self.repo.update_owned(id, owner_id, &patch).await
    }
}
