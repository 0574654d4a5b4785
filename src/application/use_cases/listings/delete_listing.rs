use uuid::Uuid;

use crate::application::ports::listing_repository::ListingRepository;

pub struct DeleteListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> DeleteListing<'a, R> {
    /// Hard delete scoped to the owner. `false` when nothing was removed.
    pub async fn execute(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let deleted = self.repo.delete_owned(id, owner_id).await?;
        if deleted {
            tracing::info!(listing_id = %id, owner_id = %owner_id, "listing_deleted");
        }
        Ok(deleted)
    }
}
