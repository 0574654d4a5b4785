use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::enums::Category;
use crate::domain::listings::listing::{Listing, ListingPatch, NewListing};

#[derive(Debug, Clone, Default)]
pub struct PublishedListingQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, owner_id: Uuid, listing: &NewListing) -> anyhow::Result<Listing>;
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Listing>>;
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        include_unpublished: bool,
    ) -> anyhow::Result<Vec<Listing>>;
    async fn list_published(&self, query: &PublishedListingQuery)
    -> anyhow::Result<Vec<Listing>>;
    // None when missing or owned by someone else
    async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &ListingPatch,
    ) -> anyhow::Result<Option<Listing>>;
    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool>;
}
