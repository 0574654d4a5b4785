use uuid::Uuid;

use crate::application::access::{self, Actor};
use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::Listing;

pub struct GetListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> GetListing<'a, R> {
    pub async fn execute(&self, actor: &Actor, id: Uuid) -> anyhow::Result<Option<Listing>> {
        Ok(self
            .repo
            .get_by_id(id)
            .await?
            .filter(|l| access::can_view_listing(actor, l)))
    }
}
