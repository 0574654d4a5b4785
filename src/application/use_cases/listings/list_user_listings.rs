use uuid::Uuid;

use crate::application::access::Actor;
use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::Listing;

pub struct ListUserListings<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> ListUserListings<'a, R> {
    /// Owners see their drafts too; everyone else only sees published listings.
    pub async fn execute(&self, actor: &Actor, user_id: Uuid) -> anyhow::Result<Vec<Listing>> {
        let is_owner = actor.user_id() == Some(user_id);
        self.repo.list_by_owner(user_id, is_owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, new_listing};

    #[tokio::test]
    async fn drafts_visible_to_owner_only() {
        let store = InMemoryStore::default();
        let owner = Uuid::new_v4();
        store.create(owner, &new_listing()).await.unwrap();
        let mut draft = new_listing();
        draft.is_published = false;
        store.create(owner, &draft).await.unwrap();

        let uc = ListUserListings { repo: &store };
        assert_eq!(uc.execute(&Actor::User(owner), owner).await.unwrap().len(), 2);
        assert_eq!(uc.execute(&Actor::Anonymous, owner).await.unwrap().len(), 1);
        let theirs = uc.execute(&Actor::User(Uuid::new_v4()), owner).await.unwrap();
        assert!(theirs.iter().all(|l| l.is_published));
    }
}
