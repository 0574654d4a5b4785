use uuid::Uuid;

use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::profile_repository::ProfileRepository;
use crate::application::ports::review_repository::ReviewRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::listings::listing::Listing;
use crate::domain::reviews::review::{RatingSummary, Review};
use crate::domain::users::portfolio::PortfolioItem;
use crate::domain::users::profile::Profile;
use crate::domain::users::user::User;

#[derive(Debug, Clone)]
pub struct PublicProfile {
    pub user: User,
    pub profile: Option<Profile>,
    pub portfolio: Vec<PortfolioItem>,
    pub listings: Vec<Listing>,
    pub reviews: Vec<Review>,
    pub rating: RatingSummary,
}

pub struct GetPublicProfile<'a, U, P, L, R>
where
    U: UserRepository + ?Sized,
    P: ProfileRepository + ?Sized,
    L: ListingRepository + ?Sized,
    R: ReviewRepository + ?Sized,
{
    pub users: &'a U,
    pub profiles: &'a P,
    pub listings: &'a L,
    pub reviews: &'a R,
}

impl<'a, U, P, L, R> GetPublicProfile<'a, U, P, L, R>
where
    U: UserRepository + ?Sized,
    P: ProfileRepository + ?Sized,
    L: ListingRepository + ?Sized,
    R: ReviewRepository + ?Sized,
{
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<Option<PublicProfile>> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let profile = self.profiles.get_profile(user_id).await?;
        let portfolio = self.profiles.list_portfolio(user_id).await?;
        let listings = self.listings.list_by_owner(user_id, false).await?;
        let reviews = self.reviews.list_for_user(user_id).await?;
        let rating = self.reviews.summary_for_user(user_id).await?;
        Ok(Some(PublicProfile {
            user,
            profile,
            portfolio,
            listings,
            reviews,
            rating,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::listing_repository::ListingRepository;
    use crate::application::test_support::{InMemoryStore, new_listing, profile_input};
    use crate::domain::enums::Role;

    #[tokio::test]
    async fn only_published_listings_are_shown() {
        let store = InMemoryStore::default();
        let u = store.seed_user("Mimi", "mimi@example.com", Role::User).await;
        store.upsert_profile(u.id, &profile_input()).await.unwrap();
        ListingRepository::create(&store, u.id, &new_listing()).await.unwrap();
        let mut draft = new_listing();
        draft.is_published = false;
        ListingRepository::create(&store, u.id, &draft).await.unwrap();

        let uc = GetPublicProfile {
            users: &store,
            profiles: &store,
            listings: &store,
            reviews: &store,
        };
        let p = uc.execute(u.id).await.unwrap().unwrap();
        assert_eq!(p.listings.len(), 1);
        assert!(p.profile.is_some());
        assert_eq!(p.rating.count, 0);
        assert!(uc.execute(Uuid::new_v4()).await.unwrap().is_none());
    }
}
