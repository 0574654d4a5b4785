use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::review_repository::ReviewRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::errors::DomainError;
use crate::domain::reviews::review::{NewReview, Review};

pub struct CreateReview<'a, U, L, R>
where
    U: UserRepository + ?Sized,
    L: ListingRepository + ?Sized,
    R: ReviewRepository + ?Sized,
{
    pub users: &'a U,
    pub listings: &'a L,
    pub reviews: &'a R,
}

impl<'a, U, L, R> CreateReview<'a, U, L, R>
where
    U: UserRepository + ?Sized,
    L: ListingRepository + ?Sized,
    R: ReviewRepository + ?Sized,
{
    pub async fn execute(&self, review: NewReview) -> anyhow::Result<Review> {
        let review = review.validated()?;
        if self.users.find_by_id(review.about_id).await?.is_none() {
            return Err(DomainError::NotFound("user").into());
        }
        if let Some(listing_id) = review.listing_id {
            let listing = self
                .listings
                .get_by_id(listing_id)
                .await?
                .ok_or(DomainError::NotFound("listing"))?;
            if listing.owner_id != review.about_id {
                return Err(
                    DomainError::validation("listing does not belong to the reviewed user").into(),
                );
            }
        }

        let (created, summary) = self.reviews.create(&review).await?;
        tracing::info!(
            review_id = %created.id,
            about_id = %created.about_id,
            rating = created.rating,
            reviews = summary.count,
            "review_created"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::profile_repository::ProfileRepository;
    use crate::application::test_support::{InMemoryStore, new_listing, profile_input};
    use crate::domain::enums::Role;
    use uuid::Uuid;

    fn review(reviewer: Uuid, about: Uuid, rating: i16) -> NewReview {
        NewReview {
            reviewer_id: reviewer,
            about_id: about,
            contract_id: None,
            listing_id: None,
            rating,
            comment: Some(" great work ".into()),
        }
    }

    #[tokio::test]
    async fn recomputes_average_rating() {
        let store = InMemoryStore::default();
        let a = store.seed_user("A", "a@example.com", Role::User).await.id;
        let b = store.seed_user("B", "b@example.com", Role::User).await.id;
        let f = store.seed_user("F", "f@example.com", Role::User).await.id;
        store.upsert_profile(f, &profile_input()).await.unwrap();
        let uc = CreateReview {
            users: &store,
            listings: &store,
            reviews: &store,
        };

        let r = uc.execute(review(a, f, 5)).await.unwrap();
        assert_eq!(r.comment.as_deref(), Some("great work"));
        assert_eq!(r.reviewer_name, "A");
        uc.execute(review(b, f, 2)).await.unwrap();

        let p = store.get_profile(f).await.unwrap().unwrap();
        assert_eq!(p.average_rating, Some(3.5));
    }

    #[tokio::test]
    async fn concurrent_reviews_all_count_toward_average() {
        let store = InMemoryStore::default();
        let f = store.seed_user("F", "f@example.com", Role::User).await.id;
        store.upsert_profile(f, &profile_input()).await.unwrap();
        let mut reviewers = Vec::new();
        for i in 0..4 {
            let u = store
                .seed_user(&format!("R{i}"), &format!("r{i}@example.com"), Role::User)
                .await;
            reviewers.push(u.id);
        }
        let uc = CreateReview {
            users: &store,
            listings: &store,
            reviews: &store,
        };

        let (r1, r2, r3, r4) = tokio::join!(
            uc.execute(review(reviewers[0], f, 5)),
            uc.execute(review(reviewers[1], f, 4)),
            uc.execute(review(reviewers[2], f, 2)),
            uc.execute(review(reviewers[3], f, 1)),
        );
        for r in [r1, r2, r3, r4] {
            r.unwrap();
        }

        let p = store.get_profile(f).await.unwrap().unwrap();
        assert_eq!(p.average_rating, Some(3.0));
        let summary = store.summary_for_user(f).await.unwrap();
        assert_eq!(summary.count, 4);
    }

    #[tokio::test]
    async fn rejects_self_review_and_unknown_target() {
        let store = InMemoryStore::default();
        let a = store.seed_user("A", "a@example.com", Role::User).await.id;
        let uc = CreateReview {
            users: &store,
            listings: &store,
            reviews: &store,
        };
        let err = uc.execute(review(a, a, 4)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Forbidden(_))
        ));
        let err = uc.execute(review(a, Uuid::new_v4(), 4)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
        assert!(uc.execute(review(a, Uuid::new_v4(), 9)).await.is_err());
    }

    #[tokio::test]
    async fn listing_must_belong_to_reviewed_user() {
        let store = InMemoryStore::default();
        let a = store.seed_user("A", "a@example.com", Role::User).await.id;
        let f = store.seed_user("F", "f@example.com", Role::User).await.id;
        let other = store.seed_user("O", "o@example.com", Role::User).await.id;
        let theirs = ListingRepository::create(&store, other, &new_listing())
            .await
            .unwrap();
        let mine = ListingRepository::create(&store, f, &new_listing())
            .await
            .unwrap();
        let uc = CreateReview {
            users: &store,
            listings: &store,
            reviews: &store,
        };

        let mut bad = review(a, f, 4);
        bad.listing_id = Some(theirs.id);
        let err = uc.execute(bad).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));

        let mut good = review(a, f, 4);
        good.listing_id = Some(mine.id);
        let r = uc.execute(good).await.unwrap();
        assert_eq!(r.listing_id, Some(mine.id));
        let listed = store.list_for_listing(mine.id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
