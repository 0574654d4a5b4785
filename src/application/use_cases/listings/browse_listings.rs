use crate::application::ports::listing_repository::{ListingRepository, PublishedListingQuery};
use crate::domain::enums::Category;
use crate::domain::listings::listing::Listing;
use crate::domain::users::freelancer::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub struct BrowseListings<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> BrowseListings<'a, R> {
    pub async fn execute(
        &self,
        category: Option<Category>,
        search: Option<String>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> anyhow::Result<Vec<Listing>> {
        let query = PublishedListingQuery {
            category,
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0).max(0),
        };
        self.repo.list_published(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, new_listing};
    use uuid::Uuid;

    #[tokio::test]
    async fn filters_published_by_category_and_text() {
        let store = InMemoryStore::default();
        let owner = Uuid::new_v4();
        store.create(owner, &new_listing()).await.unwrap();
        let mut logo = new_listing();
        logo.title = "Logo pack".into();
        logo.category = Category::Design;
        store.create(owner, &logo).await.unwrap();
        let mut hidden = logo.clone();
        hidden.is_published = false;
        store.create(owner, &hidden).await.unwrap();

        let uc = BrowseListings { repo: &store };
        assert_eq!(uc.execute(None, None, None, None).await.unwrap().len(), 2);
        let design = uc
            .execute(Some(Category::Design), None, None, None)
            .await
            .unwrap();
        assert_eq!(design.len(), 1);
        let text = uc
            .execute(None, Some("  LOGO ".into()), None, None)
            .await
            .unwrap();
        assert_eq!(text.len(), 1);
        assert_eq!(text[0].title, "Logo pack");
    }
}
