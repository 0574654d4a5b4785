use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{QueryBuilder, Row};
use uuid::Uuid;

use crate::application::ports::listing_repository::{ListingRepository, PublishedListingQuery};
use crate::domain::listings::listing::{Listing, ListingPatch, NewListing};
use crate::infrastructure::db::{PgPool, contains_pattern, enum_col};

const LISTING_COLUMNS: &str = "id, owner_id, title, description, price, currency, category, \
                               images, videos, tags, is_published, created_at, updated_at";

pub struct SqlxListingRepository {
    pub pool: PgPool,
}

impl SqlxListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn listing_from_row(r: &PgRow) -> anyhow::Result<Listing> {
    Ok(Listing {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        title: r.get("title"),
        description: r.get("description"),
        price: r.get("price"),
        currency: enum_col(r, "currency")?,
        category: enum_col(r, "category")?,
        images: r.get("images"),
        videos: r.get("videos"),
        tags: r.get("tags"),
        is_published: r.get("is_published"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

#[async_trait]
impl ListingRepository for SqlxListingRepository {
    async fn create(&self, owner_id: Uuid, listing: &NewListing) -> anyhow::Result<Listing> {
        let row = sqlx::query(&format!(
            "INSERT INTO listings (owner_id, title, description, price, currency, category,
                images, videos, tags, is_published)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {LISTING_COLUMNS}"
        ))
        .bind(owner_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(listing.currency.as_str())
        .bind(listing.category.as_str())
        .bind(&listing.images)
        .bind(&listing.videos)
        .bind(&listing.tags)
        .bind(listing.is_published)
        .fetch_one(&self.pool)
        .await?;
        listing_from_row(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Listing>> {
        let row = sqlx::query(&format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(listing_from_row).transpose()
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        include_unpublished: bool,
    ) -> anyhow::Result<Vec<Listing>> {
        let rows = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings
             WHERE owner_id = $1 AND (is_published OR $2)
             ORDER BY created_at DESC, id"
        ))
        .bind(owner_id)
        .bind(include_unpublished)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(listing_from_row).collect()
    }

    async fn list_published(
        &self,
        query: &PublishedListingQuery,
    ) -> anyhow::Result<Vec<Listing>> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE is_published"
        ));
        if let Some(c) = query.category {
            qb.push(" AND category = ").push_bind(c.as_str());
        }
        if let Some(q) = query.search.as_deref() {
            let pattern = contains_pattern(q);
            qb.push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR description ILIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        }
        qb.push(" ORDER BY created_at DESC, id LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);
        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(listing_from_row).collect()
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &ListingPatch,
    ) -> anyhow::Result<Option<Listing>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1 AND owner_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut listing = listing_from_row(&row)?;
        patch.apply(&mut listing);

        let row = sqlx::query(&format!(
            "UPDATE listings SET title = $2, description = $3, price = $4, currency = $5,
                category = $6, images = $7, videos = $8, tags = $9, is_published = $10,
                updated_at = now()
             WHERE id = $1
             RETURNING {LISTING_COLUMNS}"
        ))
        .bind(id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(listing.currency.as_str())
        .bind(listing.category.as_str())
        .bind(&listing.images)
        .bind(&listing.videos)
        .bind(&listing.tags)
        .bind(listing.is_published)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        listing_from_row(&row).map(Some)
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM listings WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
