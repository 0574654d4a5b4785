use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::enums::{Category, Currency};
use crate::domain::errors::{DomainError, is_http_url};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_MEDIA_ITEMS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    /// Denominated in `currency`, independent of the owner's profile currency.
    pub price: f64,
    pub currency: Currency,
    pub category: Category,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub currency: Currency,
    pub category: Category,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<Currency>,
    pub category: Option<Category>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

fn check_title(title: &str) -> Result<(), DomainError> {
    let t = title.trim();
    if t.is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }
    if t.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation("title is too long"));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), DomainError> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation("price must be a non-negative number"));
    }
    Ok(())
}

fn check_media(kind: &str, urls: &[String]) -> Result<(), DomainError> {
    if urls.len() > MAX_MEDIA_ITEMS {
        return Err(DomainError::validation(format!("too many {kind}")));
    }
    if let Some(bad) = urls.iter().find(|u| !is_http_url(u)) {
        return Err(DomainError::validation(format!("invalid {kind} url: {bad}")));
    }
    Ok(())
}

impl NewListing {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_title(&self.title)?;
        check_price(self.price)?;
        check_media("images", &self.images)?;
        check_media("videos", &self.videos)?;
        Ok(())
    }
}

impl ListingPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(t) = &self.title {
            check_title(t)?;
        }
        if let Some(p) = self.price {
            check_price(p)?;
        }
        if let Some(v) = &self.images {
            check_media("images", v)?;
        }
        if let Some(v) = &self.videos {
            check_media("videos", v)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.currency.is_none()
            && self.category.is_none()
            && self.images.is_none()
            && self.videos.is_none()
            && self.tags.is_none()
            && self.is_published.is_none()
    }

    /// Applies the patch to an in-memory copy.
    pub fn apply(&self, listing: &mut Listing) {
        if let Some(v) = &self.title {
            listing.title = v.clone();
        }
        if let Some(v) = &self.description {
            listing.description = v.clone();
        }
        if let Some(v) = self.price {
            listing.price = v;
        }
        if let Some(v) = self.currency {
            listing.currency = v;
        }
        if let Some(v) = self.category {
            listing.category = v;
        }
        if let Some(v) = &self.images {
            listing.images = v.clone();
        }
        if let Some(v) = &self.videos {
            listing.videos = v.clone();
        }
        if let Some(v) = &self.tags {
            listing.tags = v.clone();
        }
        if let Some(v) = self.is_published {
            listing.is_published = v;
        }
    }
}
