use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;

pub const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewer_name: String,
    pub reviewer_image: Option<String>,
    pub about_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub listing_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub reviewer_id: Uuid,
    pub about_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub listing_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub count: i64,
    pub average: Option<f64>,
}

impl NewReview {
    /// Checks the rating range and self-review, and normalizes the comment.
    pub fn validated(mut self) -> Result<Self, DomainError> {
        if !(1..=5).contains(&self.rating) {
            return Err(DomainError::validation("rating must be between 1 and 5"));
        }
        if self.reviewer_id == self.about_id {
            return Err(DomainError::forbidden("you cannot review yourself"));
        }
        self.comment = self
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if let Some(c) = &self.comment {
            if c.chars().count() > MAX_COMMENT_LEN {
                return Err(DomainError::validation("comment is too long"));
            }
        }
        Ok(self)
    }
}
