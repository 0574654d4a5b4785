use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::enums::{Category, DeliveryTime, ExperienceLevel, FreelancerLevel, RateType};
use crate::domain::errors::DomainError;
use crate::domain::users::profile::Profile;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A user that has a profile, with everything the discovery UI renders.
#[derive(Debug, Clone)]
pub struct Freelancer {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub languages: Vec<String>,
    pub is_verified: bool,
    pub is_open_to_work: bool,
    pub created_at: DateTime<Utc>,
    pub profile: Profile,
}

/// Discovery filters. Every field is optional and an absent field places no
/// constraint on its dimension; supplied fields are AND-ed together.
#[derive(Debug, Clone, Default)]
pub struct FreelancerFilters {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub rate_type: Option<RateType>,
    pub experience_level: Option<ExperienceLevel>,
    pub language: Option<String>,
    pub min_rating: Option<f64>,
    pub freelancer_level: Option<FreelancerLevel>,
    pub delivery_time: Option<DeliveryTime>,
    pub location: Option<String>,
    pub verified_only: Option<bool>,
    pub open_to_work: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle_lower))
        .unwrap_or(false)
}

impl FreelancerFilters {
    /// Trims text filters, drops empty ones and resolves paging defaults.
    pub fn normalized(self) -> Result<Self, DomainError> {
        if let Some(r) = self.min_rating {
            if !r.is_finite() || !(0.0..=5.0).contains(&r) {
                return Err(DomainError::validation("minRating must be between 0 and 5"));
            }
        }
        if matches!(self.offset, Some(o) if o < 0) {
            return Err(DomainError::validation("offset must not be negative"));
        }
        Ok(Self {
            search: clean(self.search),
            language: clean(self.language),
            location: clean(self.location),
            limit: Some(
                self.limit
                    .unwrap_or(DEFAULT_PAGE_SIZE)
                    .clamp(1, MAX_PAGE_SIZE),
            ),
            offset: Some(self.offset.unwrap_or(0)),
            ..self
        })
    }

    pub fn page_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn page_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// True when every supplied predicate holds for `f`.
    pub fn matches(&self, f: &Freelancer) -> bool {
        let p = &f.profile;
        if let Some(q) = self.search.as_deref() {
            let q = q.to_lowercase();
            let hit = f.name.to_lowercase().contains(&q)
                || contains_ci(p.headline.as_deref(), &q)
                || contains_ci(f.bio.as_deref(), &q);
            if !hit {
                return false;
            }
        }
        if let Some(c) = self.category {
            if p.main_category != Some(c) {
                return false;
            }
        }
        if let Some(r) = self.rate_type {
            if p.rate_type_preference != Some(r) {
                return false;
            }
        }
        if let Some(e) = self.experience_level {
            if p.experience_level != Some(e) {
                return false;
            }
        }
        if let Some(lang) = self.language.as_deref() {
            let lang = lang.to_lowercase();
            if !f.languages.iter().any(|l| l.to_lowercase() == lang) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            match p.average_rating {
                Some(avg) if avg >= min => {}
                _ => return false,
            }
        }
        if let Some(level) = self.freelancer_level {
            if p.freelancer_level != level {
                return false;
            }
        }
        if let Some(d) = self.delivery_time {
            if p.delivery_time != Some(d) {
                return false;
            }
        }
        if let Some(loc) = self.location.as_deref() {
            if !contains_ci(f.location.as_deref(), &loc.to_lowercase()) {
                return false;
            }
        }
        if self.verified_only == Some(true) && !f.is_verified {
            return false;
        }
        if self.open_to_work == Some(true) && !f.is_open_to_work {
            return false;
        }
        true
    }
}

/// Result order: rating (unrated last), completed jobs, newest account, id.
pub fn display_order(a: &Freelancer, b: &Freelancer) -> Ordering {
    let rating = match (a.profile.average_rating, b.profile.average_rating) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    rating
        .then_with(|| b.profile.completed_jobs.cmp(&a.profile.completed_jobs))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
