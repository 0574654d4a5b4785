//! In-memory port implementations used by the use case tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::freelancer_repository::FreelancerRepository;
use crate::application::ports::listing_repository::{ListingRepository, PublishedListingQuery};
use crate::application::ports::message_repository::MessageRepository;
use crate::application::ports::object_storage_port::ObjectStoragePort;
use crate::application::ports::profile_repository::ProfileRepository;
use crate::application::ports::realtime_port::{RealtimeEvent, RealtimePort};
use crate::application::ports::review_repository::ReviewRepository;
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::application::ports::verification_repository::VerificationRepository;
use crate::domain::enums::{Category, Currency, FreelancerLevel, Role, VerificationStatus};
use crate::domain::errors::DomainError;
use crate::domain::listings::listing::{Listing, ListingPatch, NewListing};
use crate::domain::messages::message::{ConversationSummary, Message};
use crate::domain::reviews::review::{NewReview, RatingSummary, Review};
use crate::domain::users::freelancer::{Freelancer, FreelancerFilters, display_order};
use crate::domain::users::portfolio::PortfolioItem;
use crate::domain::users::profile::{Profile, ProfileInput};
use crate::domain::users::user::{User, UserPatch};
use crate::domain::verifications::verification::{
    PendingVerification, Resolution, Verification,
};

#[derive(Default)]
struct State {
    ticks: i64,
    users: HashMap<Uuid, User>,
    passwords: HashMap<Uuid, String>,
    tokens: HashMap<String, (Uuid, DateTime<Utc>)>,
    profiles: HashMap<Uuid, Profile>,
    portfolio: Vec<PortfolioItem>,
    listings: Vec<Listing>,
    verifications: Vec<Verification>,
    reviews: Vec<Review>,
    messages: Vec<Message>,
}

impl State {
    // Strictly increasing timestamps keep ordering assertions deterministic.
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(self.ticks)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryStore {
    state: Mutex<State>,
}

pub(crate) fn new_listing() -> NewListing {
    NewListing {
        title: "Landing page".into(),
        description: "Responsive landing page".into(),
        price: 250.0,
        currency: Currency::Usd,
        category: Category::WebDevelopment,
        images: vec!["https://cdn.example.com/shot.png".into()],
        videos: vec!["https://cdn.example.com/demo.mp4".into()],
        tags: vec!["html".into(), "css".into()],
        is_published: true,
    }
}

pub(crate) fn sample_listing(owner_id: Uuid) -> Listing {
    let l = new_listing();
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Listing {
        id: Uuid::new_v4(),
        owner_id,
        title: l.title,
        description: l.description,
        price: l.price,
        currency: l.currency,
        category: l.category,
        images: l.images,
        videos: l.videos,
        tags: l.tags,
        is_published: l.is_published,
        created_at: at,
        updated_at: at,
    }
}

pub(crate) fn profile_input() -> ProfileInput {
    ProfileInput {
        headline: Some("Full-stack developer".into()),
        hourly_rate: Some(20.0),
        currency: Currency::Usd,
        main_category: Some(Category::WebDevelopment),
        rate_type_preference: None,
        experience_level: None,
        freelancer_level: FreelancerLevel::New,
        delivery_time: None,
        goals: vec![],
        skills: vec![],
    }
}

impl InMemoryStore {
    pub(crate) async fn set_average_rating(
        &self,
        user_id: Uuid,
        average: Option<f64>,
    ) -> anyhow::Result<()> {
        if let Some(p) = self.state.lock().await.profiles.get_mut(&user_id) {
            p.average_rating = average;
        }
        Ok(())
    }

    pub(crate) async fn seed_user(&self, name: &str, email: &str, role: Role) -> User {
        self.create_user(email, name, "", role, true).await.unwrap()
    }

    pub(crate) async fn user(&self, id: Uuid) -> Option<User> {
        self.state.lock().await.users.get(&id).cloned()
    }

    pub(crate) async fn verification(&self, id: Uuid) -> Option<Verification> {
        self.state
            .lock()
            .await
            .verifications
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    pub(crate) async fn token_count(&self) -> usize {
        self.state.lock().await.tokens.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: Role,
        email_verified: bool,
    ) -> anyhow::Result<User> {
        let mut s = self.state.lock().await;
        if s
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(DomainError::conflict("email already registered").into());
        }
        let created_at = s.now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            image: None,
            bio: None,
            location: None,
            languages: vec![],
            is_verified: false,
            is_open_to_work: false,
            email_verified,
            role,
            created_at,
        };
        s.passwords.insert(user.id, password_hash.to_string());
        s.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let s = self.state.lock().await;
        Ok(s
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .map(|u| UserRow {
                id: u.id,
                email: u.email.clone(),
                name: u.name.clone(),
                password_hash: s.passwords.get(&u.id).cloned(),
                email_verified: u.email_verified,
                role: u.role,
            }))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> anyhow::Result<Option<User>> {
        let mut s = self.state.lock().await;
        let Some(u) = s.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = &patch.name {
            u.name = v.clone();
        }
        if let Some(v) = &patch.bio {
            u.bio = Some(v.clone());
        }
        if let Some(v) = &patch.location {
            u.location = Some(v.clone());
        }
        if let Some(v) = &patch.languages {
            u.languages = v.clone();
        }
        if let Some(v) = patch.is_open_to_work {
            u.is_open_to_work = v;
        }
        Ok(Some(u.clone()))
    }

    async fn set_image(&self, id: Uuid, image_url: &str) -> anyhow::Result<bool> {
        let mut s = self.state.lock().await;
        Ok(match s.users.get_mut(&id) {
            Some(u) => {
                u.image = Some(image_url.to_string());
                true
            }
            None => false,
        })
    }

    async fn store_email_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        self.state
            .lock()
            .await
            .tokens
            .insert(token_hash.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn consume_email_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Uuid>> {
        let mut s = self.state.lock().await;
        let Some((user_id, expires_at)) = s.tokens.remove(token_hash) else {
            return Ok(None);
        };
        if expires_at < now {
            return Ok(None);
        }
        if let Some(u) = s.users.get_mut(&user_id) {
            u.email_verified = true;
        }
        Ok(Some(user_id))
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self.state.lock().await.profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> anyhow::Result<Profile> {
        let mut s = self.state.lock().await;
        let (average_rating, completed_jobs) = s
            .profiles
            .get(&user_id)
            .map(|p| (p.average_rating, p.completed_jobs))
            .unwrap_or((None, 0));
        let profile = Profile {
            user_id,
            headline: input.headline.clone(),
            hourly_rate: input.hourly_rate,
            currency: input.currency,
            main_category: input.main_category,
            rate_type_preference: input.rate_type_preference,
            experience_level: input.experience_level,
            freelancer_level: input.freelancer_level,
            delivery_time: input.delivery_time,
            average_rating,
            completed_jobs,
            goals: input.goals.clone(),
            skills: input.skills.clone(),
        };
        s.profiles.insert(user_id, profile.clone());
        Ok(profile)
    }

    async fn list_portfolio(&self, user_id: Uuid) -> anyhow::Result<Vec<PortfolioItem>> {
        let s = self.state.lock().await;
        Ok(s.portfolio
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_portfolio_item(
        &self,
        user_id: Uuid,
        title: &str,
        link: &str,
    ) -> anyhow::Result<PortfolioItem> {
        let mut s = self.state.lock().await;
        let created_at = s.now();
        let item = PortfolioItem {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            link: link.to_string(),
            created_at,
        };
        s.portfolio.push(item.clone());
        Ok(item)
    }
}

#[async_trait]
impl FreelancerRepository for InMemoryStore {
    async fn filter(&self, filters: &FreelancerFilters) -> anyhow::Result<Vec<Freelancer>> {
        let s = self.state.lock().await;
        let mut out: Vec<Freelancer> = s
            .profiles
            .values()
            .filter_map(|p| {
                let u = s.users.get(&p.user_id)?;
                Some(Freelancer {
                    id: u.id,
                    name: u.name.clone(),
                    image: u.image.clone(),
                    bio: u.bio.clone(),
                    location: u.location.clone(),
                    languages: u.languages.clone(),
                    is_verified: u.is_verified,
                    is_open_to_work: u.is_open_to_work,
                    created_at: u.created_at,
                    profile: p.clone(),
                })
            })
            .filter(|f| filters.matches(f))
            .collect();
        out.sort_by(display_order);
        Ok(out
            .into_iter()
            .skip(filters.page_offset() as usize)
            .take(filters.page_limit() as usize)
            .collect())
    }
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn create(&self, owner_id: Uuid, listing: &NewListing) -> anyhow::Result<Listing> {
        let mut s = self.state.lock().await;
        let at = s.now();
        let l = Listing {
            id: Uuid::new_v4(),
            owner_id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            currency: listing.currency,
            category: listing.category,
            images: listing.images.clone(),
            videos: listing.videos.clone(),
            tags: listing.tags.clone(),
            is_published: listing.is_published,
            created_at: at,
            updated_at: at,
        };
        s.listings.push(l.clone());
        Ok(l)
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Listing>> {
        let s = self.state.lock().await;
        Ok(s.listings.iter().find(|l| l.id == id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        include_unpublished: bool,
    ) -> anyhow::Result<Vec<Listing>> {
        let s = self.state.lock().await;
        let mut out: Vec<Listing> = s
            .listings
            .iter()
            .filter(|l| l.owner_id == owner_id && (include_unpublished || l.is_published))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn list_published(
        &self,
        query: &PublishedListingQuery,
    ) -> anyhow::Result<Vec<Listing>> {
        let s = self.state.lock().await;
        let needle = query.search.as_ref().map(|q| q.to_lowercase());
        let mut out: Vec<Listing> = s
            .listings
            .iter()
            .filter(|l| l.is_published)
            .filter(|l| query.category.map(|c| c == l.category).unwrap_or(true))
            .filter(|l| {
                needle
                    .as_ref()
                    .map(|q| {
                        l.title.to_lowercase().contains(q)
                            || l.description.to_lowercase().contains(q)
                    })
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &ListingPatch,
    ) -> anyhow::Result<Option<Listing>> {
        let mut s = self.state.lock().await;
        let at = s.now();
        let Some(l) = s
            .listings
            .iter_mut()
            .find(|l| l.id == id && l.owner_id == owner_id)
        else {
            return Ok(None);
        };
        patch.apply(l);
        l.updated_at = at;
        Ok(Some(l.clone()))
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let mut s = self.state.lock().await;
        let before = s.listings.len();
        s.listings.retain(|l| !(l.id == id && l.owner_id == owner_id));
        Ok(s.listings.len() < before)
    }
}

#[async_trait]
impl VerificationRepository for InMemoryStore {
    async fn create_pending(
        &self,
        user_id: Uuid,
        id_front_image: &str,
        id_back_image: &str,
    ) -> anyhow::Result<Verification> {
        let mut s = self.state.lock().await;
        if s
            .verifications
            .iter()
            .any(|v| v.user_id == user_id && v.status == VerificationStatus::Pending)
        {
            return Err(DomainError::conflict("verification already pending").into());
        }
        let created_at = s.now();
        let v = Verification {
            id: Uuid::new_v4(),
            user_id,
            status: VerificationStatus::Pending,
            id_front_image: id_front_image.to_string(),
            id_back_image: id_back_image.to_string(),
            rejection_reason: None,
            created_at,
            resolved_at: None,
            resolved_by: None,
        };
        s.verifications.push(v.clone());
        Ok(v)
    }

    async fn latest_for_user(&self, user_id: Uuid) -> anyhow::Result<Option<Verification>> {
        let s = self.state.lock().await;
        Ok(s.verifications
            .iter()
            .filter(|v| v.user_id == user_id)
            .max_by_key(|v| v.created_at)
            .cloned())
    }

    async fn find_pending_for_user(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Verification>> {
        let s = self.state.lock().await;
        Ok(s.verifications
            .iter()
            .find(|v| v.user_id == user_id && v.status == VerificationStatus::Pending)
            .cloned())
    }

    async fn list_pending(&self) -> anyhow::Result<Vec<PendingVerification>> {
        let s = self.state.lock().await;
        let mut out: Vec<PendingVerification> = s
            .verifications
            .iter()
            .filter(|v| v.status == VerificationStatus::Pending)
            .filter_map(|v| {
                let u = s.users.get(&v.user_id)?;
                Some(PendingVerification {
                    verification: v.clone(),
                    user_name: u.name.clone(),
                    user_email: u.email.clone(),
                    user_image: u.image.clone(),
                })
            })
            .collect();
        out.sort_by_key(|p| p.verification.created_at);
        Ok(out)
    }

    async fn resolve_pending(
        &self,
        verification_id: Uuid,
        resolution: &Resolution,
        resolved_by: Uuid,
    ) -> anyhow::Result<Option<Verification>> {
        let mut s = self.state.lock().await;
        let at = s.now();
        let Some(v) = s
            .verifications
            .iter_mut()
            .find(|v| v.id == verification_id && v.status == VerificationStatus::Pending)
        else {
            return Ok(None);
        };
        v.status = resolution.status;
        v.rejection_reason = resolution.reason.clone();
        v.resolved_at = Some(at);
        v.resolved_by = Some(resolved_by);
        let out = v.clone();
        if resolution.status == VerificationStatus::Approved {
            if let Some(u) = s.users.get_mut(&out.user_id) {
                u.is_verified = true;
            }
        }
        Ok(Some(out))
    }
}

fn rating_summary(reviews: &[Review], about_id: Uuid) -> RatingSummary {
    let ratings: Vec<f64> = reviews
        .iter()
        .filter(|r| r.about_id == about_id)
        .map(|r| r.rating as f64)
        .collect();
    let count = ratings.len() as i64;
    let average = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };
    RatingSummary { count, average }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn create(&self, review: &NewReview) -> anyhow::Result<(Review, RatingSummary)> {
        let mut s = self.state.lock().await;
        let created_at = s.now();
        let reviewer = s.users.get(&review.reviewer_id).cloned();
        let r = Review {
            id: Uuid::new_v4(),
            reviewer_id: review.reviewer_id,
            reviewer_name: reviewer.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
            reviewer_image: reviewer.and_then(|u| u.image),
            about_id: review.about_id,
            contract_id: review.contract_id,
            listing_id: review.listing_id,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at,
        };
        s.reviews.push(r.clone());
        let summary = rating_summary(&s.reviews, review.about_id);
        if let Some(p) = s.profiles.get_mut(&review.about_id) {
            p.average_rating = summary.average;
        }
        Ok((r, summary))
    }

    async fn list_for_user(&self, about_id: Uuid) -> anyhow::Result<Vec<Review>> {
        let s = self.state.lock().await;
        let mut out: Vec<Review> = s
            .reviews
            .iter()
            .filter(|r| r.about_id == about_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn list_for_listing(&self, listing_id: Uuid) -> anyhow::Result<Vec<Review>> {
        let s = self.state.lock().await;
        let mut out: Vec<Review> = s
            .reviews
            .iter()
            .filter(|r| r.listing_id == Some(listing_id))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn summary_for_user(&self, about_id: Uuid) -> anyhow::Result<RatingSummary> {
        Ok(rating_summary(&self.state.lock().await.reviews, about_id))
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn create(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: &str,
    ) -> anyhow::Result<Message> {
        let mut s = self.state.lock().await;
        let created_at = s.now();
        let m = Message {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            body: body.to_string(),
            created_at,
            read_at: None,
        };
        s.messages.push(m.clone());
        Ok(m)
    }

    async fn list_between(
        &self,
        a: Uuid,
        b: Uuid,
        before: Option<DateTime<Utc>>,
        limit: i64,
    ) -> anyhow::Result<Vec<Message>> {
        let s = self.state.lock().await;
        let mut out: Vec<Message> = s
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.recipient_id == b)
                    || (m.sender_id == b && m.recipient_id == a)
            })
            .filter(|m| before.map(|t| m.created_at < t).unwrap_or(true))
            .cloned()
            .collect();
        out.sort_by(|x, y| y.created_at.cmp(&x.created_at));
        out.truncate(limit as usize);
        Ok(out)
    }

    async fn mark_read(&self, recipient_id: Uuid, sender_id: Uuid) -> anyhow::Result<u64> {
        let mut s = self.state.lock().await;
        let at = s.now();
        let mut n = 0;
        for m in s.messages.iter_mut().filter(|m| {
            m.recipient_id == recipient_id && m.sender_id == sender_id && m.read_at.is_none()
        }) {
            m.read_at = Some(at);
            n += 1;
        }
        Ok(n)
    }

    async fn list_conversations(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<ConversationSummary>> {
        let s = self.state.lock().await;
        let mut latest: HashMap<Uuid, &Message> = HashMap::new();
        let mut unread: HashMap<Uuid, i64> = HashMap::new();
        for m in s
            .messages
            .iter()
            .filter(|m| m.sender_id == user_id || m.recipient_id == user_id)
        {
            let other = if m.sender_id == user_id {
                m.recipient_id
            } else {
                m.sender_id
            };
            if m.recipient_id == user_id && m.read_at.is_none() {
                *unread.entry(other).or_default() += 1;
            }
            let slot = latest.entry(other).or_insert(m);
            if m.created_at > slot.created_at {
                *slot = m;
            }
        }
        let mut out: Vec<ConversationSummary> = latest
            .into_iter()
            .map(|(other, m)| {
                let u = s.users.get(&other);
                ConversationSummary {
                    counterpart_id: other,
                    counterpart_name: u.map(|u| u.name.clone()).unwrap_or_default(),
                    counterpart_image: u.and_then(|u| u.image.clone()),
                    last_message: m.clone(),
                    unread_count: unread.get(&other).copied().unwrap_or(0),
                }
            })
            .collect();
        out.sort_by(|a, b| b.last_message.created_at.cmp(&a.last_message.created_at));
        Ok(out)
    }
}

/// Records every push so tests can assert on side effects.
#[derive(Default)]
pub(crate) struct RecordingRealtime {
    pub sent: Mutex<Vec<(Uuid, RealtimeEvent)>>,
}

#[async_trait]
impl RealtimePort for RecordingRealtime {
    async fn send_to_user(&self, user_id: Uuid, event: RealtimeEvent) -> usize {
        self.sent.lock().await.push((user_id, event));
        1
    }

    async fn is_online(&self, _user_id: Uuid) -> bool {
        true
    }
}

#[derive(Default)]
pub(crate) struct FakeObjectStorage {
    pub presigned: Mutex<Vec<(String, String, Duration)>>,
    pub objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

#[async_trait]
impl ObjectStoragePort for FakeObjectStorage {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> anyhow::Result<String> {
        self.presigned
            .lock()
            .await
            .push((key.to_string(), content_type.to_string(), expires_in));
        Ok(format!(
            "https://bucket.s3.test/{key}?X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()> {
        self.objects
            .lock()
            .await
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://bucket.s3.test/{key}")
    }
}
