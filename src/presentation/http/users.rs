use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::use_cases::users::add_portfolio_item::AddPortfolioItem;
use crate::application::use_cases::users::get_public_profile::{GetPublicProfile, PublicProfile};
use crate::application::use_cases::users::update_user::UpdateUser;
use crate::application::use_cases::users::upload_profile_image::UploadProfileImage;
use crate::application::use_cases::users::upsert_profile::UpsertProfile;
use crate::bootstrap::app_context::AppContext;
use crate::domain::enums::{
    Category, Currency, DeliveryTime, ExperienceLevel, FreelancerLevel, RateType, SkillLevel,
};
use crate::domain::users::portfolio::PortfolioItem;
use crate::domain::users::profile::{Profile, ProfileInput, Skill};
use crate::domain::users::user::{User, UserPatch};
use crate::presentation::http::auth::{self, Session, UserResponse};
use crate::presentation::http::error::{ApiError, ApiJson, ApiQuery, ApiResult, ErrorBody};
use crate::presentation::http::listings::ListingResponse;
use crate::presentation::http::reviews::ReviewResponse;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillDto {
    pub name: String,
    pub level: SkillLevel,
}

impl From<Skill> for SkillDto {
    fn from(s: Skill) -> Self {
        Self {
            name: s.name,
            level: s.level,
        }
    }
}

impl From<SkillDto> for Skill {
    fn from(s: SkillDto) -> Self {
        Self {
            name: s.name,
            level: s.level,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub headline: Option<String>,
    pub hourly_rate: Option<f64>,
    pub currency: Currency,
    pub main_category: Option<Category>,
    pub rate_type_preference: Option<RateType>,
    pub experience_level: Option<ExperienceLevel>,
    pub freelancer_level: FreelancerLevel,
    pub delivery_time: Option<DeliveryTime>,
    pub average_rating: Option<f64>,
    pub completed_jobs: i32,
    pub goals: Vec<String>,
    pub skills: Vec<SkillDto>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            headline: p.headline,
            hourly_rate: p.hourly_rate,
            currency: p.currency,
            main_category: p.main_category,
            rate_type_preference: p.rate_type_preference,
            experience_level: p.experience_level,
            freelancer_level: p.freelancer_level,
            delivery_time: p.delivery_time,
            average_rating: p.average_rating,
            completed_jobs: p.completed_jobs,
            goals: p.goals,
            skills: p.skills.into_iter().map(Into::into).collect(),
        }
    }
}

/// What other users may see of an account. Email and role stay private.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub languages: Vec<String>,
    pub is_verified: bool,
    pub is_open_to_work: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            image: u.image,
            bio: u.bio,
            location: u.location,
            languages: u.languages,
            is_verified: u.is_verified,
            is_open_to_work: u.is_open_to_work,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItemResponse {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub created_at: DateTime<Utc>,
}

impl From<PortfolioItem> for PortfolioItemResponse {
    fn from(p: PortfolioItem) -> Self {
        Self {
            id: p.id,
            title: p.title,
            link: p.link,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub user: PublicUser,
    pub profile: Option<ProfileResponse>,
    pub portfolio: Vec<PortfolioItemResponse>,
    pub listings: Vec<ListingResponse>,
    pub reviews: Vec<ReviewResponse>,
    pub review_count: i64,
    pub average_rating: Option<f64>,
}

impl From<PublicProfile> for PublicProfileResponse {
    fn from(p: PublicProfile) -> Self {
        Self {
            user: p.user.into(),
            profile: p.profile.map(Into::into),
            portfolio: p.portfolio.into_iter().map(Into::into).collect(),
            listings: p.listings.into_iter().map(Into::into).collect(),
            reviews: p.reviews.into_iter().map(Into::into).collect(),
            review_count: p.rating.count,
            average_rating: p.rating.average,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct PublicProfileQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub languages: Option<Vec<String>>,
    pub is_open_to_work: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    pub headline: Option<String>,
    pub hourly_rate: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: Currency,
    pub main_category: Option<Category>,
    pub rate_type_preference: Option<RateType>,
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default = "default_level")]
    pub freelancer_level: FreelancerLevel,
    pub delivery_time: Option<DeliveryTime>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub skills: Vec<SkillDto>,
}

fn default_currency() -> Currency {
    Currency::Usd
}

fn default_level() -> FreelancerLevel {
    FreelancerLevel::New
}

impl From<UpsertProfileRequest> for ProfileInput {
    fn from(r: UpsertProfileRequest) -> Self {
        Self {
            headline: r.headline,
            hourly_rate: r.hourly_rate,
            currency: r.currency,
            main_category: r.main_category,
            rate_type_preference: r.rate_type_preference,
            experience_level: r.experience_level,
            freelancer_level: r.freelancer_level,
            delivery_time: r.delivery_time,
            goals: r.goals,
            skills: r.skills.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPortfolioItemRequest {
    /// Defaults to the caller. Admins may add items for other users.
    pub user_id: Option<Uuid>,
    pub title: String,
    pub link: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadProfileImageRequest {
    /// `data:image/...;base64,` URL or bare base64.
    pub image_data: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadProfileImageResponse {
    pub url: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/rpc/user.getSession", get(auth::session))
        .route("/rpc/user.getShowPublicProfile", get(get_public_profile))
        .route("/rpc/user.updateUser", post(update_user))
        .route("/rpc/user.upsertProfile", post(upsert_profile))
        .route("/rpc/user.addPortfolioItem", post(add_portfolio_item))
        .route("/rpc/user.uploadProfileImage", post(upload_profile_image))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/rpc/user.getShowPublicProfile", tag = "Users", params(PublicProfileQuery), responses(
    (status = 200, body = PublicProfileResponse),
    (status = 404, body = ErrorBody)
))]
pub async fn get_public_profile(
    State(ctx): State<AppContext>,
    ApiQuery(q): ApiQuery<PublicProfileQuery>,
) -> ApiResult<PublicProfileResponse> {
    let users = ctx.user_repo();
    let profiles = ctx.profile_repo();
    let listings = ctx.listing_repo();
    let reviews = ctx.review_repo();
    let uc = GetPublicProfile {
        users: users.as_ref(),
        profiles: profiles.as_ref(),
        listings: listings.as_ref(),
        reviews: reviews.as_ref(),
    };
    let profile = uc
        .execute(q.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user"))?;
    Ok(Json(profile.into()))
}

#[utoipa::path(post, path = "/api/rpc/user.updateUser", tag = "Users", request_body = UpdateUserRequest, responses(
    (status = 200, body = UserResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn update_user(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let repo = ctx.user_repo();
    let uc = UpdateUser {
        repo: repo.as_ref(),
    };
    let patch = UserPatch {
        name: req.name,
        bio: req.bio,
        location: req.location,
        languages: req.languages,
        is_open_to_work: req.is_open_to_work,
    };
    let user = uc.execute(user_id, patch).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(post, path = "/api/rpc/user.upsertProfile", tag = "Users", request_body = UpsertProfileRequest, responses(
    (status = 200, body = ProfileResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn upsert_profile(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<UpsertProfileRequest>,
) -> ApiResult<ProfileResponse> {
    let repo = ctx.profile_repo();
    let uc = UpsertProfile {
        profiles: repo.as_ref(),
    };
    let profile = uc.execute(user_id, req.into()).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(post, path = "/api/rpc/user.addPortfolioItem", tag = "Users", request_body = AddPortfolioItemRequest, responses(
    (status = 200, body = PortfolioItemResponse),
    (status = 400, body = ErrorBody),
    (status = 403, body = ErrorBody)
))]
pub async fn add_portfolio_item(
    State(ctx): State<AppContext>,
    Session(actor_id): Session,
    ApiJson(req): ApiJson<AddPortfolioItemRequest>,
) -> ApiResult<PortfolioItemResponse> {
    let users = ctx.user_repo();
    let profiles = ctx.profile_repo();
    let uc = AddPortfolioItem {
        users: users.as_ref(),
        profiles: profiles.as_ref(),
    };
    let target = req.user_id.unwrap_or(actor_id);
    let item = uc.execute(actor_id, target, &req.title, &req.link).await?;
    Ok(Json(item.into()))
}

#[utoipa::path(post, path = "/api/rpc/user.uploadProfileImage", tag = "Users", request_body = UploadProfileImageRequest, responses(
    (status = 200, body = UploadProfileImageResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn upload_profile_image(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<UploadProfileImageRequest>,
) -> ApiResult<UploadProfileImageResponse> {
    let users = ctx.user_repo();
    let storage = ctx.object_storage();
    let uc = UploadProfileImage {
        users: users.as_ref(),
        storage: storage.as_ref(),
        max_bytes: ctx.cfg.upload_max_bytes,
    };
    let url = uc.execute(user_id, &req.image_data).await?;
    Ok(Json(UploadProfileImageResponse { url }))
}
