use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::use_cases::listings::browse_listings::BrowseListings;
use crate::application::use_cases::listings::create_listing::CreateListing;
use crate::application::use_cases::listings::delete_listing::DeleteListing;
use crate::application::use_cases::listings::get_listing::GetListing;
use crate::application::use_cases::listings::list_user_listings::ListUserListings;
use crate::application::use_cases::listings::update_listing::UpdateListing;
use crate::bootstrap::app_context::AppContext;
use crate::domain::enums::{Category, Currency};
use crate::domain::listings::listing::{Listing, ListingPatch, NewListing};
use crate::presentation::http::auth::{MaybeSession, Session};
use crate::presentation::http::error::{ApiError, ApiJson, ApiQuery, ApiResult, ErrorBody};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
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

impl From<Listing> for ListingResponse {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            owner_id: l.owner_id,
            title: l.title,
            description: l.description,
            price: l.price,
            currency: l.currency,
            category: l.category,
            images: l.images,
            videos: l.videos,
            tags: l.tags,
            is_published: l.is_published,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub currency: Currency,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub id: Uuid,
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

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListingIdRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingIdQuery {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BrowseQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/rpc/listing.create", post(create_listing))
        .route("/rpc/listing.update", post(update_listing))
        .route("/rpc/listing.delete", post(delete_listing))
        .route("/rpc/listing.getById", get(get_listing))
        .route("/rpc/listing.getByUserId", get(get_user_listings))
        .route("/rpc/listing.getPublished", get(get_published))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/rpc/listing.create", tag = "Listings", request_body = CreateListingRequest, responses(
    (status = 200, body = ListingResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn create_listing(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<CreateListingRequest>,
) -> ApiResult<ListingResponse> {
    let repo = ctx.listing_repo();
    let uc = CreateListing {
        repo: repo.as_ref(),
    };
    let listing = uc
        .execute(
            user_id,
            NewListing {
                title: req.title,
                description: req.description,
                price: req.price,
                currency: req.currency,
                category: req.category,
                images: req.images,
                videos: req.videos,
                tags: req.tags,
                is_published: req.is_published,
            },
        )
        .await?;
    Ok(Json(listing.into()))
}

#[utoipa::path(post, path = "/api/rpc/listing.update", tag = "Listings", request_body = UpdateListingRequest, responses(
    (status = 200, body = ListingResponse),
    (status = 404, body = ErrorBody)
))]
pub async fn update_listing(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<UpdateListingRequest>,
) -> ApiResult<ListingResponse> {
    let repo = ctx.listing_repo();
    let uc = UpdateListing {
        repo: repo.as_ref(),
    };
    let patch = ListingPatch {
        title: req.title,
        description: req.description,
        price: req.price,
        currency: req.currency,
        category: req.category,
        images: req.images,
        videos: req.videos,
        tags: req.tags,
        is_published: req.is_published,
    };
    let listing = uc
        .execute(req.id, user_id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("listing"))?;
    Ok(Json(listing.into()))
}

#[utoipa::path(post, path = "/api/rpc/listing.delete", tag = "Listings", request_body = ListingIdRequest, responses(
    (status = 200, body = DeletedResponse),
    (status = 404, body = ErrorBody)
))]
pub async fn delete_listing(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<ListingIdRequest>,
) -> ApiResult<DeletedResponse> {
    let repo = ctx.listing_repo();
    let uc = DeleteListing {
        repo: repo.as_ref(),
    };
    if !uc.execute(req.id, user_id).await? {
        return Err(ApiError::not_found("listing"));
    }
    Ok(Json(DeletedResponse { deleted: true }))
}

#[utoipa::path(get, path = "/api/rpc/listing.getById", tag = "Listings", params(ListingIdQuery), responses(
    (status = 200, body = ListingResponse),
    (status = 404, body = ErrorBody)
))]
pub async fn get_listing(
    State(ctx): State<AppContext>,
    session: MaybeSession,
    ApiQuery(q): ApiQuery<ListingIdQuery>,
) -> ApiResult<ListingResponse> {
    let repo = ctx.listing_repo();
    let uc = GetListing {
        repo: repo.as_ref(),
    };
    let listing = uc
        .execute(&session.actor(), q.id)
        .await?
        .ok_or_else(|| ApiError::not_found("listing"))?;
    Ok(Json(listing.into()))
}

#[utoipa::path(get, path = "/api/rpc/listing.getByUserId", tag = "Listings", params(UserIdQuery), responses(
    (status = 200, body = [ListingResponse])
))]
pub async fn get_user_listings(
    State(ctx): State<AppContext>,
    session: MaybeSession,
    ApiQuery(q): ApiQuery<UserIdQuery>,
) -> ApiResult<Vec<ListingResponse>> {
    let repo = ctx.listing_repo();
    let uc = ListUserListings {
        repo: repo.as_ref(),
    };
    let items = uc.execute(&session.actor(), q.user_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/rpc/listing.getPublished", tag = "Listings", params(BrowseQuery), responses(
    (status = 200, body = [ListingResponse])
))]
pub async fn get_published(
    State(ctx): State<AppContext>,
    ApiQuery(q): ApiQuery<BrowseQuery>,
) -> ApiResult<Vec<ListingResponse>> {
    let repo = ctx.listing_repo();
    let uc = BrowseListings {
        repo: repo.as_ref(),
    };
    let items = uc.execute(q.category, q.search, q.limit, q.offset).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
