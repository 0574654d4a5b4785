use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::use_cases::reviews::create_review::CreateReview;
use crate::application::use_cases::reviews::list_reviews::{
    ListReviewsForListing, ListReviewsForUser,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::reviews::review::{NewReview, Review};
use crate::presentation::http::auth::Session;
use crate::presentation::http::error::{ApiJson, ApiQuery, ApiResult, ErrorBody};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
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

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            reviewer_id: r.reviewer_id,
            reviewer_name: r.reviewer_name,
            reviewer_image: r.reviewer_image,
            about_id: r.about_id,
            contract_id: r.contract_id,
            listing_id: r.listing_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub about_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub listing_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ForUserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ForListingQuery {
    pub listing_id: Uuid,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/rpc/review.createReview", post(create_review))
        .route("/rpc/review.getForUser", get(reviews_for_user))
        .route("/rpc/review.getForListing", get(reviews_for_listing))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/rpc/review.createReview", tag = "Reviews", request_body = CreateReviewRequest, responses(
    (status = 200, body = ReviewResponse),
    (status = 400, body = ErrorBody),
    (status = 403, body = ErrorBody),
    (status = 404, body = ErrorBody)
))]
pub async fn create_review(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<CreateReviewRequest>,
) -> ApiResult<ReviewResponse> {
    let users = ctx.user_repo();
    let listings = ctx.listing_repo();
    let reviews = ctx.review_repo();
    let uc = CreateReview {
        users: users.as_ref(),
        listings: listings.as_ref(),
        reviews: reviews.as_ref(),
    };
    let review = uc
        .execute(NewReview {
            reviewer_id: user_id,
            about_id: req.about_id,
            contract_id: req.contract_id,
            listing_id: req.listing_id,
            rating: req.rating,
            comment: req.comment,
        })
        .await?;
    Ok(Json(review.into()))
}

#[utoipa::path(get, path = "/api/rpc/review.getForUser", tag = "Reviews", params(ForUserQuery), responses(
    (status = 200, body = [ReviewResponse])
))]
pub async fn reviews_for_user(
    State(ctx): State<AppContext>,
    ApiQuery(q): ApiQuery<ForUserQuery>,
) -> ApiResult<Vec<ReviewResponse>> {
    let repo = ctx.review_repo();
    let uc = ListReviewsForUser {
        reviews: repo.as_ref(),
    };
    let items = uc.execute(q.user_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/rpc/review.getForListing", tag = "Reviews", params(ForListingQuery), responses(
    (status = 200, body = [ReviewResponse])
))]
pub async fn reviews_for_listing(
    State(ctx): State<AppContext>,
    ApiQuery(q): ApiQuery<ForListingQuery>,
) -> ApiResult<Vec<ReviewResponse>> {
    let repo = ctx.review_repo();
    let uc = ListReviewsForListing {
        reviews: repo.as_ref(),
    };
    let items = uc.execute(q.listing_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
