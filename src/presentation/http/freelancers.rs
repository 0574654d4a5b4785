use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::use_cases::freelancers::filter_freelancers::FilterFreelancers;
use crate::bootstrap::app_context::AppContext;
use crate::domain::enums::{Category, DeliveryTime, ExperienceLevel, FreelancerLevel, RateType};
use crate::domain::users::freelancer::{Freelancer, FreelancerFilters};
use crate::presentation::http::error::{ApiQuery, ApiResult, ErrorBody};
use crate::presentation::http::users::ProfileResponse;

/// Every parameter is optional. Supplied ones are AND-ed.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct FreelancerQuery {
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

impl From<FreelancerQuery> for FreelancerFilters {
    fn from(q: FreelancerQuery) -> Self {
        Self {
            search: q.search,
            category: q.category,
            rate_type: q.rate_type,
            experience_level: q.experience_level,
            language: q.language,
            min_rating: q.min_rating,
            freelancer_level: q.freelancer_level,
            delivery_time: q.delivery_time,
            location: q.location,
            verified_only: q.verified_only,
            open_to_work: q.open_to_work,
            limit: q.limit,
            offset: q.offset,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerResponse {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub languages: Vec<String>,
    pub is_verified: bool,
    pub is_open_to_work: bool,
    pub created_at: DateTime<Utc>,
    pub profile: ProfileResponse,
}

impl From<Freelancer> for FreelancerResponse {
    fn from(f: Freelancer) -> Self {
        Self {
            id: f.id,
            name: f.name,
            image: f.image,
            bio: f.bio,
            location: f.location,
            languages: f.languages,
            is_verified: f.is_verified,
            is_open_to_work: f.is_open_to_work,
            created_at: f.created_at,
            profile: f.profile.into(),
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/rpc/freelancer.getFilteredFreelancers",
            get(get_filtered_freelancers),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/rpc/freelancer.getFilteredFreelancers", tag = "Freelancers", params(FreelancerQuery), responses(
    (status = 200, body = [FreelancerResponse]),
    (status = 400, body = ErrorBody)
))]
pub async fn get_filtered_freelancers(
    State(ctx): State<AppContext>,
    ApiQuery(q): ApiQuery<FreelancerQuery>,
) -> ApiResult<Vec<FreelancerResponse>> {
    let repo = ctx.freelancer_repo();
    let uc = FilterFreelancers {
        repo: repo.as_ref(),
    };
    let items = uc.execute(q.into()).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
