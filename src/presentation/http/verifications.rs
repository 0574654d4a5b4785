use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::verifications::get_my_verification::GetMyVerification;
use crate::application::use_cases::verifications::list_pending::ListPendingVerifications;
use crate::application::use_cases::verifications::submit_verification::SubmitVerification;
use crate::application::use_cases::verifications::update_status::UpdateVerificationStatus;
use crate::bootstrap::app_context::AppContext;
use crate::domain::enums::VerificationStatus;
use crate::domain::verifications::verification::{PendingVerification, Verification};
use crate::presentation::http::auth::Session;
use crate::presentation::http::error::{ApiJson, ApiResult, ErrorBody};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: VerificationStatus,
    pub id_front_image: String,
    pub id_back_image: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<Verification> for VerificationResponse {
    fn from(v: Verification) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            status: v.status,
            id_front_image: v.id_front_image,
            id_back_image: v.id_back_image,
            rejection_reason: v.rejection_reason,
            created_at: v.created_at,
            resolved_at: v.resolved_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingVerificationResponse {
    #[serde(flatten)]
    pub verification: VerificationResponse,
    pub user_name: String,
    pub user_email: String,
    pub user_image: Option<String>,
}

impl From<PendingVerification> for PendingVerificationResponse {
    fn from(p: PendingVerification) -> Self {
        Self {
            verification: p.verification.into(),
            user_name: p.user_name,
            user_email: p.user_email,
            user_image: p.user_image,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVerificationRequest {
    pub id_front_image: String,
    pub id_back_image: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVerificationStatusRequest {
    pub user_id: Uuid,
    /// `APPROVED` or `REJECTED`. Parsed by the handler so bad values map to 400.
    pub status: String,
    pub reason: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/rpc/verification.submit", post(submit_verification))
        .route("/rpc/verification.getMine", get(get_my_verification))
        .route("/rpc/user.getPendingVerifications", get(get_pending_verifications))
        .route(
            "/rpc/user.updateUserVerificationStatus",
            post(update_verification_status),
        )
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/rpc/verification.submit", tag = "Verification", request_body = SubmitVerificationRequest, responses(
    (status = 200, body = VerificationResponse),
    (status = 400, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn submit_verification(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<SubmitVerificationRequest>,
) -> ApiResult<VerificationResponse> {
    let users = ctx.user_repo();
    let verifications = ctx.verification_repo();
    let uc = SubmitVerification {
        users: users.as_ref(),
        verifications: verifications.as_ref(),
    };
    let v = uc
        .execute(user_id, &req.id_front_image, &req.id_back_image)
        .await?;
    Ok(Json(v.into()))
}

#[utoipa::path(get, path = "/api/rpc/verification.getMine", tag = "Verification", responses(
    (status = 200, body = Option<VerificationResponse>)
))]
pub async fn get_my_verification(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
) -> ApiResult<Option<VerificationResponse>> {
    let repo = ctx.verification_repo();
    let uc = GetMyVerification {
        verifications: repo.as_ref(),
    };
    Ok(Json(uc.execute(user_id).await?.map(Into::into)))
}

#[utoipa::path(get, path = "/api/rpc/user.getPendingVerifications", tag = "Verification", responses(
    (status = 200, body = [PendingVerificationResponse]),
    (status = 403, body = ErrorBody)
))]
pub async fn get_pending_verifications(
    State(ctx): State<AppContext>,
    Session(actor_id): Session,
) -> ApiResult<Vec<PendingVerificationResponse>> {
    let users = ctx.user_repo();
    let verifications = ctx.verification_repo();
    let uc = ListPendingVerifications {
        users: users.as_ref(),
        verifications: verifications.as_ref(),
    };
    let items = uc.execute(actor_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/api/rpc/user.updateUserVerificationStatus", tag = "Verification", request_body = UpdateVerificationStatusRequest, responses(
    (status = 200, body = VerificationResponse),
    (status = 403, body = ErrorBody),
    (status = 404, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn update_verification_status(
    State(ctx): State<AppContext>,
    Session(actor_id): Session,
    ApiJson(req): ApiJson<UpdateVerificationStatusRequest>,
) -> ApiResult<VerificationResponse> {
    let users = ctx.user_repo();
    let verifications = ctx.verification_repo();
    let realtime = ctx.realtime_port();
    let status: VerificationStatus = req.status.trim().parse()?;
    let uc = UpdateVerificationStatus {
        users: users.as_ref(),
        verifications: verifications.as_ref(),
        realtime: realtime.as_ref(),
    };
    let v = uc
        .execute(actor_id, req.user_id, status, req.reason)
        .await?;
    Ok(Json(v.into()))
}
