use std::time::Duration;

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::uploads::presign_upload::{PresignUpload, PresignedUpload};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::Session;
use crate::presentation::http::error::{ApiJson, ApiResult, ErrorBody};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    pub file_name: String,
    pub file_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignResponse {
    /// Signed PUT target. Send the file body with the same `Content-Type`.
    pub url: String,
    pub key: String,
    pub public_url: String,
    pub expires_in: u64,
}

impl From<PresignedUpload> for PresignResponse {
    fn from(p: PresignedUpload) -> Self {
        Self {
            url: p.url,
            key: p.key,
            public_url: p.public_url,
            expires_in: p.expires_in,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/rpc/upload.getPresignedUrl", post(get_presigned_url))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/rpc/upload.getPresignedUrl", tag = "Uploads", request_body = PresignRequest, responses(
    (status = 200, body = PresignResponse),
    (status = 400, body = ErrorBody),
    (status = 500, body = ErrorBody)
))]
pub async fn get_presigned_url(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<PresignRequest>,
) -> ApiResult<PresignResponse> {
    let storage = ctx.object_storage();
    let uc = PresignUpload {
        storage: storage.as_ref(),
        expires_in: Duration::from_secs(ctx.cfg.upload_url_expires_secs),
    };
    let out = uc.execute(user_id, &req.file_name, &req.file_type).await?;
    Ok(Json(out.into()))
}
