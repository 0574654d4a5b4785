use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::bootstrap::app_context::AppContext;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when Postgres answers, `degraded` otherwise.
    pub status: &'static str,
}

#[utoipa::path(get, path = "/api/health", tag = "Health", security(()), responses(
    (status = 200, body = HealthResponse)
))]
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&ctx.pool)
        .await
        .is_ok();
    if !database {
        tracing::warn!("health_check_database_unreachable");
    }
    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
    })
}

pub async fn root() -> &'static str {
    "OK"
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new().route("/health", get(health)).with_state(ctx)
}
