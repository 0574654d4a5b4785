use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use axum::{Router, routing::get};
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use api::application::ports::object_storage_port::ObjectStoragePort;
use api::bootstrap::app_context::{AppContext, AppServices};
use api::bootstrap::config::Config;
use api::infrastructure::db::repositories::{
    freelancer_repository_sqlx::SqlxFreelancerRepository,
    listing_repository_sqlx::SqlxListingRepository, message_repository_sqlx::SqlxMessageRepository,
    profile_repository_sqlx::SqlxProfileRepository, review_repository_sqlx::SqlxReviewRepository,
    user_repository_sqlx::SqlxUserRepository,
    verification_repository_sqlx::SqlxVerificationRepository,
};
use api::infrastructure::realtime::RealtimeHub;
use api::infrastructure::storage::{DisabledObjectStorage, S3ObjectStorage};
use api::presentation::http as handlers;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            handlers::auth::register,
            handlers::auth::login,
            handlers::auth::logout,
            handlers::auth::verify_email,
            handlers::auth::session,
            handlers::users::get_public_profile,
            handlers::users::update_user,
            handlers::users::upsert_profile,
            handlers::users::add_portfolio_item,
            handlers::users::upload_profile_image,
            handlers::freelancers::get_filtered_freelancers,
            handlers::listings::create_listing,
            handlers::listings::update_listing,
            handlers::listings::delete_listing,
            handlers::listings::get_listing,
            handlers::listings::get_user_listings,
            handlers::listings::get_published,
            handlers::verifications::submit_verification,
            handlers::verifications::get_my_verification,
            handlers::verifications::get_pending_verifications,
            handlers::verifications::update_verification_status,
            handlers::reviews::create_review,
            handlers::reviews::reviews_for_user,
            handlers::reviews::reviews_for_listing,
            handlers::uploads::get_presigned_url,
            handlers::messages::send_message,
            handlers::messages::get_conversation,
            handlers::messages::get_conversations,
            handlers::health::health,
            api::presentation::ws::ws_entry,
        ),
        components(schemas(
            handlers::error::ErrorBody,
            handlers::auth::RegisterRequest,
            handlers::auth::RegisterResponse,
            handlers::auth::LoginRequest,
            handlers::auth::LoginResponse,
            handlers::auth::SessionUser,
            handlers::auth::VerifyEmailRequest,
            handlers::auth::VerifyEmailResponse,
            handlers::auth::UserResponse,
            handlers::users::SkillDto,
            handlers::users::ProfileResponse,
            handlers::users::PublicUser,
            handlers::users::PortfolioItemResponse,
            handlers::users::PublicProfileResponse,
            handlers::users::UpdateUserRequest,
            handlers::users::UpsertProfileRequest,
            handlers::users::AddPortfolioItemRequest,
            handlers::users::UploadProfileImageRequest,
            handlers::users::UploadProfileImageResponse,
            handlers::freelancers::FreelancerResponse,
            handlers::listings::ListingResponse,
            handlers::listings::CreateListingRequest,
            handlers::listings::UpdateListingRequest,
            handlers::listings::ListingIdRequest,
            handlers::listings::DeletedResponse,
            handlers::verifications::VerificationResponse,
            handlers::verifications::PendingVerificationResponse,
            handlers::verifications::SubmitVerificationRequest,
            handlers::verifications::UpdateVerificationStatusRequest,
            handlers::reviews::ReviewResponse,
            handlers::reviews::CreateReviewRequest,
            handlers::uploads::PresignRequest,
            handlers::uploads::PresignResponse,
            handlers::messages::MessageResponse,
            handlers::messages::ConversationResponse,
            handlers::messages::SendMessageRequest,
            handlers::health::HealthResponse,
            api::domain::enums::Currency,
            api::domain::enums::Category,
            api::domain::enums::RateType,
            api::domain::enums::ExperienceLevel,
            api::domain::enums::FreelancerLevel,
            api::domain::enums::DeliveryTime,
            api::domain::enums::SkillLevel,
            api::domain::enums::Role,
            api::domain::enums::VerificationStatus,
        )),
        tags(
            (name = "Auth", description = "Registration, login and sessions"),
            (name = "Users", description = "Accounts, profiles and portfolios"),
            (name = "Freelancers", description = "Freelancer discovery"),
            (name = "Listings", description = "Service listings"),
            (name = "Verification", description = "Identity verification"),
            (name = "Reviews", description = "Ratings and reviews"),
            (name = "Uploads", description = "Direct-to-storage uploads"),
            (name = "Messages", description = "Direct messages"),
            (name = "Realtime", description = "Websocket push channel"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        // Production requires FRONTEND_URL, so a bad value denies every origin.
        _ if cfg.is_production => base.allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("http://invalid"),
        )),
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "shutdown_signal_failed");
    }
    info!("shutdown_requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api=debug,marketplace_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        production = cfg.is_production,
        storage = cfg.s3_bucket.as_deref().unwrap_or("disabled"),
        "starting marketplace api"
    );

    let pool = api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    api::infrastructure::db::migrate(&pool).await?;

    let object_storage: Arc<dyn ObjectStoragePort> = if cfg.s3_bucket.is_some() {
        Arc::new(S3ObjectStorage::new(&cfg).await?)
    } else {
        tracing::warn!("object_storage_disabled");
        Arc::new(DisabledObjectStorage)
    };

    let services = AppServices {
        user_repo: Arc::new(SqlxUserRepository::new(pool.clone())),
        profile_repo: Arc::new(SqlxProfileRepository::new(pool.clone())),
        freelancer_repo: Arc::new(SqlxFreelancerRepository::new(pool.clone())),
        listing_repo: Arc::new(SqlxListingRepository::new(pool.clone())),
        verification_repo: Arc::new(SqlxVerificationRepository::new(pool.clone())),
        review_repo: Arc::new(SqlxReviewRepository::new(pool.clone())),
        message_repo: Arc::new(SqlxMessageRepository::new(pool.clone())),
        object_storage,
        hub: RealtimeHub::new(),
    };
    let ctx = AppContext::new(cfg.clone(), pool, services);

    let api_router = Router::new()
        .nest("/api", handlers::health::routes(ctx.clone()))
        .nest("/api/auth", handlers::auth::routes(ctx.clone()))
        .nest("/api", handlers::users::routes(ctx.clone()))
        .nest("/api", handlers::freelancers::routes(ctx.clone()))
        .nest("/api", handlers::listings::routes(ctx.clone()))
        .nest("/api", handlers::verifications::routes(ctx.clone()))
        .nest("/api", handlers::reviews::routes(ctx.clone()))
        .nest("/api", handlers::uploads::routes(ctx.clone()))
        .nest("/api", handlers::messages::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()));

    let ws_router = Router::new()
        .route("/api/ws", get(api::presentation::ws::ws_entry))
        .with_state(ctx.clone());

    // Profile images arrive base64-encoded inside JSON, so leave room for the encoding.
    let body_limit = cfg.upload_max_bytes / 3 * 4 + 64 * 1024;

    let app = Router::new()
        .route("/", get(handlers::health::root))
        .merge(api_router)
        .merge(ws_router)
        .layer(cors_layer(&cfg))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
