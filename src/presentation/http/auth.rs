use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::Actor;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::application::use_cases::auth::verify_email::VerifyEmail;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::enums::Role;
use crate::domain::users::user::User;
use crate::presentation::http::error::{ApiError, ApiJson, ApiResult, ErrorBody};

pub const ACCESS_COOKIE: &str = "access_token";

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// The signed-in user's own view of their account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub languages: Vec<String>,
    pub is_verified: bool,
    pub is_open_to_work: bool,
    pub email_verified: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            image: u.image,
            bio: u.bio,
            location: u.location,
            languages: u.languages,
            is_verified: u.is_verified,
            is_open_to_work: u.is_open_to_work,
            email_verified: u.email_verified,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub email_verification_required: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailResponse {
    pub user_id: Uuid,
    pub email_verified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify-email", post(verify_email))
        .route("/session", get(session))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 200, body = RegisterResponse),
    (status = 400, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
        admin_emails: &ctx.cfg.admin_emails,
        require_email_verification: ctx.cfg.require_email_verification,
        token_ttl: chrono::Duration::seconds(ctx.cfg.email_token_ttl_secs),
    };
    let dto = RegisterDto {
        email: req.email,
        name: req.name,
        password: req.password,
    };
    let out = uc.execute(&dto).await?;
    if let Some(token) = &out.verification_token {
        // No mailer: the operator relays the link.
        tracing::info!(user_id = %out.user.id, email = %out.user.email, token = %token, "email_verification_token_issued");
    }
    tracing::info!(user_id = %out.user.id, role = %out.user.role, "user_registered");
    Ok(Json(RegisterResponse {
        email_verification_required: out.verification_token.is_some(),
        user: out.user.into(),
    }))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 401, body = ErrorBody),
    (status = 403, body = ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
        require_email_verification: ctx.cfg.require_email_verification,
    };
    let dto = LoginDto {
        email: req.email,
        password: req.password,
    };
    let user = uc.execute(&dto).await?.ok_or_else(|| {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "invalid email or password",
        )
    })?;
    let token = issue_token(&ctx.cfg, user.id)?;

    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie(&token, ctx.cfg.jwt_expires_secs, secure_cookies(&ctx.cfg));
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).unwrap_or(HeaderValue::from_static("")),
    );
    tracing::info!(user_id = %user.id, "user_logged_in");
    Ok((
        headers,
        Json(LoginResponse {
            access_token: token,
            user: SessionUser {
                id: user.id,
                email: user.email,
                name: user.name,
                role: user.role,
            },
        }),
    ))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "Auth", responses((status = 204)))]
pub async fn logout(State(ctx): State<AppContext>) -> (HeaderMap, StatusCode) {
    let mut headers = HeaderMap::new();
    let cookie = if secure_cookies(&ctx.cfg) {
        "access_token=; HttpOnly; Secure; Path=/; Max-Age=0; SameSite=Lax"
    } else {
        "access_token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"
    };
    headers.insert(header::SET_COOKIE, HeaderValue::from_static(cookie));
    (headers, StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/auth/verify-email", tag = "Auth", request_body = VerifyEmailRequest, security(()), responses(
    (status = 200, body = VerifyEmailResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn verify_email(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<VerifyEmailRequest>,
) -> ApiResult<VerifyEmailResponse> {
    let repo = ctx.user_repo();
    let uc = VerifyEmail {
        repo: repo.as_ref(),
    };
    let user_id = uc.execute(&req.token).await?;
    tracing::info!(user_id = %user_id, "email_verified");
    Ok(Json(VerifyEmailResponse {
        user_id,
        email_verified: true,
    }))
}

#[utoipa::path(get, path = "/api/auth/session", tag = "Auth", responses(
    (status = 200, body = Option<UserResponse>, description = "null without a valid session")
))]
pub async fn session(
    State(ctx): State<AppContext>,
    MaybeSession(user_id): MaybeSession,
) -> ApiResult<Option<UserResponse>> {
    let Some(user_id) = user_id else {
        return Ok(Json(None));
    };
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(user_id).await?.map(Into::into)))
}

// --- Token extraction and JWT ---

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from_headers(&parts.headers)
            .map(Bearer)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Authenticated caller. Rejects with 401 when the token is missing or invalid.
pub struct Session(pub Uuid);

#[axum::async_trait]
impl FromRequestParts<AppContext> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let Bearer(token) = Bearer::from_request_parts(parts, ctx).await?;
        validate_token(&ctx.cfg, &token)
            .map(Session)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Caller that may be anonymous. A bad token counts as no session.
pub struct MaybeSession(pub Option<Uuid>);

impl MaybeSession {
    pub fn actor(&self) -> Actor {
        self.0.map(Actor::User).unwrap_or(Actor::Anonymous)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for MaybeSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(
            token_from_headers(&parts.headers).and_then(|t| validate_token(&ctx.cfg, &t)),
        ))
    }
}

/// `Authorization: Bearer` first, then the `access_token` cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(t) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(t.to_string());
    }
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|c| get_cookie(c, ACCESS_COOKIE))
        .filter(|t| !t.is_empty())
}

pub fn issue_token(cfg: &Config, user_id: Uuid) -> Result<String, ApiError> {
    let now = Utc::now().timestamp().max(0) as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + cfg.jwt_expires_secs.max(0) as usize,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!(error = ?e, "jwt_encode_failed");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "could not issue session",
        )
    })
}

pub fn validate_token(cfg: &Config, token: &str) -> Option<Uuid> {
    let data = jsonwebtoken::decode::<Claims>(
        token.trim(),
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;
    Uuid::parse_str(&data.claims.sub).ok()
}

fn secure_cookies(cfg: &Config) -> bool {
    cfg.frontend_url
        .as_deref()
        .map(|u| u.starts_with("https://"))
        .unwrap_or(false)
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        if let Some((k, v)) = part.trim().split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "{ACCESS_COOKIE}={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}
