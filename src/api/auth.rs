use actix_web::{web, HttpResponse};

use crate::models::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Missing field or user already exists")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.clone().unwrap_or_default();
    log::info!("📝 POST /auth/register - email: {}", email);

    let response = state.credentials.register(request.into_inner()).await.map_err(|e| {
        log::warn!("❌ Registration failed: {} - {}", email, e);
        e
    })?;

    Ok(HttpResponse::Created().json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.clone();
    log::info!("🔐 POST /auth/login - email: {}", email);

    let response = state.credentials.login(request.into_inner()).await.map_err(|e| {
        log::warn!("❌ Login failed: {} - {}", email, e);
        e
    })?;

    log::info!("✅ Login successful: {}", email);
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = PublicUser),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(user: web::ReqData<PublicUser>) -> HttpResponse {
    log::info!("👤 GET /auth/me - {}", user.email);
    HttpResponse::Ok().json(user.into_inner())
}
