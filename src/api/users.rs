use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::middleware::require_admin;
use crate::models::{MessageResponse, PasswordUpdate, ProfileUpdate, PublicUser};
use crate::services::credential_service::USER_NOT_FOUND;
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    request_body = ProfileUpdate,
    responses((status = 200, description = "Updated profile", body = PublicUser)),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
    request: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️ PUT /users/profile - {}", user.email);

    let updated = state
        .credentials
        .update_profile(&user.id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    put,
    path = "/api/users/password",
    tag = "Users",
    request_body = PasswordUpdate,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Current password is incorrect")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_password(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
    request: web::Json<PasswordUpdate>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔒 PUT /users/password - {}", user.email);

    state
        .credentials
        .update_password(&user.id, request.into_inner())
        .await
        .map_err(|e| {
            log::warn!("❌ Password change failed for {}: {}", user.email, e);
            e
        })?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password updated successfully")))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [PublicUser]),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    log::info!("📋 GET /users - admin {}", user.email);

    let users = state.credentials.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User removed", body = MessageResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    let id = parse_id(&path, USER_NOT_FOUND)?;
    log::info!("🗑️ DELETE /users/{} - admin {}", id, user.email);

    state.credentials.delete_user(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User removed")))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/toggle-admin",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Admin flag flipped", body = PublicUser),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_admin(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    let id = parse_id(&path, USER_NOT_FOUND)?;
    log::info!("🔑 PUT /users/{}/toggle-admin - admin {}", id, user.email);

    let updated = state.credentials.toggle_admin(&id).await?;
    Ok(HttpResponse::Ok().json(updated))
}
