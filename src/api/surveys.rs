use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::middleware::require_admin;
use crate::models::{
    AnalyticsReport, CreateSurveyRequest, MessageResponse, PublicUser, SurveyResponse,
    SurveyWithOwner, UpdateSurveyRequest,
};
use crate::services::survey_service::SURVEY_NOT_FOUND;
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/api/surveys",
    tag = "Surveys",
    request_body = CreateSurveyRequest,
    responses(
        (status = 201, description = "Survey submitted", body = SurveyResponse),
        (status = 400, description = "Missing field or survey already submitted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_survey(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
    request: web::Json<CreateSurveyRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /surveys - {}", user.email);

    let survey = state
        .surveys
        .create(&user, request.into_inner())
        .await
        .map_err(|e| {
            log::warn!("❌ Survey submission rejected for {}: {}", user.email, e);
            e
        })?;

    Ok(HttpResponse::Created().json(SurveyResponse::try_from(survey)?))
}

#[utoipa::path(
    get,
    path = "/api/surveys/my-survey",
    tag = "Surveys",
    responses(
        (status = 200, description = "Caller's survey", body = SurveyResponse),
        (status = 404, description = "No survey yet (body is null)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_survey(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
) -> Result<HttpResponse, AppError> {
    log::info!("📄 GET /surveys/my-survey - {}", user.email);

    match state.surveys.get_mine(&user).await? {
        Some(survey) => Ok(HttpResponse::Ok().json(SurveyResponse::try_from(survey)?)),
        None => Ok(HttpResponse::NotFound().json(serde_json::Value::Null)),
    }
}

#[utoipa::path(
    put,
    path = "/api/surveys/{id}",
    tag = "Surveys",
    params(("id" = String, Path, description = "Survey id")),
    request_body = UpdateSurveyRequest,
    responses(
        (status = 200, description = "Survey updated", body = SurveyResponse),
        (status = 403, description = "Not the owner nor an admin"),
        (status = 404, description = "Survey not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_survey(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
    path: web::Path<String>,
    request: web::Json<UpdateSurveyRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path, SURVEY_NOT_FOUND)?;
    log::info!("✏️ PUT /surveys/{} - {}", id, user.email);

    let survey = state
        .surveys
        .update(&id, &user, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(SurveyResponse::try_from(survey)?))
}

#[utoipa::path(
    get,
    path = "/api/surveys/analytics",
    tag = "Surveys",
    responses((status = 200, description = "Aggregate statistics", body = AnalyticsReport)),
    security(("bearer_auth" = []))
)]
pub async fn get_analytics(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
) -> Result<HttpResponse, AppError> {
    log::info!("📊 GET /surveys/analytics - {}", user.email);

    let report = state.surveys.analytics().await?;
    Ok(HttpResponse::Ok().json(report))
}

#[utoipa::path(
    get,
    path = "/api/surveys",
    tag = "Surveys",
    responses(
        (status = 200, description = "All surveys with owner", body = [SurveyWithOwner]),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_surveys(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    log::info!("📋 GET /surveys - admin {}", user.email);

    let surveys = state.surveys.list_all().await?;
    Ok(HttpResponse::Ok().json(surveys))
}

#[utoipa::path(
    delete,
    path = "/api/surveys/{id}",
    tag = "Surveys",
    params(("id" = String, Path, description = "Survey id")),
    responses(
        (status = 200, description = "Survey removed", body = MessageResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Survey not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_survey(
    state: web::Data<AppState>,
    user: web::ReqData<PublicUser>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    let id = parse_id(&path, SURVEY_NOT_FOUND)?;
    log::info!("🗑️ DELETE /surveys/{} - admin {}", id, user.email);

    state.surveys.delete(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Survey removed")))
}
