use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Education Migration Survey API",
        version = "1.0.0",
        description = "Survey collection backend. \n\n**Authentication:** every endpoint except register, login and health requires a JWT Bearer token. Admin-only endpoints additionally require the caller's `isAdmin` flag."
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::get_me,

        // Users
        crate::api::users::update_profile,
        crate::api::users::update_password,
        crate::api::users::list_users,
        crate::api::users::delete_user,
        crate::api::users::toggle_admin,

        // Surveys
        crate::api::surveys::create_survey,
        crate::api::surveys::get_my_survey,
        crate::api::surveys::update_survey,
        crate::api::surveys::get_analytics,
        crate::api::surveys::list_surveys,
        crate::api::surveys::delete_survey,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::AuthResponse,
            crate::models::PublicUser,
            crate::models::ProfileUpdate,
            crate::models::PasswordUpdate,
            crate::models::MessageResponse,
            crate::models::EducationLevel,
            crate::models::MigrationStatus,
            crate::models::CreateSurveyRequest,
            crate::models::UpdateSurveyRequest,
            crate::models::SurveyResponse,
            crate::models::SurveyWithOwner,
            crate::models::AnalyticsReport,
            crate::models::TopReason,
            crate::models::EducationLevelCount,
            crate::api::health::HealthResponse,
            crate::api::health::DatabaseHealth,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and the current user."),
        (name = "Users", description = "Profile and password changes; admin user management."),
        (name = "Surveys", description = "One survey per user, admin listing and aggregate analytics."),
        (name = "Health", description = "Liveness check."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build()
                ),
            );
        }
    }
}
