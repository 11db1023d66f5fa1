pub mod auth;
pub mod frontend;
pub mod health;
pub mod surveys;
pub mod swagger;
pub mod users;


use actix_web::web;
use mongodb::bson::oid::ObjectId;

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

/// Registers every route. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::get_me)),
                ),
        )
        .service(
            web::scope("/api/users")
                .wrap(AuthMiddleware)
                .route("", web::get().to(users::list_users))
                .route("/profile", web::put().to(users::update_profile))
                .route("/password", web::put().to(users::update_password))
                .route("/{id}", web::delete().to(users::delete_user))
                .route("/{id}/toggle-admin", web::put().to(users::toggle_admin)),
        )
        .service(
            web::scope("/api/surveys")
                .wrap(AuthMiddleware)
                .route("", web::post().to(surveys::create_survey))
                .route("", web::get().to(surveys::list_surveys))
                .route("/my-survey", web::get().to(surveys::get_my_survey))
                .route("/analytics", web::get().to(surveys::get_analytics))
                .route("/{id}", web::put().to(surveys::update_survey))
                .route("/{id}", web::delete().to(surveys::delete_survey)),
        );
}

/// Body parse failures use the same error body as everything else.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("❌ Rejected request body: {}", err);
        AppError::Validation(err.to_string()).into()
    })
}

/// Path ids that are not ObjectIds cannot match a record.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::NotFound(not_found.to_string()))
}
