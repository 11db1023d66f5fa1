mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Compress, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::{MongoDB, MongoSurveyRepository, MongoUserRepository};
use crate::services::TokenService;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Survey Service...");
    log::info!("📊 Database: {}", config.database_name);

    let db = MongoDB::new(&config.mongo_uri, &config.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
        })?;
    log::info!("✅ MongoDB connected successfully");

    let state = web::Data::new(AppState::new(
        Arc::new(db.clone()),
        Arc::new(MongoUserRepository::new(&db)),
        Arc::new(MongoSurveyRepository::new(&db)),
        TokenService::new(&config.jwt_secret, &config.jwt_issuer),
        config.bcrypt_cost,
    ));

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!(
        "📚 Swagger UI available at: http://{}:{}/swagger-ui/",
        config.host,
        config.port
    );

    let origins = config.cors_allowed_origins.clone();
    let static_dir = config.static_dir.clone();
    if let Some(dir) = &static_dir {
        log::info!("🖥️ Serving frontend from {}", dir.display());
    }
    let openapi = api::swagger::ApiDoc::openapi();

    let server = HttpServer::new(move || {
        let cors = build_cors(&origins);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(api::configure)
            .configure(|cfg| {
                if let Some(dir) = &static_dir {
                    api::frontend::configure(cfg, dir);
                }
            })
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    let result = server.await;

    log::info!("🛑 Server stopped, closing MongoDB connections");
    db.shutdown().await;

    result
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = if origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .max_age(3600)
}
