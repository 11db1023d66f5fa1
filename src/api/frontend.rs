use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::web;
use std::path::Path;

/// Serves the built frontend from `dir`. Any path without a matching file
/// gets `index.html` so client-side routes survive a reload. Register after
/// the API routes, it matches everything.
pub fn configure(cfg: &mut web::ServiceConfig, dir: &Path) {
    let index = dir.join("index.html");

    cfg.service(
        Files::new("/", dir)
            .index_file("index.html")
            .default_handler(fn_service(move |req: ServiceRequest| {
                let index = index.clone();
                async move {
                    let (req, _) = req.into_parts();
                    let file = NamedFile::open_async(&index).await?;
                    let res = file.into_response(&req);
                    Ok(ServiceResponse::new(req, res))
                }
            })),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    fn bundle() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
        std::fs::write(dir.path().join("main.js"), "console.log(1)").unwrap();
        dir
    }

    #[actix_web::test]
    async fn serves_assets_and_falls_back_to_index() {
        let dir = bundle();
        let app = test::init_service(
            App::new()
                .route("/health", web::get().to(|| async { "ok" }))
                .configure(|cfg| configure(cfg, dir.path())),
        )
        .await;

        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/main.js").to_request()).await;
        assert_eq!(body, "console.log(1)");

        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(body, "<div id=\"root\"></div>");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/my-survey").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "<div id=\"root\"></div>");

        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(body, "ok");
    }
}
