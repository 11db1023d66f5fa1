use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::models::PublicUser;
use crate::services::CredentialService;
use crate::state::AppState;
use crate::utils::AppError;

/// Requires a valid bearer token on every request of the wrapped scope and
/// attaches the caller as `web::ReqData<PublicUser>`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("Application state not configured".to_string()))?;

            let token = bearer_token(req.headers()).map(str::to_owned);
            let user = authenticate(&state.credentials, token.as_deref()).await?;

            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}

/// Token part of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves a bearer token to its user. Missing, invalid or expired tokens
/// and tokens of deleted users are all `Unauthenticated`.
pub async fn authenticate(
    credentials: &CredentialService,
    token: Option<&str>,
) -> Result<PublicUser, AppError> {
    let token = token.ok_or(AppError::Unauthenticated)?;

    let user_id = credentials.tokens().verify(token).map_err(|e| {
        log::warn!("❌ Rejected token: {}", e);
        AppError::Unauthenticated
    })?;

    credentials.current_user(&user_id).await?.ok_or_else(|| {
        log::warn!("❌ Token references missing user {}", user_id);
        AppError::Unauthenticated
    })
}

/// Admin-only gate. Runs after `authenticate`.
pub fn require_admin(user: &PublicUser) -> Result<(), AppError> {
    if user.is_admin {
        Ok(())
    } else {
        log::warn!("⛔ Admin access denied for {}", user.email);
        Err(AppError::Forbidden("Not authorized as an admin".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryUserRepository;
    use crate::database::UserRepository;
    use crate::models::User;
    use crate::services::TokenService;
    use actix_web::http::header::HeaderValue;
    use chrono::Duration;
    use mongodb::bson::oid::ObjectId;
    use std::sync::Arc;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    async fn setup(ttl: Duration) -> (CredentialService, Arc<MemoryUserRepository>, ObjectId) {
        let repo = Arc::new(MemoryUserRepository::default());
        let stored = repo
            .insert(User::new("A".into(), "a@x.com".into(), "hash".into()))
            .await
            .unwrap();
        let tokens = TokenService::with_ttl("test-secret", "survey-service", ttl);
        let credentials = CredentialService::new(repo.clone(), tokens, 4);
        (credentials, repo, stored.id.unwrap())
    }

    #[tokio::test]
    async fn valid_token_resolves_user() {
        let (credentials, _, id) = setup(Duration::days(30)).await;
        let token = credentials.tokens().issue(&id).unwrap();

        let user = authenticate(&credentials, Some(&token)).await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn missing_or_expired_token_is_unauthenticated() {
        let (credentials, _, id) = setup(Duration::days(-2)).await;
        let expired = credentials.tokens().issue(&id).unwrap();

        assert!(matches!(
            authenticate(&credentials, None).await,
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            authenticate(&credentials, Some(&expired)).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn token_of_deleted_user_is_unauthenticated() {
        let (credentials, repo, id) = setup(Duration::days(30)).await;
        let token = credentials.tokens().issue(&id).unwrap();
        repo.delete(&id).await.unwrap();

        assert!(matches!(
            authenticate(&credentials, Some(&token)).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn require_admin_checks_flag() {
        let (credentials, _, id) = setup(Duration::days(30)).await;
        let mut user = credentials.current_user(&id).await.unwrap().unwrap();

        assert!(matches!(require_admin(&user), Err(AppError::Forbidden(_))));
        user.is_admin = true;
        assert!(require_admin(&user).is_ok());
    }
}
