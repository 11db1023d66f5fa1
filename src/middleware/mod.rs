pub mod auth;
pub mod security_headers;

pub use auth::{require_admin, AuthMiddleware};
pub use security_headers::SecurityHeaders;
