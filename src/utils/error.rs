use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing bearer token, or the token's user no longer exists
    #[error("Not authorized, no valid token")]
    Unauthenticated,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness violation (duplicate email, second survey)
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Login failure. Identical for unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password change with a wrong current password
    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::IncorrectPassword => "INVALID_CREDENTIALS",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Maps a duplicate-key write failure to `Conflict`, anything else to `Database`.
    pub fn from_write(err: mongodb::error::Error, conflict: &str) -> Self {
        let duplicate = match *err.kind {
            ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => {
                write_error.code == DUPLICATE_KEY
            }
            _ => false,
        };

        if duplicate {
            AppError::Conflict(conflict.to_string())
        } else {
            AppError::Database(err)
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidToken | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::IncorrectPassword | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(_) | AppError::Internal(_) => {
                log::error!("❌ {}", self);
                "Server error".to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.kind(),
            "message": message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn assert_error(error: AppError, status: StatusCode, kind: &str, message: &str) {
        let resp = error.error_response();
        assert_eq!(resp.status(), status);
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], kind);
        assert_eq!(json["message"], message);
    }

    #[actix_web::test]
    async fn conflict_is_bad_request() {
        assert_error(
            AppError::Conflict("User already exists".into()),
            StatusCode::BAD_REQUEST,
            "CONFLICT",
            "User already exists",
        )
        .await;
    }

    #[actix_web::test]
    async fn login_and_password_change_share_kind() {
        assert_error(
            AppError::InvalidCredentials,
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Invalid credentials",
        )
        .await;
        assert_error(
            AppError::IncorrectPassword,
            StatusCode::BAD_REQUEST,
            "INVALID_CREDENTIALS",
            "Current password is incorrect",
        )
        .await;
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        assert_error(
            AppError::Internal("pool exhausted at 10.0.0.3".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Server error",
        )
        .await;
    }

    #[actix_web::test]
    async fn auth_failures_are_unauthorized() {
        assert_error(
            AppError::Unauthenticated,
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            "Not authorized, no valid token",
        )
        .await;
        assert_error(
            AppError::Forbidden("Not authorized as an admin".into()),
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "Not authorized as an admin",
        )
        .await;
    }
}
