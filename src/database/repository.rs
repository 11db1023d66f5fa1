use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{Survey, User};
use crate::utils::AppError;

/// Liveness of the backing store, reported by `/health`.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    /// Stores a new user and returns it with its assigned id.
    /// A duplicate email yields `Conflict`.
    async fn insert(&self, user: User) -> Result<User, AppError>;
    /// `NotFound` when the user no longer exists.
    async fn replace(&self, user: &User) -> Result<(), AppError>;
    /// Returns `false` when no user had that id.
    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError>;
}

#[async_trait]
pub trait SurveyRepository: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Survey>, AppError>;
    async fn find_by_user(&self, user: &ObjectId) -> Result<Option<Survey>, AppError>;
    async fn list(&self) -> Result<Vec<Survey>, AppError>;
    /// Stores a new survey. A second survey for the same user yields `Conflict`.
    async fn insert(&self, survey: Survey) -> Result<Survey, AppError>;
    /// `NotFound` when the survey no longer exists.
    async fn replace(&self, survey: &Survey) -> Result<(), AppError>;
    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError>;
}
