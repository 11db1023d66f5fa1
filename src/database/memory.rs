//! In-memory repositories for tests. Enforce the same uniqueness rules as
//! the MongoDB indexes.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::surveys::{ALREADY_SUBMITTED, SURVEY_NOT_FOUND};
use super::users::USER_NOT_FOUND;
use super::{StoreHealth, SurveyRepository, UserRepository};
use crate::models::{Survey, User};
use crate::utils::AppError;

/// Store whose reachability the test controls.
pub struct MemoryStore {
    up: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            up: AtomicBool::new(true),
        }
    }
}

impl MemoryStore {
    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        if self.up.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Internal("store unreachable".to_string()))
        }
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn insert(&self, mut user: User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn replace(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id.is_some() && u.id == user.id)
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id.as_ref() != Some(id));
        Ok(users.len() < before)
    }
}

#[derive(Default)]
pub struct MemorySurveyRepository {
    surveys: Mutex<Vec<Survey>>,
}

impl MemorySurveyRepository {
    pub fn count_for(&self, user: &ObjectId) -> usize {
        self.surveys.lock().unwrap().iter().filter(|s| &s.user == user).count()
    }
}

#[async_trait]
impl SurveyRepository for MemorySurveyRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Survey>, AppError> {
        let surveys = self.surveys.lock().unwrap();
        Ok(surveys.iter().find(|s| s.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_user(&self, user: &ObjectId) -> Result<Option<Survey>, AppError> {
        let surveys = self.surveys.lock().unwrap();
        Ok(surveys.iter().find(|s| &s.user == user).cloned())
    }

    async fn list(&self) -> Result<Vec<Survey>, AppError> {
        Ok(self.surveys.lock().unwrap().clone())
    }

    async fn insert(&self, mut survey: Survey) -> Result<Survey, AppError> {
        let mut surveys = self.surveys.lock().unwrap();
        if surveys.iter().any(|s| s.user == survey.user) {
            return Err(AppError::Conflict(ALREADY_SUBMITTED.to_string()));
        }
        survey.id = Some(ObjectId::new());
        surveys.push(survey.clone());
        Ok(survey)
    }

    async fn replace(&self, survey: &Survey) -> Result<(), AppError> {
        let mut surveys = self.surveys.lock().unwrap();
        let slot = surveys
            .iter_mut()
            .find(|s| s.id.is_some() && s.id == survey.id)
            .ok_or_else(|| AppError::NotFound(SURVEY_NOT_FOUND.to_string()))?;
        *slot = survey.clone();
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let mut surveys = self.surveys.lock().unwrap();
        let before = surveys.len();
        surveys.retain(|s| s.id.as_ref() != Some(id));
        Ok(surveys.len() < before)
    }
}
