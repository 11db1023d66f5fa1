use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::database::UserRepository;
use crate::models::{
    AuthResponse, LoginRequest, PasswordUpdate, ProfileUpdate, PublicUser, RegisterRequest, User,
};
use crate::services::token_service::TokenService;
use crate::utils::AppError;

pub use crate::database::users::USER_NOT_FOUND;

/// Registration, login, profile and admin management of user records.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
    hash_cost: u32,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService, hash_cost: u32) -> Self {
        Self {
            users,
            tokens,
            hash_cost,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        let name = required(request.name, "name")?;
        let email = required(request.email, "email")?;
        let password = required(request.password, "password")?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(password, self.hash_cost).await?;
        // the unique email index still catches a concurrent registration
        let user = self.users.insert(User::new(name, email, password_hash)).await?;
        let token = self.issue_for(&user)?;

        log::info!("✅ User registered successfully: {}", user.email);

        Ok(AuthResponse {
            token,
            user: user.try_into()?,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(request.password, user.password.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_for(&user)?;
        Ok(AuthResponse {
            token,
            user: user.try_into()?,
        })
    }

    /// Resolves a verified token subject to the current user record.
    pub async fn current_user(&self, id: &ObjectId) -> Result<Option<PublicUser>, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .map(PublicUser::try_from)
            .transpose()
    }

    pub async fn update_profile(
        &self,
        id: &ObjectId,
        update: ProfileUpdate,
    ) -> Result<PublicUser, AppError> {
        let mut user = self.load(id).await?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(notifications) = update.notifications {
            user.notifications = notifications;
        }

        self.users.replace(&user).await?;
        user.try_into()
    }

    pub async fn update_password(&self, id: &ObjectId, update: PasswordUpdate) -> Result<(), AppError> {
        let mut user = self.load(id).await?;

        if !verify_password(update.current_password, user.password.clone()).await? {
            return Err(AppError::IncorrectPassword);
        }
        let new_password = required(Some(update.new_password), "newPassword")?;

        user.password = hash_password(new_password, self.hash_cost).await?;
        self.users.replace(&user).await
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AppError> {
        self.users
            .list()
            .await?
            .into_iter()
            .map(PublicUser::try_from)
            .collect()
    }

    pub async fn toggle_admin(&self, id: &ObjectId) -> Result<PublicUser, AppError> {
        let mut user = self.load(id).await?;
        user.is_admin = !user.is_admin;
        self.users.replace(&user).await?;

        log::info!("🔑 Admin flag for {} is now {}", user.email, user.is_admin);
        user.try_into()
    }

    /// Removes the user record only. Their survey, if any, is kept.
    pub async fn delete_user(&self, id: &ObjectId) -> Result<(), AppError> {
        if !self.users.delete(id).await? {
            return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    async fn load(&self, id: &ObjectId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
    }

    fn issue_for(&self, user: &User) -> Result<String, AppError> {
        let id = user
            .id
            .ok_or_else(|| AppError::Internal("Stored user has no id".to_string()))?;
        self.tokens.issue(&id)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("Please provide {}", field))),
    }
}

// bcrypt is CPU bound, keep it off the request workers
async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))
}
