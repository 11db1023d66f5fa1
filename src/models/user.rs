use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use super::{persisted_id, to_utc};
use crate::database::USERS;
use crate::utils::AppError;

/// Usuário armazenado na coleção `users`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// bcrypt hash, never the plaintext
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default = "default_notifications")]
    pub notifications: bool,
    pub created_at: BsonDateTime,
}

fn default_notifications() -> bool {
    true
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            name,
            email,
            password: password_hash,
            is_admin: false,
            phone: None,
            notifications: true,
            created_at: BsonDateTime::now(),
        }
    }
}

/// User as exposed over the API and attached to authenticated requests.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub notifications: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<User> for PublicUser {
    type Error = AppError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(PublicUser {
            id: persisted_id(user.id, USERS)?,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            phone: user.phone,
            notifications: user.notifications,
            created_at: to_utc(user.created_at)?,
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Partial profile update. `None` leaves the stored value alone; any
/// provided value, empty string or `false` included, replaces it.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub notifications: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_carries_password() {
        let mut user = User::new("Ana".into(), "ana@x.com".into(), "$2b$04$hash".into());
        user.id = Some(ObjectId::new());

        let json = serde_json::to_value(PublicUser::try_from(user.clone()).unwrap()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["_id"], user.id.unwrap().to_hex());
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["notifications"], true);
    }

    #[test]
    fn stored_user_defaults() {
        let doc = mongodb::bson::doc! {
            "name": "Ana",
            "email": "ana@x.com",
            "password": "hash",
            "createdAt": BsonDateTime::now(),
        };
        let user: User = mongodb::bson::from_document(doc).unwrap();
        assert!(!user.is_admin);
        assert!(user.notifications);
        assert!(user.phone.is_none());
    }

    #[test]
    fn public_user_requires_stored_id() {
        let user = User::new("Ana".into(), "ana@x.com".into(), "hash".into());
        assert!(matches!(PublicUser::try_from(user), Err(AppError::Internal(_))));
    }
}
