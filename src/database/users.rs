use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use super::{MongoDB, UserRepository, USERS};
use crate::models::User;
use crate::utils::AppError;

pub const USER_NOT_FOUND: &str = "User not found";

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<User>(USERS),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, mut user: User) -> Result<User, AppError> {
        let result = self
            .collection
            .insert_one(&user)
            .await
            .map_err(|e| AppError::from_write(e, "User already exists"))?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn replace(&self, user: &User) -> Result<(), AppError> {
        let id = user
            .id
            .ok_or_else(|| AppError::Internal("Cannot update a user without id".to_string()))?;

        let result = self
            .collection
            .replace_one(doc! { "_id": id }, user)
            .await
            .map_err(|e| AppError::from_write(e, "User already exists"))?;

        // deleted between load and write
        if result.matched_count == 0 {
            return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}
