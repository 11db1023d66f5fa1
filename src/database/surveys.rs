use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use super::{MongoDB, SurveyRepository, SURVEYS};
use crate::models::Survey;
use crate::utils::AppError;

pub const ALREADY_SUBMITTED: &str =
    "You have already submitted a survey. Please update your existing survey instead.";

pub const SURVEY_NOT_FOUND: &str = "Survey not found";

pub struct MongoSurveyRepository {
    collection: Collection<Survey>,
}

impl MongoSurveyRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<Survey>(SURVEYS),
        }
    }
}

#[async_trait]
impl SurveyRepository for MongoSurveyRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Survey>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_by_user(&self, user: &ObjectId) -> Result<Option<Survey>, AppError> {
        Ok(self.collection.find_one(doc! { "user": *user }).await?)
    }

    async fn list(&self) -> Result<Vec<Survey>, AppError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, mut survey: Survey) -> Result<Survey, AppError> {
        // unique index on `user` closes the check-then-insert race
        let result = self
            .collection
            .insert_one(&survey)
            .await
            .map_err(|e| AppError::from_write(e, ALREADY_SUBMITTED))?;

        survey.id = result.inserted_id.as_object_id();
        Ok(survey)
    }

    async fn replace(&self, survey: &Survey) -> Result<(), AppError> {
        let id = survey
            .id
            .ok_or_else(|| AppError::Internal("Cannot update a survey without id".to_string()))?;

        let result = self.collection.replace_one(doc! { "_id": id }, survey).await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(SURVEY_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}
