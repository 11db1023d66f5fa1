use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::collections::HashMap;
use std::sync::Arc;

use crate::database::{surveys::ALREADY_SUBMITTED, SurveyRepository, UserRepository, SURVEYS};
use crate::models::{
    persisted_id, to_utc,
    AnalyticsReport, CreateSurveyRequest, EducationLevel, EducationLevelCount, MigrationStatus,
    PublicUser, Survey, SurveyWithOwner, TopReason, UpdateSurveyRequest,
};
use crate::utils::AppError;

pub use crate::database::surveys::SURVEY_NOT_FOUND;

/// Placeholder distribution reported as "top migration reasons". It is not
/// derived from stored answers; replace once reasons are categorized.
pub const PLACEHOLDER_TOP_REASONS: [(&str, u32); 4] = [
    ("Better quality education", 45),
    ("More opportunities", 30),
    ("Specific program availability", 15),
    ("Other", 10),
];

#[derive(Clone)]
pub struct SurveyService {
    surveys: Arc<dyn SurveyRepository>,
    users: Arc<dyn UserRepository>,
}

impl SurveyService {
    pub fn new(surveys: Arc<dyn SurveyRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { surveys, users }
    }

    /// Stores the caller's first survey. A second submission is a `Conflict`.
    pub async fn create(&self, owner: &PublicUser, request: CreateSurveyRequest) -> Result<Survey, AppError> {
        if self.surveys.find_by_user(&owner.id).await?.is_some() {
            return Err(AppError::Conflict(ALREADY_SUBMITTED.to_string()));
        }

        let is_migrated = request
            .is_migrated
            .ok_or_else(|| missing("Please indicate if you migrated for education"))?;

        let survey = Survey {
            id: None,
            user: owner.id,
            current_institution: present(request.current_institution)
                .ok_or_else(|| missing("Please provide your current institution"))?,
            institution_location: present(request.institution_location)
                .ok_or_else(|| missing("Please provide the institution location"))?,
            current_residence: present(request.current_residence)
                .ok_or_else(|| missing("Please provide your current residence"))?,
            education_level: request
                .education_level
                .ok_or_else(|| missing("Please select your education level"))?,
            is_migrated,
            migration_reason: normalize_reason(is_migrated, present(request.migration_reason))?,
            submitted_at: BsonDateTime::now(),
        };

        self.surveys.insert(survey).await
    }

    /// Updates a survey in place. Only the owner or an admin may do so.
    pub async fn update(
        &self,
        id: &ObjectId,
        requester: &PublicUser,
        request: UpdateSurveyRequest,
    ) -> Result<Survey, AppError> {
        let mut survey = self
            .surveys
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(SURVEY_NOT_FOUND.to_string()))?;

        if survey.user != requester.id && !requester.is_admin {
            return Err(AppError::Forbidden(
                "Not authorized to update this survey".to_string(),
            ));
        }

        if let Some(v) = present(request.current_institution) {
            survey.current_institution = v;
        }
        if let Some(v) = present(request.institution_location) {
            survey.institution_location = v;
        }
        if let Some(v) = present(request.current_residence) {
            survey.current_residence = v;
        }
        if let Some(v) = present(request.education_level) {
            survey.education_level = v.parse().map_err(AppError::Validation)?;
        }
        if let Some(v) = present(request.is_migrated) {
            survey.is_migrated = v.parse().map_err(AppError::Validation)?;
        }

        let reason = present(request.migration_reason).or_else(|| {
            Some(std::mem::take(&mut survey.migration_reason)).filter(|r| !r.is_empty())
        });
        survey.migration_reason = normalize_reason(survey.is_migrated, reason)?;

        self.surveys.replace(&survey).await?;
        Ok(survey)
    }

    pub async fn get_mine(&self, owner: &PublicUser) -> Result<Option<Survey>, AppError> {
        self.surveys.find_by_user(&owner.id).await
    }

    /// Every survey joined with its owner's name and email.
    pub async fn list_all(&self) -> Result<Vec<SurveyWithOwner>, AppError> {
        let owners: HashMap<ObjectId, (String, String)> = self
            .users
            .list()
            .await?
            .into_iter()
            .filter_map(|u| u.id.map(|id| (id, (u.name, u.email))))
            .collect();

        let surveys = self.surveys.list().await?;
        surveys
            .into_iter()
            .map(|survey| {
                let owner = owners.get(&survey.user);
                Ok::<_, AppError>(SurveyWithOwner {
                    id: persisted_id(survey.id, SURVEYS)?,
                    user_id: survey.user,
                    user_name: owner.map(|(name, _)| name.clone()),
                    user_email: owner.map(|(_, email)| email.clone()),
                    current_institution: survey.current_institution,
                    institution_location: survey.institution_location,
                    current_residence: survey.current_residence,
                    education_level: survey.education_level,
                    is_migrated: survey.is_migrated,
                    migration_reason: survey.migration_reason,
                    submitted_at: to_utc(survey.submitted_at)?,
                })
            })
            .collect()
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<(), AppError> {
        if !self.surveys.delete(id).await? {
            return Err(AppError::NotFound(SURVEY_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub async fn analytics(&self) -> Result<AnalyticsReport, AppError> {
        let surveys = self.surveys.list().await?;
        Ok(build_report(&surveys))
    }
}

fn build_report(surveys: &[Survey]) -> AnalyticsReport {
    let total = surveys.len() as u64;
    let migrated = surveys
        .iter()
        .filter(|s| s.is_migrated == MigrationStatus::Yes)
        .count() as u64;

    let migration_rate = if total > 0 {
        migrated as f64 / total as f64
    } else {
        0.0
    };

    let top_reasons = PLACEHOLDER_TOP_REASONS
        .iter()
        .map(|(reason, percentage)| TopReason {
            reason: reason.to_string(),
            percentage: *percentage,
        })
        .collect();

    let education_level_distribution = EducationLevel::ALL
        .into_iter()
        .map(|level| EducationLevelCount {
            level,
            count: surveys.iter().filter(|s| s.education_level == level).count() as u64,
        })
        .collect();

    AnalyticsReport {
        total_responses: total,
        migration_rate,
        top_reasons,
        education_level_distribution,
    }
}

/// A reason is kept only for migrated respondents, and they must give one.
fn normalize_reason(status: MigrationStatus, reason: Option<String>) -> Result<String, AppError> {
    match status {
        MigrationStatus::No => Ok(String::new()),
        MigrationStatus::Yes => {
            reason.ok_or_else(|| missing("Please provide your reason for migrating"))
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn missing(message: &str) -> AppError {
    AppError::Validation(message.to_string())
}
