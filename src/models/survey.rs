use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{persisted_id, to_utc};
use crate::database::SURVEYS;
use crate::utils::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Bachelors,
    Masters,
    Phd,
    Other,
}

impl EducationLevel {
    /// Fixed order used by the analytics distribution
    pub const ALL: [EducationLevel; 5] = [
        EducationLevel::HighSchool,
        EducationLevel::Bachelors,
        EducationLevel::Masters,
        EducationLevel::Phd,
        EducationLevel::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "high_school",
            EducationLevel::Bachelors => "bachelors",
            EducationLevel::Masters => "masters",
            EducationLevel::Phd => "phd",
            EducationLevel::Other => "other",
        }
    }
}

impl FromStr for EducationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EducationLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("Invalid education level: {}", s))
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to "did you migrate for education?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStatus {
    Yes,
    No,
}

impl FromStr for MigrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(MigrationStatus::Yes),
            "no" => Ok(MigrationStatus::No),
            other => Err(format!("Invalid migration answer: {}", other)),
        }
    }
}

/// Survey armazenado na coleção `surveys` (um por usuário)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Owning user
    pub user: ObjectId,
    pub current_institution: String,
    pub institution_location: String,
    pub current_residence: String,
    pub education_level: EducationLevel,
    pub is_migrated: MigrationStatus,
    /// Empty unless `is_migrated` is `Yes`
    #[serde(default)]
    pub migration_reason: String,
    pub submitted_at: BsonDateTime,
}

/// Body of `POST /surveys`. Presence is checked by the survey service.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyRequest {
    pub current_institution: Option<String>,
    pub institution_location: Option<String>,
    pub current_residence: Option<String>,
    pub education_level: Option<EducationLevel>,
    pub is_migrated: Option<MigrationStatus>,
    pub migration_reason: Option<String>,
}

/// Body of `PUT /surveys/{id}`. An absent or empty field keeps the stored value.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSurveyRequest {
    pub current_institution: Option<String>,
    pub institution_location: Option<String>,
    pub current_residence: Option<String>,
    pub education_level: Option<String>,
    pub is_migrated: Option<String>,
    pub migration_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub user: ObjectId,
    pub current_institution: String,
    pub institution_location: String,
    pub current_residence: String,
    pub education_level: EducationLevel,
    pub is_migrated: MigrationStatus,
    pub migration_reason: String,
    pub submitted_at: DateTime<Utc>,
}

impl TryFrom<Survey> for SurveyResponse {
    type Error = AppError;

    fn try_from(survey: Survey) -> Result<Self, Self::Error> {
        Ok(SurveyResponse {
            id: persisted_id(survey.id, SURVEYS)?,
            user: survey.user,
            current_institution: survey.current_institution,
            institution_location: survey.institution_location,
            current_residence: survey.current_residence,
            education_level: survey.education_level,
            is_migrated: survey.is_migrated,
            migration_reason: survey.migration_reason,
            submitted_at: to_utc(survey.submitted_at)?,
        })
    }
}

/// Admin listing row: the survey joined with its owner's name and email.
/// Owner fields are `None` when the owning user has been deleted.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyWithOwner {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub user_id: ObjectId,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub current_institution: String,
    pub institution_location: String,
    pub current_residence: String,
    pub education_level: EducationLevel,
    pub is_migrated: MigrationStatus,
    pub migration_reason: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct TopReason {
    pub reason: String,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct EducationLevelCount {
    pub level: EducationLevel,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_responses: u64,
    /// Fraction of respondents who migrated, 0 when there are no responses
    pub migration_rate: f64,
    pub top_reasons: Vec<TopReason>,
    pub education_level_distribution: Vec<EducationLevelCount>,
}
