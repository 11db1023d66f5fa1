pub mod survey;
pub mod user;

pub use survey::*;
pub use user::*;

use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::utils::AppError;

/// Id of a record read back from the store. A missing `_id` is a broken record.
pub(crate) fn persisted_id(id: Option<ObjectId>, collection: &str) -> Result<ObjectId, AppError> {
    id.ok_or_else(|| AppError::Internal(format!("{} record without _id", collection)))
}

pub(crate) fn to_utc(at: BsonDateTime) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp_millis(at.timestamp_millis())
        .ok_or_else(|| AppError::Internal(format!("timestamp out of range: {}", at.timestamp_millis())))
}
