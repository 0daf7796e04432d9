use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: i64,
    pub name: String,
    pub semester: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduleRequest {
    pub name: Option<String>,
    pub semester: Option<String>,
}

/// A subject placed on a schedule. Timeslot fields are copied from the
/// subject at the moment it is added.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduleItem {
    pub id: i64,
    pub schedule_id: i64,
    pub subject_id: i64,
    pub name: String,
    pub day: Option<i32>,
    pub startperiod: Option<i32>,
    pub endperiod: Option<i32>,
    pub room: String,
    pub color: String,
}

/// Schedule item joined with the subject's code and credits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduleItemView {
    pub id: i64,
    pub subject_id: i64,
    pub name: String,
    pub code: String,
    pub credits: i32,
    pub day: Option<i32>,
    pub startperiod: Option<i32>,
    pub endperiod: Option<i32>,
    pub room: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItemRequest {
    pub schedule_id: i64,
    pub subject_id: i64,
}
