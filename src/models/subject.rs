use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub professor: String,
    pub startperiod: Option<i32>,
    pub endperiod: Option<i32>,
    pub day: Option<i32>,
    pub room: String,
    pub color: String,
    pub semester: String,
    pub weeks: String,
    pub created_at: String,
}

/// A fully built subject that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub professor: String,
    pub startperiod: Option<i32>,
    pub endperiod: Option<i32>,
    pub day: Option<i32>,
    pub room: String,
    pub color: String,
    pub semester: String,
    pub weeks: String,
}
