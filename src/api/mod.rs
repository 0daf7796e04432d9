use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::put;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

const DEFAULT_SEARCH_LIMIT: i64 = 10;

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<i64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/subjects", get(list_subjects))
        .route("/api/search-subjects", get(search_subjects))
        .route("/api/schedules", get(list_schedules).post(create_schedule))
        .route("/api/schedules/{id}", axum::routing::delete(delete_schedule))
        .route("/api/schedules/{id}/items", get(list_schedule_items))
        .route(
            "/api/schedule-items",
            put(add_schedule_item).delete(remove_schedule_item),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = repository::fetch_subjects(&state.db).await?;
    Ok(Json(subjects))
}

async fn search_subjects(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Subject>>, AppError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    if limit <= 0 {
        return Err(AppError::BadRequest("limit must be positive".to_string()));
    }

    let subjects = repository::search_subjects(&state.db, query, limit).await?;
    Ok(Json(subjects))
}

async fn list_schedules(State(state): State<AppState>) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = repository::fetch_schedules(&state.db).await?;
    Ok(Json(schedules))
}

async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<NewScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = repository::insert_schedule(&state.db, req).await?;
    Ok(Json(schedule))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_schedule(&state.db, id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn list_schedule_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ScheduleItemView>>, AppError> {
    repository::find_schedule_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let items = repository::fetch_schedule_items(&state.db, id).await?;
    Ok(Json(items))
}

async fn add_schedule_item(
    State(state): State<AppState>,
    Json(req): Json<ScheduleItemRequest>,
) -> Result<Json<ScheduleItem>, AppError> {
    let schedule = repository::find_schedule_by_id(&state.db, req.schedule_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let subject = repository::find_subject_by_id(&state.db, req.subject_id)
        .await?
        .ok_or(AppError::NotFound)?;

    match repository::insert_schedule_item(&state.db, schedule.id, &subject).await {
        Ok(item) => Ok(Json(item)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
            format!("{} is already on schedule {}", subject.code, schedule.id),
        )),
        Err(e) => Err(e.into()),
    }
}

async fn remove_schedule_item(
    State(state): State<AppState>,
    Json(req): Json<ScheduleItemRequest>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_schedule_item(&state.db, req.schedule_id, req.subject_id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
