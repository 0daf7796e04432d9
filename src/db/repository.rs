use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::models::{
    NewScheduleRequest, NewSubject, Schedule, ScheduleItem, ScheduleItemView, Subject,
};

const SUBJECT_COLUMNS: &str = "id, code, name, credits, professor, startperiod, endperiod, day, room, color, semester, weeks, created_at";

pub async fn fetch_subjects(db: &SqlitePool) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "SELECT {} FROM subjects ORDER BY name, code",
        SUBJECT_COLUMNS
    ))
    .fetch_all(db)
    .await
}

pub async fn find_subject_by_id(db: &SqlitePool, id: i64) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!("SELECT {} FROM subjects WHERE id = ?", SUBJECT_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_subject_by_code<'e, E>(db: E, code: &str) -> Result<Option<Subject>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Subject>(&format!("SELECT {} FROM subjects WHERE code = ?", SUBJECT_COLUMNS))
        .bind(code)
        .fetch_optional(db)
        .await
}

/// Case-insensitive prefix search over subject name and code.
pub async fn search_subjects(
    db: &SqlitePool,
    query: &str,
    limit: i64,
) -> Result<Vec<Subject>, sqlx::Error> {
    let pattern = format!("{}%", escape_like(query));

    sqlx::query_as::<_, Subject>(&format!(
        r"SELECT {} FROM subjects
        WHERE name LIKE ?1 ESCAPE '\' OR code LIKE ?1 ESCAPE '\'
        ORDER BY name, code
        LIMIT ?2",
        SUBJECT_COLUMNS
    ))
    .bind(pattern)
    .bind(limit)
    .fetch_all(db)
    .await
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Inserts the subject unless its code is already taken.
///
/// Returns the new row id, or `None` when another row owns the code. The
/// existence check and the insert are one statement, so two concurrent
/// importers cannot both create the same code.
pub async fn insert_subject_if_absent<'e, E>(
    db: E,
    subject: &NewSubject,
) -> Result<Option<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        INSERT INTO subjects
            (code, name, credits, professor, startperiod, endperiod,
            day, room, color, semester, weeks, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        ON CONFLICT(code) DO NOTHING
        "#,
    )
    .bind(&subject.code)
    .bind(&subject.name)
    .bind(subject.credits)
    .bind(&subject.professor)
    .bind(subject.startperiod)
    .bind(subject.endperiod)
    .bind(subject.day)
    .bind(&subject.room)
    .bind(&subject.color)
    .bind(&subject.semester)
    .bind(&subject.weeks)
    .bind(now)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        Ok(None)
    } else {
        Ok(Some(result.last_insert_rowid()))
    }
}

pub async fn count_subjects<'e, E>(db: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subjects")
        .fetch_one(db)
        .await
}

pub async fn delete_all_subjects<'e, E>(db: E) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    Ok(sqlx::query("DELETE FROM subjects").execute(db).await?.rows_affected())
}

pub async fn delete_all_schedules<'e, E>(db: E) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    Ok(sqlx::query("DELETE FROM schedules").execute(db).await?.rows_affected())
}

pub async fn delete_all_schedule_items<'e, E>(db: E) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    Ok(sqlx::query("DELETE FROM schedule_items")
        .execute(db)
        .await?
        .rows_affected())
}

pub async fn fetch_schedules(db: &SqlitePool) -> Result<Vec<Schedule>, sqlx::Error> {
    sqlx::query_as::<_, Schedule>(
        "SELECT id, name, semester, created_at FROM schedules ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_schedule_by_id(db: &SqlitePool, id: i64) -> Result<Option<Schedule>, sqlx::Error> {
    sqlx::query_as::<_, Schedule>("SELECT id, name, semester, created_at FROM schedules WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_schedule(
    db: &SqlitePool,
    req: NewScheduleRequest,
) -> Result<Schedule, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "New Schedule".to_string());
    let semester = req.semester.unwrap_or_default();

    let id = sqlx::query("INSERT INTO schedules (name, semester, created_at) VALUES (?1, ?2, ?3)")
        .bind(&name)
        .bind(&semester)
        .bind(&now)
        .execute(db)
        .await?
        .last_insert_rowid();

    Ok(Schedule {
        id,
        name,
        semester,
        created_at: now,
    })
}

pub async fn delete_schedule(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM schedules WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Places `subject` on the schedule, copying its timeslot and color.
pub async fn insert_schedule_item(
    db: &SqlitePool,
    schedule_id: i64,
    subject: &Subject,
) -> Result<ScheduleItem, sqlx::Error> {
    let id = sqlx::query(
        r#"
        INSERT INTO schedule_items
            (schedule_id, subject_id, name, day, startperiod, endperiod, room, color)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(schedule_id)
    .bind(subject.id)
    .bind(&subject.name)
    .bind(subject.day)
    .bind(subject.startperiod)
    .bind(subject.endperiod)
    .bind(&subject.room)
    .bind(&subject.color)
    .execute(db)
    .await?
    .last_insert_rowid();

    Ok(ScheduleItem {
        id,
        schedule_id,
        subject_id: subject.id,
        name: subject.name.clone(),
        day: subject.day,
        startperiod: subject.startperiod,
        endperiod: subject.endperiod,
        room: subject.room.clone(),
        color: subject.color.clone(),
    })
}

pub async fn delete_schedule_item(
    db: &SqlitePool,
    schedule_id: i64,
    subject_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM schedule_items WHERE schedule_id = ?1 AND subject_id = ?2")
        .bind(schedule_id)
        .bind(subject_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_schedule_items(
    db: &SqlitePool,
    schedule_id: i64,
) -> Result<Vec<ScheduleItemView>, sqlx::Error> {
    sqlx::query_as::<_, ScheduleItemView>(
        r#"
        SELECT
            i.id, i.subject_id, i.name, s.code, s.credits,
            i.day, i.startperiod, i.endperiod, i.room, i.color
        FROM schedule_items i
        JOIN subjects s ON s.id = i.subject_id
        WHERE i.schedule_id = ?
        ORDER BY i.day, i.startperiod, i.id
        "#,
    )
    .bind(schedule_id)
    .fetch_all(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn setup_test_db() -> SqlitePool {
        let pool = db::connect_in_memory()
            .await
            .expect("Failed to create test db");

        db::migrate(&pool).await.expect("Failed to run migrations");

        pool
    }

    fn new_subject(code: &str, name: &str) -> NewSubject {
        NewSubject {
            code: code.to_string(),
            name: name.to_string(),
            credits: 3,
            professor: "Dr. Nguyen".to_string(),
            startperiod: Some(6),
            endperiod: Some(8),
            day: Some(1),
            room: "P1".to_string(),
            color: "#3498db".to_string(),
            semester: "1-2025".to_string(),
            weeks: "1-16".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_subject_if_absent_skips_taken_code() {
        let pool = setup_test_db().await;

        let first = insert_subject_if_absent(&pool, &new_subject("CS101", "Nhập môn"))
            .await
            .expect("Failed to insert subject");
        assert!(first.is_some());

        let second = insert_subject_if_absent(&pool, &new_subject("CS101", "Other name"))
            .await
            .expect("Failed to insert subject");
        assert_eq!(second, None);

        let stored = find_subject_by_code(&pool, "CS101")
            .await
            .expect("Failed to fetch subject")
            .expect("Subject not found");
        assert_eq!(stored.name, "Nhập môn");
        assert_eq!(count_subjects(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_subjects_prefix_on_name_or_code() {
        let pool = setup_test_db().await;

        for (code, name) in [("MATH1", "Algebra"), ("CS101", "Algorithms"), ("PHY1", "Mechanics")] {
            insert_subject_if_absent(&pool, &new_subject(code, name))
                .await
                .expect("Failed to insert subject");
        }

        let by_name = search_subjects(&pool, "al", 10).await.unwrap();
        let names: Vec<_> = by_name.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Algebra", "Algorithms"]);

        let by_code = search_subjects(&pool, "phy", 10).await.unwrap();
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].code, "PHY1");

        let limited = search_subjects(&pool, "al", 1).await.unwrap();
        assert_eq!(limited.len(), 1);

        let wildcard = search_subjects(&pool, "%", 10).await.unwrap();
        assert!(wildcard.is_empty());
    }

    #[tokio::test]
    async fn test_schedule_items_follow_schedule_and_subject() {
        let pool = setup_test_db().await;

        let subject_id = insert_subject_if_absent(&pool, &new_subject("CS101", "Nhập môn"))
            .await
            .unwrap()
            .expect("Subject not created");
        let subject = find_subject_by_id(&pool, subject_id).await.unwrap().unwrap();

        let schedule = insert_schedule(
            &pool,
            NewScheduleRequest {
                name: None,
                semester: Some("1-2025".to_string()),
            },
        )
        .await
        .expect("Failed to insert schedule");
        assert_eq!(schedule.name, "New Schedule");

        let item = insert_schedule_item(&pool, schedule.id, &subject)
            .await
            .expect("Failed to insert item");
        assert_eq!(item.day, Some(1));
        assert_eq!(item.room, "P1");

        let duplicate = insert_schedule_item(&pool, schedule.id, &subject).await;
        assert!(duplicate.is_err());

        let items = fetch_schedule_items(&pool, schedule.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code, "CS101");

        assert!(delete_schedule_item(&pool, schedule.id, subject.id).await.unwrap());
        assert!(!delete_schedule_item(&pool, schedule.id, subject.id).await.unwrap());

        insert_schedule_item(&pool, schedule.id, &subject).await.unwrap();
        assert!(delete_schedule(&pool, schedule.id).await.unwrap());
        assert_eq!(delete_all_schedule_items(&pool).await.unwrap(), 0);
    }
}
