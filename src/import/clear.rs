use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearStats {
    pub subjects: u64,
    pub schedules: u64,
    pub schedule_items: u64,
}

/// Deletes all schedule items, schedules and subjects in one transaction.
pub async fn clear_all(db: &SqlitePool) -> Result<ClearStats, sqlx::Error> {
    let mut tx = db.begin().await?;

    // Children first so the counts are not eaten by cascades.
    let schedule_items = repository::delete_all_schedule_items(&mut *tx).await?;
    let schedules = repository::delete_all_schedules(&mut *tx).await?;
    let subjects = repository::delete_all_subjects(&mut *tx).await?;

    tx.commit().await?;

    let stats = ClearStats {
        subjects,
        schedules,
        schedule_items,
    };
    info!(
        "Deleted {} subjects, {} schedules, {} schedule items",
        stats.subjects, stats.schedules, stats.schedule_items
    );
    Ok(stats)
}
