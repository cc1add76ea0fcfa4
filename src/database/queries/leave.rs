use crate::database::models::{LeaveStatus, LeaveSubmission};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

const LEAVE_SELECT: &str = "SELECT l.id, l.user_id, u.name AS author, l.reason, l.file_key, l.status, l.created_at,
            EXISTS(SELECT 1 FROM leave_views v WHERE v.leave_id = l.id) AS viewed
     FROM leave_submissions l
     JOIN users u ON u.id = l.user_id";

pub async fn insert<'e, E>(
    db: E,
    user_id: i64,
    reason: &str,
    file_key: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO leave_submissions (user_id, reason, file_key, status, created_at)
         VALUES (?, ?, ?, 'pending', ?)",
    )
    .bind(user_id)
    .bind(reason)
    .bind(file_key)
    .bind(created_at)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_by_id<'e, E>(db: E, leave_id: i64) -> sqlx::Result<Option<LeaveSubmission>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, LeaveSubmission>(&format!("{LEAVE_SELECT} WHERE l.id = ?"))
        .bind(leave_id)
        .fetch_optional(db)
        .await
}

/// Submissions of employee accounts, newest first.
pub async fn list_from_employees<'e, E>(db: E) -> sqlx::Result<Vec<LeaveSubmission>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, LeaveSubmission>(&format!(
        "{LEAVE_SELECT} WHERE u.role = 'employee' ORDER BY l.created_at DESC, l.id DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn list_for_user<'e, E>(db: E, user_id: i64) -> sqlx::Result<Vec<LeaveSubmission>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, LeaveSubmission>(&format!(
        "{LEAVE_SELECT} WHERE l.user_id = ? ORDER BY l.created_at DESC, l.id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Moves a pending submission to `status`. Returns false when the
/// submission is not pending any more.
pub async fn resolve_pending<'e, E>(db: E, leave_id: i64, status: LeaveStatus) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("UPDATE leave_submissions SET status = ? WHERE id = ? AND status = 'pending'")
            .bind(status.as_str())
            .bind(leave_id)
            .execute(db)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Records the viewed marker. Returns false when it already existed.
pub async fn mark_viewed<'e, E>(db: E, leave_id: i64, viewed_at: DateTime<Utc>) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("INSERT OR IGNORE INTO leave_views (leave_id, viewed_at) VALUES (?, ?)")
            .bind(leave_id)
            .bind(viewed_at)
            .execute(db)
            .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_views<'e, E>(db: E, leave_id: i64) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM leave_views WHERE leave_id = ?")
        .bind(leave_id)
        .fetch_one(db)
        .await
}

pub async fn file_keys_for_user<'e, E>(db: E, user_id: i64) -> sqlx::Result<Vec<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT file_key FROM leave_submissions WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(db)
        .await
}
