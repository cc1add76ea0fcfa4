use crate::database::models::Feedback;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

const FEEDBACK_SELECT: &str = "SELECT f.id, f.user_id, u.name AS author, f.message, f.created_at,
            EXISTS(SELECT 1 FROM feedback_views v WHERE v.feedback_id = f.id) AS viewed
     FROM feedback f
     JOIN users u ON u.id = f.user_id";

pub async fn insert<'e, E>(
    db: E,
    user_id: i64,
    message: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("INSERT INTO feedback (user_id, message, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(message)
            .bind(created_at)
            .execute(db)
            .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_by_id<'e, E>(db: E, feedback_id: i64) -> sqlx::Result<Option<Feedback>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Feedback>(&format!("{FEEDBACK_SELECT} WHERE f.id = ?"))
        .bind(feedback_id)
        .fetch_optional(db)
        .await
}

/// Feedback written by employee accounts, newest first.
pub async fn list_from_employees<'e, E>(db: E) -> sqlx::Result<Vec<Feedback>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Feedback>(&format!(
        "{FEEDBACK_SELECT} WHERE u.role = 'employee' ORDER BY f.created_at DESC, f.id DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn list_for_user<'e, E>(db: E, user_id: i64) -> sqlx::Result<Vec<Feedback>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Feedback>(&format!(
        "{FEEDBACK_SELECT} WHERE f.user_id = ? ORDER BY f.created_at DESC, f.id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Records the viewed marker. Returns false when it already existed.
pub async fn mark_viewed<'e, E>(
    db: E,
    feedback_id: i64,
    viewed_at: DateTime<Utc>,
) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("INSERT OR IGNORE INTO feedback_views (feedback_id, viewed_at) VALUES (?, ?)")
            .bind(feedback_id)
            .bind(viewed_at)
            .execute(db)
            .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_views<'e, E>(db: E, feedback_id: i64) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM feedback_views WHERE feedback_id = ?")
        .bind(feedback_id)
        .fetch_one(db)
        .await
}
