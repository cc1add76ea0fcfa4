use crate::database::models::Announcement;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

pub async fn insert<'e, E>(
    db: E,
    title: &str,
    body: &str,
    audience: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO announcements (title, body, audience, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(title)
    .bind(body)
    .bind(audience)
    .bind(created_at)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Newest first.
pub async fn list<'e, E>(db: E) -> sqlx::Result<Vec<Announcement>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Announcement>(
        "SELECT id, title, body, audience, created_at
         FROM announcements
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(db)
    .await
}

pub async fn delete<'e, E>(db: E, announcement_id: i64) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
        .bind(announcement_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
