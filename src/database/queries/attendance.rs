use crate::database::models::{AttendanceRecord, AttendanceReportRow};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

/// Opens a record unless the user already has one open. Returns the new
/// record, or `None` when an open record exists.
pub async fn insert_if_closed<'e, E>(
    db: E,
    user_id: i64,
    clock_in: DateTime<Utc>,
) -> sqlx::Result<Option<AttendanceRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AttendanceRecord>(
        "INSERT INTO attendance_records (user_id, clock_in)
         SELECT ?1, ?2
         WHERE NOT EXISTS (
             SELECT 1 FROM attendance_records WHERE user_id = ?1 AND clock_out IS NULL
         )
         RETURNING id, user_id, clock_in, clock_out",
    )
    .bind(user_id)
    .bind(clock_in)
    .fetch_optional(db)
    .await
}

/// Closes the user's latest open record and returns it, or `None` when no
/// record is open.
pub async fn close_open<'e, E>(
    db: E,
    user_id: i64,
    clock_out: DateTime<Utc>,
) -> sqlx::Result<Option<AttendanceRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AttendanceRecord>(
        "UPDATE attendance_records SET clock_out = ?2
         WHERE id = (
             SELECT id FROM attendance_records
             WHERE user_id = ?1 AND clock_out IS NULL
             ORDER BY clock_in DESC, id DESC
             LIMIT 1
         )
         RETURNING id, user_id, clock_in, clock_out",
    )
    .bind(user_id)
    .bind(clock_out)
    .fetch_optional(db)
    .await
}

pub async fn latest<'e, E>(db: E, user_id: i64) -> sqlx::Result<Option<AttendanceRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AttendanceRecord>(
        "SELECT id, user_id, clock_in, clock_out
         FROM attendance_records
         WHERE user_id = ?
         ORDER BY clock_in DESC, id DESC
         LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// All records of one user, newest first.
pub async fn list_for_user<'e, E>(db: E, user_id: i64) -> sqlx::Result<Vec<AttendanceRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AttendanceRecord>(
        "SELECT id, user_id, clock_in, clock_out
         FROM attendance_records
         WHERE user_id = ?
         ORDER BY clock_in DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Half-open `[from, until)` range on the clock-in instant.
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub user_id: Option<i64>,
}

/// Records of employee accounts matching `filter`, oldest first.
pub async fn report<'e, E>(db: E, filter: &ReportFilter) -> sqlx::Result<Vec<AttendanceReportRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AttendanceReportRow>(
        "SELECT a.id, a.user_id, u.name AS user_name, a.clock_in, a.clock_out
         FROM attendance_records a
         JOIN users u ON u.id = a.user_id
         WHERE u.role = 'employee'
           AND (?1 IS NULL OR a.clock_in >= ?1)
           AND (?2 IS NULL OR a.clock_in < ?2)
           AND (?3 IS NULL OR a.user_id = ?3)
         ORDER BY a.clock_in ASC, a.id ASC",
    )
    .bind(filter.from)
    .bind(filter.until)
    .bind(filter.user_id)
    .fetch_all(db)
    .await
}

pub async fn count_for_user<'e, E>(db: E, user_id: i64) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM attendance_records WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(db)
        .await
}
