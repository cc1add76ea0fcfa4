use crate::database::models::{EmployeeDetails, Role, User};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, job_title, created_at";

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub job_title: Option<&'a str>,
}

pub async fn insert<'e, E>(db: E, user: &NewUser<'_>, created_at: DateTime<Utc>) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, role, job_title, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.role.as_str())
    .bind(user.job_title)
    .bind(created_at)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_by_id<'e, E>(db: E, user_id: i64) -> sqlx::Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(user_id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_email<'e, E>(db: E, email: &str) -> sqlx::Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(db)
        .await
}

/// Whether `email` belongs to some account other than `except_user_id`.
pub async fn email_in_use<'e, E>(db: E, email: &str, except_user_id: Option<i64>) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND (? IS NULL OR id != ?))",
    )
    .bind(email)
    .bind(except_user_id)
    .bind(except_user_id)
    .fetch_one(db)
    .await?;

    Ok(taken)
}

/// Writes back the mutable columns of `user`.
pub async fn update<'e, E>(db: E, user: &User) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE users SET name = ?, email = ?, password_hash = ?, job_title = ? WHERE id = ?",
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.job_title)
    .bind(user.id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn update_password<'e, E>(db: E, user_id: i64, password_hash: &str) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(())
}

/// Deletes the user; owned rows go with it through ON DELETE CASCADE.
pub async fn delete<'e, E>(db: E, user_id: i64) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_by_role<'e, E>(db: E, role: Role) -> sqlx::Result<Vec<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role = ? ORDER BY name ASC, id ASC"
    ))
    .bind(role.as_str())
    .fetch_all(db)
    .await
}

pub async fn list_employee_details<'e, E>(db: E) -> sqlx::Result<Vec<EmployeeDetails>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, EmployeeDetails>(
        "SELECT u.id, u.name, u.email, u.job_title, p.phone, p.avatar
         FROM users u
         LEFT JOIN user_profiles p ON p.user_id = u.id
         WHERE u.role = 'employee'
         ORDER BY u.name ASC, u.id ASC",
    )
    .fetch_all(db)
    .await
}
