use crate::database::models::ProfileAttributes;
use sqlx::{Executor, Sqlite};

pub async fn insert<'e, E>(
    db: E,
    user_id: i64,
    phone: Option<&str>,
    avatar: Option<&str>,
) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO user_profiles (user_id, phone, avatar)
         VALUES (?, ?, COALESCE(?, 'default-user.png'))",
    )
    .bind(user_id)
    .bind(phone)
    .bind(avatar)
    .execute(db)
    .await?;

    Ok(())
}

/// Creates the profile row if the user has none yet.
pub async fn ensure<'e, E>(db: E, user_id: i64) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT OR IGNORE INTO user_profiles (user_id) VALUES (?)")
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn set_avatar<'e, E>(db: E, user_id: i64, avatar: &str) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE user_profiles SET avatar = ? WHERE user_id = ?")
        .bind(avatar)
        .bind(user_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_by_user<'e, E>(db: E, user_id: i64) -> sqlx::Result<Option<ProfileAttributes>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ProfileAttributes>(
        "SELECT id, user_id, phone, birth_date, address, avatar
         FROM user_profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn update<'e, E>(db: E, profile: &ProfileAttributes) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE user_profiles SET phone = ?, birth_date = ?, address = ?, avatar = ?
         WHERE user_id = ?",
    )
    .bind(&profile.phone)
    .bind(profile.birth_date)
    .bind(&profile.address)
    .bind(&profile.avatar)
    .bind(profile.user_id)
    .execute(db)
    .await?;

    Ok(())
}
