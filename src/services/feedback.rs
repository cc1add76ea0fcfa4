use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::{Feedback, User};
use crate::database::queries::{feedback, users};
use crate::error::{AppError, AppResult};
use crate::services::access;
use crate::utils::{time, validation};

pub async fn submit(pool: &SqlitePool, author: &User, message: Option<&str>) -> AppResult<i64> {
    let message = match message {
        None => return Err(AppError::bad_request("Dados insuficientes fornecidos.")),
        Some(m) => validation::require_text(Some(m), "A mensagem não pode estar vazia.")?,
    };

    let id = feedback::insert(pool, author.id, &message, time::now()).await?;
    info!("User {} submitted feedback {}", author.id, id);
    Ok(id)
}

/// Feedback from every employee, newest first. Managers only.
pub async fn list_all(pool: &SqlitePool, actor: &User) -> AppResult<Vec<Feedback>> {
    access::require_manager(actor)?;
    Ok(feedback::list_from_employees(pool).await?)
}

pub async fn list_own(pool: &SqlitePool, actor: &User) -> AppResult<Vec<Feedback>> {
    Ok(feedback::list_for_user(pool, actor.id).await?)
}

/// Flags a feedback entry as read. Repeating the call changes nothing.
pub async fn mark_viewed(pool: &SqlitePool, actor: &User, feedback_id: i64) -> AppResult<()> {
    access::require_manager(actor)?;

    let entry = feedback::find_by_id(pool, feedback_id)
        .await?
        .ok_or_else(|| AppError::not_found("Feedback não encontrado"))?;

    let author = users::find_by_id(pool, entry.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Feedback não encontrado"))?;
    access::ensure_can_access(actor, &author)?;

    if feedback::mark_viewed(pool, entry.id, time::now()).await? {
        info!("Manager {} marked feedback {} as viewed", actor.id, entry.id);
    }
    Ok(())
}
