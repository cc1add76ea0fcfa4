use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::{Announcement, User};
use crate::database::queries::announcements;
use crate::error::{AppError, AppResult};
use crate::services::access;
use crate::utils::{time, validation};

pub const DEFAULT_AUDIENCE: &str = "todos";

pub async fn list(pool: &SqlitePool) -> AppResult<Vec<Announcement>> {
    Ok(announcements::list(pool).await?)
}

pub async fn create(
    pool: &SqlitePool,
    actor: &User,
    title: Option<&str>,
    body: Option<&str>,
    audience: Option<&str>,
) -> AppResult<i64> {
    access::require_manager(actor)?;

    const REQUIRED: &str = "Título e mensagem são obrigatórios.";
    let title = validation::require_text(title, REQUIRED)?;
    let body = validation::require_text(body, REQUIRED)?;
    let audience = audience
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_AUDIENCE);

    let id = announcements::insert(pool, &title, &body, audience, time::now()).await?;
    info!("Manager {} published announcement {} for '{}'", actor.id, id, audience);
    Ok(id)
}

pub async fn delete(pool: &SqlitePool, actor: &User, announcement_id: i64) -> AppResult<()> {
    access::require_manager(actor)?;

    if !announcements::delete(pool, announcement_id).await? {
        return Err(AppError::not_found("Aviso não encontrado"));
    }

    info!("Manager {} deleted announcement {}", actor.id, announcement_id);
    Ok(())
}
