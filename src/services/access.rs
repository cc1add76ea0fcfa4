use sqlx::SqlitePool;

use crate::database::models::User;
use crate::database::queries::users;
use crate::error::{AppError, AppResult};

pub fn require_manager(actor: &User) -> AppResult<()> {
    if actor.is_manager() {
        Ok(())
    } else {
        Err(AppError::forbidden())
    }
}

pub fn ensure_can_access(actor: &User, target: &User) -> AppResult<()> {
    let allowed = if actor.is_manager() {
        !target.is_manager()
    } else {
        actor.id == target.id
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden())
    }
}

/// Loads the user `target_id` on behalf of `actor`.
///
/// An employee asking for anyone else is refused before the lookup, so the
/// response does not reveal whether the id exists.
pub async fn resolve_target(pool: &SqlitePool, actor: &User, target_id: i64) -> AppResult<User> {
    if !actor.is_manager() && actor.id != target_id {
        return Err(AppError::forbidden());
    }

    let target = users::find_by_id(pool, target_id)
        .await?
        .ok_or_else(|| AppError::not_found("Funcionário não encontrado"))?;

    ensure_can_access(actor, &target)?;
    Ok(target)
}
