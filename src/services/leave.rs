use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::models::{LeaveStatus, LeaveSubmission, User};
use crate::database::queries::{leave, users};
use crate::error::{AppError, AppResult};
use crate::services::access;
use crate::storage::{FileStorage, UploadedFile};
use crate::utils::{time, validation};

pub async fn submit(
    pool: &SqlitePool,
    storage: &dyn FileStorage,
    author: &User,
    reason: Option<&str>,
    file: Option<UploadedFile>,
) -> AppResult<i64> {
    let file = file.ok_or_else(|| AppError::bad_request("Nenhum arquivo enviado"))?;
    let reason = reason.map(str::trim).unwrap_or_default();
    if file.filename.trim().is_empty() || reason.is_empty() {
        return Err(AppError::bad_request("Arquivo ou motivo não selecionado"));
    }

    let safe_name = validation::sanitize_filename(&file.filename);
    validation::validate_leave_file(&safe_name)?;

    let now = time::now();
    let key = format!("atestado_{}_{}_{}", author.id, time::file_stamp(now), safe_name);
    storage.save(&key, &file.data).await?;

    match leave::insert(pool, author.id, reason, &key, now).await {
        Ok(id) => {
            info!("User {} submitted leave {} ({})", author.id, id, key);
            Ok(id)
        }
        Err(e) => {
            if let Err(cleanup) = storage.delete(&key).await {
                warn!("Failed to remove orphaned upload {}: {}", key, cleanup);
            }
            Err(e.into())
        }
    }
}

/// Every employee submission, newest first. Managers only.
pub async fn list_all(pool: &SqlitePool, actor: &User) -> AppResult<Vec<LeaveSubmission>> {
    access::require_manager(actor)?;
    Ok(leave::list_from_employees(pool).await?)
}

pub async fn list_own(pool: &SqlitePool, actor: &User) -> AppResult<Vec<LeaveSubmission>> {
    Ok(leave::list_for_user(pool, actor.id).await?)
}

async fn find_targetable(pool: &SqlitePool, actor: &User, leave_id: i64) -> AppResult<LeaveSubmission> {
    access::require_manager(actor)?;

    let submission = leave::find_by_id(pool, leave_id)
        .await?
        .ok_or_else(|| AppError::not_found("Atestado não encontrado"))?;

    let author = users::find_by_id(pool, submission.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Atestado não encontrado"))?;
    access::ensure_can_access(actor, &author)?;

    Ok(submission)
}

/// Approves or rejects a pending submission. Only the two terminal values
/// are accepted; a decided submission stays decided.
pub async fn set_status(
    pool: &SqlitePool,
    actor: &User,
    leave_id: i64,
    status: &str,
) -> AppResult<LeaveStatus> {
    let submission = find_targetable(pool, actor, leave_id).await?;

    let status = LeaveStatus::parse(status)
        .filter(LeaveStatus::is_terminal)
        .ok_or_else(|| AppError::bad_request("Status inválido"))?;

    if !leave::resolve_pending(pool, submission.id, status).await? {
        return Err(AppError::InvalidTransition(format!(
            "Atestado já foi {}",
            submission.status.label()
        )));
    }

    info!(
        "Manager {} set leave {} to {}",
        actor.id,
        submission.id,
        status.as_str()
    );
    Ok(status)
}

pub async fn mark_viewed(pool: &SqlitePool, actor: &User, leave_id: i64) -> AppResult<()> {
    let submission = find_targetable(pool, actor, leave_id).await?;

    if leave::mark_viewed(pool, submission.id, time::now()).await? {
        info!("Manager {} marked leave {} as viewed", actor.id, submission.id);
    }
    Ok(())
}
