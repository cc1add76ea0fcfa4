use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::database::models::{EmployeeDetails, Role, User};
use crate::database::queries::{leave, profiles, users};
use crate::error::{AppError, AppResult};
use crate::services::{access, credentials, profile};
use crate::storage::{FileStorage, UploadedFile};
use crate::utils::validation;

#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<UploadedFile>,
}

/// Fields a manager may change. `None` leaves the stored value alone; an
/// empty password is ignored.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub job_title: Option<String>,
}

pub async fn create(
    pool: &SqlitePool,
    storage: &dyn FileStorage,
    actor: &User,
    form: NewEmployee,
) -> AppResult<User> {
    access::require_manager(actor)?;

    const REQUIRED: &str = "Nome, email e senha são obrigatórios.";
    let name = validation::require_text(form.name.as_deref(), REQUIRED)?;
    let email = validation::require_text(form.email.as_deref(), REQUIRED)?;
    let password = form
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::bad_request(REQUIRED))?;
    validation::validate_email(&email)?;

    let photo = match form.photo {
        Some(photo) => Some((profile::check_photo(&photo)?, photo)),
        None => None,
    };

    if users::email_in_use(pool, &email, None).await? {
        return Err(AppError::Conflict("E-mail já cadastrado.".to_string()));
    }

    let phone = form
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let password_hash = hash_password(&password)?;

    let mut tx = pool.begin().await?;
    let employee = credentials::insert_account(
        &mut *tx,
        &name,
        &email,
        &password_hash,
        Role::Employee,
        phone,
    )
    .await?;

    // The account only commits once its photo is stored and linked.
    let avatar = match &photo {
        Some((ext, file)) => Some(profile::store_photo(storage, employee.id, ext, &file.data).await?),
        None => None,
    };
    if let Some(key) = &avatar {
        if let Err(e) = profiles::set_avatar(&mut *tx, employee.id, key).await {
            profile::discard_photo(storage, Some(key)).await;
            return Err(e.into());
        }
    }
    if let Err(e) = tx.commit().await {
        profile::discard_photo(storage, avatar.as_deref()).await;
        return Err(e.into());
    }

    info!("Manager {} created employee {} ({})", actor.id, employee.id, employee.email);
    Ok(employee)
}

pub async fn list(pool: &SqlitePool, actor: &User) -> AppResult<Vec<User>> {
    access::require_manager(actor)?;
    Ok(users::list_by_role(pool, Role::Employee).await?)
}

pub async fn list_details(pool: &SqlitePool, actor: &User) -> AppResult<Vec<EmployeeDetails>> {
    access::require_manager(actor)?;
    Ok(users::list_employee_details(pool).await?)
}

pub async fn update(
    pool: &SqlitePool,
    actor: &User,
    employee_id: i64,
    changes: &EmployeeUpdate,
) -> AppResult<User> {
    access::require_manager(actor)?;
    let mut employee = access::resolve_target(pool, actor, employee_id).await?;

    if let Some(name) = &changes.name {
        employee.name = validation::require_text(Some(name), "Nome não pode estar vazio.")?;
    }
    if let Some(email) = &changes.email {
        let email = email.trim();
        validation::validate_email(email)?;
        if users::email_in_use(pool, email, Some(employee.id)).await? {
            return Err(AppError::Conflict(
                "Email já registrado para outro usuário!".to_string(),
            ));
        }
        employee.email = email.to_string();
    }
    if let Some(password) = changes.password.as_deref().filter(|p| !p.is_empty()) {
        employee.password_hash = hash_password(password)?;
    }
    if let Some(job_title) = &changes.job_title {
        let trimmed = job_title.trim();
        employee.job_title = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    users::update(pool, &employee).await?;
    info!("Manager {} updated employee {}", actor.id, employee.id);
    Ok(employee)
}

/// Deletes an employee with everything they own. Stored files are removed
/// after the rows are gone; a failed file removal is only logged.
pub async fn delete(
    pool: &SqlitePool,
    storage: &dyn FileStorage,
    actor: &User,
    employee_id: i64,
) -> AppResult<()> {
    access::require_manager(actor)?;
    let employee = access::resolve_target(pool, actor, employee_id).await?;

    let mut tx = pool.begin().await?;
    let keys = leave::file_keys_for_user(&mut *tx, employee.id).await?;
    let avatar = profiles::find_by_user(&mut *tx, employee.id)
        .await?
        .and_then(|p| p.avatar);
    if !users::delete(&mut *tx, employee.id).await? {
        return Err(AppError::not_found("Funcionário não encontrado"));
    }
    tx.commit().await?;

    info!("Manager {} deleted employee {}", actor.id, employee.id);

    profile::discard_photo(storage, avatar.as_deref()).await;
    for key in &keys {
        if let Err(e) = storage.delete(key).await {
            warn!("Failed to remove file {} of deleted user {}: {}", key, employee.id, e);
        }
    }
    Ok(())
}
