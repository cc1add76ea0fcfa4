use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::models::{DEFAULT_AVATAR, ProfileAttributes, User};
use crate::database::queries::{profiles, users};
use crate::error::{AppError, AppResult};
use crate::storage::{FileStorage, UploadedFile};
use crate::utils::{time, validation};

/// Fields of a profile edit. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// `YYYY-MM-DD`; an empty string clears the date.
    pub birth_date: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.birth_date.is_none()
            && self.address.is_none()
    }
}

pub async fn get(pool: &SqlitePool, user: &User) -> AppResult<Option<ProfileAttributes>> {
    Ok(profiles::find_by_user(pool, user.id).await?)
}

pub async fn update(pool: &SqlitePool, user: &User, changes: &ProfileUpdate) -> AppResult<()> {
    if changes.is_empty() {
        return Err(AppError::bad_request("Nenhum dado fornecido"));
    }

    let birth_date = match changes.birth_date.as_deref() {
        Some(raw) => Some(validation::parse_birth_date(raw)?),
        None => None,
    };

    let mut account = user.clone();
    if let Some(name) = &changes.name {
        account.name = validation::require_text(Some(name), "Nome não pode estar vazio.")?;
    }
    if let Some(email) = &changes.email {
        let email = email.trim();
        validation::validate_email(email)?;
        if users::email_in_use(pool, email, Some(user.id)).await? {
            return Err(AppError::Conflict("Email já está em uso".to_string()));
        }
        account.email = email.to_string();
    }

    let mut tx = pool.begin().await?;

    users::update(&mut *tx, &account).await?;

    profiles::ensure(&mut *tx, user.id).await?;
    let mut profile = profiles::find_by_user(&mut *tx, user.id)
        .await?
        .ok_or_else(|| AppError::internal("profile missing after ensure"))?;
    if let Some(phone) = &changes.phone {
        profile.phone = Some(phone.trim().to_string());
    }
    if let Some(date) = birth_date {
        profile.birth_date = date;
    }
    if let Some(address) = &changes.address {
        profile.address = Some(address.trim().to_string());
    }
    profiles::update(&mut *tx, &profile).await?;

    tx.commit().await?;
    info!("User {} updated profile", user.id);
    Ok(())
}

/// Checks the upload is an image and returns the extension it will be
/// stored under. The extension always comes from [`validation::PHOTO_EXTENSIONS`],
/// taken from the file name when it names one, else from the declared type.
pub(crate) fn check_photo(file: &UploadedFile) -> AppResult<&'static str> {
    const NOT_IMAGE: &str = "O arquivo deve ser uma imagem.";

    if file.filename.trim().is_empty() {
        return Err(AppError::bad_request("Nenhum arquivo selecionado"));
    }

    let declared = file.content_type.as_deref().map(str::trim);
    if declared.is_some_and(|ct| !ct.starts_with("image/")) {
        return Err(AppError::bad_request(NOT_IMAGE));
    }

    let from_name = validation::file_extension(&validation::sanitize_filename(&file.filename))
        .and_then(|ext| {
            validation::PHOTO_EXTENSIONS
                .iter()
                .copied()
                .find(|allowed| *allowed == ext)
        });
    let from_type = || {
        declared
            .and_then(mime_guess::get_mime_extensions_str)
            .and_then(|exts| {
                exts.iter()
                    .find_map(|ext| validation::PHOTO_EXTENSIONS.iter().copied().find(|a| a == ext))
            })
    };

    from_name
        .or_else(from_type)
        .ok_or_else(|| AppError::bad_request(NOT_IMAGE))
}

/// Saves a profile photo for `user_id` and returns its storage key.
pub(crate) async fn store_photo(
    storage: &dyn FileStorage,
    user_id: i64,
    ext: &str,
    data: &[u8],
) -> AppResult<String> {
    let key = format!("perfil/perfil_{}_{}.{}", user_id, time::file_stamp(time::now()), ext);

    storage.save(&key, data).await?;
    Ok(key)
}

/// Best-effort removal of a replaced or orphaned photo.
pub(crate) async fn discard_photo(storage: &dyn FileStorage, key: Option<&str>) {
    let Some(key) = key.filter(|k| *k != DEFAULT_AVATAR) else {
        return;
    };
    if let Err(e) = storage.delete(key).await {
        warn!("Failed to remove photo {}: {}", key, e);
    }
}

/// Replaces the caller's photo and returns the new storage key.
pub async fn upload_photo(
    pool: &SqlitePool,
    storage: &dyn FileStorage,
    user: &User,
    file: Option<UploadedFile>,
) -> AppResult<String> {
    let file = file.ok_or_else(|| AppError::bad_request("Nenhum arquivo de foto enviado"))?;
    let ext = check_photo(&file)?;

    let key = store_photo(storage, user.id, ext, &file.data).await?;

    profiles::ensure(pool, user.id).await?;
    let mut profile = profiles::find_by_user(pool, user.id)
        .await?
        .ok_or_else(|| AppError::internal("profile missing after ensure"))?;
    let previous = profile.avatar.replace(key.clone());
    profiles::update(pool, &profile).await?;

    if previous.as_deref() != Some(key.as_str()) {
        discard_photo(storage, previous.as_deref()).await;
    }

    info!("User {} uploaded profile photo {}", user.id, key);
    Ok(key)
}
