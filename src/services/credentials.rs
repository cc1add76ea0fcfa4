use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::auth::TokenService;
use crate::auth::password::{hash_password, verify_password};
use crate::config::{Config, DefaultManager};
use crate::database::models::{Role, User};
use crate::database::queries::{self, profiles, users};
use crate::error::{AppError, AppResult};
use crate::utils::{time, validation};

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub pin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
    pub name: String,
}

const INSUFFICIENT_DATA: &str = "Dados insuficientes fornecidos.";
const BAD_CREDENTIALS: &str = "Credenciais inválidas!";

/// Self-service sign up. Manager accounts need the configured PIN.
pub async fn register(pool: &SqlitePool, config: &Config, form: &Registration) -> AppResult<User> {
    let name = validation::require_text(form.name.as_deref(), INSUFFICIENT_DATA)?;
    let email = validation::require_text(form.email.as_deref(), INSUFFICIENT_DATA)?;
    let password = form
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::bad_request(INSUFFICIENT_DATA))?;
    let role_raw = validation::require_text(form.role.as_deref(), INSUFFICIENT_DATA)?;
    validation::validate_email(&email)?;

    if users::email_in_use(pool, &email, None).await? {
        return Err(AppError::Conflict("Email já registrado!".to_string()));
    }

    let role = Role::parse(&role_raw).ok_or_else(|| {
        AppError::InvalidRole("Tipo de usuário inválido para registro.".to_string())
    })?;

    if role == Role::Manager && form.pin.as_deref() != Some(config.manager_pin.as_str()) {
        warn!("Manager registration for {} refused: bad PIN", email);
        return Err(AppError::Forbidden("PIN de gerente inválido!".to_string()));
    }

    let password_hash = hash_password(password)?;
    let user = create_account(pool, &name, &email, &password_hash, role, None).await?;

    info!("Registered {} account {} ({})", role.as_str(), user.id, user.email);
    Ok(user)
}

/// Inserts the user and its empty profile in one transaction. A concurrent
/// sign up with the same email surfaces as `Conflict`.
pub(crate) async fn create_account(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    phone: Option<&str>,
) -> AppResult<User> {
    let mut tx = pool.begin().await?;
    let user = insert_account(&mut tx, name, email, password_hash, role, phone).await?;
    tx.commit().await?;
    Ok(user)
}

/// User plus profile row on a connection the caller owns, usually an open
/// transaction.
pub(crate) async fn insert_account(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    phone: Option<&str>,
) -> AppResult<User> {
    let new_user = users::NewUser {
        name,
        email,
        password_hash,
        role,
        job_title: None,
    };
    let user_id = match users::insert(&mut *conn, &new_user, time::now()).await {
        Ok(id) => id,
        Err(e) if queries::is_unique_violation(&e) => {
            return Err(AppError::Conflict("Email já registrado!".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    profiles::insert(&mut *conn, user_id, phone, None).await?;

    users::find_by_id(&mut *conn, user_id)
        .await?
        .ok_or_else(|| AppError::internal("user vanished after insert"))
}

pub async fn login(
    pool: &SqlitePool,
    tokens: &TokenService,
    email: Option<&str>,
    password: Option<&str>,
) -> AppResult<LoginOutcome> {
    let (email, password) = match (email.map(str::trim), password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(AppError::bad_request("Email e senha são obrigatórios!")),
    };

    let Some(user) = users::find_by_email(pool, email).await? else {
        warn!("Login failed for unknown email {}", email);
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.to_string()));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!("Login failed for user {}: wrong password", user.id);
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.to_string()));
    }

    let token = tokens.issue(user.id)?;
    info!("User {} logged in", user.id);

    Ok(LoginOutcome {
        token,
        role: user.role,
        name: user.name,
    })
}

pub async fn change_password(
    pool: &SqlitePool,
    user: &User,
    current: Option<&str>,
    new: Option<&str>,
) -> AppResult<()> {
    let (current, new) = match (current, new) {
        (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (c, n),
        _ => return Err(AppError::bad_request("Preencha todos os campos.")),
    };

    if !verify_password(current, &user.password_hash)? {
        warn!("Password change for user {} refused: wrong current password", user.id);
        return Err(AppError::Unauthenticated("Senha atual incorreta.".to_string()));
    }

    users::update_password(pool, user.id, &hash_password(new)?).await?;
    info!("User {} changed password", user.id);
    Ok(())
}

/// Creates the start-up manager account unless its email is already taken.
/// Returns whether an account was created.
pub async fn seed_default_manager(pool: &SqlitePool, seed: &DefaultManager) -> AppResult<bool> {
    if users::email_in_use(pool, &seed.email, None).await? {
        return Ok(false);
    }

    let password_hash = hash_password(&seed.password)?;
    let user = create_account(pool, &seed.name, &seed.email, &password_hash, Role::Manager, None)
        .await?;

    info!("Seeded default manager account {} ({})", user.id, user.email);
    Ok(true)
}
