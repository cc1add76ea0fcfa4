use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::{PayrollFields, PayrollRecord, User};
use crate::database::queries::payroll;
use crate::error::{AppError, AppResult};
use crate::services::access;
use crate::utils::time;

fn missing() -> AppError {
    AppError::not_found("Registro contábil não encontrado")
}

/// Payroll of `user_id`, for the employee themself or a manager.
pub async fn get(pool: &SqlitePool, actor: &User, user_id: i64) -> AppResult<PayrollRecord> {
    let target = access::resolve_target(pool, actor, user_id).await?;
    payroll::find_by_user(pool, target.id).await?.ok_or_else(missing)
}

pub async fn own(pool: &SqlitePool, actor: &User) -> AppResult<PayrollRecord> {
    payroll::find_by_user(pool, actor.id).await?.ok_or_else(missing)
}

/// Creates or replaces the payroll of an employee. Managers only.
pub async fn upsert(
    pool: &SqlitePool,
    actor: &User,
    user_id: i64,
    fields: &PayrollFields,
) -> AppResult<PayrollRecord> {
    access::require_manager(actor)?;
    let target = access::resolve_target(pool, actor, user_id).await?;

    let amounts = [
        fields.base_salary,
        fields.allowances,
        fields.deductions,
        fields.overtime,
        fields.vacation_pay,
    ];
    if amounts.iter().any(|v| *v < Decimal::ZERO) {
        return Err(AppError::bad_request("Valores não podem ser negativos."));
    }

    payroll::upsert(pool, target.id, fields, time::now()).await?;
    info!("Manager {} updated payroll of user {}", actor.id, target.id);

    payroll::find_by_user(pool, target.id)
        .await?
        .ok_or_else(|| AppError::internal("payroll vanished after upsert"))
}
