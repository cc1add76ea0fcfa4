use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::{AttendanceRecord, AttendanceReportRow, AttendanceState, User};
use crate::database::queries::attendance::{self, ReportFilter};
use crate::error::{AppError, AppResult};
use crate::services::access;
use crate::utils::time;

pub async fn clock_in(pool: &SqlitePool, user: &User, at: DateTime<Utc>) -> AppResult<AttendanceRecord> {
    let at = time::truncate_to_seconds(at);

    let record = opened(attendance::insert_if_closed(pool, user.id, at).await)?;
    info!("User {} clocked in at {}", user.id, time::format_iso(at));
    Ok(record)
}

fn opened(result: sqlx::Result<Option<AttendanceRecord>>) -> AppResult<AttendanceRecord> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(already_open()),
        // The partial unique index catches what the conditional insert cannot.
        Err(e) if crate::database::queries::is_unique_violation(&e) => Err(already_open()),
        Err(e) => Err(e.into()),
    }
}

fn already_open() -> AppError {
    AppError::InvalidTransition("Já existe um ponto de entrada registrado sem saída.".to_string())
}

pub async fn clock_out(pool: &SqlitePool, user: &User, at: DateTime<Utc>) -> AppResult<AttendanceRecord> {
    let at = time::truncate_to_seconds(at);

    let record = attendance::close_open(pool, user.id, at).await?.ok_or_else(|| {
        AppError::InvalidTransition(
            "Não há um ponto de entrada aberto para registrar a saída.".to_string(),
        )
    })?;

    info!("User {} clocked out at {}", user.id, time::format_iso(at));
    Ok(record)
}

pub async fn state(pool: &SqlitePool, user: &User) -> AppResult<AttendanceState> {
    let latest = attendance::latest(pool, user.id).await?;
    Ok(AttendanceState::from_latest(latest.as_ref()))
}

/// The caller's own records, newest first.
pub async fn own_records(pool: &SqlitePool, user: &User) -> AppResult<Vec<AttendanceRecord>> {
    Ok(attendance::list_for_user(pool, user.id).await?)
}

/// Records of `employee_id` as seen by `actor`, with the employee.
pub async fn records_of(
    pool: &SqlitePool,
    actor: &User,
    employee_id: i64,
) -> AppResult<(User, Vec<AttendanceRecord>)> {
    let employee = access::resolve_target(pool, actor, employee_id).await?;
    let records = attendance::list_for_user(pool, employee.id).await?;
    Ok((employee, records))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub employee_id: Option<i64>,
}

/// Employee records, oldest first, narrowed by civil month or year and by
/// employee. Employees must name themselves.
pub async fn report(
    pool: &SqlitePool,
    actor: &User,
    query: ReportQuery,
) -> AppResult<Vec<AttendanceReportRow>> {
    let user_id = if actor.is_manager() {
        match query.employee_id {
            Some(id) => Some(access::resolve_target(pool, actor, id).await?.id),
            None => None,
        }
    } else {
        match query.employee_id {
            Some(id) if id == actor.id => Some(id),
            _ => return Err(AppError::forbidden()),
        }
    };

    let (from, until) = match (query.month, query.year) {
        (Some(month), Some(year)) => {
            let (start, end) = time::month_range(year, month)?;
            (Some(start), Some(end))
        }
        (None, Some(year)) => {
            let (start, end) = time::year_range(year)?;
            (Some(start), Some(end))
        }
        (Some(_), None) => {
            return Err(AppError::bad_request("Informe o ano junto com o mês."));
        }
        (None, None) => (None, None),
    };

    let filter = ReportFilter {
        from,
        until,
        user_id,
    };
    Ok(attendance::report(pool, &filter).await?)
}
