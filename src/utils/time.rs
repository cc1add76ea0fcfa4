use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{AppError, AppResult};

/// Civil timezone every timestamp is recorded and rendered in.
pub const CIVIL_TZ: Tz = chrono_tz::America::Sao_Paulo;

/// Current instant truncated to whole seconds.
pub fn now() -> DateTime<Utc> {
    truncate_to_seconds(Utc::now())
}

pub fn truncate_to_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_nanosecond(0).unwrap_or(at)
}

pub fn to_civil(at: DateTime<Utc>) -> DateTime<Tz> {
    at.with_timezone(&CIVIL_TZ)
}

/// ISO-8601 rendering in the civil timezone, e.g. `2024-05-02T09:00:00-03:00`.
pub fn format_iso(at: DateTime<Utc>) -> String {
    to_civil(at).to_rfc3339()
}

pub fn format_iso_opt(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(format_iso)
}

/// Compact stamp used inside generated file names.
pub fn file_stamp(at: DateTime<Utc>) -> String {
    to_civil(at).format("%Y%m%d%H%M%S").to_string()
}

/// Builds a UTC instant from a civil wall-clock time. Ambiguous local times
/// resolve to the earlier instant.
pub fn civil_datetime(
    date: NaiveDate,
    hour: u32,
    min: u32,
    sec: u32,
) -> AppResult<DateTime<Utc>> {
    let naive = date
        .and_hms_opt(hour, min, sec)
        .ok_or_else(|| AppError::bad_request("Horário inválido"))?;
    CIVIL_TZ
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::bad_request("Horário inexistente no fuso horário local"))
}

/// Half-open UTC range `[start, end)` covering a civil calendar month.
pub fn month_range(year: i32, month: u32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::bad_request("Mês ou ano inválido"))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::bad_request("Mês ou ano inválido"))?;

    Ok((civil_datetime(first, 0, 0, 0)?, civil_datetime(next, 0, 0, 0)?))
}

/// Half-open UTC range covering a civil calendar year.
pub fn year_range(year: i32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let (start, _) = month_range(year, 1)?;
    let (_, end) = month_range(year, 12)?;
    Ok((start, end))
}
