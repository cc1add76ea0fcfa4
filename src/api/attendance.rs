use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::extract::{ApiPath, ApiQuery, parse_optional};
use crate::auth::CurrentUser;
use crate::database::models::{AttendanceRecord, AttendanceReportRow, AttendanceState};
use crate::error::AppResult;
use crate::services::attendance::{self, ReportQuery};
use crate::utils::time;

#[derive(Debug, Serialize)]
pub struct ClockInResponse {
    pub message: &'static str,
    pub entrada: String,
}

#[derive(Debug, Serialize)]
pub struct ClockOutResponse {
    pub message: &'static str,
    pub saida: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordView {
    pub id: i64,
    pub entrada: String,
    pub saida: Option<String>,
}

impl From<AttendanceRecord> for RecordView {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: record.id,
            entrada: time::format_iso(record.clock_in),
            saida: time::format_iso_opt(record.clock_out),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportRowView {
    pub id: i64,
    pub funcionario_id: i64,
    pub funcionario: String,
    pub entrada: String,
    pub saida: Option<String>,
}

impl From<AttendanceReportRow> for ReportRowView {
    fn from(row: AttendanceReportRow) -> Self {
        Self {
            id: row.id,
            funcionario_id: row.user_id,
            funcionario: row.user_name,
            entrada: time::format_iso(row.clock_in),
            saida: time::format_iso_opt(row.clock_out),
        }
    }
}

pub async fn clock_in(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ClockInResponse>> {
    let record = attendance::clock_in(&state.pool, &user, time::now()).await?;

    Ok(Json(ClockInResponse {
        message: "Entrada registrada com sucesso!",
        entrada: time::format_iso(record.clock_in),
    }))
}

pub async fn clock_out(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ClockOutResponse>> {
    let record = attendance::clock_out(&state.pool, &user, time::now()).await?;

    Ok(Json(ClockOutResponse {
        message: "Saída registrada com sucesso!",
        saida: time::format_iso_opt(record.clock_out),
    }))
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub estado: AttendanceState,
    pub aberto: bool,
}

pub async fn current_state(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<StateResponse>> {
    let current = attendance::state(&state.pool, &user).await?;
    Ok(Json(StateResponse {
        estado: current,
        aberto: current == AttendanceState::Open,
    }))
}

pub async fn own_records(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<RecordView>>> {
    let records = attendance::own_records(&state.pool, &user).await?;
    Ok(Json(records.into_iter().map(RecordView::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct EmployeeRecordsResponse {
    pub funcionario_nome: String,
    pub pontos: Vec<RecordView>,
}

pub async fn employee_records(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(user_id): ApiPath<i64>,
) -> AppResult<Json<EmployeeRecordsResponse>> {
    let (employee, records) = attendance::records_of(&state.pool, &user, user_id).await?;

    Ok(Json(EmployeeRecordsResponse {
        funcionario_nome: employee.name,
        pontos: records.into_iter().map(RecordView::from).collect(),
    }))
}

/// Every employee record, newest first.
pub async fn full_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<ReportRowView>>> {
    let query = if user.is_manager() {
        ReportQuery::default()
    } else {
        ReportQuery {
            employee_id: Some(user.id),
            ..Default::default()
        }
    };
    let rows = attendance::report(&state.pool, &user, query).await?;

    Ok(Json(rows.into_iter().rev().map(ReportRowView::from).collect()))
}

/// Raw query values. Blank values count as absent.
#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    pub month: Option<String>,
    pub year: Option<String>,
    pub employee_id: Option<String>,
}

pub async fn calendar_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(params): ApiQuery<CalendarParams>,
) -> AppResult<Json<Vec<ReportRowView>>> {
    let query = ReportQuery {
        month: parse_optional(params.month.as_deref(), "month")?,
        year: parse_optional(params.year.as_deref(), "year")?,
        employee_id: parse_optional(params.employee_id.as_deref(), "employee_id")?,
    };
    let rows = attendance::report(&state.pool, &user, query).await?;

    Ok(Json(rows.into_iter().map(ReportRowView::from).collect()))
}
