use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::extract::{ApiJson, ApiPath};
use crate::auth::CurrentUser;
use crate::database::models::{PayrollFields, PayrollRecord};
use crate::error::AppResult;
use crate::services::payroll;
use crate::utils::time;

#[derive(Debug, Serialize)]
pub struct PayrollView {
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub salario_base: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub abonos: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub descontos: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub horas_extras: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub ferias: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_liquido: Decimal,
    pub historico_pagamentos: Vec<serde_json::Value>,
    pub atualizado_em: String,
}

impl From<PayrollRecord> for PayrollView {
    fn from(record: PayrollRecord) -> Self {
        Self {
            user_id: record.user_id,
            total_liquido: record.net_total(),
            salario_base: record.base_salary,
            abonos: record.allowances,
            descontos: record.deductions,
            horas_extras: record.overtime,
            ferias: record.vacation_pay,
            historico_pagamentos: record.payment_history,
            atualizado_em: time::format_iso(record.updated_at),
        }
    }
}

/// Missing amounts are zero; a missing history is empty.
#[derive(Debug, Deserialize)]
pub struct PayrollRequest {
    #[serde(default, with = "rust_decimal::serde::float")]
    pub salario_base: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub abonos: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub descontos: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub horas_extras: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub ferias: Decimal,
    #[serde(default)]
    pub historico_pagamentos: Vec<serde_json::Value>,
}

impl From<PayrollRequest> for PayrollFields {
    fn from(body: PayrollRequest) -> Self {
        Self {
            base_salary: body.salario_base,
            allowances: body.abonos,
            deductions: body.descontos,
            overtime: body.horas_extras,
            vacation_pay: body.ferias,
            payment_history: body.historico_pagamentos,
        }
    }
}

pub async fn own(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<PayrollView>> {
    let record = payroll::own(&state.pool, &user).await?;
    Ok(Json(record.into()))
}

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(user_id): ApiPath<i64>,
) -> AppResult<Json<PayrollView>> {
    let record = payroll::get(&state.pool, &user, user_id).await?;
    Ok(Json(record.into()))
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub message: &'static str,
    pub contabilidade: PayrollView,
}

pub async fn upsert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(body): ApiJson<PayrollRequest>,
) -> AppResult<Json<SavedResponse>> {
    let record = payroll::upsert(&state.pool, &user, user_id, &body.into()).await?;

    Ok(Json(SavedResponse {
        message: "Dados contábeis salvos com sucesso!",
        contabilidade: record.into(),
    }))
}
