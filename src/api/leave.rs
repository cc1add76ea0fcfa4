use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::api::extract::{ApiMultipart, ApiPath, MultipartForm};
use crate::api::{AppState, MessageResponse};
use crate::auth::CurrentUser;
use crate::database::models::LeaveSubmission;
use crate::error::AppResult;
use crate::services::leave;
use crate::storage::FileStorage;
use crate::utils::time;

#[derive(Debug, Serialize)]
pub struct LeaveView {
    pub id: i64,
    pub funcionario_id: i64,
    pub funcionario: String,
    pub motivo: String,
    pub arquivo: String,
    pub arquivo_url: String,
    pub criado_em: String,
    pub status: &'static str,
    pub visualizado: bool,
}

impl LeaveView {
    fn new(submission: LeaveSubmission, storage: &dyn FileStorage) -> Self {
        Self {
            id: submission.id,
            funcionario_id: submission.user_id,
            funcionario: submission.author,
            motivo: submission.reason,
            arquivo_url: storage.url_for(&submission.file_key),
            arquivo: submission.file_key,
            criado_em: time::format_iso(submission.created_at),
            status: submission.status.label(),
            visualizado: submission.viewed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmittedResponse {
    pub message: &'static str,
    pub id: i64,
}

pub async fn submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<SubmittedResponse>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = form.take_file("file");

    let id = leave::submit(
        &state.pool,
        state.storage.as_ref(),
        &user,
        form.text("motivo"),
        file,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmittedResponse {
            message: "Atestado enviado com sucesso!",
            id,
        }),
    ))
}

pub async fn list_all(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<LeaveView>>> {
    let items = leave::list_all(&state.pool, &user).await?;
    let storage = state.storage.as_ref();
    Ok(Json(items.into_iter().map(|s| LeaveView::new(s, storage)).collect()))
}

pub async fn list_own(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<LeaveView>>> {
    let items = leave::list_own(&state.pool, &user).await?;
    let storage = state.storage.as_ref();
    Ok(Json(items.into_iter().map(|s| LeaveView::new(s, storage)).collect()))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub status: &'static str,
}

pub async fn set_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath((id, status)): ApiPath<(i64, String)>,
) -> AppResult<Json<StatusResponse>> {
    let status = leave::set_status(&state.pool, &user, id, &status).await?;

    Ok(Json(StatusResponse {
        message: format!("Atestado {} com sucesso!", status.label()),
        status: status.label(),
    }))
}

pub async fn mark_viewed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    leave::mark_viewed(&state.pool, &user, id).await?;
    Ok(Json(MessageResponse::new("Atestado marcado como visualizado.")))
}
