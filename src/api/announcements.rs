use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::{AppState, MessageResponse};
use crate::auth::CurrentUser;
use crate::database::models::Announcement;
use crate::error::AppResult;
use crate::services::announcements;
use crate::utils::time;

#[derive(Debug, Serialize)]
pub struct AnnouncementView {
    pub id: i64,
    pub titulo: String,
    pub mensagem: String,
    pub destinatarios: String,
    pub data_envio: String,
}

impl From<Announcement> for AnnouncementView {
    fn from(a: Announcement) -> Self {
        Self {
            id: a.id,
            titulo: a.title,
            mensagem: a.body,
            destinatarios: a.audience,
            data_envio: time::format_iso(a.created_at),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> AppResult<Json<Vec<AnnouncementView>>> {
    let items = announcements::list(&state.pool).await?;
    Ok(Json(items.into_iter().map(AnnouncementView::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub titulo: Option<String>,
    pub mensagem: Option<String>,
    pub destinatarios: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<CreateAnnouncementRequest>,
) -> AppResult<Json<CreatedResponse>> {
    let id = announcements::create(
        &state.pool,
        &user,
        body.titulo.as_deref(),
        body.mensagem.as_deref(),
        body.destinatarios.as_deref(),
    )
    .await?;

    Ok(Json(CreatedResponse {
        message: "Aviso publicado com sucesso!",
        id,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    announcements::delete(&state.pool, &user, id).await?;
    Ok(Json(MessageResponse::new("Aviso excluído com sucesso!")))
}
