use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::{AppState, MessageResponse};
use crate::auth::CurrentUser;
use crate::database::models::Feedback;
use crate::error::AppResult;
use crate::services::feedback;
use crate::utils::time;

#[derive(Debug, Serialize)]
pub struct FeedbackView {
    pub id: i64,
    pub autor_id: i64,
    pub autor: String,
    pub mensagem: String,
    pub criado_em: String,
    pub visualizado: bool,
}

impl From<Feedback> for FeedbackView {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id,
            autor_id: f.user_id,
            autor: f.author,
            mensagem: f.message,
            criado_em: time::format_iso(f.created_at),
            visualizado: f.viewed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub mensagem: Option<String>,
}

pub async fn submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<FeedbackRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    feedback::submit(&state.pool, &user, body.mensagem.as_deref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Feedback enviado com sucesso!")),
    ))
}

pub async fn list_all(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<FeedbackView>>> {
    let items = feedback::list_all(&state.pool, &user).await?;
    Ok(Json(items.into_iter().map(FeedbackView::from).collect()))
}

pub async fn list_own(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<FeedbackView>>> {
    let items = feedback::list_own(&state.pool, &user).await?;
    Ok(Json(items.into_iter().map(FeedbackView::from).collect()))
}

pub async fn mark_viewed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    feedback::mark_viewed(&state.pool, &user, id).await?;
    Ok(Json(MessageResponse::new("Feedback marcado como visualizado.")))
}
