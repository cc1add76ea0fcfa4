use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::extract::ApiJson;
use crate::api::{AppState, MessageResponse};
use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::services::credentials::{self, Registration};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    pub tipo_usuario: Option<String>,
    pub pin: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub id: i64,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let form = Registration {
        name: body.nome,
        email: body.email,
        password: body.senha,
        role: body.tipo_usuario,
        pin: body.pin,
    };
    let user = credentials::register(&state.pool, &state.config, &form).await?;

    Ok(Json(RegisterResponse {
        message: "Usuário registrado com sucesso!",
        id: user.id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub senha: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub tipo_usuario: &'static str,
    pub nome_usuario: String,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = credentials::login(
        &state.pool,
        &state.tokens,
        body.email.as_deref(),
        body.senha.as_deref(),
    )
    .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        tipo_usuario: outcome.role.label(),
        nome_usuario: outcome.name,
    }))
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub id: i64,
    pub nome: String,
    pub tipo_usuario: &'static str,
}

pub async fn dashboard(CurrentUser(user): CurrentUser) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        id: user.id,
        tipo_usuario: user.role.label(),
        nome: user.name,
    })
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub senha_atual: Option<String>,
    pub nova_senha: Option<String>,
}

pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    credentials::change_password(
        &state.pool,
        &user,
        body.senha_atual.as_deref(),
        body.nova_senha.as_deref(),
    )
    .await?;

    Ok(Json(MessageResponse::new("Senha alterada com sucesso!")))
}
