use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::extract::{ApiJson, ApiMultipart, MultipartForm};
use crate::api::{AppState, MessageResponse};
use crate::auth::CurrentUser;
use crate::database::models::DEFAULT_AVATAR;
use crate::error::AppResult;
use crate::services::profile::{self, ProfileUpdate};

/// Absent values render as empty strings, as the profile page expects.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub funcao: String,
    pub telefone: String,
    pub nascimento: String,
    pub endereco: String,
    pub foto_perfil: String,
    pub foto_url: String,
}

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ProfileView>> {
    let attrs = profile::get(&state.pool, &user).await?;

    let (telefone, nascimento, endereco, avatar) = match attrs {
        Some(p) => (
            p.phone.unwrap_or_default(),
            p.birth_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            p.address.unwrap_or_default(),
            p.avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        ),
        None => Default::default(),
    };
    let avatar = if avatar.is_empty() {
        DEFAULT_AVATAR.to_string()
    } else {
        avatar
    };

    Ok(Json(ProfileView {
        id: user.id,
        nome: user.name,
        email: user.email,
        funcao: user.job_title.unwrap_or_default(),
        telefone,
        nascimento,
        endereco,
        foto_url: state.storage.url_for(&avatar),
        foto_perfil: avatar,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub nascimento: Option<String>,
    pub endereco: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<ProfileUpdateRequest>,
) -> AppResult<Json<MessageResponse>> {
    let changes = ProfileUpdate {
        name: body.nome,
        email: body.email,
        phone: body.telefone,
        birth_date: body.nascimento,
        address: body.endereco,
    };
    profile::update(&state.pool, &user, &changes).await?;

    Ok(Json(MessageResponse::new("Dados atualizados com sucesso!")))
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub message: &'static str,
    pub filename: String,
    pub url: String,
}

pub async fn upload_photo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<Json<PhotoResponse>> {
    let mut form = MultipartForm::read(multipart).await?;
    let key = profile::upload_photo(
        &state.pool,
        state.storage.as_ref(),
        &user,
        form.take_file("foto"),
    )
    .await?;

    Ok(Json(PhotoResponse {
        message: "Foto de perfil atualizada com sucesso!",
        url: state.storage.url_for(&key),
        filename: key,
    }))
}
