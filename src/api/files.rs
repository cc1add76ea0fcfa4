use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::io;
use tracing::debug;

use crate::api::AppState;
use crate::api::extract::ApiPath;
use crate::error::{AppError, AppResult};

/// Streams a stored upload with a content type guessed from its key.
pub async fn serve(State(state): State<AppState>, ApiPath(key): ApiPath<String>) -> AppResult<Response> {
    let data = match state.storage.load(&key).await {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Requested upload {} does not exist", key);
            return Err(AppError::not_found("Arquivo não encontrado"));
        }
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => {
            return Err(AppError::bad_request("Nome de arquivo inválido"));
        }
        Err(e) => return Err(e.into()),
    };

    let mime = mime_guess::from_path(&key).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], data).into_response())
}
