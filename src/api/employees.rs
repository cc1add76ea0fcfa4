use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::extract::{ApiJson, ApiMultipart, ApiPath, MultipartForm};
use crate::api::{AppState, MessageResponse};
use crate::auth::CurrentUser;
use crate::database::models::{EmployeeDetails, User};
use crate::error::AppResult;
use crate::services::employees::{self, EmployeeUpdate, NewEmployee};

#[derive(Debug, Serialize)]
pub struct EmployeeSummary {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub funcao: Option<String>,
}

impl From<User> for EmployeeSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            nome: u.name,
            email: u.email,
            funcao: u.job_title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeDetailsView {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub foto_perfil: Option<String>,
    pub funcao: Option<String>,
}

impl From<EmployeeDetails> for EmployeeDetailsView {
    fn from(d: EmployeeDetails) -> Self {
        Self {
            id: d.id,
            nome: d.name,
            email: d.email,
            telefone: d.phone,
            foto_perfil: d.avatar,
            funcao: d.job_title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}

/// Multipart: `nome`, `email`, `senha`, `telefone`, optional `foto_perfil`.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<Json<CreatedResponse>> {
    let mut form = MultipartForm::read(multipart).await?;
    // An empty file input still arrives as a part with no name and no bytes.
    let photo = form
        .take_file("foto_perfil")
        .filter(|f| !f.filename.is_empty() || !f.data.is_empty());

    let new_employee = NewEmployee {
        name: form.text("nome").map(str::to_string),
        email: form.text("email").map(str::to_string),
        password: form.text("senha").map(str::to_string),
        phone: form.text("telefone").map(str::to_string),
        photo,
    };
    let employee =
        employees::create(&state.pool, state.storage.as_ref(), &user, new_employee).await?;

    Ok(Json(CreatedResponse {
        message: "Funcionário cadastrado com sucesso!",
        id: employee.id,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<EmployeeSummary>>> {
    let items = employees::list(&state.pool, &user).await?;
    Ok(Json(items.into_iter().map(EmployeeSummary::from).collect()))
}

pub async fn list_details(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<EmployeeDetailsView>>> {
    let items = employees::list_details(&state.pool, &user).await?;
    Ok(Json(items.into_iter().map(EmployeeDetailsView::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct EmployeeUpdateRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    pub funcao: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<EmployeeUpdateRequest>,
) -> AppResult<Json<MessageResponse>> {
    let changes = EmployeeUpdate {
        name: body.nome,
        email: body.email,
        password: body.senha,
        job_title: body.funcao,
    };
    employees::update(&state.pool, &user, id, &changes).await?;

    Ok(Json(MessageResponse::new("Funcionário atualizado com sucesso!")))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    employees::delete(&state.pool, state.storage.as_ref(), &user, id).await?;
    Ok(Json(MessageResponse::new("Funcionário excluído com sucesso!")))
}
