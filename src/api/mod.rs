use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenService;
use crate::auth::gate::require_user;
use crate::config::Config;
use crate::storage::FileStorage;

pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod employees;
pub mod extract;
pub mod feedback;
pub mod files;
pub mod leave;
pub mod payroll;
pub mod profile;

pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
    pub storage: Arc<dyn FileStorage>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config, storage: Arc<dyn FileStorage>) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret));
        Self {
            pool,
            config: Arc::new(config),
            tokens,
            storage,
        }
    }
}

/// `{"message": ...}` body for operations with nothing else to report.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(auth::dashboard))
        .route("/api/meus-dados", get(profile::show).put(profile::update))
        .route("/api/meus-dados/alterar-senha", put(auth::change_password))
        .route("/api/upload-foto-perfil", post(profile::upload_photo))
        // Attendance
        .route("/api/ponto/entrada", post(attendance::clock_in))
        .route("/api/ponto/saida", post(attendance::clock_out))
        .route("/api/ponto/estado", get(attendance::current_state))
        .route("/api/meus-pontos", get(attendance::own_records))
        .route("/api/gerente/pontos/{user_id}", get(attendance::employee_records))
        .route("/api/gerente/relatorio-pontos", get(attendance::full_report))
        .route(
            "/api/gerente/relatorio-pontos-calendario",
            get(attendance::calendar_report),
        )
        // Announcements
        .route(
            "/api/avisos",
            get(announcements::list).post(announcements::create),
        )
        .route("/api/avisos/{id}", axum::routing::delete(announcements::delete))
        // Feedback
        .route("/api/feedback", post(feedback::submit))
        .route("/api/feedbacks", get(feedback::list_all))
        .route("/api/gerente/feedbacks", get(feedback::list_all))
        .route("/api/meus-feedbacks", get(feedback::list_own))
        .route("/api/feedbacks/{id}/visualizado", put(feedback::mark_viewed))
        // Leave submissions
        .route("/api/atestado", post(leave::submit))
        .route("/api/atestados", get(leave::list_all))
        .route("/api/meus-atestados", get(leave::list_own))
        .route("/api/atestados/{id}/visualizado", put(leave::mark_viewed))
        .route("/api/atestados/{id}/{status}", put(leave::set_status))
        // Payroll
        .route("/api/contabilidade", get(payroll::own))
        .route(
            "/api/contabilidade/{user_id}",
            get(payroll::show).post(payroll::upsert),
        )
        // Team management
        .route("/cadastrar-funcionario", post(employees::create))
        .route("/api/funcionarios", get(employees::list))
        .route(
            "/api/funcionarios/{id}",
            put(employees::update).delete(employees::delete),
        )
        .route("/api/gerente/funcionarios", get(employees::list_details))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/static/uploads/{*key}", get(files::serve));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
