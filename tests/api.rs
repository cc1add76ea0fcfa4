use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use ponto_server::api::{self, AppState};
use ponto_server::auth::TokenService;
use ponto_server::config::Config;
use ponto_server::database::create_connection;
use ponto_server::storage::{FileStorage, MemoryStorage};
use serde_json::{Value, json};
use tower::ServiceExt;

const BOUNDARY: &str = "ponto-test-boundary";

struct TestApp {
    router: Router,
    storage: Arc<MemoryStorage>,
}

impl TestApp {
    async fn new() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        Self::with_storage(storage.clone(), storage).await
    }

    async fn with_storage(backend: Arc<dyn FileStorage>, storage: Arc<MemoryStorage>) -> Self {
        let pool = create_connection("sqlite::memory:").await.unwrap();
        let state = AppState::new(pool, Config::for_tests(), backend);
        Self {
            router: api::router(state),
            storage,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn multipart(&self, uri: &str, token: &str, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn register(&self, name: &str, email: &str, role: &str, pin: Option<&str>) -> i64 {
        let (status, body) = self
            .json(
                Method::POST,
                "/register",
                None,
                json!({
                    "nome": name,
                    "email": email,
                    "senha": "segredo123",
                    "tipo_usuario": role,
                    "pin": pin,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/login",
                None,
                json!({ "email": email, "senha": "segredo123" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// A manager and one employee, both logged in.
    async fn with_team(&self) -> (String, i64, String) {
        self.register("Gerente", "gerente@empresa.com", "gerente", Some("2222"))
            .await;
        let employee_id = self
            .register("Ana", "ana@empresa.com", "funcionario", None)
            .await;
        let manager = self.login("gerente@empresa.com").await;
        let employee = self.login("ana@empresa.com").await;
        (manager, employee_id, employee)
    }
}

struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    content_type: Option<&'a str>,
    data: &'a [u8],
}

fn text_part<'a>(name: &'a str, value: &'a str) -> Part<'a> {
    Part {
        name,
        filename: None,
        content_type: None,
        data: value.as_bytes(),
    }
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[tokio::test]
async fn test_register_login_and_dashboard() {
    let app = TestApp::new().await;
    let id = app
        .register("Ana", "ana@empresa.com", "funcionario", None)
        .await;

    let (status, body) = app
        .json(
            Method::POST,
            "/login",
            None,
            json!({ "email": "ana@empresa.com", "senha": "segredo123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tipo_usuario"], "funcionario");
    assert_eq!(body["nome_usuario"], "Ana");

    let token = body["token"].as_str().unwrap();
    let (status, body) = app.get("/dashboard", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["nome"], "Ana");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_pin() {
    let app = TestApp::new().await;
    app.register("Ana", "ana@empresa.com", "funcionario", None)
        .await;

    let (status, body) = app
        .json(
            Method::POST,
            "/register",
            None,
            json!({ "nome": "Outra", "email": "ana@empresa.com", "senha": "x", "tipo_usuario": "funcionario" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email já registrado!");

    let (status, _) = app
        .json(
            Method::POST,
            "/register",
            None,
            json!({ "nome": "Chefe", "email": "chefe@empresa.com", "senha": "x", "tipo_usuario": "gerente", "pin": "0000" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .json(
            Method::POST,
            "/register",
            None,
            json!({ "nome": "Chefe", "email": "chefe@empresa.com", "senha": "x", "tipo_usuario": "diretor" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new().await;
    app.register("Ana", "ana@empresa.com", "funcionario", None)
        .await;

    let (status, body) = app
        .json(
            Method::POST,
            "/login",
            None,
            json!({ "email": "ana@empresa.com", "senha": "errada" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciais inválidas!");
}

#[tokio::test]
async fn test_gate_reports_failure_reason() {
    let app = TestApp::new().await;
    let id = app
        .register("Ana", "ana@empresa.com", "funcionario", None)
        .await;

    let (status, body) = app.get("/dashboard", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], "missing");

    let request = Request::builder()
        .uri("/dashboard")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], "malformed");

    let foreign = TokenService::new("some-other-secret").issue(id).unwrap();
    let (status, body) = app.get("/dashboard", Some(&foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], "invalid");

    let ghost = TokenService::new(&Config::for_tests().jwt_secret)
        .issue(id + 100)
        .unwrap();
    let (status, body) = app.get("/dashboard", Some(&ghost)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], "user_not_found");
}

#[tokio::test]
async fn test_clock_in_and_out() {
    let app = TestApp::new().await;
    let (_, _, employee) = app.with_team().await;

    let (status, body) = app.get("/api/ponto/estado", Some(&employee)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estado"], "closed");

    let (status, body) = app
        .json(Method::POST, "/api/ponto/entrada", Some(&employee), Value::Null)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["entrada"].is_string());

    let (status, body) = app
        .json(Method::POST, "/api/ponto/entrada", Some(&employee), Value::Null)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Já existe um ponto de entrada registrado sem saída."
    );

    let (_, body) = app.get("/api/ponto/estado", Some(&employee)).await;
    assert_eq!(body["aberto"], true);

    let (status, body) = app
        .json(Method::POST, "/api/ponto/saida", Some(&employee), Value::Null)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["saida"].is_string());

    let (status, _) = app
        .json(Method::POST, "/api/ponto/saida", Some(&employee), Value::Null)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/meus-pontos", Some(&employee)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_employee_cannot_reach_other_people_data() {
    let app = TestApp::new().await;
    let (manager, employee_id, employee) = app.with_team().await;
    let other_id = app
        .register("Bruno", "bruno@empresa.com", "funcionario", None)
        .await;

    let (status, _) = app
        .get(
            &format!("/api/gerente/relatorio-pontos-calendario?employee_id={}", other_id),
            Some(&employee),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/api/contabilidade/{}", other_id), Some(&employee))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/feedbacks", Some(&employee)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/funcionarios", Some(&employee)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Their own report is fine.
    let (status, _) = app
        .get(
            &format!("/api/gerente/relatorio-pontos-calendario?employee_id={}", employee_id),
            Some(&employee),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/funcionarios", Some(&manager)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_calendar_report_rejects_bad_parameters() {
    let app = TestApp::new().await;
    let (manager, _, _) = app.with_team().await;

    let (status, _) = app
        .get("/api/gerente/relatorio-pontos-calendario?month=abc", Some(&manager))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get("/api/gerente/relatorio-pontos-calendario?month=3", Some(&manager))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .get(
            "/api/gerente/relatorio-pontos-calendario?month=3&year=2025&employee_id=",
            Some(&manager),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_feedback_flow() {
    let app = TestApp::new().await;
    let (manager, _, employee) = app.with_team().await;

    let (status, _) = app
        .json(
            Method::POST,
            "/api/feedback",
            Some(&employee),
            json!({ "mensagem": "   " }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .json(
            Method::POST,
            "/api/feedback",
            Some(&employee),
            json!({ "mensagem": "Cadeira quebrada" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/api/gerente/feedbacks", Some(&manager)).await;
    let id = body[0]["id"].as_i64().unwrap();
    assert_eq!(body[0]["visualizado"], false);

    for _ in 0..2 {
        let (status, _) = app
            .json(
                Method::PUT,
                &format!("/api/feedbacks/{}/visualizado", id),
                Some(&manager),
                Value::Null,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = app.get("/api/meus-feedbacks", Some(&employee)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["visualizado"], true);
}

#[tokio::test]
async fn test_leave_submission_and_review() {
    let app = TestApp::new().await;
    let (manager, _, employee) = app.with_team().await;

    let body = multipart_body(&[
        text_part("motivo", "Consulta médica"),
        Part {
            name: "file",
            filename: Some("laudo medico.pdf"),
            content_type: Some("application/pdf"),
            data: b"%PDF-1.4 test",
        },
    ]);
    let (status, body) = app.multipart("/api/atestado", &employee, body).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(app.storage.len(), 1);

    let (_, list) = app.get("/api/meus-atestados", Some(&employee)).await;
    assert_eq!(list[0]["status"], "pendente");
    let url = list[0]["arquivo_url"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"%PDF-1.4 test");

    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/api/atestados/{}/aprovado", id),
            Some(&employee),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/api/atestados/{}/talvez", id),
            Some(&manager),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .json(
            Method::PUT,
            &format!("/api/atestados/{}/aprovado", id),
            Some(&manager),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "aprovado");

    let (status, body) = app
        .json(
            Method::PUT,
            &format!("/api/atestados/{}/rejeitado", id),
            Some(&manager),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Atestado já foi aprovado");

    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/api/atestados/{}/visualizado", id),
            Some(&manager),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_leave_rejects_disallowed_file() {
    let app = TestApp::new().await;
    let (_, _, employee) = app.with_team().await;

    let body = multipart_body(&[
        text_part("motivo", "Gripe"),
        Part {
            name: "file",
            filename: Some("virus.exe"),
            content_type: None,
            data: b"MZ",
        },
    ]);
    let (status, _) = app.multipart("/api/atestado", &employee, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn test_missing_upload_is_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/static/uploads/nada.pdf", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Arquivo não encontrado");
}

#[tokio::test]
async fn test_payroll_upsert_and_read() {
    let app = TestApp::new().await;
    let (manager, employee_id, employee) = app.with_team().await;

    let (status, _) = app.get("/api/contabilidade", Some(&employee)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .json(
            Method::POST,
            &format!("/api/contabilidade/{}", employee_id),
            Some(&manager),
            json!({ "salario_base": 3000.0, "abonos": 200.0, "descontos": 450.5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["contabilidade"]["total_liquido"], 2749.5);

    let (status, body) = app.get("/api/contabilidade", Some(&employee)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["salario_base"], 3000.0);
    assert_eq!(body["horas_extras"], 0.0);

    let (status, _) = app
        .json(
            Method::POST,
            &format!("/api/contabilidade/{}", employee_id),
            Some(&employee),
            json!({ "salario_base": 99999.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_update_and_password_change() {
    let app = TestApp::new().await;
    let (_, _, employee) = app.with_team().await;

    let (status, body) = app.get("/api/meus-dados", Some(&employee)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["foto_perfil"], "default-user.png");

    let (status, _) = app
        .json(
            Method::PUT,
            "/api/meus-dados",
            Some(&employee),
            json!({ "telefone": "11 99999-0000", "nascimento": "1990-05-20" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/meus-dados", Some(&employee)).await;
    assert_eq!(body["telefone"], "11 99999-0000");
    assert_eq!(body["nascimento"], "1990-05-20");

    let (status, _) = app
        .json(
            Method::PUT,
            "/api/meus-dados/alterar-senha",
            Some(&employee),
            json!({ "senha_atual": "errada", "nova_senha": "nova123" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .json(
            Method::PUT,
            "/api/meus-dados/alterar-senha",
            Some(&employee),
            json!({ "senha_atual": "segredo123", "nova_senha": "nova123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .json(
            Method::POST,
            "/login",
            None,
            json!({ "email": "ana@empresa.com", "senha": "nova123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_manager_creates_and_deletes_employee() {
    let app = TestApp::new().await;
    let (manager, _, _) = app.with_team().await;

    let body = multipart_body(&[
        text_part("nome", "Carla"),
        text_part("email", "carla@empresa.com"),
        text_part("senha", "segredo123"),
        text_part("telefone", "11 5555-0000"),
        Part {
            name: "foto_perfil",
            filename: Some("carla.png"),
            content_type: Some("image/png"),
            data: b"\x89PNG",
        },
    ]);
    let (status, body) = app
        .multipart("/cadastrar-funcionario", &manager, body)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let carla_id = body["id"].as_i64().unwrap();
    assert_eq!(app.storage.len(), 1);

    let carla = app.login("carla@empresa.com").await;
    app.json(Method::POST, "/api/ponto/entrada", Some(&carla), Value::Null)
        .await;
    let leave = multipart_body(&[
        text_part("motivo", "Exame"),
        Part {
            name: "file",
            filename: Some("exame.jpg"),
            content_type: Some("image/jpeg"),
            data: b"jpeg",
        },
    ]);
    let (status, _) = app.multipart("/api/atestado", &carla, leave).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.storage.len(), 2);

    let (status, body) = app.get("/api/gerente/funcionarios", Some(&manager)).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == carla_id)
        .cloned()
        .unwrap();
    assert_eq!(listed["telefone"], "11 5555-0000");

    let uri = format!("/api/funcionarios/{}", carla_id);
    let (status, _) = app.json(Method::DELETE, &uri, Some(&manager), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.storage.is_empty());

    let (status, _) = app.json(Method::DELETE, &uri, Some(&manager), Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/dashboard", Some(&carla)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], "user_not_found");

    let (_, body) = app.get("/api/atestados", Some(&manager)).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_announcements() {
    let app = TestApp::new().await;
    let (manager, _, employee) = app.with_team().await;

    let (status, _) = app
        .json(
            Method::POST,
            "/api/avisos",
            Some(&employee),
            json!({ "titulo": "Oi", "mensagem": "Teste" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .json(
            Method::POST,
            "/api/avisos",
            Some(&manager),
            json!({ "titulo": "Feriado", "mensagem": "Sexta não há expediente" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let id = body["id"].as_i64().unwrap();

    let (_, body) = app.get("/api/avisos", Some(&employee)).await;
    assert_eq!(body[0]["titulo"], "Feriado");
    assert_eq!(body[0]["destinatarios"], "todos");

    let uri = format!("/api/avisos/{}", id);
    let (status, _) = app.json(Method::DELETE, &uri, Some(&manager), Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.json(Method::DELETE, &uri, Some(&manager), Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

struct BrokenDisk;

#[async_trait::async_trait]
impl FileStorage for BrokenDisk {
    async fn save(&self, _key: &str, _data: &[u8]) -> std::io::Result<()> {
        Err(std::io::Error::other("disk full"))
    }

    async fn load(&self, key: &str) -> std::io::Result<Vec<u8>> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, key.to_string()))
    }

    async fn delete(&self, _key: &str) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_failed_photo_write_leaves_no_employee() {
    let app = TestApp::with_storage(Arc::new(BrokenDisk), Arc::new(MemoryStorage::new())).await;
    let (manager, _, _) = app.with_team().await;

    let body = multipart_body(&[
        text_part("nome", "Carlos"),
        text_part("email", "carlos@empresa.com"),
        text_part("senha", "segredo123"),
        Part {
            name: "foto_perfil",
            filename: Some("carlos.png"),
            content_type: Some("image/png"),
            data: b"\x89PNG",
        },
    ]);
    let (status, _) = app
        .multipart("/cadastrar-funcionario", &manager, body)
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = app.get("/api/funcionarios", Some(&manager)).await;
    let emails: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["email"].as_str())
        .collect();
    assert_eq!(emails, vec!["ana@empresa.com"]);
}

#[tokio::test]
async fn test_photo_is_served_as_image_whatever_its_name() {
    let app = TestApp::new().await;
    let (_, _, employee) = app.with_team().await;

    let body = multipart_body(&[Part {
        name: "foto",
        filename: Some("pagina.html"),
        content_type: Some("image/png"),
        data: b"<script>alert(1)</script>",
    }]);
    let (status, body) = app
        .multipart("/api/upload-foto-perfil", &employee, body)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.ends_with(".png"));

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let svg = multipart_body(&[Part {
        name: "foto",
        filename: Some("desenho.svg"),
        content_type: Some("image/svg+xml"),
        data: b"<svg onload=\"alert(1)\"/>",
    }]);
    let (status, _) = app
        .multipart("/api/upload-foto-perfil", &employee, svg)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
