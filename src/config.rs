use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub database_url: String,
    pub bind_addr: String,
    pub upload_dir: PathBuf,
    pub manager_pin: String,
    pub default_manager: Option<DefaultManager>,
}

/// Account seeded at start-up so a fresh install has someone able to log in.
#[derive(Debug, Clone)]
pub struct DefaultManager {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:ponto.db".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static/uploads"));

        let manager_pin = env::var("MANAGER_PIN").unwrap_or_else(|_| "2222".to_string());

        let seed_disabled = env::var("DISABLE_DEFAULT_MANAGER")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE"))
            .unwrap_or(false);

        let default_manager = if seed_disabled {
            None
        } else {
            Some(DefaultManager {
                name: "Gerente Padrão".to_string(),
                email: env::var("DEFAULT_MANAGER_EMAIL")
                    .unwrap_or_else(|_| "gerente@empresa.com".to_string()),
                password: env::var("DEFAULT_MANAGER_PASSWORD")
                    .unwrap_or_else(|_| "Gerente123!".to_string()),
            })
        };

        Ok(Config {
            jwt_secret,
            database_url,
            bind_addr,
            upload_dir,
            manager_pin,
            default_manager,
        })
    }

    /// Configuration for tests and tooling; nothing is read from the environment.
    pub fn for_tests() -> Self {
        Config {
            jwt_secret: "test-secret-key-for-ponto-server".to_string(),
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            upload_dir: PathBuf::from("static/uploads"),
            manager_pin: "2222".to_string(),
            default_manager: None,
        }
    }
}
