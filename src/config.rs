use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    pub database_url: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Secret used to sign session and flash cookies. Must be at least 32 bytes.
    pub session_secret: String,
    pub http_bind_address: Option<String>,
    /// Directory where uploaded photos land. Must live under `static/`,
    /// which is the subtree the HTTP server serves files from.
    pub upload_dir: Option<String>,
    pub image_host: Option<ImageHostConfig>,
}

/// Remote image host (Cloudinary-style unsigned upload endpoint).
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ImageHostConfig {
    pub endpoint: String,
    pub upload_preset: String,
    pub folder: Option<String>,
}

impl Config {
    pub fn upload_dir(&self) -> &str {
        self.upload_dir.as_deref().unwrap_or("static/uploads")
    }
}

pub fn create_test_config() -> Config {
    Config {
        database_url: "postgres://localhost/celo_imoveis_test".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "xxx".to_string(),
        session_secret: "0123456789abcdef0123456789abcdef".to_string(),
        http_bind_address: None,
        upload_dir: None,
        image_host: None,
    }
}

pub fn read_config() -> Config {
    dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map_err(|_| format!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(config_path).map_err(|e| e.to_string()))
        .and_then(|bytes| toml::from_slice(&bytes).map_err(|e| e.to_string()))
        .unwrap_or_else(|err| {
            error!("failed to read config: {err}");
            std::process::exit(1);
        })
}
