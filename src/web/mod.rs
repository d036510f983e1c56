pub mod error;
pub mod forms;
pub mod handlers;

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;
use log::info;
use tera::Tera;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::auth::{ConfigCredentials, CredentialVerifier};
use crate::config::Config;
use crate::uploads::ImageHost;

/// Enough for a handful of listing photos in one submission.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tera: Arc<Tera>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub image_host: Option<Arc<ImageHost>>,
    key: Key,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        ensure!(
            config.session_secret.len() >= 32,
            "session_secret must be at least 32 bytes"
        );
        let key = Key::derive_from(config.session_secret.as_bytes());
        let tera = Tera::new("templates/**/*.html").context("loading templates")?;
        let credentials: Arc<dyn CredentialVerifier> =
            Arc::new(ConfigCredentials::from_config(&config));
        let image_host = config.image_host.as_ref().map(|c| Arc::new(ImageHost::new(c)));

        Ok(Self {
            config,
            tera: Arc::new(tera),
            credentials,
            image_host,
            key,
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/imovel/:id", get(handlers::detalhes))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/admin", get(handlers::admin))
        .route("/add", post(handlers::add_imovel))
        .route(
            "/edit/:id",
            get(handlers::edit_form).post(handlers::edit_imovel),
        )
        .route("/delete/:id", get(handlers::delete_imovel))
        .nest_service("/static", ServeDir::new("static"))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

pub async fn start_http_server(
    state: AppState,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let bind_addr = state
        .config
        .http_bind_address
        .clone()
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind http listener on {bind_addr}"))?;
    info!("listening on {bind_addr}");

    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .context("HTTP server crashed")
}
