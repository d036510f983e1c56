use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("imóvel não encontrado")]
    NotFound,

    #[error("não autenticado")]
    Unauthorized,

    #[error("requisição inválida: {0}")]
    BadRequest(String),

    #[error("database error")]
    Database(#[from] diesel::result::Error),

    #[error("template error")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Html("<h1>Imóvel não encontrado</h1>".to_string()),
            )
                .into_response(),
            // Admin routes bounce straight to the login form.
            AppError::Unauthorized => Redirect::to("/login").into_response(),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Database(e) => {
                error!("database error: {e}");
                internal()
            }
            AppError::Template(e) => {
                error!("template error: {e}");
                internal()
            }
            AppError::Internal(e) => {
                error!("internal error: {e:#}");
                internal()
            }
        }
    }
}

fn internal() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "erro interno".to_string(),
    )
        .into_response()
}
