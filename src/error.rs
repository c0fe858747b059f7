use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::extract::ExtractError;

#[derive(Debug)]
pub enum AppError {
    /// Return a status code with a JSON `{ "error": msg }` body.
    Msg(StatusCode, String),
    /// Internal error -> 500 with JSON body; logged.
    Anyhow(anyhow::Error),
}

impl AppError {
    #[must_use]
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::Msg(StatusCode::BAD_REQUEST, msg.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Anyhow(e)
    }
}

/* ---- Narrow, explicit conversions so `?` works everywhere ---- */

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        tracing::warn!(error = %e, "model output rejected");
        Self::Msg(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        // Keeps 413 for bodies over the limit, 400 for malformed forms.
        Self::Msg(e.status(), e.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Anyhow(e.into())
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Msg(code, msg) => (code, Json(ErrBody { error: msg })).into_response(),
            Self::Anyhow(err) => {
                tracing::error!("{:#}", err);
                let body = Json(ErrBody {
                    error: err.to_string(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn msg_renders_json_error() {
        let (st, body) = body_of(AppError::bad_request("No file part")).await;
        assert_eq!(st, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file part");
    }

    #[tokio::test]
    async fn anyhow_is_a_500_with_top_level_message() {
        let err = anyhow::anyhow!("connection refused").context("catalog lookup failed");
        let (st, body) = body_of(AppError::Anyhow(err)).await;
        assert_eq!(st, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "catalog lookup failed");
    }

    #[tokio::test]
    async fn extract_errors_are_server_errors() {
        let (st, body) = body_of(ExtractError::MissingBlock.into()).await;
        assert_eq!(st, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Could not find JSON in the analysis result");
    }
}
