use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use aisle_core::intake::IntakeError;

#[derive(Debug, Clone, Serialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not signed in")]
    Unauthorized,

    #[error("Not allowed")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Please fix the highlighted fields")]
    Validation(Vec<FieldMessage>),

    #[error("Failed to load")]
    Load(#[source] anyhow::Error),

    #[error("Failed to save")]
    Save(#[source] anyhow::Error),
}

impl From<Vec<IntakeError>> for ApiError {
    fn from(errors: Vec<IntakeError>) -> Self {
        Self::Validation(
            errors
                .iter()
                .map(|e| FieldMessage {
                    field: e.field(),
                    message: e.to_string(),
                })
                .collect(),
        )
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldMessage]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Load(e) | Self::Save(e) => {
                error!("{}: {:#}", self, e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let fields = match &self {
            Self::Validation(fields) => Some(fields.as_slice()),
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}
