use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use coach_common::{ErrorKind, SearchBackendError};
use coach_runtime::evaluation::PanelError;
use coach_runtime::SearchError;

pub type AppSuccess = GenericResponse;

/// Envelope shared by every route: `{status, message, data}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericResponse {
    pub status: u16,
    pub message: String,
    pub data: Value,
}

impl GenericResponse {
    pub fn new(status: StatusCode, message: &str, data: Value) -> Self {
        Self {
            status: status.as_u16(),
            message: message.to_string(),
            data,
        }
    }
}

impl IntoResponse for GenericResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json::from(self)).into_response()
    }
}

/// An `anyhow::Error` with the status it should be reported under, plus optional details.
#[derive(Debug)]
pub struct AppError(pub StatusCode, pub anyhow::Error, pub Value);

impl AppError {
    pub fn new(status: StatusCode, err: anyhow::Error) -> Self {
        Self(status, err, json!({}))
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.2 = data;
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("CODE: {}, MESSAGE: {}", self.0.as_u16(), self.1);
        GenericResponse::new(self.0, &self.1.to_string(), self.2).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.into())
    }
}

fn backend_status(err: &SearchBackendError) -> StatusCode {
    match err.kind() {
        ErrorKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Backend failures carry the configuration hint next to the raw error.
pub fn search_backend_error(err: SearchBackendError) -> AppError {
    let data = json!({ "code": err.kind(), "hint": err.hint() });
    AppError::new(backend_status(&err), err.into()).with_data(data)
}

pub fn search_error(err: SearchError) -> AppError {
    match err {
        SearchError::EmptyQuery => AppError::new(StatusCode::BAD_REQUEST, err.into())
            .with_data(json!({ "code": ErrorKind::InvalidInput })),
        SearchError::Backend(err) => search_backend_error(err),
    }
}

pub fn panel_error(err: PanelError) -> AppError {
    let status = match err {
        PanelError::UnknownPanel(_) => StatusCode::NOT_FOUND,
        PanelError::EmptyAnswer => StatusCode::BAD_REQUEST,
    };
    AppError::new(status, err.into())
}
