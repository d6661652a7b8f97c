//! HTTP-facing errors
//!
//! Anything that reaches this type is a server-side failure: validation
//! and not-found are ordinary outcomes handled in `routes`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use commander_core::{CommandError, ExError, ExErrorKind};
use commander_core_types::{RequestContext, RequestId, TraceId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("request task failed: {0}")]
    Task(String),

    #[error("server i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Structured form used for logging and the response body
    pub fn to_ex_error(&self) -> ExError {
        match self {
            ApiError::Command(err) => err.clone().into(),
            ApiError::Task(message) => {
                ExError::new(ExErrorKind::Internal).with_message(message.clone())
            }
            ApiError::Io(err) => ExError::new(ExErrorKind::Internal).with_message(err.to_string()),
        }
    }
}

impl ApiError {
    /// Log the failure against the request's correlation ids and render it
    /// as a 500 whose body carries only the stable code
    pub fn into_response_for(self, ctx: &RequestContext) -> Response {
        let mut ex_err = self
            .to_ex_error()
            .with_request_id(ctx.request_id.clone());
        if let Some(trace_id) = &ctx.trace_id {
            ex_err = ex_err.with_trace_id(trace_id.clone());
        }
        error_response(&ex_err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(&self.to_ex_error())
    }
}

fn error_response(ex_err: &ExError) -> Response {
    tracing::error!(
        request_id = ex_err.request_id().map(RequestId::as_str),
        trace_id = ex_err.trace_id().map(TraceId::as_str),
        err_kind = ?ex_err.kind(),
        err_code = ex_err.code(),
        err_message = ex_err.message(),
        "request failed"
    );

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "code": ex_err.code() })),
    )
        .into_response()
}
