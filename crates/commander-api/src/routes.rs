//! Routes for the Command collection
//!
//! Each handler builds a `CommandRequest` and runs it on the blocking pool,
//! since the store and the unit of work are synchronous.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use commander_core::CommandId;
use commander_core_types::{RequestContext, RequestId, TraceId};
use commander_engine::{apply_request, CommandRequest, RequestOutcome};

use crate::error::ApiError;
use crate::state::AppState;

/// Base path of the Command collection
pub const COMMANDS_PATH: &str = "/api/v1/commands";

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Location of a single Command
pub fn location(id: CommandId) -> String {
    format!("{}/{}", COMMANDS_PATH, id)
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(COMMANDS_PATH, get(list_commands).post(create_command))
        .route(
            "/api/v1/commands/:id",
            get(get_command).put(update_command).delete(delete_command),
        )
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_commands(State(state): State<AppState>, headers: HeaderMap) -> Response {
    dispatch(state, &headers, CommandRequest::List).await
}

async fn get_command(
    State(state): State<AppState>,
    Path(id): Path<CommandId>,
    headers: HeaderMap,
) -> Response {
    dispatch(state, &headers, CommandRequest::Get { id }).await
}

async fn create_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = CommandRequest::Create {
        body: body.to_vec(),
    };
    dispatch(state, &headers, request).await
}

async fn update_command(
    State(state): State<AppState>,
    Path(id): Path<CommandId>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = CommandRequest::Update {
        id,
        body: body.to_vec(),
    };
    dispatch(state, &headers, request).await
}

async fn delete_command(
    State(state): State<AppState>,
    Path(id): Path<CommandId>,
    headers: HeaderMap,
) -> Response {
    dispatch(state, &headers, CommandRequest::Delete { id }).await
}

/// Correlation ids from the request headers, generating a request id when
/// the caller sent none
fn request_context(headers: &HeaderMap) -> RequestContext {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let mut ctx = match header_str(REQUEST_ID_HEADER) {
        Some(id) => RequestContext::with_request_id(RequestId::from_string(id)),
        None => RequestContext::new(),
    };
    if let Some(trace) = header_str(TRACE_ID_HEADER) {
        ctx = ctx.with_trace_id(TraceId::from_string(trace));
    }
    ctx
}

/// Run a request and render its response
///
/// Success and failure responses both echo the request id.
async fn dispatch(state: AppState, headers: &HeaderMap, request: CommandRequest) -> Response {
    let ctx = request_context(headers);
    let span = tracing::info_span!(
        "http_request",
        request_id = %ctx.request_id,
        trace_id = ctx.trace_id.as_ref().map(TraceId::as_str),
    );

    let store = state.store();
    let request_span = span.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _entered = request_span.enter();
        apply_request(request, store.as_ref())
    })
    .await
    .map_err(|e| ApiError::Task(e.to_string()))
    .and_then(|applied| applied.map_err(ApiError::from));

    let mut response = match result {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => span.in_scope(|| err.into_response_for(&ctx)),
    };
    if let Ok(value) = HeaderValue::from_str(ctx.request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn outcome_response(outcome: RequestOutcome) -> Response {
    match outcome {
        RequestOutcome::Listed(reads) => (StatusCode::OK, Json(reads)).into_response(),
        RequestOutcome::Found(read) => (StatusCode::OK, Json(read)).into_response(),
        RequestOutcome::Created(read) => (
            StatusCode::CREATED,
            [(header::LOCATION, location(read.id))],
            Json(read),
        )
            .into_response(),
        RequestOutcome::NoContent => StatusCode::NO_CONTENT.into_response(),
        RequestOutcome::NotFound => StatusCode::NOT_FOUND.into_response(),
        RequestOutcome::Invalid(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
    }
}
