//! HTTP API server implementation

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Json, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::core::adapter;
use crate::core::config::ServerConfig;
use crate::core::errors::TranslationError;
use crate::core::languages;
use crate::core::models::{LanguageInfo, TranslationRequest, TranslationResult};
use crate::core::service::{log_streaming_settings, TranslationService};

/// Translation form served at `/translation_page`
const TRANSLATION_PAGE: &str = include_str!("../../templates/translation_page.html");

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the server answers
    pub status: String,
    /// Package name
    pub service: String,
    /// Package version
    pub version: String,
    /// Loaded model backend
    pub backend: String,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub detail: String,
    /// Machine-readable error code
    pub code: String,
}

impl IntoResponse for TranslationError {
    fn into_response(self) -> Response {
        let status = match &self {
            TranslationError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        let body = ErrorResponse {
            detail: self.public_message(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for TranslationError {
    fn from(rejection: JsonRejection) -> Self {
        TranslationError::InvalidRequest {
            message: rejection.body_text(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health_check, list_languages, translate, translate_stream, stream_text),
    components(schemas(
        TranslationRequest,
        TranslationResult,
        LanguageInfo,
        HealthResponse,
        ErrorResponse
    ))
)]
/// OpenAPI document for the HTTP API
pub struct ApiDoc;

/// Health check handler
#[utoipa::path(get, path = "/", responses((status = 200, body = HealthResponse)))]
async fn health_check(State(service): State<TranslationService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: service.backend_name().to_string(),
    })
}

/// Supported language codes
#[utoipa::path(get, path = "/languages", responses((status = 200, body = [LanguageInfo])))]
async fn list_languages() -> Json<Vec<LanguageInfo>> {
    Json(languages::supported_languages())
}

/// Translate and return the full text
#[utoipa::path(
    post,
    path = "/translate",
    request_body = TranslationRequest,
    responses(
        (status = 200, body = TranslationResult),
        (status = 400, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    )
)]
async fn translate(
    State(service): State<TranslationService>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResult>, TranslationError> {
    let Json(payload) = payload?;
    let result = service.translate(&payload).await?;
    Ok(Json(result))
}

/// Translate, streaming tokens as they are generated
///
/// A generation failure after the first chunk aborts the chunked body.
#[utoipa::path(
    post,
    path = "/translate/stream",
    request_body = TranslationRequest,
    responses(
        (status = 200, content_type = "text/event-stream", body = String),
        (status = 400, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    )
)]
async fn translate_stream(
    State(service): State<TranslationService>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Response, TranslationError> {
    let Json(payload) = payload?;
    let tokens = service.stream_translate(&payload)?;
    let body = tokens.map(|item| item.map(|chunk| chunk.into_string()));
    Ok(streaming_response(Body::from_stream(body)))
}

/// Demo: stream a fixed string one character at a time
#[utoipa::path(
    get,
    path = "/stream-text",
    responses((status = 200, content_type = "text/event-stream", body = String))
)]
async fn stream_text(State(service): State<TranslationService>) -> Response {
    let body = service
        .demo_text_stream()
        .map(Ok::<_, std::convert::Infallible>);
    streaming_response(Body::from_stream(body))
}

async fn translation_page() -> Html<&'static str> {
    Html(TRANSLATION_PAGE)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Chunked response with buffering and caching disabled along the way
fn streaming_response(body: Body) -> Response {
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    response
}

/// Build the application router
pub fn create_router(service: TranslationService) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/languages", get(list_languages))
        .route("/openapi.json", get(openapi_json))
        .route("/translate", post(translate))
        .route("/translate/stream", post(translate_stream))
        .route("/translation_page", get(translation_page))
        .route("/stream-text", get(stream_text))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Run the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;

    // Model load downloads weights on first run; keep it off the async workers.
    let model_config = config.model.clone();
    let adapter = tokio::task::spawn_blocking(move || adapter::load_adapter(&model_config)).await??;
    info!("Loaded model backend: {}", adapter.name());

    log_streaming_settings(&config.streaming);
    let service = TranslationService::new(adapter, config.streaming.clone());
    let app = create_router(service);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
