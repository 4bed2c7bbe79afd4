//! HTTP surface: `POST /analyze` and a root health check.

use crate::config::Config;
use crate::error::AnalyzeError;
use crate::pipeline::{self, Summary};
use crate::tables::TableSettings;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Multipart field that carries the invoice.
pub const FILE_FIELD: &str = "file";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Upper bound on one analysis unless configured otherwise.
pub const DEFAULT_ANALYZE_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<TableSettings>,
    pub analyze_timeout: Duration,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TableSettings::default(), DEFAULT_ANALYZE_TIMEOUT)
    }
}

impl AppState {
    pub fn new(settings: TableSettings, analyze_timeout: Duration) -> Self {
        Self {
            settings: Arc::new(settings),
            analyze_timeout,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Failures as the HTTP layer reports them.
#[derive(Debug)]
pub enum ApiError {
    Analyze(AnalyzeError),
    MissingFile,
    /// Unreadable multipart body, with the status the extractor chose for it.
    BadForm(StatusCode, String),
}

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        ApiError::Analyze(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Analyze(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Analyze(AnalyzeError::NoTables) => StatusCode::NOT_FOUND,
            ApiError::Analyze(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadForm(status, _) => *status,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::Analyze(
                e @ (AnalyzeError::InvalidFileType
                | AnalyzeError::MissingColumns
                | AnalyzeError::NoTables),
            ) => e.to_string(),
            ApiError::Analyze(e) => format!("An error occurred during processing: {e}"),
            ApiError::MissingFile => format!("Missing '{FILE_FIELD}' field in form data."),
            ApiError::BadForm(_, msg) => format!("Invalid multipart form: {msg}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %detail, "Request failed");
        } else {
            warn!(status = status.as_u16(), detail = %detail, "Request rejected");
        }
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Any origin, method and header, with credentials. Origins, methods and
/// headers are mirrored because wildcards cannot be combined with
/// credentials.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/analyze", post(analyze_invoice))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Serve on an already bound listener.
pub async fn serve(listener: tokio::net::TcpListener, router: Router) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Invoice analyzer listening");
    }
    axum::serve(listener, router).await
}

pub async fn start_server(config: &Config) -> Result<(), std::io::Error> {
    let state = AppState::new(
        config.tables.clone(),
        Duration::from_secs(config.server.analyze_timeout_secs),
    );
    let router = build_router(state, config.server.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    serve(listener, router).await
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "FinSight Analyzer API is running.",
    })
}

pub async fn analyze_invoice(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Summary>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadForm(e.status(), e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadForm(e.status(), e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let content_type = field.content_type().map(str::to_string);
        if content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
            info!(filename = %filename, content_type = ?content_type, "Upload is not declared as PDF");
            return Err(AnalyzeError::InvalidFileType.into());
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadForm(e.status(), e.body_text()))?;
        let digest = format!("{:x}", Sha256::digest(&bytes));
        let span = tracing::info_span!("analyze", filename = %filename, sha256 = %digest);

        info!(parent: &span, bytes = bytes.len(), "Received invoice");
        let settings = state.settings.clone();
        let worker_span = span.clone();
        let summary = run_blocking(state.analyze_timeout, move || {
            let _guard = worker_span.enter();
            pipeline::analyze(&bytes, &settings)
        })
        .await?;

        info!(parent: &span, sum = %summary.sum, "Invoice analyzed");
        return Ok(Json(summary));
    }

    Err(ApiError::MissingFile)
}

/// Run `job` on the blocking pool. A panic or a job still running after
/// `deadline` becomes a processing error; the worker itself is not stopped.
pub async fn run_blocking<T, F>(deadline: Duration, job: F) -> Result<T, AnalyzeError>
where
    F: FnOnce() -> Result<T, AnalyzeError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(deadline, tokio::task::spawn_blocking(job)).await {
        Ok(joined) => joined.map_err(|e| AnalyzeError::Processing(e.to_string()))?,
        Err(_) => Err(AnalyzeError::Processing(format!(
            "analysis did not finish within {}s",
            deadline.as_secs_f64()
        ))),
    }
}
