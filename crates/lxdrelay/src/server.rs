//! HTTP surface: image references in the path, resolution in the headers
//!
//! `GET|HEAD /{owner}/{repo}/{image}[/v{version}]` answers `204 No Content`
//! with `LXD-Image-Hash` and `LXD-Image-URL`. Failures answer with the
//! resolver's status code and a one-line plain-text message.

use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use lxdrelay_resolver::{ImageReference, ImageResolver, ResolveError, ResolvedImage};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

pub const IMAGE_HASH_HEADER: HeaderName = HeaderName::from_static("lxd-image-hash");
pub const IMAGE_URL_HEADER: HeaderName = HeaderName::from_static("lxd-image-url");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    resolver: Arc<ImageResolver>,
    request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(resolver: Arc<ImageResolver>, request_timeout: Option<Duration>) -> Self {
        Self {
            resolver,
            request_timeout,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/{owner}/{repo}/{image}", get(latest_image))
        .route("/{owner}/{repo}/{image}/{version}", get(pinned_image))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok\n"
}

async fn latest_image(
    State(state): State<AppState>,
    Path((owner, repo, image)): Path<(String, String, String)>,
) -> Response {
    resolve(&state, ImageReference::latest(owner, repo, image)).await
}

async fn pinned_image(
    State(state): State<AppState>,
    Path((owner, repo, image, version)): Path<(String, String, String, String)>,
) -> Response {
    // Only `v<version>` is a version segment
    match version.strip_prefix('v').filter(|v| !v.is_empty()) {
        Some(version) => {
            let reference = ImageReference::latest(owner, repo, image).with_version(version);
            resolve(&state, reference).await
        }
        None => ApiError::new(StatusCode::NOT_FOUND, "404 page not found").into_response(),
    }
}

async fn resolve(state: &AppState, reference: ImageReference) -> Response {
    let resolution = state.resolver.resolve_image(&reference);

    let result = match state.request_timeout {
        Some(limit) => match tokio::time::timeout(limit, resolution).await {
            Ok(result) => result,
            Err(_) => {
                warn!(image = %reference, timeout_secs = limit.as_secs(), "Resolution timed out");
                return ApiError::new(
                    StatusCode::GATEWAY_TIMEOUT,
                    format!("resolving {} timed out", reference),
                )
                .into_response();
            }
        },
        None => resolution.await,
    };

    match result {
        Ok(resolved) => image_response(&reference, &resolved),
        Err(e) => ApiError::from(e).into_response(),
    }
}

// Bytes that HTTP headers cannot carry are answered with 500, not rewritten
fn image_response(reference: &ImageReference, resolved: &ResolvedImage) -> Response {
    let headers = HeaderValue::from_str(&resolved.checksum)
        .and_then(|hash| Ok((hash, HeaderValue::from_str(&resolved.download_url)?)));

    match headers {
        Ok((hash, url)) => (
            StatusCode::NO_CONTENT,
            [(IMAGE_HASH_HEADER, hash), (IMAGE_URL_HEADER, url)],
        )
            .into_response(),
        Err(e) => {
            error!(image = %reference, error = %e, "Resolved image cannot be sent as headers");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("release metadata for {} is not a valid header value", reference),
            )
            .into_response()
        }
    }
}

/// Plain-text error response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self::new(err.status_code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )],
            format!("{}\n", self.message),
        )
            .into_response()
    }
}
