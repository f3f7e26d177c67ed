//! Middleware stack for the API server
//!
//! Provides logging, request ID generation, CORS, compression, timeouts and
//! rate limiting.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use curator_common::{AppError, CorsConfig, RateLimitConfig};
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::extractors::CSRF_HEADER;
use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Request ID, tracing and timeout layers shared by every route
pub fn apply_middleware(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static(REQUEST_ID_HEADER),
                MakeRequestUuid,
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                REQUEST_ID_HEADER,
            )))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_request_span)
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(TimeoutLayer::with_status_code(
                StatusCode::SERVICE_UNAVAILABLE,
                REQUEST_TIMEOUT,
            )),
    )
}

/// Full stack for API routes: rate limiting, CORS and compression on top of
/// [`apply_middleware`]
pub fn apply_middleware_with_config(
    router: Router<AppState>,
    rate_limit_config: &RateLimitConfig,
    cors_config: &CorsConfig,
    is_production: bool,
) -> Result<Router<AppState>, AppError> {
    if rate_limit_config.requests_per_second == 0 {
        return Err(AppError::Config(
            "RATE_LIMIT_REQUESTS_PER_SECOND must be non-zero".to_string(),
        ));
    }
    // The builder takes the interval between replenished permits
    let replenish_ms = (1000 / u64::from(rate_limit_config.requests_per_second)).max(1);

    // Global key: one bucket for the whole instance
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(replenish_ms)
            .burst_size(rate_limit_config.burst)
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .ok_or_else(|| {
                AppError::Config("RATE_LIMIT_BURST must be non-zero".to_string())
            })?,
    );

    // Layers wrap outward: RateLimit -> RequestID -> Trace -> Timeout -> CORS -> Compression
    let router = router
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(cors_config, is_production));
    let router = apply_middleware(router);

    Ok(router.layer(GovernorLayer {
        config: governor_conf,
    }))
}

fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Which browser origins may call the API
#[derive(Debug, PartialEq, Eq)]
enum OriginPolicy {
    /// Development with nothing configured
    Anyone,
    Listed(Vec<HeaderValue>),
    /// Production with nothing configured
    Nobody,
}

impl OriginPolicy {
    fn resolve(config: &CorsConfig, is_production: bool) -> Self {
        let listed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring unparsable CORS origin");
                    None
                }
            })
            .collect();

        match (listed.is_empty(), is_production) {
            (false, _) => Self::Listed(listed),
            (true, true) => Self::Nobody,
            (true, false) => Self::Anyone,
        }
    }
}

fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            request_id.clone(),
            HeaderName::from_static(CSRF_HEADER),
        ])
        .expose_headers([request_id]);

    match OriginPolicy::resolve(config, is_production) {
        OriginPolicy::Listed(origins) => {
            tracing::info!(count = origins.len(), "CORS restricted to configured origins");
            // Credentials carry the CSRF cookie
            layer
                .allow_origin(AllowOrigin::list(origins))
                .allow_credentials(true)
        }
        OriginPolicy::Nobody => {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty in production; browser calls will fail");
            layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()))
        }
        OriginPolicy::Anyone => {
            tracing::warn!("CORS open to any origin (development)");
            layer.allow_origin(Any)
        }
    }
}
