use std::time::{Duration, Instant};

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    tracing::info!(target: "http_access", latency_ms, "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        // Storefront
        .merge(crate::api::menu::router())
        .merge(crate::api::cart::router())
        .merge(crate::api::checkout::router())
        // Admin data APIs
        .merge(crate::api::categories::router())
        .merge(crate::api::items::router())
        .merge(crate::api::customizations::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::settings::router())
}

/// HTTP service: the fully layered router bound to a [`ServerState`]
#[derive(Clone)]
pub struct HttpsService {
    router: Router,
}

impl HttpsService {
    pub fn new(state: ServerState) -> Self {
        let timeout = Duration::from_millis(state.config.request_timeout_ms);
        let router = build_app()
            // JWT 认证中间件 - 在 Router 级别应用，require_auth 内部会跳过公共路由
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
            // Tower HTTP 中间件
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::with_status_code(
                http::StatusCode::REQUEST_TIMEOUT,
                timeout,
            ))
            // HTTP 请求日志中间件
            .layer(middleware::from_fn(log_request));

        Self { router }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
