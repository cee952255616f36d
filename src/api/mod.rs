use crate::api::cors::{OriginAllowList, enforce_origin};
use crate::config::Config;
use crate::services::contact_service::ContactService;
use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::{
    Router,
    middleware::{from_fn_with_state, map_response},
    routing::{get, post},
};
use std::time::Duration;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod contact;
pub mod cors;
pub mod health;
pub mod middleware;
pub mod schemas;

#[derive(Clone, Debug)]
pub struct AppState {
    pub contact_service: ContactService,
    pub origins: OriginAllowList,
}

/// Configures and returns the application router.
pub fn app_router(config: &Config, contact_service: ContactService) -> Router {
    let origins = OriginAllowList::new(config.server.origins());
    tracing::info!(origins = ?origins.origins(), "CORS allowed origins");

    let state = AppState { contact_service, origins };
    let request_id = HeaderName::from_static(middleware::REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health))
        .route("/contact", post(contact::submit))
        .route("/contact/", post(contact::submit))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(map_response(middleware::json_timeout_body))
        .layer(state.origins.layer())
        .layer(from_fn_with_state(state.clone(), enforce_origin))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .and_then(|id| id.header_value().to_str().ok())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &tracing::Span| {
                        let status = response.status();
                        span.record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(request_id, middleware::MakeRequestUuidOrHeader))
        .with_state(state)
}
