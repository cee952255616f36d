use crate::api::AppState;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Exact-match list of browser origins allowed to call the API.
#[derive(Clone, Debug)]
pub struct OriginAllowList {
    origins: Arc<[String]>,
}

impl OriginAllowList {
    #[must_use]
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins: origins.into() }
    }

    /// Requests without an `Origin` header (curl, server-to-server) are always allowed.
    #[must_use]
    pub fn allows(&self, origin: Option<&HeaderValue>) -> bool {
        let Some(origin) = origin else {
            return true;
        };
        origin.to_str().is_ok_and(|o| self.origins.iter().any(|allowed| allowed == o))
    }

    /// Response-header side of the policy.
    #[must_use]
    pub fn layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    }

    #[must_use]
    pub fn origins(&self) -> &[String] {
        &self.origins
    }
}

/// Rejects browser requests whose origin is not on the allow-list before they reach a handler.
pub async fn enforce_origin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request.headers().get(header::ORIGIN);
    if !state.origins.allows(origin) {
        let origin = origin.map(|o| String::from_utf8_lossy(o.as_bytes()).into_owned()).unwrap_or_default();
        return AppError::OriginRejected(origin).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> OriginAllowList {
        OriginAllowList::new(vec![
            "https://panditconstruction.netlify.app".to_string(),
            "http://localhost:5173".to_string(),
        ])
    }

    #[test]
    fn test_known_origin_allowed() {
        let origin = HeaderValue::from_static("https://panditconstruction.netlify.app");
        assert!(list().allows(Some(&origin)));
    }

    #[test]
    fn test_unknown_origin_rejected() {
        let origin = HeaderValue::from_static("https://evil.example.com");
        assert!(!list().allows(Some(&origin)));
    }

    #[test]
    fn test_missing_origin_allowed() {
        assert!(list().allows(None));
    }

    #[test]
    fn test_match_is_exact() {
        let origin = HeaderValue::from_static("http://localhost:5173/");
        assert!(!list().allows(Some(&origin)));
    }
}
