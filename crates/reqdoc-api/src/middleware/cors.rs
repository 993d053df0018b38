//! # CORS
//!
//! Browser clients send credentialed requests from the configured origins.
//! With no origins configured the layer is fully permissive (development).
//! An origin of `*` allows any origin, without credentials.

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;

const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

const ALLOWED_HEADERS: [HeaderName; 4] = [
    header::ORIGIN,
    header::CONTENT_TYPE,
    header::ACCEPT,
    header::AUTHORIZATION,
];

const WILDCARD: &str = "*";

/// Build the CORS layer for `config`.
///
/// Origins that are not valid header values are logged and ignored.
pub fn layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    if config.allowed_origins.iter().any(|o| o.trim() == WILDCARD) {
        if config.allowed_origins.len() > 1 {
            tracing::warn!(
                origins = ?config.allowed_origins,
                "wildcard CORS origin overrides the other configured origins"
            );
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(ALLOWED_HEADERS);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn app(origins: &[&str]) -> Router {
        let config = CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        };
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(layer(&config))
    }

    #[tokio::test]
    async fn allowed_origin_gets_credentials() {
        let response = app(&["http://localhost:3000"])
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn other_origin_is_not_echoed() {
        let response = app(&["http://localhost:3000"])
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn empty_config_is_permissive() {
        let response = app(&[])
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "https://any.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_some());
    }

    #[tokio::test]
    async fn wildcard_origin_allows_any_without_credentials() {
        let response = app(&["http://localhost:3000", "*"])
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "https://any.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert!(headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .is_none());
    }
}
