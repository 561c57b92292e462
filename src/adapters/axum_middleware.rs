//! Axum middleware built on [`HttpAdapter`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{routing::get, Router};
//! use darkforest_blocker::{adapters, PolicyConfig, PolicyEngine};
//!
//! let engine = PolicyEngine::new(PolicyConfig {
//!     custom_patterns: vec!["bad-bot".into()],
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let app: Router = adapters::protect(
//!     Router::new().route("/", get(|| async { "hello" })),
//!     Arc::new(engine),
//! );
//! ```

use super::{Adapter, HttpAdapter};
use crate::engine::PolicyEngine;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::Router;
use std::sync::Arc;

/// Middleware function for `axum::middleware::from_fn_with_state`.
pub async fn blocker_middleware(
    State(engine): State<Arc<PolicyEngine>>,
    request: Request,
    next: Next,
) -> Response {
    let blocked = HttpAdapter::<Body>::new().handle(&engine, &request);
    if let Some(response) = blocked {
        return response;
    }

    next.run(request).await
}

/// Wrap every route of `router` with the blocker.
pub fn protect<S>(router: Router<S>, engine: Arc<PolicyEngine>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(from_fn_with_state(engine, blocker_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use crate::presets::PresetCategory;
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app(config: PolicyConfig) -> Router {
        let engine = Arc::new(PolicyEngine::new(config).unwrap());
        protect(
            Router::new()
                .route("/", get(|| async { "ok" }))
                .route("/api/public/data", get(|| async { "public" })),
            engine,
        )
    }

    fn get_request(uri: &str, ua: &str) -> Request {
        Request::builder()
            .uri(uri)
            .header(header::USER_AGENT, ua)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_allowed_request_reaches_handler() {
        let app = test_app(PolicyConfig {
            custom_patterns: vec!["bad-bot".to_string()],
            ..Default::default()
        });

        let response = app.oneshot(get_request("/", "Mozilla/5.0")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_blocked_request_gets_json_error() {
        let app = test_app(PolicyConfig {
            preset_categories: vec![PresetCategory::AiCrawlBots],
            ..Default::default()
        });

        let response = app
            .oneshot(get_request("/", "Mozilla/5.0 (compatible; GPTBot/1.2)"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(err["error"].as_str().unwrap().contains("blocked"));
    }

    #[tokio::test]
    async fn test_blocked_request_redirected() {
        let app = test_app(PolicyConfig {
            custom_patterns: vec!["bad-bot".to_string()],
            redirect_url: Some("/blocked".to_string()),
            ..Default::default()
        });

        let response = app.oneshot(get_request("/", "bad-bot/1.0")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/blocked");
    }

    #[tokio::test]
    async fn test_exempt_path_reaches_handler() {
        let app = test_app(PolicyConfig {
            custom_patterns: vec!["bad-bot".to_string()],
            exempt_path_patterns: vec!["^/api/public/.*".to_string()],
            ..Default::default()
        });

        let response = app
            .oneshot(get_request("/api/public/data", "bad-bot/1.0"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
