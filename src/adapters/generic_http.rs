//! Adapter for the `http` crate's request and response types.
//!
//! Works with any framework built on `http` (axum, hyper, tower services).

use super::{Adapter, RequestAttributes};
use crate::decision::{Decision, ResponseAction, BLOCKED_MESSAGE};
use http::header::{self, HeaderValue};
use http::{Request, Response, StatusCode};
use serde_json::json;
use std::marker::PhantomData;
use tracing::warn;

/// [`Adapter`] over `http::Request<B>` / `http::Response<B>`.
pub struct HttpAdapter<B> {
    _body: PhantomData<fn() -> B>,
}

impl<B> HttpAdapter<B> {
    pub fn new() -> Self {
        Self { _body: PhantomData }
    }
}

impl<B> Default for HttpAdapter<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: From<String>> Adapter for HttpAdapter<B> {
    type Request = Request<B>;
    type Response = Response<B>;

    fn extract_request<'r>(&self, request: &'r Request<B>) -> RequestAttributes<'r> {
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok());

        RequestAttributes::new(user_agent, Some(request.uri().path()))
    }

    fn render_decision(&self, decision: &Decision) -> Option<Response<B>> {
        match decision.action() {
            ResponseAction::Continue => None,
            ResponseAction::Redirect { status, location } => Some(redirect_response(status, location)),
            ResponseAction::Json { status, body } => Some(json_response(status, &body)),
        }
    }
}

fn redirect_response<B: From<String>>(status: u16, location: &str) -> Response<B> {
    let value = match HeaderValue::from_str(location) {
        Ok(value) => value,
        Err(e) => {
            warn!(location, error = %e, "Redirect target is not a valid header value, denying instead");
            return json_response(StatusCode::FORBIDDEN.as_u16(), &json!({ "error": BLOCKED_MESSAGE }));
        }
    };

    let mut response = Response::new(B::from(String::new()));
    *response.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::FOUND);
    response.headers_mut().insert(header::LOCATION, value);
    response
}

fn json_response<B: From<String>>(status: u16, body: &serde_json::Value) -> Response<B> {
    let mut response = Response::new(B::from(body.to_string()));
    *response.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::FORBIDDEN);
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use crate::engine::PolicyEngine;

    fn engine(redirect_url: Option<&str>) -> PolicyEngine {
        PolicyEngine::new(PolicyConfig {
            custom_patterns: vec!["bad-bot".to_string()],
            exempt_path_patterns: vec!["^/robots\\.txt$".to_string()],
            redirect_url: redirect_url.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    fn request(ua: Option<&str>, uri: &str) -> Request<String> {
        let mut builder = Request::builder().uri(uri);
        if let Some(ua) = ua {
            builder = builder.header("user-agent", ua);
        }
        builder.body(String::new()).unwrap()
    }

    #[test]
    fn test_extract_request() {
        let adapter = HttpAdapter::<String>::new();

        let req = request(Some("bad-bot/1.0"), "/docs?page=2");
        let attrs = adapter.extract_request(&req);
        assert_eq!(attrs.user_agent, "bad-bot/1.0");
        assert_eq!(attrs.path, "/docs");

        let req = request(None, "/");
        assert_eq!(adapter.extract_request(&req).user_agent, "");
    }

    #[test]
    fn test_blocked_json_response() {
        let adapter = HttpAdapter::<String>::new();
        let response = adapter
            .handle(&engine(None), &request(Some("bad-bot/1.0"), "/"))
            .expect("request should be blocked");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body: serde_json::Value = serde_json::from_str(response.body()).unwrap();
        assert_eq!(body["error"], BLOCKED_MESSAGE);
    }

    #[test]
    fn test_blocked_redirect_response() {
        let adapter = HttpAdapter::<String>::new();
        let response = adapter
            .handle(
                &engine(Some("https://example.com/blocked")),
                &request(Some("bad-bot/1.0"), "/"),
            )
            .expect("request should be redirected");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com/blocked");
    }

    #[test]
    fn test_pass_through() {
        let adapter = HttpAdapter::<String>::new();
        let engine = engine(None);
        assert!(adapter.handle(&engine, &request(Some("Mozilla/5.0"), "/")).is_none());
        assert!(adapter.handle(&engine, &request(Some("bad-bot/1.0"), "/robots.txt")).is_none());
        assert!(adapter.handle(&engine, &request(None, "/")).is_none());
    }
}
