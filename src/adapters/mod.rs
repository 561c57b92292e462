//! Framework adapters.
//!
//! An adapter pulls the User-Agent and path out of a framework's request type
//! and turns a [`Decision`] into that framework's response. The engine itself
//! never sees framework types.

pub mod axum_middleware;
pub mod generic_http;

pub use axum_middleware::{blocker_middleware, protect};
pub use generic_http::HttpAdapter;

use crate::decision::Decision;
use crate::engine::{MatchedRule, PolicyEngine};
use tracing::debug;

/// Path used when a framework cannot supply one.
pub const DEFAULT_PATH: &str = "/";

/// The request attributes the engine evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestAttributes<'a> {
    /// User-Agent header value (empty when absent)
    pub user_agent: &'a str,
    /// Request path (`/` when unavailable)
    pub path: &'a str,
}

impl<'a> RequestAttributes<'a> {
    /// Build attributes, applying the defaults for missing values.
    pub fn new(user_agent: Option<&'a str>, path: Option<&'a str>) -> Self {
        Self {
            user_agent: user_agent.unwrap_or(""),
            path: path.filter(|p| !p.is_empty()).unwrap_or(DEFAULT_PATH),
        }
    }
}

/// Translation between a web framework and the policy engine.
pub trait Adapter {
    /// Native request type.
    type Request;
    /// Native response type.
    type Response;

    /// Extract the attributes the engine needs from a request.
    fn extract_request<'r>(&self, request: &'r Self::Request) -> RequestAttributes<'r>;

    /// Render a decision. `None` means the request should continue to the
    /// next handler.
    fn render_decision(&self, decision: &Decision) -> Option<Self::Response>;

    /// Evaluate `request` and render the result.
    fn handle(&self, engine: &PolicyEngine, request: &Self::Request) -> Option<Self::Response> {
        let attrs = self.extract_request(request);
        let evaluation = engine.explain(attrs.user_agent, attrs.path);

        match evaluation.matched {
            Some(MatchedRule::Block(pattern)) => debug!(
                user_agent = attrs.user_agent,
                path = attrs.path,
                pattern,
                status_code = evaluation.decision.status_code,
                "Request blocked"
            ),
            Some(MatchedRule::Exempt(pattern)) => debug!(
                path = attrs.path,
                pattern,
                "Request path exempt from blocking"
            ),
            None => {}
        }

        self.render_decision(&evaluation.decision)
    }
}
