//! Policy engine: compiles a [`PolicyConfig`] once and evaluates requests.

use crate::config::PolicyConfig;
use crate::decision::Decision;
use crate::error::{ConfigError, PatternKind, Result};
use crate::presets;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, info};

/// A pattern compiled for case-insensitive matching, with its source text.
#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    fn compile(source: &str, kind: PatternKind) -> Result<Self> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: source.to_string(),
                kind,
                source: e,
            })?;

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }
}

/// Immutable, pre-compiled form of a [`PolicyConfig`].
#[derive(Debug, Clone)]
pub struct CompiledPolicy {
    /// Preset patterns first, then custom patterns, in configured order
    block_patterns: Vec<CompiledPattern>,
    exempt_patterns: Vec<CompiledPattern>,
    status_code: u16,
    redirect_url: Option<String>,
}

impl CompiledPolicy {
    fn compile(config: &PolicyConfig) -> Result<Self> {
        config.validate()?;

        let preset_patterns = presets::resolve(&config.preset_categories);
        debug!(
            categories = ?config.preset_categories,
            patterns = preset_patterns.len(),
            "Resolved preset categories"
        );

        let block_patterns = preset_patterns
            .into_iter()
            .chain(config.custom_patterns.iter().map(String::as_str))
            .map(|p| CompiledPattern::compile(p, PatternKind::Block))
            .collect::<Result<Vec<_>>>()?;

        let exempt_patterns = config
            .exempt_path_patterns
            .iter()
            .map(|p| CompiledPattern::compile(p, PatternKind::Exempt))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            block_patterns,
            exempt_patterns,
            status_code: config.status_code,
            redirect_url: config.effective_redirect_url().map(str::to_string),
        })
    }

    /// Source text of every block pattern, in evaluation order.
    pub fn block_patterns(&self) -> impl Iterator<Item = &str> {
        self.block_patterns.iter().map(|p| p.source.as_str())
    }

    /// Source text of every exempt-path pattern, in evaluation order.
    pub fn exempt_patterns(&self) -> impl Iterator<Item = &str> {
        self.exempt_patterns.iter().map(|p| p.source.as_str())
    }

    /// Status code returned for blocked requests without a redirect.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Redirect target for blocked requests.
    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    fn blocked_response(&self) -> Decision {
        match &self.redirect_url {
            Some(url) => Decision::redirect(url.clone()),
            None => Decision::deny(self.status_code),
        }
    }
}

/// The pattern that settled an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "pattern", rename_all = "snake_case")]
pub enum MatchedRule<'a> {
    /// The path matched this exemption
    Exempt(&'a str),
    /// The user agent matched this block pattern
    Block(&'a str),
}

/// A [`Decision`] together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation<'a> {
    pub decision: Decision,
    /// `None` when no exempt or block pattern matched
    pub matched: Option<MatchedRule<'a>>,
}

/// Evaluates requests against a compiled policy.
///
/// The engine is never mutated after [`PolicyEngine::new`], so it can be
/// shared across threads (for example behind an `Arc`) without locking.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    policy: CompiledPolicy,
}

impl PolicyEngine {
    /// Validate `config` and compile all of its patterns.
    pub fn new(config: PolicyConfig) -> Result<Self> {
        let policy = CompiledPolicy::compile(&config)?;

        info!(
            block_patterns = policy.block_patterns.len(),
            exempt_patterns = policy.exempt_patterns.len(),
            status_code = policy.status_code,
            redirect_url = policy.redirect_url.as_deref().unwrap_or(""),
            "Policy engine ready"
        );

        Ok(Self { policy })
    }

    /// The compiled policy backing this engine.
    pub fn policy(&self) -> &CompiledPolicy {
        &self.policy
    }

    /// Decide what to do with a request.
    ///
    /// Exempt paths are checked first and always pass. Otherwise the request
    /// is blocked if any block pattern matches the user agent.
    pub fn decide(&self, user_agent: &str, path: &str) -> Decision {
        if self.is_exempt(path) {
            return Decision::allow();
        }

        if self.policy.block_patterns.iter().any(|p| p.regex.is_match(user_agent)) {
            return self.policy.blocked_response();
        }

        Decision::allow()
    }

    /// Same result as [`decide`](Self::decide), plus the pattern responsible.
    pub fn explain(&self, user_agent: &str, path: &str) -> Evaluation<'_> {
        if let Some(exempt) = self.policy.exempt_patterns.iter().find(|p| p.regex.is_match(path)) {
            return Evaluation {
                decision: Decision::allow(),
                matched: Some(MatchedRule::Exempt(&exempt.source)),
            };
        }

        match self.policy.block_patterns.iter().find(|p| p.regex.is_match(user_agent)) {
            Some(block) => Evaluation {
                decision: self.policy.blocked_response(),
                matched: Some(MatchedRule::Block(&block.source)),
            },
            None => Evaluation {
                decision: Decision::allow(),
                matched: None,
            },
        }
    }

    /// Whether `path` matches an exempt-path pattern.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.policy.exempt_patterns.iter().any(|p| p.regex.is_match(path))
    }
}
