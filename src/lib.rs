//! User-Agent blocking policy engine.
//!
//! Decides whether an HTTP request should be blocked, redirected, or passed
//! through, based on its User-Agent and path.
//!
//! # Features
//!
//! - Preset lists of AI search, AI training, and open-data crawlers
//! - Custom case-insensitive User-Agent patterns
//! - Exempt path patterns that always override blocking
//! - Redirect or JSON error responses for blocked requests
//! - Adapters for `http` types and axum middleware
//!
//! # Example
//!
//! ```
//! use darkforest_blocker::{PolicyConfig, PolicyEngine, PresetCategory};
//!
//! let engine = PolicyEngine::new(PolicyConfig {
//!     preset_categories: vec![PresetCategory::OpenDataCrawlers],
//!     custom_patterns: vec!["bad-bot".into()],
//!     exempt_path_patterns: vec!["^/robots\\.txt$".into()],
//!     ..Default::default()
//! })?;
//!
//! assert!(engine.decide("CCBot/2.0", "/").blocked);
//! assert!(!engine.decide("CCBot/2.0", "/robots.txt").blocked);
//! assert!(!engine.decide("Mozilla/5.0", "/").blocked);
//! # Ok::<(), darkforest_blocker::ConfigError>(())
//! ```

pub mod adapters;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod presets;

pub use config::{load_config, PolicyConfig};
pub use decision::{Decision, ResponseAction, BLOCKED_MESSAGE};
pub use engine::{CompiledPolicy, Evaluation, MatchedRule, PolicyEngine};
pub use error::{ConfigError, PatternKind};
pub use presets::PresetCategory;
