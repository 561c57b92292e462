//! Curated User-Agent pattern lists.
//!
//! Each [`PresetCategory`] names a group of automated agents. The patterns
//! are compiled the same way as custom patterns (case-insensitive regular
//! expressions), so entries such as `iaskspider/2.0` match as written.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AI assistants and answer engines fetching pages on demand.
static AI_SEARCH_BOTS: &[&str] = &[
    "Applebot",
    "Applebot-Extended",
    "DuckAssistBot",
    "Google-Extended",
    "GoogleOther",
    "GoogleOther-Image",
    "GoogleOther-Video",
    "OAI-SearchBot",
    "PerplexityBot",
    "PetalBot",
    "YouBot",
    "ChatGPT-User",
    "cohere-ai",
    "PerplexityBot",
];

/// Crawlers collecting training data for AI models.
static AI_CRAWL_BOTS: &[&str] = &[
    "AI2Bot",
    "Ai2Bot-Dolma",
    "Amazonbot",
    "anthropic-ai",
    "Claude-Web",
    "ClaudeBot",
    "cohere-ai",
    "cohere-training-data-crawler",
    "Crawlspace",
    "Diffbot",
    "FacebookBot",
    "FriendlyCrawler",
    "GPTBot",
    "ICCCrawler",
    "ImagesiftBot",
    "img2dataset",
    "Kangaroo Bot",
    "Meta-ExternalAgent",
    "Meta-ExternalFetcher",
    "omgili",
    "omgilibot",
    "PanguBot",
    "Scrapy",
    "Sidetrade indexer bot",
    "Timpibot",
    "VelenPublicWebCrawler",
    "Webzio-Extended",
    "Bytespider",
    "iaskspider/2.0",
    "ISSCyberRiskCrawler",
];

/// Open web archives.
static OPEN_DATA_CRAWLERS: &[&str] = &["CCBot"];

/// Named group of known automated agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetCategory {
    /// AI search and assistant fetchers (`ai-search-bots`)
    AiSearchBots,
    /// AI training crawlers (`ai-crawl-bots`)
    AiCrawlBots,
    /// Open dataset crawlers such as Common Crawl (`open-data-crawlers`)
    OpenDataCrawlers,
}

impl PresetCategory {
    /// Every category, in registry order.
    pub const ALL: [PresetCategory; 3] = [
        PresetCategory::AiSearchBots,
        PresetCategory::AiCrawlBots,
        PresetCategory::OpenDataCrawlers,
    ];

    /// Returns the category name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetCategory::AiSearchBots => "ai-search-bots",
            PresetCategory::AiCrawlBots => "ai-crawl-bots",
            PresetCategory::OpenDataCrawlers => "open-data-crawlers",
        }
    }

    /// Returns the patterns registered for this category.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            PresetCategory::AiSearchBots => AI_SEARCH_BOTS,
            PresetCategory::AiCrawlBots => AI_CRAWL_BOTS,
            PresetCategory::OpenDataCrawlers => OPEN_DATA_CRAWLERS,
        }
    }
}

impl fmt::Display for PresetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        PresetCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownCategory(s.to_string()))
    }
}

/// Flatten categories into a single pattern list.
///
/// Category order and list order are preserved. Duplicates are kept: a
/// pattern listed under two categories appears twice.
pub fn resolve(categories: &[PresetCategory]) -> Vec<&'static str> {
    categories
        .iter()
        .flat_map(|category| category.patterns().iter().copied())
        .collect()
}

/// Like [`resolve`], but takes category names and rejects unknown ones.
pub fn resolve_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<&'static str>> {
    let categories = names
        .iter()
        .map(|name| name.as_ref().parse())
        .collect::<Result<Vec<PresetCategory>>>()?;
    Ok(resolve(&categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_round_trip() {
        for category in PresetCategory::ALL {
            assert_eq!(category.as_str().parse::<PresetCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = "ai-scraper-bots".parse::<PresetCategory>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCategory(ref name) if name == "ai-scraper-bots"));
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&PresetCategory::OpenDataCrawlers).unwrap();
        assert_eq!(json, r#""open-data-crawlers""#);
        let parsed: PresetCategory = serde_json::from_str(r#""ai-crawl-bots""#).unwrap();
        assert_eq!(parsed, PresetCategory::AiCrawlBots);
    }

    #[test]
    fn test_resolve_preserves_order() {
        let patterns = resolve(&[PresetCategory::OpenDataCrawlers, PresetCategory::AiSearchBots]);
        assert_eq!(patterns[0], "CCBot");
        assert_eq!(patterns[1], "Applebot");
        assert_eq!(patterns.len(), 1 + AI_SEARCH_BOTS.len());
    }

    #[test]
    fn test_resolve_keeps_duplicates() {
        let patterns = resolve(&[PresetCategory::AiSearchBots, PresetCategory::AiCrawlBots]);
        let cohere = patterns.iter().filter(|p| **p == "cohere-ai").count();
        assert_eq!(cohere, 2);
        let perplexity = patterns.iter().filter(|p| **p == "PerplexityBot").count();
        assert_eq!(perplexity, 2);
    }

    #[test]
    fn test_resolve_empty() {
        assert!(resolve(&[]).is_empty());
    }

    #[test]
    fn test_resolve_names() {
        let patterns = resolve_names(&["open-data-crawlers"]).unwrap();
        assert_eq!(patterns, vec!["CCBot"]);

        assert!(resolve_names(&["open-data-crawlers", "nope"]).is_err());
    }

    #[test]
    fn test_presets_compile_as_regex() {
        for category in PresetCategory::ALL {
            for pattern in category.patterns() {
                assert!(regex::Regex::new(pattern).is_ok(), "preset {} should compile", pattern);
            }
        }
    }
}
