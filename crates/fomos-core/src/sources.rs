use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Placeholder substituted with the percent-encoded search query.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Which page layout an extractor should expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Jiomart,
    Amazon,
    Snapdeal,
}

impl std::fmt::Display for SiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteKind::Jiomart => write!(f, "jiomart"),
            SiteKind::Amazon => write!(f, "amazon"),
            SiteKind::Snapdeal => write!(f, "snapdeal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Display name stamped on every listing from this source.
    pub name: String,
    pub kind: SiteKind,
    /// Search page template, e.g. `"https://www.amazon.in/s?k={query}"`.
    pub search_url: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceSpec>,
}

/// The three storefronts the service ships with, in aggregation order.
#[must_use]
pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec {
            name: "Jiomart".to_string(),
            kind: SiteKind::Jiomart,
            search_url: "https://www.jiomart.com/search/{query}".to_string(),
            enabled: true,
        },
        SourceSpec {
            name: "Amazon".to_string(),
            kind: SiteKind::Amazon,
            search_url: "https://www.amazon.in/s?k={query}".to_string(),
            enabled: true,
        },
        SourceSpec {
            name: "Snapdeal".to_string(),
            kind: SiteKind::Snapdeal,
            search_url: "https://www.snapdeal.com/search?keyword={query}".to_string(),
            enabled: true,
        },
    ]
}

/// Load and validate a sources registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_sources(&content)
}

/// Parse and validate a sources registry from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_sources(content: &str) -> Result<SourcesFile, ConfigError> {
    let sources_file: SourcesFile = serde_yaml::from_str(content)?;
    validate_sources(&sources_file)?;
    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for source in &sources_file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }

        if !source.search_url.contains(QUERY_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "source '{}' search_url must contain {QUERY_PLACEHOLDER}",
                source.name
            )));
        }

        if !source.search_url.starts_with("http://") && !source.search_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(format!(
                "source '{}' search_url must be an absolute http(s) URL",
                source.name
            )));
        }

        if !seen_names.insert(source.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }
    }

    Ok(())
}
