//! Configuration loading from a TOML file.
//!
//! Configuration is optional; every field falls back to the built-in
//! defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! [batch]
//! page_size = 8
//!
//! [scanner]
//! categories = []            # replaces the built-in vocabulary when non-empty
//! extra_categories = ["ZOOLOGÍA"]
//! header_patterns = ['(?i)ronda\s+(\d+)\s+de\s+(\d+)']
//! skip_keywords = ["scratchea"]
//! excluded_nicks = ["Saga_Noren", "VegaSicilia", "Bot", "Server", "GleviBot"]
//! track_chat_nicks = false
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::api::Options;
use crate::batch::DEFAULT_PAGE_SIZE;
use crate::rules::vocabulary::{DEFAULT_EXCLUDED_NICKS, DEFAULT_SKIP_KEYWORDS};
use crate::{Error, Result};

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub batch: BatchSection,

    #[serde(default)]
    pub scanner: ScannerSection,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BatchSection {
    /// Records per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScannerSection {
    /// Replaces the built-in category vocabulary when non-empty.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Labels appended to the vocabulary in use.
    #[serde(default)]
    pub extra_categories: Vec<String>,

    /// Additional header regexes; groups `number`/`total` (or 1 and 2)
    /// carry the question number and the round total.
    #[serde(default)]
    pub header_patterns: Vec<String>,

    #[serde(default = "default_skip_keywords")]
    pub skip_keywords: Vec<String>,

    #[serde(default = "default_excluded_nicks")]
    pub excluded_nicks: Vec<String>,

    #[serde(default)]
    pub track_chat_nicks: bool,
}

impl Default for ScannerSection {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            extra_categories: Vec::new(),
            header_patterns: Vec::new(),
            skip_keywords: default_skip_keywords(),
            excluded_nicks: default_excluded_nicks(),
            track_chat_nicks: false,
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_skip_keywords() -> Vec<String> {
    DEFAULT_SKIP_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_excluded_nicks() -> Vec<String> {
    DEFAULT_EXCLUDED_NICKS.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| Error::ConfigRead { path: path.to_path_buf(), source })?;
        let config: Config =
            toml::from_str(&content).map_err(|source| Error::ConfigParse { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Runtime options described by this configuration.
    pub fn options(&self) -> Options {
        let mut options = Options::default();
        options.page_size = self.batch.page_size;

        if !self.scanner.categories.is_empty() {
            options.categories = self.scanner.categories.clone();
        }
        for extra in &self.scanner.extra_categories {
            if !options.categories.contains(extra) {
                options.categories.push(extra.clone());
            }
        }

        options.header_patterns = self.scanner.header_patterns.clone();
        options.skip_keywords = self.scanner.skip_keywords.clone();
        options.excluded_nicks = self.scanner.excluded_nicks.clone();
        options.track_chat_nicks = self.scanner.track_chat_nicks;
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());

        let options = config.options();
        assert_eq!(options.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(options.skip_keywords, vec!["scratchea".to_string()]);
        assert!(options.excluded_nicks.contains(&"GleviBot".to_string()));
        assert!(options.categories.contains(&"GASTRONOMÍA".to_string()));
    }

    #[test]
    fn categories_replace_and_extend_vocabulary() {
        let config = Config::from_toml_str(
            r#"
            [scanner]
            categories = ["ZOOLOGÍA", "HISTORIA"]
            extra_categories = ["HISTORIA", "BOTÁNICA"]
            "#,
        )
        .unwrap();
        assert_eq!(config.options().categories, vec!["ZOOLOGÍA", "HISTORIA", "BOTÁNICA"]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::from_toml_str("[batch]\npages = 3\n").is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch]\npage_size = 12\n\n[scanner]\ntrack_chat_nicks = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.batch.page_size, 12);
        assert!(config.options().track_chat_nicks);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch\npage_size = ").unwrap();
        assert!(matches!(Config::load(file.path()), Err(Error::ConfigParse { .. })));
    }
}
