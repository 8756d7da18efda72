use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::{DomainFilter, ExportFormat};

/// The configuration record handed in by the external CLI/API collaborator
/// (§6). The core only validates and consumes it; parsing a config file is
/// that collaborator's job.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub start_url: String,
    pub max_depth: u32,
    pub max_pages: usize,
    pub domain_filter: DomainFilter,
    pub workers: usize,
    pub delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub respect_robots: bool,
    pub parse_sitemap: bool,
    pub max_retries: u32,
    pub export_format: ExportFormat,
    pub export_path: Option<PathBuf>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: String::new(),
            max_depth: 3,
            max_pages: 100,
            domain_filter: DomainFilter::Same,
            workers: 4,
            delay: Duration::from_millis(0),
            timeout: Duration::from_secs(30),
            user_agent: "seo-crawler/0.1".to_string(),
            respect_robots: true,
            parse_sitemap: false,
            max_retries: 2,
            export_format: ExportFormat::Json,
            export_path: None,
        }
    }
}

impl CrawlConfig {
    /// Configuration errors abort the crawl before it starts (§7); all other
    /// failures are recorded as data on the affected `PageResult`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_url.trim().is_empty() {
            return Err(ConfigError::EmptyStartUrl);
        }
        if crate::url::normalize(&self.start_url).is_err() {
            return Err(ConfigError::InvalidStartUrl(self.start_url.clone()));
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.max_pages == 0 {
            return Err(ConfigError::ZeroMaxPages);
        }
        Ok(())
    }
}
