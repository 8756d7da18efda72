use thiserror::Error;

/// Failures that can occur while constructing a `Fetcher` or normalizing a
/// URL (C1, C2). Retry and status-based error strings live on
/// `fetcher::FetchResult` itself, which travels all the way to
/// `PageResult.error` as a plain `String` rather than through this enum.
#[derive(Error, Debug, Clone)]
pub enum CrawlError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failures writing a `CrawlReport` out via the export functions (§4.11).
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV writer error: {0}")]
    Csv(#[from] csv::Error),
}

/// Pre-crawl configuration failures (§7). Unlike `CrawlError`, these abort
/// before a single request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("start_url must not be empty")]
    EmptyStartUrl,

    #[error("start_url is not a valid URL: {0}")]
    InvalidStartUrl(String),

    #[error("workers must be at least 1")]
    ZeroWorkers,

    #[error("max_pages must be at least 1")]
    ZeroMaxPages,
}
