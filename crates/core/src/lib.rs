pub mod config;
pub mod error;
pub mod types;
pub mod url;

pub use config::CrawlConfig;
pub use error::{ConfigError, CrawlError, ExportError};
pub use types::*;
