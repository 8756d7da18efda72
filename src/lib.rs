//! Concurrent web-crawling and SEO-analysis core.
//!
//! This crate is a library: it has no CLI, no config-file loader, and no
//! persistence layer. A host application builds a [`CrawlConfig`], calls
//! [`crawl`], and does whatever it wants with the resulting [`CrawlReport`]
//! (serve it over HTTP, store it, hand it to a dashboard — all out of
//! scope here).

pub use seo_crawler_analyzer as analyzer;
pub use seo_crawler_core::{
    config::CrawlConfig,
    error::{ConfigError, CrawlError},
    types::*,
    url,
};
pub use seo_crawler_crawler::{crawl, export, CrawlReport};
pub use seo_crawler_fetcher as fetcher;
pub use seo_crawler_frontier as frontier;
pub use seo_crawler_graph as graph;
pub use seo_crawler_robots as robots;
pub use seo_crawler_sitemap as sitemap;
