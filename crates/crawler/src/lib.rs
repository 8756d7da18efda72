//! Orchestrates one crawl end to end: seeds the frontier, spawns workers,
//! collects results, and runs the analyzer over them (C7, §4.7).

pub mod export;
mod scheduler;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

use seo_crawler_core::config::CrawlConfig;
use seo_crawler_core::error::ConfigError;
use seo_crawler_core::types::{Issue, PageResult, Summary};
use seo_crawler_core::url as urlutil;
use seo_crawler_fetcher::Fetcher;
use seo_crawler_frontier::Frontier;
use seo_crawler_graph::LinkGraph;
use seo_crawler_robots::RobotsGate;

use scheduler::WorkerContext;

/// Everything a crawl produces: the raw per-page results, the link graph
/// between them, the derived issues, and their aggregate summary (§4.10).
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub results: Vec<PageResult>,
    pub graph: HashMap<String, Vec<String>>,
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

/// Run one crawl to completion: seed, fetch, extract, and analyze, honoring
/// `config` throughout (§4.1–§4.10). Returns as soon as the frontier closes
/// and every worker has exited.
pub async fn crawl(config: &CrawlConfig) -> Result<CrawlReport, ConfigError> {
    crawl_cancellable(config, CancellationToken::new()).await
}

/// Same as [`crawl`], but cooperative cancellation can be requested through
/// `cancel`: workers abandon further frontier items and exit once their
/// current in-flight request settles, without emitting a partial
/// `PageResult` for it (§5).
pub async fn crawl_cancellable(
    config: &CrawlConfig,
    cancel: CancellationToken,
) -> Result<CrawlReport, ConfigError> {
    config.validate()?;
    let span = tracing::info_span!("crawl", start_url = %config.start_url);
    run(config, cancel).instrument(span).await
}

async fn run(config: &CrawlConfig, cancel: CancellationToken) -> Result<CrawlReport, ConfigError> {
    let fetcher = Arc::new(
        Fetcher::new(&config.user_agent, config.timeout)
            .map_err(|e| ConfigError::InvalidStartUrl(e.to_string()))?,
    );
    let robots = Arc::new(RobotsGate::new(
        fetcher.clone(),
        config.user_agent.clone(),
        config.respect_robots,
    ));
    let frontier = Arc::new(Frontier::new(config.max_depth, config.max_pages, config.domain_filter));
    let graph = Arc::new(LinkGraph::new());

    let start_url = urlutil::normalize(&config.start_url)
        .map_err(|_| ConfigError::InvalidStartUrl(config.start_url.clone()))?;
    let mut seeds = vec![start_url.clone()];

    if config.parse_sitemap {
        let sitemap_url = seo_crawler_sitemap::discover_sitemap_url(&start_url);
        if let Some(sitemap_url) = sitemap_url {
            info!(sitemap_url, "discovering sitemap seeds");
            let discovered = seo_crawler_sitemap::parse_sitemap(&fetcher, &sitemap_url).await;
            info!(count = discovered.len(), "sitemap seeds discovered");
            seeds.extend(discovered);
        }
    }

    frontier.seed(&seeds).await;

    let (tx, mut rx) = mpsc::unbounded_channel::<PageResult>();
    let ctx = Arc::new(WorkerContext {
        frontier: frontier.clone(),
        robots,
        fetcher: fetcher.clone(),
        graph: graph.clone(),
        results: tx,
        delay: config.delay,
        max_retries: config.max_retries,
    });

    let handles = scheduler::spawn_workers(ctx, config.workers, cancel.clone());

    let mut results = Vec::new();
    while let Some(page) = rx.recv().await {
        debug!(url = %page.url, status_code = page.status_code, "page fetched");
        results.push(page);
    }

    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "worker task panicked");
        }
    }

    let issues = seo_crawler_analyzer::analyze(&results, &fetcher).await;
    let summary = seo_crawler_analyzer::build_summary(&results, &issues);

    Ok(CrawlReport {
        results,
        graph: graph.all_edges(),
        issues,
        summary,
    })
}
