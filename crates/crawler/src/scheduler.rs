//! N parallel workers pulling from the frontier, invoking the fetcher,
//! robots gate, and HTML extractor, and feeding results/edges to their
//! sinks (C7, §4.7).

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use seo_crawler_core::types::PageResult;
use seo_crawler_fetcher::Fetcher;
use seo_crawler_frontier::Frontier;
use seo_crawler_graph::LinkGraph;
use seo_crawler_robots::RobotsGate;

pub struct WorkerContext {
    pub frontier: Arc<Frontier>,
    pub robots: Arc<RobotsGate>,
    pub fetcher: Arc<Fetcher>,
    pub graph: Arc<LinkGraph>,
    pub results: mpsc::UnboundedSender<PageResult>,
    pub delay: Duration,
    pub max_retries: u32,
}

/// Spawn `worker_count` workers and return their join handles. Each worker
/// runs until the frontier closes (normal completion) or `cancel` fires.
pub fn spawn_workers(
    ctx: Arc<WorkerContext>,
    worker_count: usize,
    cancel: CancellationToken,
) -> Vec<tokio::task::JoinHandle<()>> {
    (0..worker_count)
        .map(|worker_id| {
            let ctx = ctx.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { worker_loop(worker_id, ctx, cancel).await })
        })
        .collect()
}

async fn worker_loop(worker_id: usize, ctx: Arc<WorkerContext>, cancel: CancellationToken) {
    let mut last_request: Option<Instant> = None;
    loop {
        let item = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(worker_id, "cancelled, exiting");
                break;
            }
            item = ctx.frontier.take() => item,
        };
        let Some(item) = item else {
            debug!(worker_id, "frontier closed, exiting");
            break;
        };
        if cancel.is_cancelled() {
            break;
        }

        process_item(worker_id, &ctx, item.url, item.depth, &mut last_request).await;
        ctx.frontier.mark_done().await;
    }
}

async fn process_item(
    worker_id: usize,
    ctx: &WorkerContext,
    url: String,
    depth: u32,
    last_request: &mut Option<Instant>,
) {
    if !ctx.robots.is_allowed(&url).await {
        debug!(worker_id, url = %url, "blocked by robots.txt");
        emit(ctx, PageResult {
            url: url.clone(),
            status_code: 0,
            response_time_ms: 0,
            title: String::new(),
            meta_description: String::new(),
            canonical: String::new(),
            h1: Vec::new(),
            h2: Vec::new(),
            h3: Vec::new(),
            h4: Vec::new(),
            h5: Vec::new(),
            h6: Vec::new(),
            internal_links: Vec::new(),
            external_links: Vec::new(),
            images: Vec::new(),
            redirect_chain: Vec::new(),
            error: "blocked by robots.txt".to_string(),
            crawled_at: chrono::Utc::now(),
        });
        return;
    }

    if let Some(last) = last_request {
        let elapsed = last.elapsed();
        if elapsed < ctx.delay {
            tokio::time::sleep(ctx.delay - elapsed).await;
        }
    }
    *last_request = Some(Instant::now());

    info!(worker_id, url = %url, depth, "fetching");
    let result = ctx.fetcher.fetch_with_retry(&url, ctx.max_retries).await;

    let is_html = (200..300).contains(&result.status_code)
        && result
            .content_type
            .as_deref()
            .map(|ct| ct.to_lowercase().contains("text/html"))
            .unwrap_or(false);

    let final_url = result.redirect_chain.last().cloned().unwrap_or_else(|| url.clone());
    let base = if is_html {
        url::Url::parse(&final_url).or_else(|_| url::Url::parse(&url)).ok()
    } else {
        None
    };

    let page = if let Some(base) = base {
        let body = String::from_utf8_lossy(&result.body);
        let extracted = seo_crawler_parser::extract(&body, &base);

        for link in &extracted.internal_links {
            ctx.frontier.offer(link.clone(), depth + 1).await;
        }
        let mut all_links = extracted.internal_links.clone();
        all_links.extend(extracted.external_links.clone());
        if !all_links.is_empty() {
            ctx.graph.add_edges(&url, &all_links);
        }

        PageResult {
            url: url.clone(),
            status_code: result.status_code,
            response_time_ms: result.response_time_ms,
            title: extracted.title,
            meta_description: extracted.meta_description,
            canonical: extracted.canonical,
            h1: extracted.h1,
            h2: extracted.h2,
            h3: extracted.h3,
            h4: extracted.h4,
            h5: extracted.h5,
            h6: extracted.h6,
            internal_links: extracted.internal_links,
            external_links: extracted.external_links,
            images: extracted.images,
            redirect_chain: result.redirect_chain,
            error: result.error,
            crawled_at: chrono::Utc::now(),
        }
    } else if is_html {
        // The requested or redirect-final URL failed to re-parse as a base
        // for resolving relative links. The frontier only ever offers
        // already-normalized URLs, so this should not happen in practice;
        // when it does, skip extraction rather than abort the worker.
        warn!(worker_id, url, final_url, "could not parse base URL for extraction");
        PageResult {
            url: url.clone(),
            status_code: result.status_code,
            response_time_ms: result.response_time_ms,
            title: String::new(),
            meta_description: String::new(),
            canonical: String::new(),
            h1: Vec::new(),
            h2: Vec::new(),
            h3: Vec::new(),
            h4: Vec::new(),
            h5: Vec::new(),
            h6: Vec::new(),
            internal_links: Vec::new(),
            external_links: Vec::new(),
            images: Vec::new(),
            redirect_chain: result.redirect_chain,
            error: if result.error.is_empty() {
                "invalid URL: could not parse base for link extraction".to_string()
            } else {
                result.error
            },
            crawled_at: chrono::Utc::now(),
        }
    } else {
        if result.status_code == 0 || !(200..300).contains(&result.status_code) {
            warn!(worker_id, url, status = result.status_code, error = %result.error, "fetch did not succeed");
        }
        PageResult {
            url: url.clone(),
            status_code: result.status_code,
            response_time_ms: result.response_time_ms,
            title: String::new(),
            meta_description: String::new(),
            canonical: String::new(),
            h1: Vec::new(),
            h2: Vec::new(),
            h3: Vec::new(),
            h4: Vec::new(),
            h5: Vec::new(),
            h6: Vec::new(),
            internal_links: Vec::new(),
            external_links: Vec::new(),
            images: Vec::new(),
            redirect_chain: result.redirect_chain,
            error: result.error,
            crawled_at: chrono::Utc::now(),
        }
    };

    emit(ctx, page);
}

fn emit(ctx: &WorkerContext, page: PageResult) {
    if ctx.results.send(page).is_err() {
        warn!("result sink closed while a worker still had output");
    }
}
