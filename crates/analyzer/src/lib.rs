//! Per-page and aggregate SEO issue derivation (C9), plus the summary
//! builder that turns a crawl's results and issues into one `Summary`
//! (C10, §4.9–§4.10).

mod image_probe;
mod rules;
mod summary;

use seo_crawler_core::types::{Issue, PageResult, Summary};
use seo_crawler_fetcher::Fetcher;

pub use rules::analyze_page;
pub use summary::{build_summary, top_issues};

/// Every issue derived from `results`: per-page rules plus the image-size
/// probe, which needs network access and a cross-page cache (§4.9).
pub async fn analyze(results: &[PageResult], fetcher: &Fetcher) -> Vec<Issue> {
    let mut issues: Vec<Issue> = results.iter().flat_map(analyze_page).collect();
    issues.extend(image_probe::probe_images(results, fetcher).await);
    issues
}
