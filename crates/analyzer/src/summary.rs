//! Aggregate counters, rankings, and severity histogram over a crawl's
//! results and issues (C10, §4.10).

use std::collections::BTreeMap;

use seo_crawler_core::types::{Issue, IssueKind, PageResult, SlowPage, Summary};

const SLOW_THRESHOLD_MS: u64 = 2000;
const SLOWEST_PAGES_LIMIT: usize = 5;

pub fn build_summary(results: &[PageResult], issues: &[Issue]) -> Summary {
    let total_pages = results.len();
    let total_issues = issues.len();

    let mut issues_by_type: BTreeMap<IssueKind, usize> = BTreeMap::new();
    for issue in issues {
        *issues_by_type.entry(issue.kind).or_insert(0) += 1;
    }

    let average_response_time_ms = if total_pages == 0 {
        0
    } else {
        let sum: u64 = results.iter().map(|p| p.response_time_ms).sum();
        (sum as f64 / total_pages as f64).round() as u64
    };

    let pages_with_errors = results.iter().filter(|p| p.is_failure()).count();
    let pages_with_redirects = results.iter().filter(|p| !p.redirect_chain.is_empty()).count();
    let total_internal_links = results.iter().map(|p| p.internal_links.len()).sum();
    let total_external_links = results.iter().map(|p| p.external_links.len()).sum();

    let mut slowest_pages: Vec<SlowPage> = results
        .iter()
        .filter(|p| p.response_time_ms > SLOW_THRESHOLD_MS)
        .map(|p| SlowPage {
            url: p.url.clone(),
            response_time_ms: p.response_time_ms,
        })
        .collect();
    slowest_pages.sort_by(|a, b| b.response_time_ms.cmp(&a.response_time_ms));
    slowest_pages.truncate(SLOWEST_PAGES_LIMIT);

    Summary {
        total_pages,
        total_issues,
        issues_by_type,
        issues: issues.to_vec(),
        average_response_time_ms,
        pages_with_errors,
        pages_with_redirects,
        total_internal_links,
        total_external_links,
        slowest_pages,
    }
}

/// The `k` most common issue kinds, ties broken by kind name ascending (§4.10).
pub fn top_issues(summary: &Summary, k: usize) -> Vec<(IssueKind, usize)> {
    let mut counts: Vec<(IssueKind, usize)> = summary.issues_by_type.iter().map(|(k, v)| (*k, *v)).collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    counts.truncate(k);
    counts
}
