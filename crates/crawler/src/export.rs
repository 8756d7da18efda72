//! Writing an already-collected crawl to JSON or CSV (C11, §4.11). Each
//! function is a pure transform over its data plus a writer — no I/O beyond
//! what the caller hands it, so callers can export to a file, a response
//! body, or an in-memory buffer alike.

use std::collections::BTreeSet;
use std::io::Write;

use seo_crawler_core::error::ExportError;
use seo_crawler_core::types::{PageResult, Summary};

/// Serialize `results` as a JSON array using the field names of a
/// `PageResult` (§6.1).
pub fn write_results_json<W: Write>(results: &[PageResult], w: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(w, results)?;
    Ok(())
}

/// Write `results` as CSV with a fixed column order: url, status_code,
/// response_time_ms, title, meta_description, canonical, h1 (joined by
/// ` | `), internal_link_count, external_link_count, redirect_chain (joined
/// by ` -> `), error (§6.2).
pub fn write_results_csv<W: Write>(results: &[PageResult], w: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(w);
    writer.write_record([
        "url",
        "status_code",
        "response_time_ms",
        "title",
        "meta_description",
        "canonical",
        "h1",
        "internal_link_count",
        "external_link_count",
        "redirect_chain",
        "error",
    ])?;
    for page in results {
        writer.write_record(&csv_row(page))?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_row(page: &PageResult) -> [String; 11] {
    [
        page.url.clone(),
        page.status_code.to_string(),
        page.response_time_ms.to_string(),
        page.title.clone(),
        page.meta_description.clone(),
        page.canonical.clone(),
        page.h1.join(" | "),
        page.internal_links.len().to_string(),
        page.external_links.len().to_string(),
        page.redirect_chain.join(" -> "),
        page.error.clone(),
    ]
}

/// Emit `{nodes, edges}` for a link graph's adjacency mapping: nodes are the
/// sorted-unique union of sources and targets, edges are `[src, tgt]` pairs
/// in the graph's own (insertion) order (§6.3, §4.11).
pub fn write_graph_json<W: Write>(
    graph: &std::collections::HashMap<String, Vec<String>>,
    w: W,
) -> Result<(), ExportError> {
    let mut nodes: BTreeSet<&str> = BTreeSet::new();
    let mut edges: Vec<[&str; 2]> = Vec::new();
    for (source, targets) in graph {
        nodes.insert(source.as_str());
        for target in targets {
            nodes.insert(target.as_str());
            edges.push([source.as_str(), target.as_str()]);
        }
    }

    let body = serde_json::json!({
        "nodes": nodes.into_iter().collect::<Vec<_>>(),
        "edges": edges,
    });
    serde_json::to_writer_pretty(w, &body)?;
    Ok(())
}

/// Emit `summary` as JSON, with `IssueKind` serialized through its stable
/// snake_case string name (§6.4).
pub fn write_summary_json<W: Write>(summary: &Summary, w: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(w, summary)?;
    Ok(())
}
