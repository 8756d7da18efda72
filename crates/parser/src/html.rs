//! Streaming-style HTML extraction (C5, §4.5).
//!
//! `scraper` still materializes a DOM internally, but we only ever walk it
//! with narrow CSS selectors and pull text/attributes out immediately —
//! nothing here holds on to node references past a single pass, so memory
//! pressure stays proportional to one page, the same shape the teacher's
//! extractor used for its own selector-driven passes.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use seo_crawler_core::types::Image;
use seo_crawler_core::url as urlutil;

/// Everything the extractor can produce from response bytes, minus the
/// fields the caller (the worker scheduler) fills in itself: `url`,
/// `status_code`, `response_time_ms`, `redirect_chain`, `error` (§4.5).
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub title: String,
    pub meta_description: String,
    pub canonical: String,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    pub images: Vec<Image>,
}

/// Extract SEO-relevant facts from `body`, resolving relative references
/// against `base_url` (the final URL after redirects).
///
/// Lenient by design (§7): malformed markup never produces an error, it
/// just leaves the affected field empty or short.
pub fn extract(body: &str, base_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(body);

    let title = first_text(&document, "title");
    let meta_description = meta_content(&document, "description");
    let canonical = canonical_link(&document, base_url);

    let h1 = heading_texts(&document, "h1");
    let h2 = heading_texts(&document, "h2");
    let h3 = heading_texts(&document, "h3");
    let h4 = heading_texts(&document, "h4");
    let h5 = heading_texts(&document, "h5");
    let h6 = heading_texts(&document, "h6");

    let (internal_links, external_links) = extract_links(&document, base_url);
    let images = extract_images(&document, base_url);

    ExtractedPage {
        title,
        meta_description,
        canonical,
        h1,
        h2,
        h3,
        h4,
        h5,
        h6,
        internal_links,
        external_links,
        images,
    }
}

fn selector(s: &str) -> Option<Selector> {
    Selector::parse(s).ok()
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, tag: &str) -> String {
    selector(tag)
        .and_then(|s| document.select(&s).next())
        .map(element_text)
        .unwrap_or_default()
}

fn heading_texts(document: &Html, tag: &str) -> Vec<String> {
    match selector(tag) {
        Some(s) => document.select(&s).map(element_text).collect(),
        None => Vec::new(),
    }
}

/// First `<meta name="description">`, case-insensitive on the name (§4.5).
fn meta_content(document: &Html, name: &str) -> String {
    let Some(sel) = selector("meta[name]") else {
        return String::new();
    };
    document
        .select(&sel)
        .find(|el| {
            el.value()
                .attr("name")
                .map(|n| n.eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .unwrap_or_default()
}

fn canonical_link(document: &Html, base_url: &Url) -> String {
    let Some(sel) = selector("link[rel]") else {
        return String::new();
    };
    document
        .select(&sel)
        .find(|el| {
            el.value()
                .attr("rel")
                .map(|r| r.eq_ignore_ascii_case("canonical"))
                .unwrap_or(false)
        })
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| urlutil::resolve(base_url.as_str(), href).ok())
        .unwrap_or_default()
}

/// `true` for schemes the spec says to drop outright, and for pure
/// fragment references (`href="#top"`) (§4.5).
fn is_dropped_href(href: &str) -> bool {
    let trimmed = href.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return true;
    }
    let lower = trimmed.to_lowercase();
    ["mailto:", "tel:", "javascript:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

fn extract_links(document: &Html, base_url: &Url) -> (Vec<String>, Vec<String>) {
    let mut internal = Vec::new();
    let mut external = Vec::new();
    let mut seen_internal = std::collections::HashSet::new();
    let mut seen_external = std::collections::HashSet::new();

    let Some(sel) = selector("a[href]") else {
        return (internal, external);
    };

    for el in document.select(&sel) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if is_dropped_href(href) {
            continue;
        }
        let Ok(resolved) = urlutil::resolve(base_url.as_str(), href) else {
            continue;
        };
        if urlutil::same_host(base_url.as_str(), &resolved) {
            if seen_internal.insert(resolved.clone()) {
                internal.push(resolved);
            }
        } else if seen_external.insert(resolved.clone()) {
            external.push(resolved);
        }
    }

    (internal, external)
}

fn extract_images(document: &Html, base_url: &Url) -> Vec<Image> {
    let mut images = Vec::new();
    let mut seen = std::collections::HashSet::new();

    let Some(sel) = selector("img") else {
        return images;
    };

    for el in document.select(&sel) {
        let Some(src) = el.value().attr("src") else {
            continue;
        };
        let Ok(resolved) = urlutil::resolve(base_url.as_str(), src) else {
            continue;
        };
        if !seen.insert(resolved.clone()) {
            continue;
        }
        let alt = el.value().attr("alt").unwrap_or("").to_string();
        images.push(Image { url: resolved, alt });
    }

    images
}
