//! Sitemap index and URL-set parsing used to seed the frontier (C4, §4.4).

use std::future::Future;
use std::pin::Pin;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};
use url::Url;

use seo_crawler_core::url as urlutil;
use seo_crawler_fetcher::Fetcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Sitemap,
    Url,
}

/// Pull every `<loc>` value out of a sitemap or sitemap-index document,
/// tagged with which container it was found in. Unparseable XML yields no
/// entries rather than an error — sitemap failures never abort a crawl
/// (§4.4, §7).
fn extract_locs(body: &str) -> Vec<(Container, String)> {
    let mut reader = Reader::from_str(body);

    let mut entries = Vec::new();
    let mut current: Option<Container> = None;
    let mut in_loc = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                "sitemap" => current = Some(Container::Sitemap),
                "url" => current = Some(Container::Url),
                "loc" => in_loc = true,
                _ => {}
            },
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                "sitemap" | "url" => current = None,
                "loc" => in_loc = false,
                _ => {}
            },
            Ok(Event::Text(text)) => {
                if in_loc {
                    if let (Some(kind), Ok(unescaped)) = (current, text.unescape()) {
                        let value = unescaped.trim().to_string();
                        if !value.is_empty() {
                            entries.push((kind, value));
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(error = %e, "malformed sitemap XML, stopping parse");
                break;
            }
            _ => {}
        }
        buf.clear();
    }
    entries
}

fn local_name(qname: &[u8]) -> &str {
    let s = std::str::from_utf8(qname).unwrap_or("");
    s.rsplit(':').next().unwrap_or(s)
}

/// Recursively parse a sitemap (or sitemap index) at `url`, returning every
/// normalized page URL it names. Child-sitemap failures are logged and
/// skipped, never propagated to the caller (§4.4).
pub fn parse_sitemap<'a>(
    fetcher: &'a Fetcher,
    url: &'a str,
) -> Pin<Box<dyn Future<Output = Vec<String>> + Send + 'a>> {
    Box::pin(async move {
        let result = fetcher.fetch(url).await;
        if result.status_code != 200 {
            debug!(url, status = result.status_code, "sitemap fetch failed");
            return Vec::new();
        }
        let body = String::from_utf8_lossy(&result.body).into_owned();
        let entries = extract_locs(&body);

        let mut urls = Vec::new();
        let mut child_sitemaps = Vec::new();
        for (kind, loc) in entries {
            match kind {
                Container::Sitemap => child_sitemaps.push(loc),
                Container::Url => {
                    if let Ok(normalized) = urlutil::normalize(&loc) {
                        urls.push(normalized);
                    }
                }
            }
        }

        if !child_sitemaps.is_empty() {
            for child in child_sitemaps {
                let child_urls = parse_sitemap(fetcher, &child).await;
                urls.extend(child_urls);
            }
        }

        urls
    })
}

/// The conventional sitemap location for a site: `<scheme>://<host>/sitemap.xml` (§4.4).
/// Carries the port through when the base URL names a non-default one, so
/// seeding still hits the right origin against a locally-hosted test server.
pub fn discover_sitemap_url(base: &str) -> Option<String> {
    let parsed = Url::parse(base).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}/sitemap.xml", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}/sitemap.xml", parsed.scheme(), host)),
    }
}
