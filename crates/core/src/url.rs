//! URL normalization, resolution, and host comparison (C1, §4.1).

use url::Url;

use crate::error::CrawlError;

/// Parse `raw` and normalize it: strip the fragment, strip a trailing `/`
/// unless the path is exactly `/`. Scheme, host, port, path, and query are
/// otherwise left as-is (case preserved), except the host is lowercased —
/// host comparison is treated as case-insensitive per §9's open question.
pub fn normalize(raw: &str) -> Result<String, CrawlError> {
    let mut url = Url::parse(raw).map_err(|e| CrawlError::InvalidUrl(e.to_string()))?;
    normalize_url(&mut url);
    Ok(url.to_string())
}

fn normalize_url(url: &mut Url) {
    url.set_fragment(None);
    if let Some(host) = url.host_str() {
        let lower = host.to_lowercase();
        if lower != host {
            let _ = url.set_host(Some(&lower));
        }
    }
    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }
}

/// RFC 3986 reference resolution against `base`, followed by `normalize`.
pub fn resolve(base: &str, reference: &str) -> Result<String, CrawlError> {
    let base_url = Url::parse(base).map_err(|e| CrawlError::InvalidUrl(e.to_string()))?;
    let mut resolved = base_url
        .join(reference)
        .map_err(|e| CrawlError::InvalidUrl(e.to_string()))?;
    normalize_url(&mut resolved);
    Ok(resolved.to_string())
}

/// `true` iff `a` and `b` parse to the same (lowercased) hostname.
pub fn same_host(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => match (a.host_str(), b.host_str()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        },
        _ => false,
    }
}

/// The hostname component of `u`, or empty string if `u` has none.
pub fn domain(u: &str) -> String {
    Url::parse(u)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default()
}
