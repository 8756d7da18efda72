//! Image-size probe: HEAD (falling back to a capped GET) each unique image
//! URL once per crawl, flagging oversized images (C9, §4.9).

use std::collections::HashMap;

use seo_crawler_core::types::{Issue, IssueKind, PageResult, Severity};
use seo_crawler_fetcher::Fetcher;

const LARGE_IMAGE_BYTES: u64 = 100 * 1024;
const FALLBACK_GET_CAP: usize = 1024 * 1024;

/// Probes every unique image URL across `pages` at most once, regardless of
/// how many pages reference it (§4.9's "cache per crawl").
pub async fn probe_images(pages: &[PageResult], fetcher: &Fetcher) -> Vec<Issue> {
    let mut cache: HashMap<String, Option<u64>> = HashMap::new();
    let mut issues = Vec::new();

    for page in pages {
        for image in &page.images {
            let size = match cache.get(&image.url) {
                Some(cached) => *cached,
                None => {
                    let size = probe_one(fetcher, &image.url).await;
                    cache.insert(image.url.clone(), size);
                    size
                }
            };
            if let Some(bytes) = size {
                if bytes > LARGE_IMAGE_BYTES {
                    issues.push(Issue {
                        kind: IssueKind::LargeImage,
                        severity: Severity::Warning,
                        url: page.url.clone(),
                        message: "image exceeds the recommended size".to_string(),
                        value: format!("{} bytes ({})", bytes, image.url),
                        recommendation: "compress or resize the image".to_string(),
                    });
                }
            }
        }
    }

    issues
}

/// Fetch failures are silent (§4.9): `None` simply skips the rule for that
/// image rather than producing an error.
async fn probe_one(fetcher: &Fetcher, url: &str) -> Option<u64> {
    let head = fetcher.head(url).await;
    if head.status_code == 200 {
        if let Some(len) = head.content_length {
            return Some(len);
        }
        let body = fetcher.get_capped(url, FALLBACK_GET_CAP).await;
        if body.status_code == 200 {
            return Some(body.body.len() as u64);
        }
        return None;
    }
    None
}
