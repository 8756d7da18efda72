//! Per-host robots.txt fetch, parse, cache, and allow/deny test (C3, §4.3).

mod group;
pub mod pattern;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use seo_crawler_fetcher::Fetcher;

use group::Group;

#[derive(Debug, Clone)]
enum Policy {
    Permissive,
    Rules(Group),
}

/// `host` or `host:port` (lowercased) when `url` carries a non-default
/// port, so two origins sharing a hostname never share a cached policy.
fn origin_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    }
}

/// Caches one robots.txt policy per host behind a read-write lock, so a
/// repeat lookup for the same host never refetches (§4.3, §5).
pub struct RobotsGate {
    cache: RwLock<HashMap<String, Policy>>,
    fetcher: Arc<Fetcher>,
    user_agent: String,
    respect_robots: bool,
}

impl RobotsGate {
    pub fn new(fetcher: Arc<Fetcher>, user_agent: String, respect_robots: bool) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            fetcher,
            user_agent,
            respect_robots,
        }
    }

    /// `true` if `url` may be fetched under the cached (or freshly fetched)
    /// policy for its host (§4.3).
    pub async fn is_allowed(&self, url: &str) -> bool {
        if !self.respect_robots {
            return true;
        }
        let Ok(parsed) = Url::parse(url) else {
            return true;
        };
        if parsed.host_str().is_none() {
            return true;
        };
        // Cache per origin (scheme + host + port), not bare hostname — two
        // hosts sharing a name on different ports have independent
        // robots.txt documents.
        let origin_key = origin_key(&parsed);

        if let Some(policy) = self.cache.read().await.get(&origin_key) {
            return Self::test(policy, parsed.path());
        }

        let policy = self.fetch_policy(&parsed, &origin_key).await;
        let allowed = Self::test(&policy, parsed.path());
        self.cache.write().await.insert(origin_key, policy);
        allowed
    }

    fn test(policy: &Policy, path: &str) -> bool {
        match policy {
            Policy::Permissive => true,
            Policy::Rules(group) => group.is_allowed(path),
        }
    }

    async fn fetch_policy(&self, url: &Url, origin_key: &str) -> Policy {
        let robots_url = format!("{}://{}/robots.txt", url.scheme(), origin_key);
        let result = self.fetcher.fetch(&robots_url).await;
        if result.status_code != 200 {
            debug!(origin = origin_key, status = result.status_code, "robots.txt unavailable, permissive");
            return Policy::Permissive;
        }
        let body = String::from_utf8_lossy(&result.body);
        match group::select_group(&body, &self.user_agent) {
            Some(group) => Policy::Rules(group),
            None => {
                warn!(origin = origin_key, "robots.txt had no parseable groups, permissive");
                Policy::Permissive
            }
        }
    }
}
