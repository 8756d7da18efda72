//! Deduped, depth-bounded, domain-scoped work queue (C6, §4.6).
//!
//! The visited set and the queue live behind one lock so "insert into
//! visited" and "enqueue" happen atomically — two workers racing to offer
//! the same URL can never both win (§5).

use std::collections::{HashSet, VecDeque};

use tokio::sync::{Mutex, Notify};
use tracing::debug;

use seo_crawler_core::types::{DomainFilter, FrontierItem};
use seo_crawler_core::url as urlutil;

struct State {
    queue: VecDeque<FrontierItem>,
    visited: HashSet<String>,
    accepted: usize,
    /// Accepted items not yet reported done via `mark_done` — covers both
    /// items still queued and items a worker currently has in hand.
    pending: usize,
    seed_host: Option<String>,
    closed: bool,
}

/// The frontier of discovered-but-not-yet-fetched URLs.
///
/// `Take` blocks until an item is available or the frontier is closed and
/// drained; `Offer`/`Seed` are safe to call concurrently from any number of
/// workers.
pub struct Frontier {
    state: Mutex<State>,
    notify: Notify,
    max_depth: u32,
    max_pages: usize,
    domain_filter: DomainFilter,
}

impl Frontier {
    pub fn new(max_depth: u32, max_pages: usize, domain_filter: DomainFilter) -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                visited: HashSet::new(),
                accepted: 0,
                pending: 0,
                seed_host: None,
                closed: false,
            }),
            notify: Notify::new(),
            max_depth,
            max_pages,
            domain_filter,
        }
    }

    /// Seed the frontier at depth 0 (§4.6). The first seed's host becomes
    /// the scope boundary for `DomainFilter::Same`.
    pub async fn seed(&self, urls: &[String]) -> usize {
        {
            let mut state = self.state.lock().await;
            if state.seed_host.is_none() {
                if let Some(first) = urls.first() {
                    state.seed_host = Some(urlutil::domain(first));
                }
            }
        }
        let mut accepted = 0;
        for raw in urls {
            let Ok(normalized) = urlutil::normalize(raw) else {
                continue;
            };
            if self.offer(normalized, 0).await {
                accepted += 1;
            }
        }
        accepted
    }

    /// Offer one URL at `depth`. Returns whether it was accepted (§4.6).
    pub async fn offer(&self, url: String, depth: u32) -> bool {
        if depth > self.max_depth {
            debug!(url = %url, depth, "frontier: rejected, beyond max_depth");
            return false;
        }
        let mut state = self.state.lock().await;
        if state.accepted >= self.max_pages {
            debug!(url = %url, "frontier: rejected, max_pages reached");
            return false;
        }
        if state.visited.contains(&url) {
            debug!(url = %url, "frontier: rejected, already visited");
            return false;
        }
        if self.domain_filter == DomainFilter::Same {
            if let Some(seed_host) = &state.seed_host {
                if !seed_host.is_empty() && &urlutil::domain(&url) != seed_host {
                    debug!(url = %url, "frontier: rejected, outside seed host");
                    return false;
                }
            }
        }
        state.visited.insert(url.clone());
        state.accepted += 1;
        state.pending += 1;
        if state.seed_host.is_none() {
            state.seed_host = Some(urlutil::domain(&url));
        }
        debug!(url = %url, depth, "frontier: accepted");
        state.queue.push_back(FrontierItem { url, depth });
        drop(state);
        self.notify.notify_waiters();
        true
    }

    /// Report that a worker has finished entirely with one item — including
    /// any child URLs it offered as a result (§4.7's "driver waits until the
    /// frontier is empty and all workers are idle"). Once every accepted
    /// item has been reported done, the frontier auto-closes: no accepted
    /// item can still be in flight to produce more work.
    pub async fn mark_done(&self) {
        let mut state = self.state.lock().await;
        state.pending = state.pending.saturating_sub(1);
        if state.pending == 0 {
            state.closed = true;
            drop(state);
            self.notify.notify_waiters();
        }
    }

    /// Blocking removal of the next item. Returns `None` once the frontier
    /// is closed and drained — never before (§4.6).
    pub async fn take(&self) -> Option<FrontierItem> {
        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(item) = state.queue.pop_front() {
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Mark the frontier as having no more producers. Pending items still
    /// drain via `take`; only an empty queue after this returns `None`.
    pub async fn close(&self) {
        self.state.lock().await.closed = true;
        self.notify.notify_waiters();
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.queue.is_empty()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    pub async fn accepted_count(&self) -> usize {
        self.state.lock().await.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_beyond_max_depth() {
        let f = Frontier::new(1, 100, DomainFilter::All);
        assert!(f.offer("http://x.com/a".into(), 1).await);
        assert!(!f.offer("http://x.com/b".into(), 2).await);
    }

    #[tokio::test]
    async fn dedups_visited_urls() {
        let f = Frontier::new(5, 100, DomainFilter::All);
        assert!(f.offer("http://x.com/a".into(), 0).await);
        assert!(!f.offer("http://x.com/a".into(), 1).await);
    }

    #[tokio::test]
    async fn caps_at_max_pages() {
        let f = Frontier::new(5, 1, DomainFilter::All);
        assert!(f.offer("http://x.com/a".into(), 0).await);
        assert!(!f.offer("http://x.com/b".into(), 0).await);
    }

    #[tokio::test]
    async fn domain_filter_same_rejects_cross_host() {
        let f = Frontier::new(5, 100, DomainFilter::Same);
        f.seed(&["http://x.com/".to_string()]).await;
        assert!(!f.offer("http://y.com/a".into(), 1).await);
        assert!(f.offer("http://x.com/a".into(), 1).await);
    }

    #[tokio::test]
    async fn domain_filter_all_allows_cross_host() {
        let f = Frontier::new(5, 100, DomainFilter::All);
        f.seed(&["http://x.com/".to_string()]).await;
        assert!(f.offer("http://y.com/a".into(), 1).await);
    }

    #[tokio::test]
    async fn take_drains_then_reports_closed() {
        let f = Frontier::new(5, 100, DomainFilter::All);
        f.offer("http://x.com/a".into(), 0).await;
        f.close().await;
        assert_eq!(f.take().await.map(|i| i.url), Some("http://x.com/a".to_string()));
        assert_eq!(f.take().await, None);
    }

    #[tokio::test]
    async fn auto_closes_once_all_accepted_items_are_marked_done() {
        let f = Frontier::new(5, 100, DomainFilter::All);
        f.offer("http://x.com/a".into(), 0).await;
        assert_eq!(f.take().await.map(|i| i.url), Some("http://x.com/a".to_string()));
        // mark_done is the last thing a worker does for this item; only
        // after it runs does the frontier have no more in-flight work.
        f.mark_done().await;
        assert_eq!(f.take().await, None);
    }

    #[tokio::test]
    async fn stays_open_while_any_item_is_still_in_flight() {
        let f = Frontier::new(5, 100, DomainFilter::All);
        f.offer("http://x.com/a".into(), 0).await;
        f.offer("http://x.com/b".into(), 0).await;
        let a = f.take().await.unwrap();
        assert_eq!(a.url, "http://x.com/a");
        f.mark_done().await;
        // "b" is still queued/in-flight, so take() must still return it.
        let b = f.take().await.unwrap();
        assert_eq!(b.url, "http://x.com/b");
        f.mark_done().await;
        assert_eq!(f.take().await, None);
    }

    #[tokio::test]
    async fn take_blocks_until_offer_then_wakes() {
        use std::sync::Arc;
        let f = Arc::new(Frontier::new(5, 100, DomainFilter::All));
        let f2 = f.clone();
        let handle = tokio::spawn(async move { f2.take().await });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        f.offer("http://x.com/a".into(), 0).await;
        let item = handle.await.unwrap();
        assert_eq!(item.map(|i| i.url), Some("http://x.com/a".to_string()));
    }
}
