//! Single-shot HTTP fetch with redirect-chain capture, plus a retry wrapper
//! (C2, §4.2).

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::{Method, Url};
use tracing::{debug, warn};

use seo_crawler_core::error::CrawlError;

const MAX_REDIRECTS: usize = 10;
const ACCEPT_HEADER: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Result of a single `Fetch` (or `FetchWithRetry`) call.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub status_code: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub redirect_chain: Vec<String>,
    pub response_time_ms: u64,
    pub error: String,
}

impl FetchResult {
    fn transport_failure(redirect_chain: Vec<String>, elapsed: Duration, error: String) -> Self {
        Self {
            status_code: 0,
            body: Vec::new(),
            content_type: None,
            content_length: None,
            redirect_chain,
            response_time_ms: elapsed.as_millis() as u64,
            error,
        }
    }

    /// Retryable per §4.2: 5xx, or a transport error naming one of the
    /// known-transient conditions.
    pub fn is_retryable(&self) -> bool {
        if (500..600).contains(&self.status_code) {
            return true;
        }
        let msg = self.error.to_lowercase();
        ["timeout", "connection refused", "no such host", "network is unreachable"]
            .iter()
            .any(|needle| msg.contains(needle))
    }
}

pub struct Fetcher {
    client: reqwest::Client,
    max_body_size: usize,
}

impl Fetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CrawlError> {
        Self::with_max_body_size(user_agent, timeout, 20 * 1024 * 1024)
    }

    pub fn with_max_body_size(
        user_agent: &str,
        timeout: Duration,
        max_body_size: usize,
    ) -> Result<Self, CrawlError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(ACCEPT_HEADER),
        );
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| CrawlError::Network(e.to_string()))?;
        Ok(Self { client, max_body_size })
    }

    /// Single-shot GET, following redirects manually so the chain can be
    /// recorded (§4.2).
    pub async fn fetch(&self, url: &str) -> FetchResult {
        self.fetch_method(Method::GET, url, self.max_body_size).await
    }

    /// HEAD request used by the image-size probe (§4.9); also follows
    /// redirects, capped the same way.
    pub async fn head(&self, url: &str) -> FetchResult {
        self.fetch_method(Method::HEAD, url, 0).await
    }

    /// GET capped at `max_bytes`, used as the image-size probe's fallback
    /// when a HEAD response has no Content-Length (§4.9).
    pub async fn get_capped(&self, url: &str, max_bytes: usize) -> FetchResult {
        self.fetch_method(Method::GET, url, max_bytes).await
    }

    async fn fetch_method(&self, method: Method, url: &str, body_cap: usize) -> FetchResult {
        let start = Instant::now();
        let mut current = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                return FetchResult::transport_failure(
                    Vec::new(),
                    start.elapsed(),
                    format!("invalid URL: {e}"),
                )
            }
        };
        let mut redirect_chain = Vec::new();

        for hop in 0..=MAX_REDIRECTS {
            let resp = match self
                .client
                .request(method.clone(), current.clone())
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    warn!(url = %current, error = %e, "fetch failed");
                    return FetchResult::transport_failure(
                        redirect_chain,
                        start.elapsed(),
                        e.to_string(),
                    );
                }
            };

            let status = resp.status();
            if status.is_redirection() && hop < MAX_REDIRECTS {
                let location = resp
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(|s| s.to_string());
                match location.and_then(|loc| current.join(&loc).ok()) {
                    Some(next) => {
                        redirect_chain.push(next.to_string());
                        current = next;
                        continue;
                    }
                    None => {
                        // Redirect status with no usable Location — treat as final.
                    }
                }
            } else if status.is_redirection() {
                return FetchResult::transport_failure(
                    redirect_chain,
                    start.elapsed(),
                    "too many redirects".to_string(),
                );
            }

            let content_type = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());
            let content_length = resp
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let status_code = status.as_u16();

            let body = if body_cap == 0 {
                Vec::new()
            } else {
                match read_capped(resp, body_cap).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        return FetchResult::transport_failure(
                            redirect_chain,
                            start.elapsed(),
                            e,
                        )
                    }
                }
            };

            let error = if (200..300).contains(&status_code) {
                String::new()
            } else {
                format!("HTTP {status_code}")
            };

            debug!(url = %current, status_code, hops = redirect_chain.len(), "fetched");
            return FetchResult {
                status_code,
                body,
                content_type,
                content_length,
                redirect_chain,
                response_time_ms: start.elapsed().as_millis() as u64,
                error,
            };
        }

        FetchResult::transport_failure(
            redirect_chain,
            start.elapsed(),
            "too many redirects".to_string(),
        )
    }

    /// Attempts once, then up to `max_retries` more times with exponential
    /// backoff (1s, 2s, 4s, …). Returns the last result regardless of
    /// outcome (§4.2).
    pub async fn fetch_with_retry(&self, url: &str, max_retries: u32) -> FetchResult {
        let mut attempt = 0u32;
        loop {
            let result = self.fetch(url).await;
            if attempt >= max_retries || !result.is_retryable() {
                return result;
            }
            let backoff = Duration::from_secs(1u64 << attempt);
            debug!(url, attempt, ?backoff, "retrying fetch");
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}

async fn read_capped(resp: reqwest::Response, cap: usize) -> Result<Vec<u8>, String> {
    use futures_util::StreamExt;

    let mut stream = resp.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| e.to_string())?;
        body.extend_from_slice(&chunk);
        if body.len() >= cap {
            body.truncate(cap);
            break;
        }
    }
    Ok(body)
}
