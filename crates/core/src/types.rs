use serde::{Deserialize, Serialize};

/// One image reference extracted from a page (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub alt: String,
}

/// Everything extracted from a single fetched URL. Immutable once emitted by
/// the worker scheduler (§3 invariant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub status_code: u16,
    pub response_time_ms: u64,
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
    pub redirect_chain: Vec<String>,
    pub error: String,
    pub crawled_at: chrono::DateTime<chrono::Utc>,
}

impl PageResult {
    pub fn is_failure(&self) -> bool {
        self.status_code >= 400 || !self.error.is_empty()
    }
}

/// A discovered-but-not-yet-fetched URL, carried through the frontier (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    pub url: String,
    pub depth: u32,
}

/// The closed enumeration of detectable SEO defects (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingTitle,
    LongTitle,
    ShortTitle,
    MissingMetaDescription,
    LongMetaDescription,
    ShortMetaDescription,
    MissingH1,
    MultipleH1,
    EmptyH1,
    NoCanonical,
    SlowResponse,
    RedirectChain,
    BrokenLink,
    LargeImage,
    MissingImageAlt,
}

impl IssueKind {
    /// The stable string name used in serialized output (§6).
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingTitle => "missing_title",
            IssueKind::LongTitle => "long_title",
            IssueKind::ShortTitle => "short_title",
            IssueKind::MissingMetaDescription => "missing_meta_description",
            IssueKind::LongMetaDescription => "long_meta_description",
            IssueKind::ShortMetaDescription => "short_meta_description",
            IssueKind::MissingH1 => "missing_h1",
            IssueKind::MultipleH1 => "multiple_h1",
            IssueKind::EmptyH1 => "empty_h1",
            IssueKind::NoCanonical => "no_canonical",
            IssueKind::SlowResponse => "slow_response",
            IssueKind::RedirectChain => "redirect_chain",
            IssueKind::BrokenLink => "broken_link",
            IssueKind::LargeImage => "large_image",
            IssueKind::MissingImageAlt => "missing_image_alt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub url: String,
    pub message: String,
    pub value: String,
    pub recommendation: String,
}

/// One row of the `slowest_pages` ranking in `Summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowPage {
    pub url: String,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_pages: usize,
    pub total_issues: usize,
    pub issues_by_type: std::collections::BTreeMap<IssueKind, usize>,
    pub issues: Vec<Issue>,
    pub average_response_time_ms: u64,
    pub pages_with_errors: usize,
    pub pages_with_redirects: usize,
    pub total_internal_links: usize,
    pub total_external_links: usize,
    pub slowest_pages: Vec<SlowPage>,
}

/// Whether a crawl restricts discovered links to the seed's host (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainFilter {
    Same,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}
