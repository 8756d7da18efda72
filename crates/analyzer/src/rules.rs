//! Per-page SEO issue rules (C9, §4.9). Pure functions of one `PageResult`
//! — running them twice on the same input yields the same issues (§8).

use seo_crawler_core::types::{Issue, IssueKind, PageResult, Severity};

const TITLE_MAX: usize = 60;
const TITLE_MIN: usize = 30;
const META_MAX: usize = 160;
const META_MIN: usize = 50;
const SLOW_RESPONSE_MS: u64 = 2000;

fn issue(kind: IssueKind, severity: Severity, url: &str, message: impl Into<String>, value: impl Into<String>, recommendation: impl Into<String>) -> Issue {
    Issue {
        kind,
        severity,
        url: url.to_string(),
        message: message.into(),
        value: value.into(),
        recommendation: recommendation.into(),
    }
}

/// Issues derived from failed fetches, independent of §4.9's 200-only rules.
fn broken_link_issue(page: &PageResult) -> Option<Issue> {
    if (400..600).contains(&page.status_code) || !page.error.is_empty() {
        Some(issue(
            IssueKind::BrokenLink,
            Severity::Error,
            &page.url,
            "page could not be fetched successfully",
            if page.error.is_empty() {
                page.status_code.to_string()
            } else {
                page.error.clone()
            },
            "fix or remove the broken link",
        ))
    } else {
        None
    }
}

/// Every rule that applies once a page fetched successfully (§4.9).
fn success_issues(page: &PageResult) -> Vec<Issue> {
    let mut issues = Vec::new();

    if page.title.is_empty() {
        issues.push(issue(
            IssueKind::MissingTitle,
            Severity::Error,
            &page.url,
            "page has no <title>",
            "",
            "add a unique, descriptive title element",
        ));
    } else if page.title.len() > TITLE_MAX {
        issues.push(issue(
            IssueKind::LongTitle,
            Severity::Warning,
            &page.url,
            "title exceeds the recommended length",
            page.title.len().to_string(),
            format!("shorten the title to {TITLE_MAX} characters or fewer"),
        ));
    } else if page.title.len() < TITLE_MIN {
        issues.push(issue(
            IssueKind::ShortTitle,
            Severity::Warning,
            &page.url,
            "title is shorter than recommended",
            page.title.len().to_string(),
            format!("expand the title to at least {TITLE_MIN} characters"),
        ));
    }

    if page.meta_description.is_empty() {
        issues.push(issue(
            IssueKind::MissingMetaDescription,
            Severity::Error,
            &page.url,
            "page has no meta description",
            "",
            "add a meta description summarizing the page",
        ));
    } else if page.meta_description.len() > META_MAX {
        issues.push(issue(
            IssueKind::LongMetaDescription,
            Severity::Warning,
            &page.url,
            "meta description exceeds the recommended length",
            page.meta_description.len().to_string(),
            format!("shorten the meta description to {META_MAX} characters or fewer"),
        ));
    } else if page.meta_description.len() < META_MIN {
        issues.push(issue(
            IssueKind::ShortMetaDescription,
            Severity::Warning,
            &page.url,
            "meta description is shorter than recommended",
            page.meta_description.len().to_string(),
            format!("expand the meta description to at least {META_MIN} characters"),
        ));
    }

    if page.h1.is_empty() {
        issues.push(issue(
            IssueKind::MissingH1,
            Severity::Error,
            &page.url,
            "page has no <h1>",
            "",
            "add exactly one h1 describing the page content",
        ));
    } else if page.h1.len() > 1 {
        issues.push(issue(
            IssueKind::MultipleH1,
            Severity::Warning,
            &page.url,
            "page has more than one <h1>",
            page.h1.len().to_string(),
            "use a single h1 per page",
        ));
    }
    if page.h1.iter().any(|h| h.trim().is_empty()) {
        issues.push(issue(
            IssueKind::EmptyH1,
            Severity::Error,
            &page.url,
            "page has an empty <h1>",
            "",
            "give the h1 non-empty text content",
        ));
    }

    if page.canonical.is_empty() {
        issues.push(issue(
            IssueKind::NoCanonical,
            Severity::Info,
            &page.url,
            "page has no canonical link",
            "",
            "add a rel=canonical link to avoid duplicate-content ambiguity",
        ));
    }

    if page.response_time_ms > SLOW_RESPONSE_MS {
        issues.push(issue(
            IssueKind::SlowResponse,
            Severity::Info,
            &page.url,
            "response time exceeds the recommended threshold",
            page.response_time_ms.to_string(),
            "investigate server or network latency",
        ));
    }

    if !page.redirect_chain.is_empty() {
        issues.push(issue(
            IssueKind::RedirectChain,
            Severity::Warning,
            &page.url,
            "request went through one or more redirects",
            page.redirect_chain.len().to_string(),
            "link directly to the final destination URL",
        ));
    }

    for image in &page.images {
        if image.alt.is_empty() {
            issues.push(issue(
                IssueKind::MissingImageAlt,
                Severity::Warning,
                &page.url,
                "image has no alt text",
                image.url.clone(),
                "add descriptive alt text for accessibility and SEO",
            ));
        }
    }

    issues
}

/// All issues for one `PageResult`, excluding the image-size probe (§4.9's
/// `large_image` rule, which needs network access and a shared cache).
pub fn analyze_page(page: &PageResult) -> Vec<Issue> {
    if let Some(broken) = broken_link_issue(page) {
        return vec![broken];
    }
    if page.status_code == 200 && page.error.is_empty() {
        success_issues(page)
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn page(overrides: impl FnOnce(&mut PageResult)) -> PageResult {
        let mut page = PageResult {
            url: "http://x.com/".to_string(),
            status_code: 200,
            response_time_ms: 100,
            title: "A sufficiently long and descriptive title".to_string(),
            meta_description: "A sufficiently long meta description that clears the minimum length threshold.".to_string(),
            canonical: "http://x.com/".to_string(),
            h1: vec!["Heading".to_string()],
            h2: vec![],
            h3: vec![],
            h4: vec![],
            h5: vec![],
            h6: vec![],
            internal_links: vec![],
            external_links: vec![],
            images: vec![],
            redirect_chain: vec![],
            error: String::new(),
            crawled_at: Utc::now(),
        };
        overrides(&mut page);
        page
    }

    #[test]
    fn clean_page_has_no_issues() {
        let p = page(|_| {});
        assert!(analyze_page(&p).is_empty());
    }

    #[test]
    fn boundary_scenario_single_page_no_links() {
        let p = page(|p| {
            p.title = "Hi".to_string();
            p.meta_description = String::new();
            p.canonical = String::new();
        });
        let issues: Vec<_> = analyze_page(&p).into_iter().map(|i| i.kind).collect();
        assert_eq!(
            issues,
            vec![
                IssueKind::ShortTitle,
                IssueKind::MissingMetaDescription,
                IssueKind::NoCanonical,
            ]
        );
    }

    #[test]
    fn failed_fetch_yields_only_broken_link() {
        let p = page(|p| {
            p.status_code = 503;
            p.error = "HTTP 503".to_string();
        });
        let issues = analyze_page(&p);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::BrokenLink);
    }

    #[test]
    fn robots_denied_yields_broken_link() {
        let p = page(|p| {
            p.status_code = 0;
            p.error = "blocked by robots.txt".to_string();
        });
        let issues = analyze_page(&p);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::BrokenLink);
    }

    #[test]
    fn redirect_chain_flags_issue() {
        let p = page(|p| p.redirect_chain = vec!["http://x.com/b".to_string(), "http://x.com/c".to_string()]);
        let issues = analyze_page(&p);
        assert!(issues.iter().any(|i| i.kind == IssueKind::RedirectChain));
    }

    #[test]
    fn missing_image_alt_is_flagged() {
        let p = page(|p| {
            p.images = vec![
                seo_crawler_core::types::Image { url: "http://x.com/a.png".to_string(), alt: String::new() },
                seo_crawler_core::types::Image { url: "http://x.com/b.png".to_string(), alt: "ok".to_string() },
            ];
        });
        let issues = analyze_page(&p);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingImageAlt);
        assert_eq!(issues[0].value, "http://x.com/a.png");
    }

    #[test]
    fn analyzer_is_pure_and_deterministic() {
        let p = page(|p| p.title = String::new());
        let first = analyze_page(&p);
        let second = analyze_page(&p);
        assert_eq!(
            first.iter().map(|i| i.kind).collect::<Vec<_>>(),
            second.iter().map(|i| i.kind).collect::<Vec<_>>()
        );
    }
}
