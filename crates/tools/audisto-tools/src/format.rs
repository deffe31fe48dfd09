//! Plain-text rendering of Audisto responses for agents.

use std::fmt::Display;

use audisto_async::types::{CrawlId, CrawlStatus, CrawlSummary};

/// Number of crawls listed by the status tool
pub const RECENT_CRAWLS_SHOWN: usize = 5;

const NOT_AVAILABLE: &str = "N/A";

fn or_na<T: Display>(value: Option<&T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string)
}

/// Lists the most recent crawls, one line each
#[must_use]
pub fn crawl_status(status: &CrawlStatus) -> String {
    let rows = status.rows();
    if rows.is_empty() {
        return "No recent crawls found.".to_string();
    }

    let mut lines = vec![format!(
        "Here are the latest {RECENT_CRAWLS_SHOWN} Audisto crawls:"
    )];
    for crawl in rows.iter().take(RECENT_CRAWLS_SHOWN) {
        let icon = if crawl.is_finished() { "OK" } else { "IN_PROGRESS" };
        lines.push(format!(
            "[{icon}] ID: {} | Domain: {} | Status: {}",
            or_na(crawl.id.as_ref()),
            or_na(crawl.domain.as_ref()),
            or_na(crawl.status.as_ref()),
        ));
    }
    lines.join("\n")
}

/// Describes a single crawl
#[must_use]
pub fn crawl_summary(crawl_id: CrawlId, summary: &CrawlSummary) -> String {
    format!(
        "Crawl Summary for ID {crawl_id}:\n\
         - Domain: {}\n\
         - Pages Crawled: {}\n\
         - Max Depth Reached: {}\n\
         - Start Time: {}",
        or_na(summary.domain.as_ref()),
        or_na(summary.crawled_pages.as_ref()),
        or_na(summary.max_depth.as_ref()),
        or_na(summary.start_time.as_ref()),
    )
}
