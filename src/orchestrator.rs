//! Per-source fetch orchestration with failure isolation.
//!
//! Walks the registry in order and produces exactly one [`SourceResult`]
//! per source. Nothing thrown by an adapter escapes a source's boundary:
//! network errors, non-success statuses, and parse failures all become a
//! warning string with an empty item list, and the remaining sources still
//! run.
//!
//! Sources are processed strictly one at a time, a politeness constraint
//! toward remote hosts, not an incidental limitation. Within one source,
//! per-article image resolution runs on a bounded, order-preserving worker
//! pool, since those requests target many distinct article URLs.

use crate::feed;
use crate::graph;
use crate::images;
use crate::models::{Item, RawEntry, Source, SourceResult, SourceType};
use crate::normalize;
use crate::scrapers::ScrapeKind;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

/// Warning attached to sources with no feed and no registered capability.
pub const LINK_ONLY_WARNING: &str = "No rssUrl configured (link-only source).";

/// How a source's entries are obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adapter {
    /// A registered site-specific scrape capability.
    Scrape(ScrapeKind),
    /// The syndication feed at the contained URL.
    Feed(String),
    /// The Graph API, for facebook-type sources.
    Graph,
    /// No way to fetch items; the source is listed but contributes none.
    LinkOnly,
}

/// Select the adapter for a source.
///
/// Priority: a registered scrape capability (only when the source has no
/// feed), then the feed, then the Graph API for facebook sources, then
/// link-only.
pub fn select_adapter(source: &Source) -> Adapter {
    if source.rss_url.is_empty() {
        if let Some(kind) = ScrapeKind::for_source(&source.id) {
            return Adapter::Scrape(kind);
        }
    }
    if !source.rss_url.is_empty() {
        return Adapter::Feed(source.rss_url.clone());
    }
    if source.source_type == SourceType::Facebook {
        return Adapter::Graph;
    }
    Adapter::LinkOnly
}

/// Process every source, in registry order. Never fails.
pub async fn run(
    client: &reqwest::Client,
    sources: &[Source],
    facebook_token: Option<&str>,
    image_workers: usize,
) -> Vec<SourceResult> {
    let mut results = Vec::with_capacity(sources.len());
    for source in sources {
        let result = fetch_source(client, source, facebook_token, image_workers).await;
        results.push(result);
    }
    results
}

/// Produce the single [`SourceResult`] for one source.
#[instrument(level = "info", skip_all, fields(source = %source.id))]
async fn fetch_source(
    client: &reqwest::Client,
    source: &Source,
    facebook_token: Option<&str>,
    image_workers: usize,
) -> SourceResult {
    let adapter = select_adapter(source);
    info!(?adapter, "Fetching source");

    let (entries, warning) = match &adapter {
        Adapter::Scrape(kind) => match kind.fetch(client).await {
            Ok(entries) => (entries, None),
            Err(e) => (Vec::new(), Some(format!("Scraping failed: {e}"))),
        },
        Adapter::Feed(url) => match feed::fetch_feed(client, url).await {
            Ok(entries) => (entries, None),
            Err(e) => (Vec::new(), Some(format!("Failed to fetch/parse feed: {e}"))),
        },
        Adapter::Graph => match graph::fetch_posts(client, source, facebook_token).await {
            Ok(entries) => (entries, None),
            Err(e) => (Vec::new(), Some(format!("Facebook fetch failed: {e}"))),
        },
        Adapter::LinkOnly => (Vec::new(), Some(LINK_ONLY_WARNING.to_string())),
    };

    if let Some(warning) = &warning {
        warn!(%warning, "Source degraded");
    }

    let items = normalize_entries(client, source, entries, image_workers).await;
    info!(count = items.len(), "Source finished");

    SourceResult {
        source: source.clone(),
        items,
        warning,
    }
}

/// Resolve images and normalize every raw entry, preserving entry order.
async fn normalize_entries(
    client: &reqwest::Client,
    source: &Source,
    entries: Vec<RawEntry>,
    image_workers: usize,
) -> Vec<Item> {
    stream::iter(entries)
        .map(move |entry| async move {
            let images = images::resolve(client, &entry, entry.link.trim()).await;
            normalize::build_item(&entry, source, images)
        })
        .buffered(image_workers.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompanyGroup;

    fn source(id: &str, rss_url: &str, source_type: SourceType) -> Source {
        Source {
            id: id.to_string(),
            company: "Acme".to_string(),
            company_group: CompanyGroup::Ours,
            source_type,
            title: "Acme".to_string(),
            page_url: "https://acme.example".to_string(),
            rss_url: rss_url.to_string(),
        }
    }

    #[test]
    fn test_select_adapter_priority() {
        // Registered capability, no feed: scrape.
        assert_eq!(
            select_adapter(&source("competitor1-news", "", SourceType::Website)),
            Adapter::Scrape(ScrapeKind::CompassNews)
        );
        // Registered capability but a feed exists: the feed wins.
        assert_eq!(
            select_adapter(&source(
                "competitor1-news",
                "https://x.example/feed",
                SourceType::Website
            )),
            Adapter::Feed("https://x.example/feed".to_string())
        );
        // Feed only.
        assert_eq!(
            select_adapter(&source("plain", "https://x.example/feed", SourceType::Website)),
            Adapter::Feed("https://x.example/feed".to_string())
        );
        // Facebook source without a feed: Graph.
        assert_eq!(
            select_adapter(&source("acme-fb", "", SourceType::Facebook)),
            Adapter::Graph
        );
        // Nothing at all: link-only.
        assert_eq!(
            select_adapter(&source("bare", "", SourceType::Website)),
            Adapter::LinkOnly
        );
    }

    #[tokio::test]
    async fn test_link_only_source_warns_and_yields_nothing() {
        let client = reqwest::Client::new();
        let s = source("bare", "", SourceType::Website);
        let result = fetch_source(&client, &s, None, 2).await;

        assert!(result.items.is_empty());
        assert_eq!(
            result.warning.as_deref(),
            Some("No rssUrl configured (link-only source).")
        );
        assert_eq!(result.source.id, "bare");
    }

    #[tokio::test]
    async fn test_facebook_without_token_degrades_to_warning() {
        let client = reqwest::Client::new();
        let s = source("acme-fb", "", SourceType::Facebook);
        let result = fetch_source(&client, &s, None, 2).await;

        assert!(result.items.is_empty());
        let warning = result.warning.unwrap();
        assert!(warning.starts_with("Facebook fetch failed:"));
        assert!(warning.contains("FACEBOOK_ACCESS_TOKEN"));
    }

    #[tokio::test]
    async fn test_failed_source_does_not_block_the_run() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        // An unroutable feed and a link-only source: both produce results.
        let sources = vec![
            source("broken", "http://127.0.0.1:9/feed", SourceType::Website),
            source("bare", "", SourceType::Website),
        ];

        let results = run(&client, &sources, None, 2).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source.id, "broken");
        assert!(results[0].warning.as_deref().unwrap().starts_with("Failed to fetch/parse feed:"));
        assert_eq!(results[1].warning.as_deref(), Some(LINK_ONLY_WARNING));
    }
}
