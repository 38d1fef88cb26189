//! Compass Fostering scrapers: the `/news/` and `/blogs/` listings.
//!
//! Both listings share one card layout: an anchor wrapping a lazy-loaded
//! `data-src` image, a muted date span, and an `h3` title. The blogs listing
//! additionally links out to arbitrary site paths, so entries that point
//! back into `/news/` are skipped there to avoid duplicating the news
//! capability.
//!
//! Dates appear as `"26 December 2025"`.

use crate::error::AdapterError;
use crate::models::RawEntry;
use crate::scrapers::{MAX_SCRAPED, fetch_html};
use chrono::{NaiveDate, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

const NEWS_URL: &str = "https://www.compassfostering.com/news/";
const BLOGS_URL: &str = "https://www.compassfostering.com/blogs/";

static NEWS_CARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<a\s+href=(https://www\.compassfostering\.com/news/[^\s>]+)[^>]*>.*?<img[^>]+data-src=([^\s>]+).*?<span[^>]*opacity-70">([^<]+)</span><h3 class="heading-five my-4">([^<]+)</h3>"#,
    )
    .unwrap()
});

static BLOG_CARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<a\s+href=(https://www\.compassfostering\.com/[^>\s]+)[^>]*class="Post__Grid-split-image[^>]*>.*?<img[^>]+data-src=([^\s>]+).*?<span[^>]*opacity-70">([^<]+)</span><h3 class="heading-five my-4">([^<]+)</h3>"#,
    )
    .unwrap()
});

/// Fetch and extract the news listing.
#[instrument(level = "info", skip_all)]
pub async fn fetch_news(client: &reqwest::Client) -> Result<Vec<RawEntry>, AdapterError> {
    let Some(html) = fetch_html(client, NEWS_URL).await else {
        return Ok(Vec::new());
    };
    let entries = extract_news(&html);
    info!(count = entries.len(), "Scraped Compass news");
    Ok(entries)
}

/// Fetch and extract the blogs listing.
#[instrument(level = "info", skip_all)]
pub async fn fetch_blogs(client: &reqwest::Client) -> Result<Vec<RawEntry>, AdapterError> {
    let Some(html) = fetch_html(client, BLOGS_URL).await else {
        return Ok(Vec::new());
    };
    let entries = extract_blogs(&html);
    info!(count = entries.len(), "Scraped Compass blogs");
    Ok(entries)
}

/// Extract article cards from the news listing markup.
pub(crate) fn extract_news(html: &str) -> Vec<RawEntry> {
    NEWS_CARD_RE
        .captures_iter(html)
        .take(MAX_SCRAPED)
        .map(|caps| card_entry(&caps))
        .collect()
}

/// Extract article cards from the blogs listing markup, skipping links that
/// point back into `/news/`.
pub(crate) fn extract_blogs(html: &str) -> Vec<RawEntry> {
    BLOG_CARD_RE
        .captures_iter(html)
        .filter(|caps| !caps[1].contains("/news/"))
        .take(MAX_SCRAPED)
        .map(|caps| card_entry(&caps))
        .collect()
}

fn card_entry(caps: &regex::Captures<'_>) -> RawEntry {
    RawEntry {
        title: caps[4].trim().to_string(),
        link: caps[1].trim().trim_matches('"').to_string(),
        published: parse_card_date(&caps[3]),
        image: Some(caps[2].trim().trim_matches('"').to_string()),
        ..RawEntry::default()
    }
}

/// Parse a card date like `"26 December 2025"`. Unparsable text yields no
/// date, which sorts the entry last.
pub(crate) fn parse_card_date(text: &str) -> Option<String> {
    NaiveDate::parse_from_str(text.trim(), "%d %B %Y")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn news_card(link: &str, image: &str, date: &str, title: &str) -> String {
        format!(
            r#"<a href={link} class="card"><div><img data-src={image} alt=""></div><span class="text-sm opacity-70">{date}</span><h3 class="heading-five my-4">{title}</h3></a>"#
        )
    }

    #[test]
    fn test_extract_news_cards() {
        let html = [
            news_card(
                "https://www.compassfostering.com/news/one/",
                "https://cdn.compass.example/one.jpg",
                "26 December 2025",
                "First story",
            ),
            news_card(
                "https://www.compassfostering.com/news/two/",
                "https://cdn.compass.example/two.jpg",
                "2 January 2026",
                "Second story",
            ),
        ]
        .join("\n");

        let entries = extract_news(&html);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First story");
        assert_eq!(entries[0].link, "https://www.compassfostering.com/news/one/");
        assert_eq!(
            entries[0].image.as_deref(),
            Some("https://cdn.compass.example/one.jpg")
        );
        assert_eq!(
            entries[0].published.as_deref(),
            Some("2025-12-26T00:00:00.000Z")
        );
        assert_eq!(
            entries[1].published.as_deref(),
            Some("2026-01-02T00:00:00.000Z")
        );
    }

    #[test]
    fn test_extract_news_caps_at_ten() {
        let html: String = (0..14)
            .map(|i| {
                news_card(
                    &format!("https://www.compassfostering.com/news/p{i}/"),
                    &format!("https://cdn.compass.example/{i}.jpg"),
                    "1 March 2026",
                    &format!("Story {i}"),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(extract_news(&html).len(), MAX_SCRAPED);
    }

    #[test]
    fn test_extract_news_no_match_is_empty() {
        assert!(extract_news("<html><body>nothing here</body></html>").is_empty());
    }

    #[test]
    fn test_extract_blogs_skips_news_links() {
        let card = |link: &str, title: &str| {
            format!(
                r#"<a href={link} data-x class="Post__Grid-split-image block"><img data-src=https://cdn.compass.example/b.jpg><span class="opacity-70">5 June 2026</span><h3 class="heading-five my-4">{title}</h3></a>"#
            )
        };
        let html = [
            card("https://www.compassfostering.com/news/cross-post/", "Cross"),
            card("https://www.compassfostering.com/advice/guide/", "Guide"),
        ]
        .join("\n");

        let entries = extract_blogs(&html);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Guide");
        assert_eq!(
            entries[0].link,
            "https://www.compassfostering.com/advice/guide/"
        );
    }

    #[test]
    fn test_parse_card_date() {
        assert_eq!(
            parse_card_date("26 December 2025").as_deref(),
            Some("2025-12-26T00:00:00.000Z")
        );
        assert_eq!(
            parse_card_date("  1 March 2026 ").as_deref(),
            Some("2026-03-01T00:00:00.000Z")
        );
        assert!(parse_card_date("sometime soon").is_none());
    }
}
