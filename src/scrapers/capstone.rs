//! Capstone Foster Care scraper: the combined news-and-blogs listing.
//!
//! Cards carry an image wrapped in an `img-gradient` div, a date paragraph,
//! and an `h4` title. Dates use ordinal day suffixes (`"2nd January, 2026"`)
//! which are stripped before parsing, and image paths may be site-relative.

use crate::error::AdapterError;
use crate::models::RawEntry;
use crate::scrapers::{MAX_SCRAPED, fetch_html};
use chrono::{NaiveDate, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

const LISTING_URL: &str = "https://www.capstonefostercare.co.uk/news-and-blogs";
const SITE_ORIGIN: &str = "https://www.capstonefostercare.co.uk";

static CARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<a href="(https://www\.capstonefostercare\.co\.uk/news-and-blogs/[^"]+)">\s*<div class="img-gradient">\s*<img[^>]+src="([^"]+)"[^>]*>\s*</div>.*?<p[^>]*class="[^"]*article-card__date[^"]*">([^<]+)</p>\s*<h4[^>]*class="card-title">([^<]+)</h4>"#,
    )
    .unwrap()
});

static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)(st|nd|rd|th)\s+").unwrap());

/// Fetch and extract the listing.
#[instrument(level = "info", skip_all)]
pub async fn fetch(client: &reqwest::Client) -> Result<Vec<RawEntry>, AdapterError> {
    let Some(html) = fetch_html(client, LISTING_URL).await else {
        return Ok(Vec::new());
    };
    let entries = extract_articles(&html);
    info!(count = entries.len(), "Scraped Capstone articles");
    Ok(entries)
}

/// Extract article cards from the listing markup.
pub(crate) fn extract_articles(html: &str) -> Vec<RawEntry> {
    CARD_RE
        .captures_iter(html)
        .take(MAX_SCRAPED)
        .map(|caps| {
            let image = caps[2].trim();
            let image = if image.starts_with("http") {
                image.to_string()
            } else {
                format!("{SITE_ORIGIN}{image}")
            };

            RawEntry {
                title: caps[4].trim().replace("&nbsp;", " "),
                link: caps[1].trim().to_string(),
                published: parse_ordinal_date(&caps[3]),
                image: Some(image),
                ..RawEntry::default()
            }
        })
        .collect()
}

/// Parse a date like `"2nd January, 2026"`, stripping the ordinal suffix.
pub(crate) fn parse_ordinal_date(text: &str) -> Option<String> {
    let clean = ORDINAL_RE.replace(text.trim(), "$1 ");
    NaiveDate::parse_from_str(&clean, "%d %B, %Y")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
}
