//! Fostering in Somerset scraper: the `/news` listing.
//!
//! Cards are `<article>` blocks whose anchor carries a CSS
//! `background-image` instead of an `<img>`, with the date split into
//! day-number and month-name spans and no year anywhere on the page. The
//! year is disambiguated against the current date: a day/month reading that
//! would land in the future belongs to the previous year.
//!
//! The background-image URL embeds the real asset path percent-encoded in a
//! `Url=` query parameter.

use crate::error::AdapterError;
use crate::models::RawEntry;
use crate::scrapers::{MAX_SCRAPED, fetch_html};
use chrono::{Datelike, NaiveDate, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

const LISTING_URL: &str = "https://www.fosteringinsomerset.org.uk/news";
const SITE_ORIGIN: &str = "https://www.fosteringinsomerset.org.uk";

static CARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<article[^>]*>.*?<a[^>]*href="(/news/[^"]+)"[^>]*style="background-image: url\(([^)]+)\)[^>]*>.*?<span class="number">(\d+)</span>.*?<span class="month">([^<]+)</span>.*?<h2 class="title"><a[^>]*>([^<]+)</a></h2>"#,
    )
    .unwrap()
});

static ASSET_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Url=([^&]+)").unwrap());

/// Fetch and extract the listing.
#[instrument(level = "info", skip_all)]
pub async fn fetch(client: &reqwest::Client) -> Result<Vec<RawEntry>, AdapterError> {
    let Some(html) = fetch_html(client, LISTING_URL).await else {
        return Ok(Vec::new());
    };
    let today = Utc::now().date_naive();
    let entries = extract_articles(&html, today);
    info!(count = entries.len(), "Scraped Somerset articles");
    Ok(entries)
}

/// Extract article cards from the listing markup.
///
/// `today` anchors the year disambiguation so the rule is testable.
pub(crate) fn extract_articles(html: &str, today: NaiveDate) -> Vec<RawEntry> {
    CARD_RE
        .captures_iter(html)
        .take(MAX_SCRAPED)
        .map(|caps| RawEntry {
            title: caps[5].trim().to_string(),
            link: format!("{SITE_ORIGIN}{}", caps[1].trim()),
            published: resolve_day_month(&caps[3], &caps[4], today),
            image: decode_background_image(&caps[2]),
            ..RawEntry::default()
        })
        .collect()
}

/// Resolve a day-number plus month-name against `today`.
///
/// The current year is assumed first; when that reading would fall in the
/// future, the most recent plausible past year (the previous one) is used
/// instead.
pub(crate) fn resolve_day_month(day: &str, month: &str, today: NaiveDate) -> Option<String> {
    let parse = |year: i32| {
        let text = format!("{} {} {}", day.trim(), month.trim(), year);
        NaiveDate::parse_from_str(&text, "%d %b %Y")
            .or_else(|_| NaiveDate::parse_from_str(&text, "%d %B %Y"))
            .ok()
    };

    let candidate = parse(today.year())?;
    let resolved = if candidate > today {
        parse(today.year() - 1)?
    } else {
        candidate
    };
    resolved
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Pull the percent-encoded asset path out of a `background-image` URL and
/// resolve it against the site origin.
pub(crate) fn decode_background_image(style_url: &str) -> Option<String> {
    let encoded = ASSET_URL_RE.captures(style_url)?.get(1)?.as_str();
    let decoded = urlencoding::decode(encoded).ok()?;
    Some(format!("{SITE_ORIGIN}{decoded}"))
}
