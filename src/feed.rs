//! RSS feed adapter.
//!
//! Fetches one syndication feed and maps each `<item>` to a [`RawEntry`].
//! Parsing is quick-xml serde over the RSS 2.0 shape (`rss > channel >
//! item*`), with the namespaced extras real-world feeds carry:
//! `content:encoded`, `dc:date`, `media:content`, `media:thumbnail`, and
//! `itunes:image`.
//!
//! Field preferences:
//! - date: `pubDate`, then `dc:date`, then `updated`; the raw text is
//!   carried on the entry and parsed during normalization
//! - `content`: `content:encoded` over `description`
//! - `snippet`: `description` with tags stripped

use crate::error::AdapterError;
use crate::models::RawEntry;
use crate::normalize::normalize_text;
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, instrument};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "date")]
    dc_date: Option<String>,
    updated: Option<String>,
    description: Option<String>,
    #[serde(rename = "encoded")]
    content_encoded: Option<String>,
    enclosure: Option<Enclosure>,
    #[serde(rename = "content")]
    media_content: Vec<MediaRef>,
    #[serde(rename = "thumbnail")]
    media_thumbnail: Vec<MediaRef>,
    #[serde(rename = "image")]
    itunes_image: Option<ItunesImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Enclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    mime_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MediaRef {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@medium")]
    medium: Option<String>,
    #[serde(rename = "@type")]
    mime_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItunesImage {
    #[serde(rename = "@href")]
    href: Option<String>,
}

/// Fetch and parse the feed at `url`.
///
/// The client's bounded timeout applies; a non-success status or an
/// unparsable body is an [`AdapterError`] for the orchestrator to convert
/// into a per-source warning.
#[instrument(level = "info", skip(client))]
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<RawEntry>, AdapterError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AdapterError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    let entries = parse_feed(&body)?;
    info!(count = entries.len(), "Parsed feed entries");
    Ok(entries)
}

/// Parse an RSS 2.0 document into raw entries, in document order.
pub fn parse_feed(xml: &str) -> Result<Vec<RawEntry>, AdapterError> {
    let rss: Rss =
        from_str(xml).map_err(|e| AdapterError::Parse(format!("invalid feed XML: {e}")))?;
    Ok(rss.channel.items.into_iter().map(map_entry).collect())
}

fn map_entry(item: FeedItem) -> RawEntry {
    let content = item
        .content_encoded
        .as_deref()
        .or(item.description.as_deref())
        .unwrap_or_default()
        .trim()
        .to_string();
    let snippet = item
        .description
        .as_deref()
        .map(strip_tags)
        .unwrap_or_default();
    let published = item.pub_date.or(item.dc_date).or(item.updated);

    // media:content only counts when it is image-typed; thumbnails always do.
    let media_urls: Vec<String> = item
        .media_content
        .iter()
        .filter(|media| {
            let kind = media
                .medium
                .as_deref()
                .or(media.mime_type.as_deref())
                .unwrap_or_default();
            kind.to_ascii_lowercase().contains("image")
        })
        .filter_map(|media| media.url.clone())
        .chain(item.media_thumbnail.iter().filter_map(|m| m.url.clone()))
        .collect();

    RawEntry {
        title: item.title.unwrap_or_default(),
        link: item.link.unwrap_or_default().trim().to_string(),
        published,
        snippet,
        content,
        image: None,
        enclosure_url: item.enclosure.as_ref().and_then(|e| e.url.clone()),
        enclosure_type: item.enclosure.as_ref().and_then(|e| e.mime_type.clone()),
        media_urls,
        itunes_image: item.itunes_image.and_then(|image| image.href),
    }
}

/// Strip markup from a description to produce a plain-text snippet.
fn strip_tags(html: &str) -> String {
    normalize_text(&TAG_RE.replace_all(html, " "))
}
