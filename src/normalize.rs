//! Item normalization: canonical text, canonical dates, stable identity.
//!
//! This is where a [`RawEntry`] from any adapter becomes a canonical
//! [`Item`]. The stable identity computed here is the de facto primary key
//! across snapshot generations: it must depend only on the
//! (`sourceId`, `link`, `isoDate`, `title`) tuple, never on wall-clock time,
//! iteration order, or memory addresses.

use crate::models::{Item, RawEntry, Source};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use itertools::Itertools;

/// Placeholder title for entries whose normalized title comes out empty.
pub const UNTITLED: &str = "(untitled)";

/// Upper bound on the images carried by one item.
pub const MAX_IMAGES: usize = 10;

/// Collapse consecutive whitespace to single spaces and trim the ends.
pub fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an adapter-native timestamp into a canonical instant.
///
/// Tries RFC 2822 (RSS `pubDate`), then RFC 3339 (Atom/`dc:date`, scraper
/// output), then two plain fallbacks. Returns `None` on failure; an
/// unparsable date is never an error, it just sorts last.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|instant| instant.with_timezone(&Utc))
        })
        .or_else(|| {
            // Graph API shape: offset without a colon.
            DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z")
                .ok()
                .map(|instant| instant.with_timezone(&Utc))
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// Format an instant the way the snapshot serializes it; empty for `None`.
///
/// The stable identity hashes this exact string, so the format here and the
/// artifact serialization must stay in lockstep.
pub fn iso_string(date: &Option<DateTime<Utc>>) -> String {
    date.map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Compute the stable identity for an item.
///
/// Joins (`source_id`, `link`, `iso_date`, `title`) with `|`, folds a 32-bit
/// unsigned rolling hash (`hash = hash * 31 + codepoint`, seed 0) over the
/// joined string's characters, and formats `"{source_id}:{hash:x}"`.
pub fn stable_id(source_id: &str, link: &str, iso_date: &str, title: &str) -> String {
    let base = [source_id, link, iso_date, title].join("|");
    let mut hash: u32 = 0;
    for c in base.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(c as u32);
    }
    format!("{source_id}:{hash:x}")
}

/// Convert a raw entry plus its source into a canonical [`Item`].
///
/// `images` is the resolver's ordered candidate list; it is deduplicated
/// (first occurrence wins) and capped at [`MAX_IMAGES`] here.
pub fn build_item(entry: &RawEntry, source: &Source, images: Vec<String>) -> Item {
    let title = {
        let normalized = normalize_text(&entry.title);
        if normalized.is_empty() {
            UNTITLED.to_string()
        } else {
            normalized
        }
    };
    let link = entry.link.trim().to_string();
    let iso_date = entry.published.as_deref().and_then(parse_date);
    let iso = iso_string(&iso_date);
    let images = images
        .into_iter()
        .unique()
        .take(MAX_IMAGES)
        .collect::<Vec<_>>();

    Item {
        id: stable_id(&source.id, &link, &iso, &title),
        source_id: source.id.clone(),
        source_title: source.title.clone(),
        company: source.company.clone(),
        company_group: source.company_group,
        source_type: source.source_type,
        page_url: source.page_url.clone(),
        title,
        link,
        iso_date,
        snippet: normalize_text(&entry.snippet),
        content: entry.content.trim().to_string(),
        images,
    }
}
