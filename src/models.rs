//! Data models for sources, raw entries, and the content snapshot.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Source`]: one configured origin (feed URL or scraped site)
//! - [`RawEntry`]: adapter-local representation of one discovered article
//! - [`Item`]: the canonical, normalized unit of content
//! - [`SourceResult`]: one source paired with its items and optional warning
//! - [`Snapshot`]: the artifact produced by one run, consumed by the viewer
//!
//! Persisted types serialize with camelCase field names to match the JSON
//! contract the static viewer reads (`sourceId`, `isoDate`, `generatedAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a source belongs to us or to a competitor.
///
/// Unrecognized values in the configuration default to [`CompanyGroup::Ours`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyGroup {
    Ours,
    Competitor,
}

/// The kind of origin a source is.
///
/// Unrecognized values in the configuration default to [`SourceType::Website`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Website,
    Facebook,
}

/// One configured origin the pipeline draws items from.
///
/// Loaded once per run from the source configuration document and immutable
/// thereafter. `id` is unique across the registry; `company` and `page_url`
/// are never empty. An empty `rss_url` means the source must resolve via a
/// registered scrape capability (or the Graph API for facebook sources), or
/// it contributes zero items as a link-only source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Unique source key, e.g. `"competitor1-news"`.
    pub id: String,
    /// Display name of the company behind the source.
    pub company: String,
    pub company_group: CompanyGroup,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Display title; derived from `company`/`id` when not configured.
    pub title: String,
    /// Landing page of the source. Required.
    pub page_url: String,
    /// Feed URL; empty when the source has no syndication feed.
    pub rss_url: String,
}

/// Adapter-local representation of one discovered article/post before
/// normalization.
///
/// The last four fields are media hints only the feed adapter populates;
/// scrapers and the Graph adapter supply a direct `image` instead.
#[derive(Debug, Default, Clone)]
pub struct RawEntry {
    pub title: String,
    pub link: String,
    /// Publish timestamp in the adapter-native format; parsed during
    /// normalization, never here.
    pub published: Option<String>,
    pub snippet: String,
    /// Raw HTML body when the adapter carries one.
    pub content: String,
    /// Direct image URL supplied by a scraper or API adapter.
    pub image: Option<String>,
    pub enclosure_url: Option<String>,
    pub enclosure_type: Option<String>,
    /// `media:content` / `media:thumbnail` image URLs, in document order.
    pub media_urls: Vec<String>,
    pub itunes_image: Option<String>,
}

/// The canonical, persisted unit of content.
///
/// Created once per raw entry during normalization, never mutated afterwards.
/// Retained in the final snapshot only when `link` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Stable identity: `"{sourceId}:{hash:x}"`, reproducible across runs.
    pub id: String,
    pub source_id: String,
    pub source_title: String,
    pub company: String,
    pub company_group: CompanyGroup,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub page_url: String,
    /// Normalized title; never empty, defaults to `"(untitled)"`.
    pub title: String,
    /// Absolute article URL. Items with an empty link are dropped at
    /// aggregation.
    pub link: String,
    /// Canonical publish instant, or `null` when unparsable/absent.
    #[serde(with = "iso_millis", default)]
    pub iso_date: Option<DateTime<Utc>>,
    pub snippet: String,
    /// Raw/trusted HTML body, or empty.
    pub content: String,
    /// Ordered, deduplicated list of absolute image URLs, at most 10.
    pub images: Vec<String>,
}

/// One source paired with its produced items and an optional warning
/// describing why fewer/no items were produced.
#[derive(Debug, Clone)]
pub struct SourceResult {
    pub source: Source,
    pub items: Vec<Item>,
    pub warning: Option<String>,
}

/// A source as recorded in the snapshot: its configuration plus the warning
/// (if any) from this run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(flatten)]
    pub source: Source,
    pub warning: Option<String>,
}

/// The output artifact of one run. Fully replaces the previous snapshot.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(with = "iso_instant")]
    pub generated_at: DateTime<Utc>,
    /// Every configured source, in registry order, with its warning.
    pub sources: Vec<SourceRecord>,
    /// All retained items, globally sorted by recency.
    pub items: Vec<Item>,
}

/// Serde adapter: `Option<DateTime<Utc>>` as an ISO-8601 string with
/// millisecond precision and `Z` suffix, or `null`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => {
                serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|instant| Some(instant.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Serde adapter: non-optional `DateTime<Utc>` in the same ISO-8601 shape.
pub mod iso_instant {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
