//! Source registry: loads and validates the source configuration document.
//!
//! The registry is the only fatal path in the pipeline. A malformed document,
//! a record missing `id`/`company`/`pageUrl`, or a duplicate `id` aborts the
//! whole run before any network activity; no partial registry is ever
//! produced.

use crate::error::ConfigError;
use crate::models::{CompanyGroup, Source, SourceType};
use crate::normalize::normalize_text;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
struct SourcesDoc {
    sources: Vec<RawSource>,
}

/// A source record as it appears on disk, before normalization. Every field
/// except the required three may be absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSource {
    id: String,
    company: String,
    company_group: String,
    #[serde(rename = "type")]
    source_type: String,
    title: String,
    page_url: String,
    rss_url: String,
}

/// Load the source registry from `path`, in document order.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_sources(path: &Path) -> Result<Vec<Source>, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let sources = parse_sources(&raw)?;
    info!(count = sources.len(), "Loaded source registry");
    Ok(sources)
}

/// Parse and validate a source configuration document.
///
/// Normalization per record: every string field is trimmed, `companyGroup`
/// defaults to `ours` and `type` to `website` when unrecognized, and `title`
/// falls back to `company`, then `id`.
pub fn parse_sources(raw: &str) -> Result<Vec<Source>, ConfigError> {
    let doc: SourcesDoc = serde_json::from_str(raw)?;

    let mut sources = Vec::with_capacity(doc.sources.len());
    for (index, record) in doc.sources.into_iter().enumerate() {
        let id = record.id.trim().to_string();
        let company = record.company.trim().to_string();
        let page_url = record.page_url.trim().to_string();

        if id.is_empty() {
            return Err(ConfigError::MissingField { index, field: "id" });
        }
        if company.is_empty() {
            return Err(ConfigError::MissingField {
                index,
                field: "company",
            });
        }
        if page_url.is_empty() {
            return Err(ConfigError::MissingField {
                index,
                field: "pageUrl",
            });
        }

        let company_group = match record.company_group.trim() {
            "competitor" => CompanyGroup::Competitor,
            _ => CompanyGroup::Ours,
        };
        let source_type = match record.source_type.trim() {
            "facebook" => SourceType::Facebook,
            _ => SourceType::Website,
        };

        let title = [record.title.as_str(), company.as_str(), id.as_str()]
            .iter()
            .map(|candidate| normalize_text(candidate))
            .find(|candidate| !candidate.is_empty())
            .unwrap_or_default();

        sources.push(Source {
            id,
            company,
            company_group,
            source_type,
            title,
            page_url,
            rss_url: record.rss_url.trim().to_string(),
        });
    }

    let mut seen = HashSet::new();
    for source in &sources {
        if !seen.insert(source.id.as_str()) {
            return Err(ConfigError::DuplicateId {
                id: source.id.clone(),
            });
        }
    }

    Ok(sources)
}
