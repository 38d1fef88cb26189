//! Merge per-source results into the snapshot artifact.
//!
//! Flattens every source's items, drops the ones without a resolvable link,
//! and sorts the remainder newest-first. Items without a date sort as if
//! published at the epoch, so they land last. The sort is stable and uses no
//! secondary key: equal dates keep their per-source insertion order.

use crate::models::{Snapshot, SourceRecord, SourceResult};
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use tracing::info;

/// Assemble the snapshot for this run.
pub fn build_snapshot(results: Vec<SourceResult>) -> Snapshot {
    build_snapshot_at(results, Utc::now())
}

/// Assemble a snapshot with an explicit generation instant.
pub fn build_snapshot_at(results: Vec<SourceResult>, generated_at: DateTime<Utc>) -> Snapshot {
    let mut sources = Vec::with_capacity(results.len());
    let mut items = Vec::new();

    for result in results {
        sources.push(SourceRecord {
            source: result.source,
            warning: result.warning,
        });
        items.extend(result.items.into_iter().filter(|item| !item.link.is_empty()));
    }

    items.sort_by_key(|item| Reverse(item.iso_date.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)));

    info!(
        items = items.len(),
        sources = sources.len(),
        "Assembled snapshot"
    );

    Snapshot {
        generated_at,
        sources,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyGroup, Item, Source, SourceType};
    use chrono::TimeZone;

    fn source(id: &str) -> Source {
        Source {
            id: id.to_string(),
            company: "Acme".to_string(),
            company_group: CompanyGroup::Ours,
            source_type: SourceType::Website,
            title: id.to_string(),
            page_url: "https://acme.example".to_string(),
            rss_url: String::new(),
        }
    }

    fn item(source_id: &str, link: &str, day: Option<u32>) -> Item {
        Item {
            id: format!("{source_id}:{link}"),
            source_id: source_id.to_string(),
            source_title: source_id.to_string(),
            company: "Acme".to_string(),
            company_group: CompanyGroup::Ours,
            source_type: SourceType::Website,
            page_url: "https://acme.example".to_string(),
            title: "t".to_string(),
            link: link.to_string(),
            iso_date: day.map(|d| Utc.with_ymd_and_hms(2026, 5, d, 12, 0, 0).unwrap()),
            snippet: String::new(),
            content: String::new(),
            images: vec![],
        }
    }

    fn result(source_id: &str, items: Vec<Item>, warning: Option<&str>) -> SourceResult {
        SourceResult {
            source: source(source_id),
            items,
            warning: warning.map(str::to_string),
        }
    }

    #[test]
    fn test_sources_correspond_one_to_one_in_order() {
        let snapshot = build_snapshot(vec![
            result("a", vec![], None),
            result("b", vec![], Some("No rssUrl configured (link-only source).")),
            result("c", vec![], Some("Failed to fetch/parse feed: boom")),
        ]);

        let ids: Vec<&str> = snapshot
            .sources
            .iter()
            .map(|record| record.source.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(snapshot.sources[0].warning.is_none());
        assert_eq!(
            snapshot.sources[1].warning.as_deref(),
            Some("No rssUrl configured (link-only source).")
        );
    }

    #[test]
    fn test_items_without_link_are_dropped() {
        let snapshot = build_snapshot(vec![result(
            "a",
            vec![item("a", "", Some(3)), item("a", "https://a/1", Some(2))],
            None,
        )]);

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].link, "https://a/1");
    }

    #[test]
    fn test_items_sorted_newest_first_with_undated_last() {
        let snapshot = build_snapshot(vec![
            result(
                "a",
                vec![item("a", "https://a/old", Some(1)), item("a", "https://a/new", Some(20))],
                None,
            ),
            result(
                "b",
                vec![item("b", "https://b/undated", None), item("b", "https://b/mid", Some(10))],
                None,
            ),
        ]);

        let links: Vec<&str> = snapshot.items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://a/new",
                "https://b/mid",
                "https://a/old",
                "https://b/undated",
            ]
        );
    }

    #[test]
    fn test_equal_dates_keep_insertion_order() {
        let snapshot = build_snapshot(vec![
            result(
                "a",
                vec![item("a", "https://a/1", Some(5)), item("a", "https://a/2", Some(5))],
                None,
            ),
            result("b", vec![item("b", "https://b/1", Some(5))], None),
        ]);

        let links: Vec<&str> = snapshot.items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(links, vec!["https://a/1", "https://a/2", "https://b/1"]);
    }

    #[test]
    fn test_empty_run_still_produces_snapshot() {
        let snapshot = build_snapshot(vec![]);
        assert!(snapshot.sources.is_empty());
        assert!(snapshot.items.is_empty());
    }
}
