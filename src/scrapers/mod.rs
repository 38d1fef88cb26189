//! Site-specific scrape capabilities for sources without a feed.
//!
//! Each capability is self-contained: its own endpoint URL, its own
//! lightweight extraction pattern (deliberately regex, not a DOM walk;
//! every pattern targets one known page layout), and its own date-text
//! parsing rule. A capability that cannot reach its endpoint or finds no
//! matches contributes an empty list; absence of matches is a valid steady
//! state for low-frequency sources, not an error.
//!
//! # Registered capabilities
//!
//! | Source id | Variant | Site |
//! |-----------|---------|------|
//! | `competitor1-news` | [`ScrapeKind::CompassNews`] | compassfostering.com/news |
//! | `competitor1-blogs` | [`ScrapeKind::CompassBlogs`] | compassfostering.com/blogs |
//! | `competitor5-news` | [`ScrapeKind::Capstone`] | capstonefostercare.co.uk |
//! | `competitor7-news` | [`ScrapeKind::Somerset`] | fosteringinsomerset.org.uk |

pub mod capstone;
pub mod compass;
pub mod somerset;

use crate::error::AdapterError;
use crate::models::RawEntry;
use tracing::warn;

/// Upper bound on the entries one capability contributes per run.
pub const MAX_SCRAPED: usize = 10;

/// A registered scrape capability, keyed by source id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeKind {
    CompassNews,
    CompassBlogs,
    Capstone,
    Somerset,
}

impl ScrapeKind {
    /// Look up the capability registered for a source id.
    pub fn for_source(id: &str) -> Option<ScrapeKind> {
        match id {
            "competitor1-news" => Some(ScrapeKind::CompassNews),
            "competitor1-blogs" => Some(ScrapeKind::CompassBlogs),
            "competitor5-news" => Some(ScrapeKind::Capstone),
            "competitor7-news" => Some(ScrapeKind::Somerset),
            _ => None,
        }
    }

    /// Fetch and extract this site's current entries.
    pub async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<RawEntry>, AdapterError> {
        match self {
            ScrapeKind::CompassNews => compass::fetch_news(client).await,
            ScrapeKind::CompassBlogs => compass::fetch_blogs(client).await,
            ScrapeKind::Capstone => capstone::fetch(client).await,
            ScrapeKind::Somerset => somerset::fetch(client).await,
        }
    }
}

/// Fetch a listing page for extraction.
///
/// An unreachable endpoint or non-success status degrades to `None`; the
/// capability then contributes nothing this run.
pub(crate) async fn fetch_html(client: &reqwest::Client, url: &str) -> Option<String> {
    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => response.text().await.ok(),
        Ok(response) => {
            warn!(%url, status = %response.status(), "Scrape endpoint returned non-success status");
            None
        }
        Err(e) => {
            warn!(%url, error = %e, "Scrape endpoint unreachable");
            None
        }
    }
}
