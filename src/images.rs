//! Featured-image resolution.
//!
//! Given a raw entry and its article link, produce an ordered list of
//! candidate image URLs. The resolver never fails: every network or parse
//! problem degrades to "no image".
//!
//! The waterfall, first success winning:
//! 1. An adapter-supplied direct image (scraper/Graph path) is used alone.
//! 2. The article page is fetched and scanned for an Open Graph image, a
//!    Twitter image, the first image inside `<article>`, then the first
//!    image inside `<main>`. The first absolute http(s) match wins alone.
//! 3. Feed-native hints: an image-typed enclosure, `media:content` /
//!    `media:thumbnail` URLs, an iTunes image, then every `<img>` in the
//!    entry's HTML body in document order.
//! 4. The step-3 list is deduplicated (first-seen order) and, when more than
//!    one candidate remains, the first is dropped: the leading image is
//!    empirically a site logo rather than article art.
//!
//! The 10-image cap belongs to the normalizer, not here.

use crate::models::RawEntry;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).unwrap());
static IMAGE_EXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp|svg)(\?.*)?$").unwrap());

static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static TWITTER_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="twitter:image"]"#).unwrap());
static ARTICLE_IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("article img").unwrap());
static MAIN_IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("main img").unwrap());

/// True for absolute `http(s)` URLs; everything else is unusable in the
/// snapshot.
pub fn is_absolute_http(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

/// Resolve the candidate images for one entry. Infallible.
pub async fn resolve(client: &reqwest::Client, entry: &RawEntry, link: &str) -> Vec<String> {
    if let Some(image) = entry.image.as_deref() {
        let image = image.trim();
        if !image.is_empty() {
            return vec![image.to_string()];
        }
    }

    if !link.is_empty() {
        if let Some(found) = fetch_page_image(client, link).await {
            return vec![found];
        }
    }

    feed_hint_images(entry)
}

/// Fetch the article page and scan it for a featured image.
async fn fetch_page_image(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(%url, error = %e, "Article page fetch failed");
            return None;
        }
    };
    if !response.status().is_success() {
        debug!(%url, status = %response.status(), "Article page returned non-success status");
        return None;
    }
    let html = response.text().await.ok()?;
    scan_page(&html)
}

/// Scan article-page markup for a featured image.
///
/// Checks, in order: `og:image` meta, `twitter:image` meta, the first image
/// inside `<article>`, the first image inside `<main>`. Each candidate must
/// be an absolute http(s) URL.
pub fn scan_page(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let probes: [(&Selector, &str); 4] = [
        (&OG_IMAGE, "content"),
        (&TWITTER_IMAGE, "content"),
        (&ARTICLE_IMG, "src"),
        (&MAIN_IMG, "src"),
    ];

    for (selector, attr) in probes {
        if let Some(element) = document.select(selector).next() {
            if let Some(value) = element.value().attr(attr) {
                if is_absolute_http(value) {
                    return Some(value.trim().to_string());
                }
            }
        }
    }
    None
}

/// Collect fallback candidates from the entry's feed-native hints.
///
/// Order: image enclosure, media URLs, iTunes image, `<img>` tags out of the
/// HTML body. Deduplicated preserving first-seen order; when more than one
/// candidate remains the first is dropped as a probable logo.
pub fn feed_hint_images(entry: &RawEntry) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    if let Some(url) = entry.enclosure_url.as_deref() {
        let image_mime = entry
            .enclosure_type
            .as_deref()
            .map(|mime| mime.starts_with("image/"))
            .unwrap_or(false);
        if IMAGE_EXT_RE.is_match(url) || image_mime {
            candidates.push(url.to_string());
        }
    }

    candidates.extend(entry.media_urls.iter().cloned());

    if let Some(url) = entry.itunes_image.as_deref() {
        candidates.push(url.to_string());
    }

    for caps in IMG_SRC_RE.captures_iter(&entry.content) {
        if let Some(src) = caps.get(1) {
            if is_absolute_http(src.as_str()) {
                candidates.push(src.as_str().to_string());
            }
        }
    }

    let unique: Vec<String> = candidates.into_iter().unique().collect();
    if unique.len() > 1 {
        unique.into_iter().skip(1).collect()
    } else {
        unique
    }
}
