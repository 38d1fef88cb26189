//! Facebook Graph API adapter.
//!
//! Facebook pages expose no feed; their posts come from the Graph API
//! instead, authenticated with a page access token supplied via
//! `FACEBOOK_ACCESS_TOKEN`. A missing token is not fatal: the source
//! degrades to zero items with a descriptive warning, like any other
//! adapter failure.
//!
//! The page identifier is the last path segment of the source's `pageUrl`
//! (the Graph API accepts page usernames in place of numeric ids).

use crate::error::AdapterError;
use crate::models::{RawEntry, Source};
use serde::Deserialize;
use tracing::{info, instrument};
use url::Url;

const GRAPH_VERSION: &str = "v18.0";
const POST_FIELDS: &str =
    "id,message,created_time,permalink_url,full_picture,attachments{media,title,description}";
const POST_LIMIT: usize = 10;

/// Title length cap; longer first lines are cut to 97 characters plus an
/// ellipsis.
const TITLE_MAX: usize = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostsResponse {
    data: Vec<Post>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Post {
    message: Option<String>,
    created_time: Option<String>,
    permalink_url: Option<String>,
    full_picture: Option<String>,
    attachments: Option<Attachments>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Attachments {
    data: Vec<Attachment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Attachment {
    title: Option<String>,
    media: Option<Media>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Media {
    image: Option<MediaImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MediaImage {
    src: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GraphErrorBody {
    error: GraphErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GraphErrorDetail {
    message: String,
}

/// Fetch the latest posts for a facebook-type source.
#[instrument(level = "info", skip_all, fields(source = %source.id))]
pub async fn fetch_posts(
    client: &reqwest::Client,
    source: &Source,
    token: Option<&str>,
) -> Result<Vec<RawEntry>, AdapterError> {
    let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
        AdapterError::MissingCredential("FACEBOOK_ACCESS_TOKEN is not set".to_string())
    })?;

    let page = page_slug(&source.page_url).ok_or_else(|| {
        AdapterError::Parse(format!(
            "cannot derive a page id from pageUrl {}",
            source.page_url
        ))
    })?;

    let endpoint = format!("https://graph.facebook.com/{GRAPH_VERSION}/{page}/posts");
    let limit = POST_LIMIT.to_string();
    let response = client
        .get(&endpoint)
        .query(&[
            ("fields", POST_FIELDS),
            ("limit", limit.as_str()),
            ("access_token", token),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        // The Graph API wraps its reason in an error envelope.
        let detail = response
            .json::<GraphErrorBody>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_default();
        if detail.is_empty() {
            return Err(AdapterError::Status {
                status: status.as_u16(),
                url: endpoint,
            });
        }
        return Err(AdapterError::Parse(format!("Graph API error: {detail}")));
    }

    let body: PostsResponse = response
        .json()
        .await
        .map_err(|e| AdapterError::Parse(format!("invalid Graph API response: {e}")))?;

    let entries = map_posts(body);
    info!(count = entries.len(), page = %page, "Fetched Facebook posts");
    Ok(entries)
}

fn map_posts(body: PostsResponse) -> Vec<RawEntry> {
    body.data
        .into_iter()
        .map(|post| RawEntry {
            title: post_title(&post),
            link: post.permalink_url.clone().unwrap_or_default(),
            published: post.created_time.clone(),
            snippet: post.message.clone().unwrap_or_default(),
            image: post_image(&post),
            ..RawEntry::default()
        })
        .collect()
}

/// Derive a post title: the first line of the message (cut at
/// [`TITLE_MAX`]), the first attachment title, or a generic fallback.
fn post_title(post: &Post) -> String {
    if let Some(message) = post.message.as_deref() {
        let first_line = message.lines().next().unwrap_or_default().trim();
        if !first_line.is_empty() {
            if first_line.chars().count() > TITLE_MAX {
                let cut: String = first_line.chars().take(TITLE_MAX - 3).collect();
                return format!("{cut}...");
            }
            return first_line.to_string();
        }
    }

    post.attachments
        .as_ref()
        .and_then(|attachments| attachments.data.first())
        .and_then(|attachment| attachment.title.clone())
        .unwrap_or_else(|| "Facebook Post".to_string())
}

fn post_image(post: &Post) -> Option<String> {
    post.full_picture.clone().or_else(|| {
        post.attachments
            .as_ref()
            .and_then(|attachments| attachments.data.first())
            .and_then(|attachment| attachment.media.as_ref())
            .and_then(|media| media.image.as_ref())
            .and_then(|image| image.src.clone())
    })
}

/// Last non-empty path segment of the page URL.
fn page_slug(page_url: &str) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyGroup, SourceType};

    fn facebook_source() -> Source {
        Source {
            id: "acme-fb".to_string(),
            company: "Acme".to_string(),
            company_group: CompanyGroup::Ours,
            source_type: SourceType::Facebook,
            title: "Acme on Facebook".to_string(),
            page_url: "https://www.facebook.com/AcmeFostering/".to_string(),
            rss_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_token_is_a_credential_error() {
        let client = reqwest::Client::new();
        let err = fetch_posts(&client, &facebook_source(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::MissingCredential(_)));
        assert!(err.to_string().contains("FACEBOOK_ACCESS_TOKEN"));

        let err = fetch_posts(&client, &facebook_source(), Some("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::MissingCredential(_)));
    }

    #[test]
    fn test_page_slug() {
        assert_eq!(
            page_slug("https://www.facebook.com/AcmeFostering/").as_deref(),
            Some("AcmeFostering")
        );
        assert_eq!(
            page_slug("https://www.facebook.com/pages/acme").as_deref(),
            Some("acme")
        );
        assert!(page_slug("not a url").is_none());
    }

    #[test]
    fn test_map_posts() {
        let body: PostsResponse = serde_json::from_str(
            r#"{
                "data": [
                    {
                        "message": "Big news today!\nMore detail below.",
                        "created_time": "2026-02-01T10:00:00+0000",
                        "permalink_url": "https://www.facebook.com/acme/posts/1",
                        "full_picture": "https://img.facebook.example/1.jpg"
                    },
                    {
                        "created_time": "2026-01-20T09:00:00+0000",
                        "permalink_url": "https://www.facebook.com/acme/posts/2",
                        "attachments": {
                            "data": [
                                {
                                    "title": "Shared article",
                                    "media": {"image": {"src": "https://img.facebook.example/2.jpg"}}
                                }
                            ]
                        }
                    },
                    {}
                ]
            }"#,
        )
        .unwrap();

        let entries = map_posts(body);
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].title, "Big news today!");
        assert_eq!(entries[0].link, "https://www.facebook.com/acme/posts/1");
        assert_eq!(
            entries[0].published.as_deref(),
            Some("2026-02-01T10:00:00+0000")
        );
        assert_eq!(entries[0].snippet, "Big news today!\nMore detail below.");
        assert_eq!(
            entries[0].image.as_deref(),
            Some("https://img.facebook.example/1.jpg")
        );

        // No message: attachment title and attachment image.
        assert_eq!(entries[1].title, "Shared article");
        assert_eq!(
            entries[1].image.as_deref(),
            Some("https://img.facebook.example/2.jpg")
        );

        // Nothing at all: generic title, no link (dropped later at aggregation).
        assert_eq!(entries[2].title, "Facebook Post");
        assert_eq!(entries[2].link, "");
        assert!(entries[2].image.is_none());
    }

    #[test]
    fn test_post_title_truncates_long_first_line() {
        let post = Post {
            message: Some("x".repeat(150)),
            ..Post::default()
        };
        let title = post_title(&post);
        assert_eq!(title.chars().count(), TITLE_MAX);
        assert!(title.ends_with("..."));
    }
}
