//! Article fetching and lightweight content extraction.
//!
//! Fetches a page over HTTP and reduces it to plain text: scripted and
//! navigational blocks are dropped, remaining tags are stripped, whitespace
//! is collapsed. This is a best-effort extractor for demo/review tooling,
//! not a full readability implementation.

mod error;


pub use error::FetchError;

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; BiasLens/1.0)";

const FETCH_TIMEOUT: Duration = Duration::from_secs(12);

/// Non-content blocks removed wholesale before tag stripping.
const DROPPED_TAGS: &[&str] = &["script", "style", "noscript", "nav", "header", "footer", "aside"];

static DROPPED_BLOCK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DROPPED_TAGS
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                .expect("block pattern compiles")
        })
        .collect()
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("tag pattern compiles"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("title pattern compiles"));

static OG_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+property\s*=\s*["']og:title["'][^>]*content\s*=\s*["']([^"']*)["']"#)
        .expect("og:title pattern compiles")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// An extracted article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    /// Registrable domain of the article's host, `www.`-stripped.
    pub source: String,
    pub title: String,
    pub text: String,
}

/// Builds the HTTP client used for article fetching.
pub fn build_client() -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(FetchError::from)
}

/// Fetches `url` and extracts its article content.
///
/// Network failures and non-2xx statuses are errors; an extraction that
/// finds no text is not (the caller decides whether short text is usable).
pub async fn fetch_article(client: &reqwest::Client, url: &str) -> Result<Article, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let response = client.get(parsed.clone()).send().await?.error_for_status()?;
    let html = response.text().await?;

    debug!(url = %url, bytes = html.len(), "fetched article page");
    Ok(extract_article(url, &parsed, &html))
}

/// Extracts title and body text from raw HTML.
pub fn extract_article(url: &str, parsed: &Url, html: &str) -> Article {
    Article {
        url: url.to_string(),
        source: domain_of(parsed),
        title: extract_title(html),
        text: extract_text(html),
    }
}

/// Host with any leading `www.` removed, lowercased.
pub fn domain_of(url: &Url) -> String {
    url.host_str()
        .map(|host| host.trim_start_matches("www.").to_lowercase())
        .unwrap_or_default()
}

fn extract_title(html: &str) -> String {
    let raw = OG_TITLE_RE
        .captures(html)
        .or_else(|| TITLE_RE.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");
    collapse_whitespace(&decode_entities(raw))
}

fn extract_text(html: &str) -> String {
    let mut cleaned = html.to_string();
    for pattern in DROPPED_BLOCK_RES.iter() {
        cleaned = pattern.replace_all(&cleaned, " ").into_owned();
    }
    let stripped = TAG_RE.replace_all(&cleaned, " ");
    collapse_whitespace(&decode_entities(&stripped))
}

/// Decodes the handful of entities common in article markup.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}
