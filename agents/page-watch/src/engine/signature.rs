//! Page signature extraction
//!
//! Fetches the page, drops markup that changes on every load (scripts,
//! styles, noscript fallbacks), keeps the visible body text, collapses
//! whitespace and hashes the result.

use crate::contracts::Fingerprint;
use crate::engine::PageSource;
use crate::error::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::{ElementRef, Html};
use sha2::{Digest, Sha256};
use std::time::Duration;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/115.0 Safari/537.36";

pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Elements whose content is never visible text
const NOISE_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// HTTP fetcher producing page fingerprints
pub struct SignatureExtractor {
    client: reqwest::Client,
}

impl SignatureExtractor {
    /// Create extractor with a bounded request timeout
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch `url` and fingerprint its visible text
    pub async fn fetch(&self, url: &str) -> Result<Fingerprint, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        let fingerprint = fingerprint_html(&body);
        tracing::debug!(
            url = %url,
            bytes = body.len(),
            fingerprint = %fingerprint.short(),
            "Computed page signature"
        );

        Ok(fingerprint)
    }
}

#[async_trait::async_trait]
impl PageSource for SignatureExtractor {
    async fn signature(&self, url: &str) -> Result<Fingerprint, FetchError> {
        self.fetch(url).await
    }
}

/// Fingerprint of an HTML document's visible text
pub fn fingerprint_html(html: &str) -> Fingerprint {
    fingerprint_text(&visible_text(html))
}

/// SHA-256 of already normalized text, hex encoded
pub fn fingerprint_text(normalized: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    Fingerprint::new(hex::encode(hasher.finalize()))
}

/// Visible text of the body (or the whole document without one), with
/// whitespace collapsed to single spaces
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let scope = root
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
        .unwrap_or(root);

    let mut pieces = Vec::new();
    collect_text(scope, &mut pieces);

    normalize_whitespace(&pieces.join(" "))
}

/// Collapse every whitespace run to a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(&text.text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if NOISE_TAGS.contains(&child_el.value().name()) {
                continue;
            }
            collect_text(child_el, out);
        }
    }
}
