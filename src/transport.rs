//! The HTTP transport: an injectable request-performing client.
//!
//! Endpoints hand a fully built URL (and possibly a bearer token) to a
//! [`Transport`] and get parsed JSON back. [`HttpTransport`] is the
//! reqwest-backed implementation used by default; tests substitute their
//! own.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("tyria/", env!("CARGO_PKG_VERSION"));

/// Pagination metadata the API reports on paged responses, taken from the
/// `X-Page-*`/`X-Result-*` headers and `Link` relations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<u32>,
    /// Link relations (`self`, `next`, `previous`, `first`, `last`) to
    /// server-relative paths.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

impl PageMeta {
    pub fn is_empty(&self) -> bool {
        self.page_size.is_none()
            && self.page_total.is_none()
            && self.result_total.is_none()
            && self.result_count.is_none()
            && self.links.is_empty()
    }
}

/// A parsed response: the JSON payload plus any pagination metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub data: Value,
    pub meta: Option<PageMeta>,
}

/// Performs a single GET and parses the result. No retries: a failure is
/// the caller's to see.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn get(&self, url: Url, bearer: Option<&str>) -> Result<ApiResponse>;
}

/// The default transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client, keeping its configuration.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url, bearer: Option<&str>) -> Result<ApiResponse> {
        debug!(%url, "GET");
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            // The API wraps most errors in {"text": "..."}; prefer that
            // over the bare status line.
            let reason = response
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(|body| body.get("text"))
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                });
            return Err(Error::Api {
                status: status.as_u16(),
                reason,
            });
        }

        let meta = page_meta(response.headers());
        let data = response.json().await?;
        Ok(ApiResponse { data, meta })
    }
}

fn page_meta(headers: &HeaderMap) -> Option<PageMeta> {
    let meta = PageMeta {
        page_size: header_u32(headers, "x-page-size"),
        page_total: header_u32(headers, "x-page-total"),
        result_total: header_u32(headers, "x-result-total"),
        result_count: header_u32(headers, "x-result-count"),
        links: headers
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .map(parse_link_relations)
            .unwrap_or_default(),
    };
    (!meta.is_empty()).then_some(meta)
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

/// Parse a `Link` header of the form
/// `</v2/quaggans?page=0&page_size=5>; rel=self, </v2/quaggans?page=1&page_size=5>; rel=next`.
fn parse_link_relations(header: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();
    for part in header.split(',') {
        let mut pieces = part.split(';');
        let Some(target) = pieces.next() else {
            continue;
        };
        let target = target.trim();
        if !(target.starts_with('<') && target.ends_with('>')) {
            continue;
        }
        let target = &target[1..target.len() - 1];
        for piece in pieces {
            if let Some(rel) = piece.trim().strip_prefix("rel=") {
                links.insert(rel.trim_matches('"').to_owned(), target.to_owned());
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_header_relations_are_extracted() {
        let header = "</v2/quaggans?page=0&page_size=5>; rel=self, \
                      </v2/quaggans?page=1&page_size=5>; rel=next, \
                      </v2/quaggans?page=0&page_size=5>; rel=first, \
                      </v2/quaggans?page=6&page_size=5>; rel=\"last\"";
        let links = parse_link_relations(header);
        assert_eq!(links["self"], "/v2/quaggans?page=0&page_size=5");
        assert_eq!(links["next"], "/v2/quaggans?page=1&page_size=5");
        assert_eq!(links["first"], "/v2/quaggans?page=0&page_size=5");
        assert_eq!(links["last"], "/v2/quaggans?page=6&page_size=5");
    }

    #[test]
    fn malformed_link_parts_are_skipped() {
        let links = parse_link_relations("nonsense, </ok>; rel=next; extra=1");
        assert_eq!(links.len(), 1);
        assert_eq!(links["next"], "/ok");
    }

    #[test]
    fn empty_meta_collapses_to_none() {
        assert!(page_meta(&HeaderMap::new()).is_none());
    }
}
