#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tyria::{ApiResponse, Error, PageMeta, Transport};
use url::Url;

/// Scripted transport: serves canned JSON per exact URL and records every
/// request so tests can count network activity.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, (Value, Option<PageMeta>)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub bearer: Option<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, url: &str, data: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_owned(), (data, None));
    }

    pub fn add_with_meta(&self, url: &str, data: Value, meta: PageMeta) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_owned(), (data, Some(meta)));
    }

    /// Number of requests that reached this transport.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: Url, bearer: Option<&str>) -> Result<ApiResponse, Error> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            bearer: bearer.map(str::to_owned),
        });
        match self.responses.lock().unwrap().get(url.as_str()) {
            Some((data, meta)) => Ok(ApiResponse {
                data: data.clone(),
                meta: meta.clone(),
            }),
            None => Err(Error::Api {
                status: 404,
                reason: format!("{url} not found"),
            }),
        }
    }
}

pub fn v1_url(path_and_query: &str) -> String {
    format!("{}{}", tyria::V1_BASE_URL, path_and_query)
}

pub fn v2_url(path_and_query: &str) -> String {
    format!("{}{}", tyria::V2_BASE_URL, path_and_query)
}
