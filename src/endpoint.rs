//! The generic endpoint mechanism every API resource is built from.
//!
//! An endpoint maps a resource name plus call parameters to a request
//! path, query and deterministic cache key, consults the cache store,
//! and falls back to the transport on a miss. Localization and
//! authentication are explicit capabilities composed onto the same core
//! rather than layered subclasses.

use std::fmt::Display;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use url::Url;

use crate::cache::CacheEnvelope;
use crate::client::ClientInner;
use crate::error::{Error, Result};
use crate::language::Language;
use crate::pagination::{Page, PageRequest};
use crate::transport::ApiResponse;

/// Bearer token shared by every endpoint of one permission-scope family.
///
/// Setting the token here makes it visible to all endpoints constructed
/// with this scope, matching how the remote service ties tokens to a
/// permission grant rather than to a single path.
#[derive(Debug, Default)]
pub struct AuthScope {
    token: RwLock<Option<String>>,
}

impl AuthScope {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_token(&self, token: Option<&str>) {
        *self.token.write() = token.map(str::to_owned);
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

/// Shared plumbing: key derivation, cache lookup, request construction.
#[derive(Debug, Clone)]
pub(crate) struct EndpointCore {
    pub client: Arc<ClientInner>,
    /// API root this endpoint's paths are relative to.
    pub base: &'static str,
    /// Relative path segment, e.g. `"items"` or `"commerce/prices"`.
    pub name: String,
    /// Present on endpoints whose resources require a token.
    pub auth: Option<Arc<AuthScope>>,
    /// Per-call token; set on clones made by `with_access_token`.
    pub token_override: Option<String>,
}

impl EndpointCore {
    pub(crate) fn new(client: Arc<ClientInner>, base: &'static str, name: impl Into<String>) -> Self {
        Self {
            client,
            base,
            name: name.into(),
            auth: None,
            token_override: None,
        }
    }

    pub(crate) fn with_auth(mut self, auth: Arc<AuthScope>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub(crate) fn set_scope_token(&self, token: Option<&str>) {
        if let Some(scope) = &self.auth {
            scope.set_token(token);
        }
    }

    /// A copy that sends `token` instead of whatever the scope stores.
    /// The scope itself is left untouched.
    pub(crate) fn with_override(&self, token: &str) -> Self {
        let mut core = self.clone();
        core.token_override = Some(token.to_owned());
        core
    }

    /// The token to send, if any. Fails when the endpoint requires
    /// authentication and neither the scope nor an override holds one.
    fn bearer(&self) -> Result<Option<String>> {
        let Some(scope) = &self.auth else {
            return Ok(None);
        };
        if let Some(token) = &self.token_override {
            return Ok(Some(token.clone()));
        }
        match scope.token() {
            Some(token) => Ok(Some(token)),
            None => Err(Error::AuthenticationRequired),
        }
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(self.base)?.join(path)?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Request a resource, first checking for a cached response. A
    /// missing token for an authenticated endpoint fails here, before
    /// the cache or the network is touched.
    pub(crate) async fn fetch(
        &self,
        path: &str,
        params: &[(&str, String)],
        cache_key: Option<&str>,
    ) -> Result<ApiResponse> {
        let bearer = self.bearer()?;

        if let Some(key) = cache_key {
            if let Some(envelope) = self.client.cache.read(key) {
                return Ok(ApiResponse {
                    data: envelope.data,
                    meta: envelope.meta,
                });
            }
        }

        let url = self.url(path, params)?;
        let response = self.client.transport().get(url, bearer.as_deref()).await?;

        if let Some(key) = cache_key {
            self.client.cache.write(
                key,
                &CacheEnvelope {
                    data: response.data.clone(),
                    meta: response.meta.clone(),
                },
            );
        }

        Ok(response)
    }

    pub(crate) fn has_cached(&self, key: &str) -> bool {
        self.client.cache.is_fresh(key)
    }

    async fn ids_op(&self) -> Result<Vec<Value>> {
        let response = self.fetch(&self.name, &[], Some(self.name.as_str())).await?;
        as_array(response.data)
    }

    async fn get_one_op(&self, id: &str, lang: Option<Language>) -> Result<Value> {
        let path = format!("{}/{}", self.name, id);
        let (params, cache_key) = match lang {
            Some(lang) => (
                vec![("lang", lang.code().to_owned())],
                format!("{}.{}.{}", self.name, lang, id),
            ),
            None => (Vec::new(), format!("{}.{}", self.name, id)),
        };
        let response = self.fetch(&path, &params, Some(cache_key.as_str())).await?;
        Ok(response.data)
    }

    async fn get_many_op(&self, ids: &[String], lang: Option<Language>) -> Result<Vec<Value>> {
        if ids.len() == 1 {
            let record = self.get_one_op(&ids[0], lang).await?;
            return Ok(vec![record]);
        }

        // The key uses the sorted id set so that permutations of the
        // same ids share an entry; the response is reordered to the
        // caller's order below either way.
        let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let sorted = sorted.join(",");

        let mut params = vec![("ids", ids.join(","))];
        let cache_key = match lang {
            Some(lang) => {
                params.push(("lang", lang.code().to_owned()));
                format!("{}.{}.{}", self.name, lang, sorted)
            }
            None => format!("{}.{}", self.name, sorted),
        };

        let response = self.fetch(&self.name, &params, Some(cache_key.as_str())).await?;
        let records = as_array(response.data)?;
        Ok(reorder_by_id(records, ids))
    }

    async fn get_all_op(&self, lang: Option<Language>) -> Result<Vec<Value>> {
        let mut params = vec![("ids", "all".to_owned())];
        let cache_key = match lang {
            Some(lang) => {
                params.push(("lang", lang.code().to_owned()));
                format!("{}.{}.all", self.name, lang)
            }
            None => format!("{}.all", self.name),
        };
        let response = self.fetch(&self.name, &params, Some(cache_key.as_str())).await?;
        as_array(response.data)
    }

    fn page_request(&self, lang: Option<Language>) -> PageRequest {
        PageRequest {
            core: self.clone(),
            path: self.name.clone(),
            cache_stem: Some(self.name.clone()),
            lang,
        }
    }
}

/// A plain resource collection: unlocalized, and unauthenticated unless
/// constructed with a scope.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub(crate) core: EndpointCore,
}

impl Endpoint {
    pub(crate) fn new(core: EndpointCore) -> Self {
        Self { core }
    }

    /// Relative path of this resource.
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// True if a fresh response for `key` is already cached.
    pub fn has_cached(&self, key: &str) -> bool {
        self.core.has_cached(key)
    }

    /// Store the bearer token on this endpoint's authentication scope,
    /// affecting every endpoint that shares the scope. No effect on
    /// endpoints without one.
    pub fn set_access_token(&self, token: Option<&str>) {
        self.core.set_scope_token(token);
    }

    /// A copy of this endpoint that sends `token` instead of the stored
    /// one. The stored token is left untouched.
    pub fn with_access_token(&self, token: &str) -> Self {
        Self {
            core: self.core.with_override(token),
        }
    }

    /// All ids in this collection.
    pub async fn ids(&self) -> Result<Vec<Value>> {
        self.core.ids_op().await
    }

    /// One record by id.
    pub async fn get_one(&self, id: impl Display) -> Result<Value> {
        self.core.get_one_op(&id.to_string(), None).await
    }

    /// Several records in one batched request, returned in the order the
    /// ids were given. Exactly one id is delegated to
    /// [`get_one`](Self::get_one) and shares its cache entry.
    pub async fn get_many<I>(&self, ids: I) -> Result<Vec<Value>>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
        self.core.get_many_op(&ids, None).await
    }

    /// Every record with full details, in one request.
    pub async fn get_all(&self) -> Result<Vec<Value>> {
        self.core.get_all_op(None).await
    }

    /// One page of the collection.
    pub async fn page(&self, page: i32, page_size: u32) -> Result<Page> {
        self.core.page_request(None).fetch(page, page_size).await
    }
}

/// A resource whose content varies by language.
///
/// Every operation takes an optional language; `None` means the default
/// (English). The language is sent as a query parameter and becomes part
/// of the cache key, so each language is cached independently. Ids are
/// language-free and cached once.
#[derive(Debug, Clone)]
pub struct LocalizedEndpoint {
    pub(crate) core: EndpointCore,
    default_lang: Language,
}

impl LocalizedEndpoint {
    pub(crate) fn new(core: EndpointCore) -> Self {
        Self {
            core,
            default_lang: Language::default(),
        }
    }

    /// A copy of this endpoint whose operations fall back to `lang`
    /// instead of English when none is given.
    pub fn with_default_lang(&self, lang: Language) -> Self {
        Self {
            core: self.core.clone(),
            default_lang: lang,
        }
    }

    fn lang(&self, lang: Option<Language>) -> Language {
        lang.unwrap_or(self.default_lang)
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn has_cached(&self, key: &str) -> bool {
        self.core.has_cached(key)
    }

    pub async fn ids(&self) -> Result<Vec<Value>> {
        self.core.ids_op().await
    }

    pub async fn get_one(&self, id: impl Display, lang: Option<Language>) -> Result<Value> {
        self.core
            .get_one_op(&id.to_string(), Some(self.lang(lang)))
            .await
    }

    pub async fn get_many<I>(&self, ids: I, lang: Option<Language>) -> Result<Vec<Value>>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
        self.core.get_many_op(&ids, Some(self.lang(lang))).await
    }

    pub async fn get_all(&self, lang: Option<Language>) -> Result<Vec<Value>> {
        self.core.get_all_op(Some(self.lang(lang))).await
    }

    pub async fn page(&self, page: i32, page_size: u32, lang: Option<Language>) -> Result<Page> {
        self.core
            .page_request(Some(self.lang(lang)))
            .fetch(page, page_size)
            .await
    }
}

/// Records come back in whatever order the server picked; put them in
/// the order the ids were requested. Records for ids that were not asked
/// for (or without an id field) keep their relative position at the end.
fn reorder_by_id(records: Vec<Value>, ids: &[String]) -> Vec<Value> {
    let mut remaining: Vec<Option<Value>> = records.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());
    for id in ids {
        let matched = remaining.iter_mut().find(|slot| {
            slot.as_ref()
                .is_some_and(|record| record_id_matches(record, id))
        });
        if let Some(slot) = matched {
            if let Some(record) = slot.take() {
                ordered.push(record);
            }
        }
    }
    ordered.extend(remaining.into_iter().flatten());
    ordered
}

fn record_id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

/// Render an id value the way it appears in paths and id lists: strings
/// bare, everything else as JSON.
pub(crate) fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn as_array(data: Value) -> Result<Vec<Value>> {
    match data {
        Value::Array(items) => Ok(items),
        other => Err(Error::UnexpectedResponse(format!(
            "expected a JSON array, got: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_are_reordered_to_requested_ids() {
        let records = vec![
            json!({"id": "cake"}),
            json!({"id": "breakfast"}),
            json!({"id": "bubble"}),
        ];
        let ids = ["breakfast", "bubble", "cake"].map(String::from);
        let ordered = reorder_by_id(records, &ids);
        assert_eq!(
            ordered,
            vec![
                json!({"id": "breakfast"}),
                json!({"id": "bubble"}),
                json!({"id": "cake"}),
            ]
        );
    }

    #[test]
    fn numeric_ids_match_their_string_form() {
        let records = vec![json!({"id": 2}), json!({"id": 1})];
        let ids = ["1", "2"].map(String::from);
        assert_eq!(
            reorder_by_id(records, &ids),
            vec![json!({"id": 1}), json!({"id": 2})]
        );
    }

    #[test]
    fn unrequested_records_trail_in_server_order() {
        let records = vec![json!({"id": 9}), json!({"id": 1}), json!({"no_id": true})];
        let ids = ["1"].map(String::from);
        assert_eq!(
            reorder_by_id(records, &ids),
            vec![json!({"id": 1}), json!({"id": 9}), json!({"no_id": true})]
        );
    }

    #[test]
    fn id_strings_render_bare() {
        assert_eq!(id_string(&json!("breakfast")), "breakfast");
        assert_eq!(id_string(&json!(1234)), "1234");
    }
}
