//! Token-scoped resources. Responses tied to a token are not written to
//! the shared disk cache, with the exception of the character endpoint's
//! generic collection operations, which behave like any other endpoint.

use std::fmt::Display;

use serde_json::Value;

use crate::endpoint::{as_array, Endpoint, EndpointCore};
use crate::error::Result;
use crate::pagination::{Page, PageRequest};

/// `account`: the account the token belongs to, plus its sub-resources.
#[derive(Debug, Clone)]
pub struct Account {
    core: EndpointCore,
}

impl Account {
    pub(crate) fn new(core: EndpointCore) -> Self {
        Self { core }
    }

    /// Store the bearer token on this endpoint family's scope.
    pub fn set_access_token(&self, token: Option<&str>) {
        self.core.set_scope_token(token);
    }

    /// A copy sending `token` for its calls only; the stored token is
    /// untouched.
    pub fn with_access_token(&self, token: &str) -> Self {
        Self {
            core: self.core.with_override(token),
        }
    }

    /// The account record itself.
    pub async fn get(&self) -> Result<Value> {
        Ok(self.core.fetch(&self.core.name, &[], None).await?.data)
    }

    /// Item slots in the account vault.
    pub async fn bank(&self) -> Result<Vec<Value>> {
        let path = format!("{}/bank", self.core.name);
        as_array(self.core.fetch(&path, &[], None).await?.data)
    }

    /// Material storage counts.
    pub async fn materials(&self) -> Result<Vec<Value>> {
        let path = format!("{}/materials", self.core.name);
        as_array(self.core.fetch(&path, &[], None).await?.data)
    }
}

/// `characters`: ids are character names; the generic collection
/// operations apply, plus per-character sub-resources.
#[derive(Debug, Clone)]
pub struct Characters {
    endpoint: Endpoint,
}

impl Characters {
    pub(crate) fn new(core: EndpointCore) -> Self {
        Self {
            endpoint: Endpoint::new(core),
        }
    }

    pub fn set_access_token(&self, token: Option<&str>) {
        self.endpoint.set_access_token(token);
    }

    pub fn with_access_token(&self, token: &str) -> Self {
        Self {
            endpoint: self.endpoint.with_access_token(token),
        }
    }

    /// Names of all characters on the account.
    pub async fn ids(&self) -> Result<Vec<Value>> {
        self.endpoint.ids().await
    }

    pub async fn get_one(&self, name: impl Display) -> Result<Value> {
        self.endpoint.get_one(name).await
    }

    pub async fn get_many<I>(&self, names: I) -> Result<Vec<Value>>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.endpoint.get_many(names).await
    }

    pub async fn get_all(&self) -> Result<Vec<Value>> {
        self.endpoint.get_all().await
    }

    pub async fn page(&self, page: i32, page_size: u32) -> Result<Page> {
        self.endpoint.page(page, page_size).await
    }

    /// Bag contents of one character.
    pub async fn inventory(&self, name: &str) -> Result<Value> {
        self.sub_resource(name, "inventory").await
    }

    /// Equipped items of one character.
    pub async fn equipment(&self, name: &str) -> Result<Value> {
        self.sub_resource(name, "equipment").await
    }

    async fn sub_resource(&self, name: &str, what: &str) -> Result<Value> {
        let core = &self.endpoint.core;
        let path = format!("{}/{}/{}", core.name, name, what);
        let cache_key = format!("{}.{}.{}", core.name, name, what);
        Ok(core
            .fetch(&path, &[], Some(cache_key.as_str()))
            .await?
            .data)
    }
}

/// `tokeninfo`: reports the name and permissions of a key. The token to
/// inspect is always the one passed in, never a stored one.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    core: EndpointCore,
}

impl TokenInfo {
    pub(crate) fn new(core: EndpointCore) -> Self {
        Self { core }
    }

    pub async fn get(&self, token: &str) -> Result<Value> {
        let core = self.core.with_override(token);
        Ok(core.fetch(&core.name, &[], None).await?.data)
    }
}

/// `commerce/transactions`: the trading-post ledger. Always paged.
#[derive(Debug, Clone)]
pub struct Transactions {
    core: EndpointCore,
}

impl Transactions {
    pub(crate) fn new(core: EndpointCore) -> Self {
        Self { core }
    }

    pub fn set_access_token(&self, token: Option<&str>) {
        self.core.set_scope_token(token);
    }

    pub fn with_access_token(&self, token: &str) -> Self {
        Self {
            core: self.core.with_override(token),
        }
    }

    pub async fn current_buys(&self, page: i32, page_size: u32) -> Result<Page> {
        self.page("current/buys", page, page_size).await
    }

    pub async fn current_sells(&self, page: i32, page_size: u32) -> Result<Page> {
        self.page("current/sells", page, page_size).await
    }

    pub async fn history_buys(&self, page: i32, page_size: u32) -> Result<Page> {
        self.page("history/buys", page, page_size).await
    }

    pub async fn history_sells(&self, page: i32, page_size: u32) -> Result<Page> {
        self.page("history/sells", page, page_size).await
    }

    /// One page of a ledger section (`current/buys`, `history/sells`, …).
    pub async fn page(&self, section: &str, page: i32, page_size: u32) -> Result<Page> {
        PageRequest {
            core: self.core.clone(),
            path: format!("{}/{}", self.core.name, section),
            cache_stem: None,
            lang: None,
        }
        .fetch(page, page_size)
        .await
    }
}

/// A single token-scoped document (`pvp/stats`, `pvp/standings`).
#[derive(Debug, Clone)]
pub struct AuthenticatedResource {
    core: EndpointCore,
}

impl AuthenticatedResource {
    pub(crate) fn new(core: EndpointCore) -> Self {
        Self { core }
    }

    pub fn set_access_token(&self, token: Option<&str>) {
        self.core.set_scope_token(token);
    }

    pub fn with_access_token(&self, token: &str) -> Self {
        Self {
            core: self.core.with_override(token),
        }
    }

    pub async fn get(&self) -> Result<Value> {
        Ok(self.core.fetch(&self.core.name, &[], None).await?.data)
    }
}
