//! Resource-specific compositions over the generic endpoint: everything
//! here is plain plumbing of the core operations, with no state of its
//! own beyond the endpoints it wraps.

use std::fmt::Display;

use serde_json::Value;

use crate::endpoint::{as_array, id_string, Endpoint, EndpointCore, LocalizedEndpoint};
use crate::error::{Error, Result};
use crate::language::Language;
use crate::pagination::{Page, PageRequest};

/// `build`: the running game build. Changes with every release, so it is
/// never cached.
#[derive(Debug, Clone)]
pub struct Build {
    core: EndpointCore,
}

impl Build {
    pub(crate) fn new(core: EndpointCore) -> Self {
        Self { core }
    }

    /// The current build id.
    pub async fn get(&self) -> Result<i64> {
        let data = self.core.fetch(&self.core.name, &[], None).await?.data;
        data.get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::UnexpectedResponse("build response without an id".into()))
    }
}

/// `recipes/search`: recipe lookup by ingredient or product.
#[derive(Debug, Clone)]
pub struct RecipeSearch {
    core: EndpointCore,
    recipes: Endpoint,
}

impl RecipeSearch {
    pub(crate) fn new(core: EndpointCore, recipes: Endpoint) -> Self {
        Self { core, recipes }
    }

    /// Ids of recipes that use `item_id` as an ingredient.
    pub async fn by_input(&self, item_id: i64) -> Result<Vec<Value>> {
        self.search("input", item_id).await
    }

    /// Ids of recipes that produce `item_id`.
    pub async fn by_output(&self, item_id: i64) -> Result<Vec<Value>> {
        self.search("output", item_id).await
    }

    /// Like [`by_input`](Self::by_input), with each id resolved to the
    /// full recipe through the recipes endpoint.
    pub async fn by_input_details(&self, item_id: i64) -> Result<Vec<Value>> {
        let ids = self.by_input(item_id).await?;
        self.recipes.get_many(ids.iter().map(id_string)).await
    }

    /// Like [`by_output`](Self::by_output), with details resolved.
    pub async fn by_output_details(&self, item_id: i64) -> Result<Vec<Value>> {
        let ids = self.by_output(item_id).await?;
        self.recipes.get_many(ids.iter().map(id_string)).await
    }

    async fn search(&self, direction: &str, item_id: i64) -> Result<Vec<Value>> {
        let params = [(direction, item_id.to_string())];
        let cache_key = format!("recipes_{direction}_{item_id}");
        as_array(
            self.core
                .fetch(&self.core.name, &params, Some(cache_key.as_str()))
                .await?
                .data,
        )
    }
}

/// `achievements`: a localized endpoint plus the daily rotations.
#[derive(Debug, Clone)]
pub struct Achievements {
    endpoint: LocalizedEndpoint,
}

impl Achievements {
    pub(crate) fn new(endpoint: LocalizedEndpoint) -> Self {
        Self { endpoint }
    }

    pub async fn ids(&self) -> Result<Vec<Value>> {
        self.endpoint.ids().await
    }

    pub async fn get_one(&self, id: impl Display, lang: Option<Language>) -> Result<Value> {
        self.endpoint.get_one(id, lang).await
    }

    pub async fn get_many<I>(&self, ids: I, lang: Option<Language>) -> Result<Vec<Value>>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.endpoint.get_many(ids, lang).await
    }

    pub async fn get_all(&self, lang: Option<Language>) -> Result<Vec<Value>> {
        self.endpoint.get_all(lang).await
    }

    pub async fn page(&self, page: i32, page_size: u32, lang: Option<Language>) -> Result<Page> {
        self.endpoint.page(page, page_size, lang).await
    }

    /// Today's daily achievements, grouped by game mode.
    pub async fn daily(&self) -> Result<Value> {
        self.endpoint.get_one("daily", None).await
    }

    /// Tomorrow's rotation.
    pub async fn daily_tomorrow(&self) -> Result<Value> {
        self.endpoint.get_one("daily/tomorrow", None).await
    }
}

/// `wvw/matches`: the currently running matchups.
#[derive(Debug, Clone)]
pub struct WvwMatches {
    endpoint: Endpoint,
}

impl WvwMatches {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub async fn ids(&self) -> Result<Vec<Value>> {
        self.endpoint.ids().await
    }

    pub async fn get_one(&self, id: impl Display) -> Result<Value> {
        self.endpoint.get_one(id).await
    }

    pub async fn get_many<I>(&self, ids: I) -> Result<Vec<Value>>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.endpoint.get_many(ids).await
    }

    pub async fn get_all(&self) -> Result<Vec<Value>> {
        self.endpoint.get_all().await
    }

    /// The match a world currently participates in.
    pub async fn world(&self, world_id: i64) -> Result<Value> {
        let core = &self.endpoint.core;
        let params = [("world", world_id.to_string())];
        let cache_key = format!("wvw_matches_world_{world_id}");
        Ok(core
            .fetch(&core.name, &params, Some(cache_key.as_str()))
            .await?
            .data)
    }
}

/// `emblem/foregrounds` and `emblem/backgrounds`. The remote 404s on the
/// `/<id>` path form, so single lookups go through `?id=` instead.
#[derive(Debug, Clone)]
pub struct Emblem {
    endpoint: Endpoint,
}

impl Emblem {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub async fn ids(&self) -> Result<Vec<Value>> {
        self.endpoint.ids().await
    }

    pub async fn get_one(&self, id: i64) -> Result<Value> {
        let core = &self.endpoint.core;
        let params = [("id", id.to_string())];
        let cache_key = format!("{}.{}", core.name, id);
        Ok(core
            .fetch(&core.name, &params, Some(cache_key.as_str()))
            .await?
            .data)
    }

    pub async fn get_many(&self, ids: &[i64]) -> Result<Vec<Value>> {
        if let [id] = ids {
            return Ok(vec![self.get_one(*id).await?]);
        }
        self.endpoint.get_many(ids).await
    }

    pub async fn get_all(&self) -> Result<Vec<Value>> {
        self.endpoint.get_all().await
    }
}

/// `pvp/seasons` plus the per-season leaderboards.
#[derive(Debug, Clone)]
pub struct PvpSeasons {
    endpoint: LocalizedEndpoint,
}

impl PvpSeasons {
    pub(crate) fn new(endpoint: LocalizedEndpoint) -> Self {
        Self { endpoint }
    }

    pub async fn ids(&self) -> Result<Vec<Value>> {
        self.endpoint.ids().await
    }

    pub async fn get_one(&self, id: impl Display, lang: Option<Language>) -> Result<Value> {
        self.endpoint.get_one(id, lang).await
    }

    pub async fn get_many<I>(&self, ids: I, lang: Option<Language>) -> Result<Vec<Value>>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.endpoint.get_many(ids, lang).await
    }

    pub async fn get_all(&self, lang: Option<Language>) -> Result<Vec<Value>> {
        self.endpoint.get_all(lang).await
    }

    /// Leaderboard kinds available for a season.
    pub async fn leaderboards(&self, season_id: &str) -> Result<Vec<Value>> {
        let core = &self.endpoint.core;
        let path = format!("{}/{}/leaderboards", core.name, season_id);
        let cache_key = format!("{}.{}.leaderboards", core.name, season_id);
        as_array(
            core.fetch(&path, &[], Some(cache_key.as_str()))
                .await?
                .data,
        )
    }

    /// One page of a season leaderboard (`ladder` or `legendary`,
    /// optionally region-scoped).
    pub async fn leaderboard(
        &self,
        season_id: &str,
        board: &str,
        region: Option<&str>,
        page: i32,
        page_size: u32,
    ) -> Result<Page> {
        let core = &self.endpoint.core;
        let mut path = format!("{}/{}/leaderboards/{}", core.name, season_id, board);
        if let Some(region) = region {
            path.push('/');
            path.push_str(region);
        }
        PageRequest {
            core: core.clone(),
            path: path.clone(),
            cache_stem: Some(path),
            lang: None,
        }
        .fetch(page, page_size)
        .await
    }
}

/// `guild`: public guild details and exact-name search.
#[derive(Debug, Clone)]
pub struct Guild {
    core: EndpointCore,
}

impl Guild {
    pub(crate) fn new(core: EndpointCore) -> Self {
        Self { core }
    }

    /// Details for one guild id.
    pub async fn get(&self, guild_id: &str) -> Result<Value> {
        let path = format!("{}/{}", self.core.name, guild_id);
        let cache_key = format!("{}.{}", self.core.name, guild_id);
        Ok(self
            .core
            .fetch(&path, &[], Some(cache_key.as_str()))
            .await?
            .data)
    }

    /// Ids of guilds whose name matches `name` exactly.
    pub async fn search(&self, name: &str) -> Result<Vec<Value>> {
        let path = format!("{}/search", self.core.name);
        let params = [("name", name.to_owned())];
        let cache_key = format!("guild_search.{name}");
        as_array(
            self.core
                .fetch(&path, &params, Some(cache_key.as_str()))
                .await?
                .data,
        )
    }
}
