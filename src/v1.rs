//! Version 1 API: the older flat registry.
//!
//! v1 resources are single JSON documents filtered through query
//! parameters rather than id-addressed collections. They are expressed
//! through the same cached-fetch core as v2; only the path and key
//! conventions differ (paths end in `.json`, localized keys put the
//! language last).

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::client::{ClientInner, V1_BASE_URL};
use crate::endpoint::{as_array, id_string, EndpointCore};
use crate::error::{Error, Result};
use crate::language::Language;

/// A running WvW match as reported by `wvw/matches.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WvwMatch {
    pub wvw_match_id: String,
    pub red_world_id: i64,
    pub blue_world_id: i64,
    pub green_world_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// All version 1 resources.
#[derive(Debug)]
pub struct Api {
    core: EndpointCore,
}

impl Api {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self {
            core: EndpointCore::new(client, V1_BASE_URL, ""),
        }
    }

    fn lang(lang: Option<Language>) -> Language {
        lang.unwrap_or_default()
    }

    /// The current build id. Never cached.
    pub async fn build(&self) -> Result<i64> {
        let data = self.core.fetch("build.json", &[], None).await?.data;
        data.get("build_id")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::UnexpectedResponse("build.json without build_id".into()))
    }

    /// All dyes, keyed by color id.
    pub async fn colors(&self, lang: Option<Language>) -> Result<Map<String, Value>> {
        let lang = Self::lang(lang);
        let params = [("lang", lang.code().to_owned())];
        let cache_key = format!("colors.{lang}");
        let data = self
            .core
            .fetch("colors.json", &params, Some(cache_key.as_str()))
            .await?
            .data;
        object_field(data, "colors")
    }

    /// Commonly requested render-service assets, keyed by file id.
    pub async fn files(&self) -> Result<Map<String, Value>> {
        let data = self.core.fetch("files.json", &[], Some("files")).await?.data;
        match data {
            Value::Object(map) => Ok(map),
            other => Err(Error::UnexpectedResponse(format!(
                "expected a JSON object, got: {other}"
            ))),
        }
    }

    /// The two continents, keyed by continent id.
    pub async fn continents(&self) -> Result<Map<String, Value>> {
        let data = self
            .core
            .fetch("continents.json", &[], Some("continents"))
            .await?
            .data;
        object_field(data, "continents")
    }

    /// Localized map names, keyed by map id. Only maps with events are
    /// listed; use [`maps`](Self::maps) for the full set.
    pub async fn map_names(&self, lang: Option<Language>) -> Result<BTreeMap<String, String>> {
        self.names("map_names.json", "map_names", lang).await
    }

    /// Map details, optionally narrowed to a single map.
    pub async fn maps(
        &self,
        map_id: Option<i64>,
        lang: Option<Language>,
    ) -> Result<Map<String, Value>> {
        let lang = Self::lang(lang);
        let mut params = Vec::new();
        let cache_key = match map_id {
            Some(id) => {
                params.push(("map_id", id.to_string()));
                format!("maps.{id}.{lang}")
            }
            None => format!("maps.{lang}"),
        };
        params.push(("lang", lang.code().to_owned()));
        let data = self
            .core
            .fetch("maps.json", &params, Some(cache_key.as_str()))
            .await?
            .data;
        object_field(data, "maps")
    }

    /// One floor of a continent: texture dimensions and regions.
    pub async fn map_floor(
        &self,
        continent_id: i64,
        floor: i64,
        lang: Option<Language>,
    ) -> Result<Value> {
        let lang = Self::lang(lang);
        let params = [
            ("continent_id", continent_id.to_string()),
            ("floor", floor.to_string()),
            ("lang", lang.code().to_owned()),
        ];
        let cache_key = format!("map_floor.{continent_id}.{floor}.{lang}");
        Ok(self
            .core
            .fetch("map_floor.json", &params, Some(cache_key.as_str()))
            .await?
            .data)
    }

    /// Localized event names, keyed by event id.
    pub async fn event_names(&self, lang: Option<Language>) -> Result<BTreeMap<String, String>> {
        self.names("event_names.json", "event_names", lang).await
    }

    /// Static details for every event, keyed by event id.
    pub async fn event_details(&self, lang: Option<Language>) -> Result<Map<String, Value>> {
        let lang = Self::lang(lang);
        let params = [("lang", lang.code().to_owned())];
        let cache_key = format!("event_details.{lang}");
        let data = self
            .core
            .fetch("event_details.json", &params, Some(cache_key.as_str()))
            .await?
            .data;
        object_field(data, "events")
    }

    /// Static details for one event.
    pub async fn event_detail(&self, event_id: &str, lang: Option<Language>) -> Result<Value> {
        let lang = Self::lang(lang);
        let params = [
            ("event_id", event_id.to_owned()),
            ("lang", lang.code().to_owned()),
        ];
        let cache_key = format!("event_details.{event_id}.{lang}");
        let data = self
            .core
            .fetch("event_details.json", &params, Some(cache_key.as_str()))
            .await?
            .data;
        let mut events = object_field(data, "events")?;
        events
            .remove(event_id)
            .ok_or_else(|| Error::UnexpectedResponse(format!("no event {event_id} in response")))
    }

    /// Ids of all discovered items.
    pub async fn items(&self) -> Result<Vec<Value>> {
        let data = self.core.fetch("items.json", &[], Some("items")).await?.data;
        array_field(data, "items")
    }

    /// Details about a single item.
    pub async fn item_details(&self, item_id: i64, lang: Option<Language>) -> Result<Value> {
        self.details("item_details", "item_id", &item_id.to_string(), lang)
            .await
    }

    /// Ids of all discovered recipes.
    pub async fn recipes(&self) -> Result<Vec<Value>> {
        let data = self
            .core
            .fetch("recipes.json", &[], Some("recipes"))
            .await?
            .data;
        array_field(data, "recipes")
    }

    /// Details about a single recipe.
    pub async fn recipe_details(&self, recipe_id: i64, lang: Option<Language>) -> Result<Value> {
        self.details("recipe_details", "recipe_id", &recipe_id.to_string(), lang)
            .await
    }

    /// Ids of all discovered skins.
    pub async fn skins(&self) -> Result<Vec<Value>> {
        let data = self.core.fetch("skins.json", &[], Some("skins")).await?.data;
        array_field(data, "skins")
    }

    /// Details about a single skin.
    pub async fn skin_details(&self, skin_id: i64, lang: Option<Language>) -> Result<Value> {
        self.details("skin_details", "skin_id", &skin_id.to_string(), lang)
            .await
    }

    /// Details about a guild, by id or by name. Only one is required; if
    /// both are given the id takes precedence and the name is ignored
    /// with a warning.
    pub async fn guild_details(
        &self,
        guild_id: Option<&str>,
        name: Option<&str>,
    ) -> Result<Value> {
        if guild_id.is_some() && name.is_some() {
            warn!("both guild_id and name are specified, name will be ignored");
        }
        let (params, cache_key) = if let Some(id) = guild_id {
            ([("guild_id", id.to_owned())], format!("guild_details.{id}"))
        } else if let Some(name) = name {
            (
                [("guild_name", name.to_owned())],
                format!("guild_details.{name}"),
            )
        } else {
            return Err(Error::MissingParameter("guild_id or name"));
        };
        Ok(self
            .core
            .fetch("guild_details.json", &params, Some(cache_key.as_str()))
            .await?
            .data)
    }

    /// The currently running WvW matches, with parsed timestamps. Never
    /// cached; matchups roll over too quickly.
    pub async fn wvw_matches(&self) -> Result<Vec<WvwMatch>> {
        let data = self.core.fetch("wvw/matches.json", &[], None).await?.data;
        array_field(data, "wvw_matches")?
            .into_iter()
            .map(|entry| serde_json::from_value(entry).map_err(Error::from))
            .collect()
    }

    /// Scores and map details for one match.
    pub async fn wvw_match_details(&self, match_id: &str) -> Result<Value> {
        let params = [("match_id", match_id.to_owned())];
        let cache_key = format!("wvw_match_details.{match_id}");
        Ok(self
            .core
            .fetch("wvw/match_details.json", &params, Some(cache_key.as_str()))
            .await?
            .data)
    }

    /// Localized WvW objective names, keyed by objective id.
    pub async fn wvw_objective_names(
        &self,
        lang: Option<Language>,
    ) -> Result<BTreeMap<String, String>> {
        self.names("wvw/objective_names.json", "wvw_objective_names", lang)
            .await
    }

    async fn names(
        &self,
        path: &str,
        stem: &str,
        lang: Option<Language>,
    ) -> Result<BTreeMap<String, String>> {
        let lang = Self::lang(lang);
        let params = [("lang", lang.code().to_owned())];
        let cache_key = format!("{stem}.{lang}");
        let data = self
            .core
            .fetch(path, &params, Some(cache_key.as_str()))
            .await?
            .data;
        let entries: Vec<NameEntry> = serde_json::from_value(data)?;
        Ok(entries
            .into_iter()
            .map(|entry| (id_string(&entry.id), entry.name))
            .collect())
    }

    async fn details(
        &self,
        what: &str,
        id_param: &str,
        id: &str,
        lang: Option<Language>,
    ) -> Result<Value> {
        let lang = Self::lang(lang);
        let params = [
            (id_param, id.to_owned()),
            ("lang", lang.code().to_owned()),
        ];
        let path = format!("{what}.json");
        let cache_key = format!("{what}.{id}.{lang}");
        Ok(self
            .core
            .fetch(&path, &params, Some(cache_key.as_str()))
            .await?
            .data)
    }
}

#[derive(Deserialize)]
struct NameEntry {
    id: Value,
    name: String,
}

fn object_field(data: Value, field: &str) -> Result<Map<String, Value>> {
    match data {
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Object(inner)) => Ok(inner),
            _ => Err(Error::UnexpectedResponse(format!(
                "response without a {field:?} object"
            ))),
        },
        other => Err(Error::UnexpectedResponse(format!(
            "expected a JSON object, got: {other}"
        ))),
    }
}

fn array_field(data: Value, field: &str) -> Result<Vec<Value>> {
    match data {
        Value::Object(mut map) => match map.remove(field) {
            Some(array @ Value::Array(_)) => as_array(array),
            _ => Err(Error::UnexpectedResponse(format!(
                "response without a {field:?} list"
            ))),
        },
        other => Err(Error::UnexpectedResponse(format!(
            "expected a JSON object, got: {other}"
        ))),
    }
}
