//! Version 2 API: the endpoint registry.
//!
//! Construction is a declarative enumeration: one field per remote
//! resource, every one built from the same generic machinery. The
//! parallel [`routes`](Api::routes) table describes the same registry in
//! data form so coverage tests can iterate it.

mod authenticated;
mod special;

pub use authenticated::{Account, AuthenticatedResource, Characters, TokenInfo, Transactions};
pub use special::{Achievements, Build, Emblem, Guild, PvpSeasons, RecipeSearch, WvwMatches};

use std::sync::Arc;

use crate::client::{ClientInner, V2_BASE_URL};
use crate::endpoint::{AuthScope, Endpoint, EndpointCore, LocalizedEndpoint};

/// One entry of the route registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Path relative to the v2 root.
    pub path: &'static str,
    /// Whether responses vary by requested language.
    pub localized: bool,
    /// Whether the resource requires a bearer token.
    pub authenticated: bool,
}

const fn route(path: &'static str, localized: bool, authenticated: bool) -> Route {
    Route {
        path,
        localized,
        authenticated,
    }
}

const ROUTES: &[Route] = &[
    route("account", false, true),
    route("account/bank", false, true),
    route("account/materials", false, true),
    route("achievements", true, false),
    route("achievements/categories", true, false),
    route("achievements/groups", true, false),
    route("backstory/answers", true, false),
    route("backstory/questions", true, false),
    route("build", false, false),
    route("characters", false, true),
    route("colors", true, false),
    route("commerce/exchange", false, false),
    route("commerce/listings", false, false),
    route("commerce/prices", false, false),
    route("commerce/transactions", false, true),
    route("continents", true, false),
    route("currencies", true, false),
    route("emblem/backgrounds", false, false),
    route("emblem/foregrounds", false, false),
    route("events", true, false),
    route("events-state", false, false),
    route("files", false, false),
    route("finishers", true, false),
    route("floors", true, false),
    route("guild", false, false),
    route("guild/permissions", true, false),
    route("guild/search", false, false),
    route("guild/upgrades", true, false),
    route("items", true, false),
    route("itemstats", true, false),
    route("leaderboards", false, false),
    route("legends", false, false),
    route("maps", true, false),
    route("masteries", true, false),
    route("minis", true, false),
    route("outfits", true, false),
    route("pets", true, false),
    route("professions", true, false),
    route("pvp/amulets", true, false),
    route("pvp/games", false, true),
    route("pvp/seasons", true, false),
    route("pvp/standings", false, true),
    route("pvp/stats", false, true),
    route("quaggans", false, false),
    route("recipes", false, false),
    route("recipes/search", false, false),
    route("skills", true, false),
    route("skins", true, false),
    route("specializations", true, false),
    route("stories", true, false),
    route("stories/seasons", true, false),
    route("titles", true, false),
    route("tokeninfo", false, true),
    route("traits", true, false),
    route("worlds", true, false),
    route("wvw/abilities", true, false),
    route("wvw/matches", false, false),
    route("wvw/objectives", true, false),
];

/// All version 2 resources.
#[derive(Debug)]
pub struct Api {
    pub build: Build,

    pub achievements: Achievements,
    pub achievement_categories: LocalizedEndpoint,
    pub achievement_groups: LocalizedEndpoint,
    pub backstory_answers: LocalizedEndpoint,
    pub backstory_questions: LocalizedEndpoint,
    pub colors: LocalizedEndpoint,
    pub continents: LocalizedEndpoint,
    pub currencies: LocalizedEndpoint,
    pub events: LocalizedEndpoint,
    pub events_state: Endpoint,
    pub exchange: Endpoint,
    pub files: Endpoint,
    pub finishers: LocalizedEndpoint,
    pub floors: LocalizedEndpoint,
    pub item_stats: LocalizedEndpoint,
    pub items: LocalizedEndpoint,
    pub leaderboards: Endpoint,
    pub legends: Endpoint,
    pub listings: Endpoint,
    pub maps: LocalizedEndpoint,
    pub masteries: LocalizedEndpoint,
    pub minis: LocalizedEndpoint,
    pub outfits: LocalizedEndpoint,
    pub pets: LocalizedEndpoint,
    pub prices: Endpoint,
    pub professions: LocalizedEndpoint,
    pub quaggans: Endpoint,
    pub recipes: Endpoint,
    pub recipe_search: RecipeSearch,
    pub skills: LocalizedEndpoint,
    pub skins: LocalizedEndpoint,
    pub specializations: LocalizedEndpoint,
    pub stories: LocalizedEndpoint,
    pub story_seasons: LocalizedEndpoint,
    pub titles: LocalizedEndpoint,
    pub traits: LocalizedEndpoint,
    pub worlds: LocalizedEndpoint,

    pub emblem_backgrounds: Emblem,
    pub emblem_foregrounds: Emblem,
    pub guild: Guild,
    pub guild_permissions: LocalizedEndpoint,
    pub guild_upgrades: LocalizedEndpoint,

    pub pvp_amulets: LocalizedEndpoint,
    pub pvp_seasons: PvpSeasons,

    pub wvw_abilities: LocalizedEndpoint,
    pub wvw_matches: WvwMatches,
    pub wvw_objectives: LocalizedEndpoint,

    pub account: Account,
    pub characters: Characters,
    pub pvp_games: Endpoint,
    pub pvp_standings: AuthenticatedResource,
    pub pvp_stats: AuthenticatedResource,
    pub token_info: TokenInfo,
    pub transactions: Transactions,
}

impl Api {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        let core = |name: &str| EndpointCore::new(Arc::clone(&client), V2_BASE_URL, name);
        let plain = |name: &str| Endpoint::new(core(name));
        let localized = |name: &str| LocalizedEndpoint::new(core(name));

        // One scope per permission family: endpoints sharing a scope
        // share their stored token.
        let account_scope = AuthScope::new();
        let characters_scope = AuthScope::new();
        let transactions_scope = AuthScope::new();
        let pvp_scope = AuthScope::new();
        let token_scope = AuthScope::new();

        let recipes = plain("recipes");

        Self {
            build: Build::new(core("build")),

            achievements: Achievements::new(localized("achievements")),
            achievement_categories: localized("achievements/categories"),
            achievement_groups: localized("achievements/groups"),
            backstory_answers: localized("backstory/answers"),
            backstory_questions: localized("backstory/questions"),
            colors: localized("colors"),
            continents: localized("continents"),
            currencies: localized("currencies"),
            events: localized("events"),
            events_state: plain("events-state"),
            exchange: plain("commerce/exchange"),
            files: plain("files"),
            finishers: localized("finishers"),
            floors: localized("floors"),
            item_stats: localized("itemstats"),
            items: localized("items"),
            leaderboards: plain("leaderboards"),
            legends: plain("legends"),
            listings: plain("commerce/listings"),
            maps: localized("maps"),
            masteries: localized("masteries"),
            minis: localized("minis"),
            outfits: localized("outfits"),
            pets: localized("pets"),
            prices: plain("commerce/prices"),
            professions: localized("professions"),
            quaggans: plain("quaggans"),
            recipe_search: RecipeSearch::new(core("recipes/search"), recipes.clone()),
            recipes,
            skills: localized("skills"),
            skins: localized("skins"),
            specializations: localized("specializations"),
            stories: localized("stories"),
            story_seasons: localized("stories/seasons"),
            titles: localized("titles"),
            traits: localized("traits"),
            worlds: localized("worlds"),

            emblem_backgrounds: Emblem::new(plain("emblem/backgrounds")),
            emblem_foregrounds: Emblem::new(plain("emblem/foregrounds")),
            guild: Guild::new(core("guild")),
            guild_permissions: localized("guild/permissions"),
            guild_upgrades: localized("guild/upgrades"),

            pvp_amulets: localized("pvp/amulets"),
            pvp_seasons: PvpSeasons::new(localized("pvp/seasons")),

            wvw_abilities: localized("wvw/abilities"),
            wvw_matches: WvwMatches::new(plain("wvw/matches")),
            wvw_objectives: localized("wvw/objectives"),

            account: Account::new(core("account").with_auth(Arc::clone(&account_scope))),
            characters: Characters::new(
                core("characters").with_auth(Arc::clone(&characters_scope)),
            ),
            pvp_games: Endpoint::new(core("pvp/games").with_auth(Arc::clone(&pvp_scope))),
            pvp_standings: AuthenticatedResource::new(
                core("pvp/standings").with_auth(Arc::clone(&pvp_scope)),
            ),
            pvp_stats: AuthenticatedResource::new(
                core("pvp/stats").with_auth(Arc::clone(&pvp_scope)),
            ),
            token_info: TokenInfo::new(core("tokeninfo").with_auth(token_scope)),
            transactions: Transactions::new(
                core("commerce/transactions").with_auth(transactions_scope),
            ),
        }
    }

    /// Store one token on every authentication scope in the registry.
    /// Scopes can still be set individually through their endpoints.
    pub fn set_access_token(&self, token: Option<&str>) {
        self.account.set_access_token(token);
        self.characters.set_access_token(token);
        self.transactions.set_access_token(token);
        // The pvp endpoints share one scope; setting it once suffices.
        self.pvp_stats.set_access_token(token);
    }

    /// Every route this registry serves, with localization and
    /// authentication flags.
    pub fn routes(&self) -> &'static [Route] {
        ROUTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_paths_are_unique_and_sorted() {
        for pair in ROUTES.windows(2) {
            assert!(
                pair[0].path < pair[1].path,
                "routes out of order: {} >= {}",
                pair[0].path,
                pair[1].path
            );
        }
    }

    #[test]
    fn known_flags() {
        let find = |path: &str| {
            ROUTES
                .iter()
                .find(|route| route.path == path)
                .unwrap_or_else(|| panic!("no route {path}"))
        };
        assert!(find("items").localized);
        assert!(!find("quaggans").localized);
        assert!(find("account").authenticated);
        assert!(find("commerce/transactions").authenticated);
        assert!(!find("commerce/prices").authenticated);
    }
}
