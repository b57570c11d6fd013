//! Client library for the Guild Wars 2 web API.
//!
//! Every remote resource is exposed as a typed local call. Responses are
//! transparently cached on disk with a configurable TTL, and pagination,
//! localization and bearer-token authentication are all layered over one
//! generic endpoint mechanism. Record payloads are [`serde_json::Value`]s;
//! their schemas are the server's business.
//!
//! ```no_run
//! # async fn run() -> Result<(), tyria::Error> {
//! let client = tyria::Client::new()?;
//! client.cache().set_dir(tyria::CacheStore::default_dir().as_deref())?;
//!
//! let names = client.v2().quaggans.ids().await?;
//! let item = client
//!     .v2()
//!     .items
//!     .get_one(30689, Some(tyria::Language::French))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Operations are `async` and complete after a cache read or a single
//! network round-trip. There is no background refresh and no retrying;
//! a failed request surfaces its error immediately. Concurrent fetches
//! of the same missing key are not deduplicated: both hit the network
//! and the last write wins.

mod cache;
mod chatlink;
mod client;
mod endpoint;
mod error;
mod language;
mod pagination;
mod transport;
pub mod v1;
pub mod v2;

pub use cache::{CacheStore, DEFAULT_TTL};
pub use chatlink::ChatLink;
pub use client::{Client, V1_BASE_URL, V2_BASE_URL};
pub use endpoint::{Endpoint, LocalizedEndpoint};
pub use error::{Error, Result};
pub use language::Language;
pub use pagination::Page;
pub use transport::{ApiResponse, HttpTransport, PageMeta, Transport};
