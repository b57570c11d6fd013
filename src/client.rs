//! The top-level client: shared transport and cache, plus one registry
//! per API version.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::cache::CacheStore;
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use crate::{v1, v2};

/// Root of the version 1 API.
pub const V1_BASE_URL: &str = "https://api.guildwars2.com/v1/";
/// Root of the version 2 API.
pub const V2_BASE_URL: &str = "https://api.guildwars2.com/v2/";

/// State shared by every endpoint of one client.
#[derive(Debug)]
pub(crate) struct ClientInner {
    transport: RwLock<Arc<dyn Transport>>,
    pub(crate) cache: CacheStore,
}

impl ClientInner {
    pub(crate) fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport.read())
    }
}

/// Entry point to both API versions.
///
/// ```no_run
/// # async fn run() -> Result<(), tyria::Error> {
/// let client = tyria::Client::new()?;
/// client.cache().set_dir(tyria::CacheStore::default_dir().as_deref())?;
///
/// let names = client.v2().quaggans.ids().await?;
/// let item = client.v2().items.get_one(30689, None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
    v1: v1::Api,
    v2: v2::Api,
}

impl Client {
    /// A client with the default HTTP transport. Caching starts disabled;
    /// configure it through [`cache()`](Self::cache).
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new()?)))
    }

    /// A client with a custom transport. Tests inject their mock here.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let inner = Arc::new(ClientInner {
            transport: RwLock::new(transport),
            cache: CacheStore::new(),
        });
        let v1 = v1::Api::new(Arc::clone(&inner));
        let v2 = v2::Api::new(Arc::clone(&inner));
        Self { inner, v1, v2 }
    }

    /// Replace the transport used by all subsequent requests.
    pub fn set_transport(&self, transport: Arc<dyn Transport>) {
        *self.inner.transport.write() = transport;
    }

    /// The response cache configuration shared by both API versions.
    pub fn cache(&self) -> &CacheStore {
        &self.inner.cache
    }

    /// Shorthand for [`CacheStore::set_dir`].
    pub fn set_cache_dir(&self, dir: Option<&Path>) -> Result<()> {
        self.inner.cache.set_dir(dir)
    }

    /// Shorthand for [`CacheStore::set_ttl`].
    pub fn set_cache_ttl(&self, ttl: Duration) {
        self.inner.cache.set_ttl(ttl)
    }

    /// The version 1 endpoint registry.
    pub fn v1(&self) -> &v1::Api {
        &self.v1
    }

    /// The version 2 endpoint registry.
    pub fn v2(&self) -> &v2::Api {
        &self.v2
    }
}
